//! HTML form front end

use axum::{extract::State, response::Html, Form};
use minijinja::context;
use serde::Deserialize;

use crate::error::Result;
use crate::server::state::AppState;

/// Page template, registered once in the app state
pub const INDEX_TEMPLATE: &str = include_str!("../../../templates/index.html");

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub query: String,
}

/// GET / - Empty query form
pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    render(&state, "", "", "")
}

/// POST /ask - Answer the submitted query and render it
pub async fn ask(State(state): State<AppState>, Form(form): Form<AskForm>) -> Result<Html<String>> {
    let query = form.query.trim();
    if query.is_empty() {
        return render(&state, "", "", "");
    }

    let reply = state.assistant().respond(query).await;
    render(&state, query, reply.intent().as_str(), &reply.to_text())
}

fn render(state: &AppState, query: &str, intent: &str, answer: &str) -> Result<Html<String>> {
    let page = state
        .templates()
        .get_template("index.html")?
        .render(context! { query, intent, answer })?;
    Ok(Html(page))
}
