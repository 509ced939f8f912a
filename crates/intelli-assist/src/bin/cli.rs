//! Interactive assistant in the terminal
//!
//! Run with: cargo run -p intelli-assist --bin intelli-assist -- [ask <text> | stats]

use clap::{Parser, Subcommand};
use console::style;
use intelli_assist::{
    health::HealthReport, places::PlacesResult, AssistConfig, Assistant, Reply,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "intelli-assist", version, about = "Health tips, places and a learning Q&A memory")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Answer memory file (overrides the config)
    #[arg(short, long, global = true)]
    memory: Option<PathBuf>,

    /// Do not contact Wikipedia or the embedding server
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive session (default)
    Chat,
    /// Answer a single query
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show answer memory statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intelli_assist=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AssistConfig::load(cli.config.as_deref())?;
    if let Some(memory) = cli.memory {
        config.memory.path = memory;
    }
    if cli.offline {
        config = config.offline();
    }

    let assistant = Assistant::from_config(&config).await?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => chat(&assistant).await?,
        Command::Ask { query } => {
            let reply = assistant.respond(&query.join(" ")).await;
            print_reply(&reply);
        }
        Command::Stats => {
            let stats = assistant.memory_stats().await;
            println!("Memory file: {}", config.memory.path.display());
            println!("Questions:   {}", stats.questions);
            println!("Answers:     {}", stats.candidates);
            println!("Total score: {}", stats.total_score);
        }
    }

    Ok(())
}

fn banner() {
    println!("{}", style("Welcome to Intelli Assist").bold().cyan());
    println!(
        "Type your request (e.g., 'I have a sore throat', 'Find parks in Berlin', 'Why is the sky blue?')."
    );
    println!("Type 'exit' to quit.\n");
}

async fn chat(assistant: &Assistant) -> anyhow::Result<()> {
    banner();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"You: ").await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!("\nGoodbye!");
            break;
        };

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if matches!(text.to_lowercase().as_str(), "exit" | "quit") {
            println!("Goodbye!");
            break;
        }

        let reply = assistant.respond(text).await;
        print_reply(&reply);
    }

    Ok(())
}

fn print_reply(reply: &Reply) {
    match reply {
        Reply::Health(report) => print_health(report),
        Reply::Places(result) => print_places(result),
        Reply::General(answer) => {
            println!("\n{}", style("--- Answer ---").bold());
            println!("{}", answer);
            println!("--------------\n");
        }
    }
}

fn print_health(report: &HealthReport) {
    println!(
        "\n{}",
        style("--- Health Helper (educational, not a diagnosis) ---").bold().green()
    );
    println!("{}", report.message);
    if !report.sources.is_empty() {
        println!("\nSources:");
        for source in &report.sources {
            println!("- {}: {}", source.name, source.url);
        }
    }
    println!("\n{}", style(report.disclaimer).yellow());
    println!("-----------------------------------------------------\n");
}

fn print_places(result: &PlacesResult) {
    println!("\n{}", style("--- Places & Addresses ---").bold().blue());
    if let Some(error) = &result.error {
        println!("{} {}", style("Error:").red(), error);
    } else if result.results.is_empty() {
        println!("No places found.");
    } else {
        for (i, place) in result.results.iter().enumerate() {
            let address = if place.address.is_empty() {
                "(no address)"
            } else {
                place.address.as_str()
            };
            let mut line = format!("{}. {} - {}", i + 1, place.name, address);
            if let Some(rating) = place.rating {
                line.push_str(&format!(" | rating: {}", rating));
            }
            if let Some(open_now) = place.open_now {
                line.push_str(&format!(" | open_now: {}", open_now));
            }
            println!("{}", line);
        }
    }
    if !result.attribution.is_empty() {
        println!("\nAttribution: {}", result.attribution.join(", "));
    }
    println!("--------------------------\n");
}
