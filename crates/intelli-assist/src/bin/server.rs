//! Assistant server binary
//!
//! Run with: cargo run -p intelli-assist --bin intelli-assist-server
//! Set INTELLI_ASSIST_CONFIG to a TOML file to override the defaults.

use intelli_assist::{config::AssistConfig, server::AssistServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intelli_assist=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                      Intelli Assist                       ║
║        Health tips, places and a learning Q&A memory      ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config_path = std::env::var_os("INTELLI_ASSIST_CONFIG").map(PathBuf::from);
    let config = AssistConfig::load(config_path.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Memory file: {}", config.memory.path.display());
    tracing::info!("  - Summaries: {} ({})", config.summary.enabled, config.summary.base_url);
    tracing::info!("  - Embeddings: {} ({})", config.embeddings.enabled, config.embeddings.model);
    tracing::info!("  - Geocoder: {}", config.places.base_url);

    // Create and start server
    let server = AssistServer::new(config).await?;

    println!("\nServer starting...");
    println!("  Web: http://{}/", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/ask          - Ask anything");
    println!("  GET  /api/memory/stats - Answer memory statistics");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
