//! cellsense — narrative decomposition service for dashboard feeds.

use std::path::PathBuf;
use std::sync::Arc;

use cellsense_core::ServerConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "--analyze" | "analyze" => {
                if args.len() < 3 {
                    eprintln!("Usage: cellsense analyze <feed.json>");
                    std::process::exit(1);
                }
                let engine_config = config.load_engine_config()?;
                let result = cli::analyze_file(&PathBuf::from(&args[2]), engine_config)?;
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("cellsense — narrative decomposition for dashboard feeds");
                println!();
                println!("Usage: cellsense [command]");
                println!();
                println!("Commands:");
                println!("  (none)                   Start the server");
                println!("  analyze <feed.json>      Analyze a record or array of records");
                println!("  help                     Show this help message");
                println!();
                println!("Environment: PORT, CELLSENSE_BIND, CELLSENSE_CONFIG, RUST_LOG");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'cellsense help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let engine_config = config.load_engine_config()?;
    let addr = config.addr();

    let state = Arc::new(AppState::new(config, engine_config));
    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("cellsense server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
