//! Debate Day coordination server.
//!
//! Single-process HTTP authority for debate sessions. Participant
//! workers poll it for their turn and submit messages; viewers read
//! transcripts. All state is in memory for the process lifetime.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use debate_day_core::{Coordinator, MemoryStore};

mod error;
mod routes;

#[derive(Parser)]
#[command(
    name = "debate-day-server",
    version,
    about = "Turn coordination server for AI debates"
)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, default_value = "8000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let coordinator = Arc::new(Coordinator::new(Arc::new(MemoryStore::new())));
    let app = routes::router(coordinator);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "debate-day server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// `RUST_LOG`-driven tracing to stderr; defaults to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
