//! College recommender API server.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use server::{AppState, ServerConfig, create_router};

/// Serve heuristic and ML college predictions over HTTP
#[derive(Parser)]
#[command(name = "college-recs-server")]
struct Args {
    /// Address to bind (overrides COLLEGE_RECS_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides COLLEGE_RECS_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Cutoff table for the heuristic predictor (overrides COLLEGE_RECS_DATA)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Trained model artifact (overrides COLLEGE_RECS_MODEL)
    #[arg(long)]
    model: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::from_env().context("Failed to read server configuration")?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data) = args.data {
        config.data_path = data;
    }
    if let Some(model) = args.model {
        config.model_path = model;
    }

    let state = AppState::load(&config);
    if state.heuristic.is_none() && state.ml.is_none() {
        warn!("No predictor loaded; every endpoint will report the model as unavailable");
    }

    let listener = config.bind().await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .await
        .context("Server error")?;

    Ok(())
}
