//! Voice presence API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p vc-api
//! ```
//!
//! Configuration is loaded from environment variables and `.env`.

use tracing::{error, info};
use vc_common::{try_init_tracing, AppConfig, TracingConfig};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Server failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        port = config.api.port,
        "Configuration loaded"
    );

    vc_api::run(config).await?;

    info!("Server shut down cleanly");
    Ok(())
}
