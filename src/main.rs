use std::path::PathBuf;

use clap::Parser;

use gateway::lifecycle::signals::shutdown_signal;
use gateway::observability::logging;
use gateway::{config, routes, Application};

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "HTTP gateway for the customer and payments API", long_about = None)]
struct Cli {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref())?;
    logging::init(&config.observability.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.listener.port,
        public_dir = %config.assets.public_dir.display(),
        images_dir = %config.assets.images_dir.display(),
        "Configuration loaded"
    );

    let app = match Application::build(config, routes::default_table()).await {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e.into());
        }
    };

    tracing::info!(port = app.port(), "app running");
    app.run_until_stopped(shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
