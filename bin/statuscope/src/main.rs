//! Entrypoint.

use clap::Parser;
use config::Opts;
use dotenvy::dotenv;
use runtime::shutdown::{ShutdownSignal, shutdown_pair};
use statuspage::Client;
use tracing::info;
use tracker::{ConsoleSink, Tracker};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try the default .env file, and ignore if it doesn't exist.
        dotenv().ok();
    }

    let opts = Opts::parse();
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
    info!(
        incidents_url = %opts.status_page.incidents_url,
        components_url = %opts.status_page.components_url,
        "🔭 Statuscope starting..."
    );

    let client = Client::new(
        opts.status_page.incidents_url.clone(),
        opts.status_page.components_url.clone(),
        opts.request_timeout(),
    )?;
    let tracker = Tracker::new(client, Box::new(ConsoleSink), opts.poll_interval());

    let (shutdown_handle, shutdown_token) = shutdown_pair();
    tokio::spawn(async move {
        ShutdownSignal::new().await;
        info!("shutdown signal received, stopping after the current cycle");
        shutdown_handle.shutdown();
    });

    tracker.run(shutdown_token).await
}
