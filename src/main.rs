use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use link2social::cli::{Cli, Command};
use link2social::config::AppConfig;
use link2social::coordinator::WorkflowCoordinator;
use link2social::server;
use link2social::ui::RunProgress;
use link2social::venice::VeniceClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Serve { host, port } => server::serve(config, &host, port).await,
        Command::Run { url, text, scrape } => run_once(config, url, text, scrape).await,
    }
}

/// Process a single article from the terminal.
async fn run_once(
    config: AppConfig,
    url: Option<String>,
    text: Option<String>,
    scrape: bool,
) -> Result<()> {
    let client = VeniceClient::with_base_url(
        config.api_key.clone(),
        config.base_url.clone(),
        config.request_timeout_secs,
    );
    let coordinator = WorkflowCoordinator::new(&config);

    let label = url.clone().unwrap_or_else(|| "pasted article".to_string());
    let progress = RunProgress::start(&label);

    let output = coordinator
        .process(&client, url.as_deref(), text.as_deref(), scrape)
        .await?;

    progress.finish(&output);
    Ok(())
}
