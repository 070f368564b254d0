mod app;
mod client;
mod config;
mod error;
mod local_state;
mod session;
mod ui;

use std::{fs::OpenOptions, path::Path, sync::Arc};

use tracing_subscriber::EnvFilter;

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config.log_file, &config.log_level)?;
    tracing::info!(base_url = %config.base_url, "starting tally_tui");

    let mut app = app::App::new(config)?;
    let result = app.run().await;
    if let Err(err) = &result {
        tracing::error!(%err, "tally_tui exited with an error");
    }
    result
}

/// Logs go to a file; stdout belongs to the terminal UI.
fn init_tracing(log_file: &str, log_level: &str) -> Result<()> {
    if let Some(parent) = Path::new(log_file).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Arc::new(file))
        .init();
    Ok(())
}
