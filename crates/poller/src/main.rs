use homework_common::config::{AppConfig, LogConfig};
use homework_common::logging;
use homework_engine::watcher::StatusWatcher;
use homework_notifier::TelegramNotifier;
use homework_poller::poller::ReviewApiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (console + rotating file)
    let log_config = LogConfig::from_env()?;
    let log_context = logging::init(&log_config)?;

    tracing::info!(
        log_file = %log_context.file().display(),
        "Homework watch starting..."
    );

    // Load configuration
    let config = AppConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Configuration invalid, aborting");
    })?;

    let source = ReviewApiClient::from_config(&config)?;
    let notifier = TelegramNotifier::from_config(&config)?;
    let mut watcher = StatusWatcher::new(source, notifier, config.retry_period);

    tracing::info!(endpoint = %config.endpoint, "Polling review API");

    // Run until Ctrl+C
    tokio::select! {
        _ = watcher.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("Homework watch stopped.");
    Ok(())
}
