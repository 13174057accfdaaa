//! The `run` command: the indefinite polling loop.

use pickupwatch_core::{AppConfig, TransitionDetector};
use pickupwatch_fetch::PickupClient;
use pickupwatch_monitor::{CsvLog, Monitor, SystemClock, UniformDelay};
use pickupwatch_notify::BarkClient;

pub async fn execute(config: &AppConfig) -> anyhow::Result<()> {
    let client = PickupClient::new(config)?;
    let notifier = BarkClient::new(config)?;
    let log = CsvLog::new(&config.log_path, config.market_tz);
    // Create the log (with header) up front so a permissions problem
    // surfaces at startup rather than on the first restock.
    log.ensure_header()?;

    println!("=== pickupwatch — {} pickup monitor ===", config.sku);
    println!("API: {}", client.endpoint());
    if notifier.is_configured() {
        println!("Push: {}/<hidden>", config.notify_server_base);
    } else {
        println!("Push: not configured (set NOTIFY_DEVICE_KEY to enable)");
    }
    println!(
        "Poll interval: {}-{} s",
        config.poll_min_secs, config.poll_max_secs
    );
    println!("Log: {}", config.log_path.display());

    let mut monitor = Monitor::new(
        client,
        notifier,
        log,
        UniformDelay::new(config.poll_min_secs, config.poll_max_secs),
        SystemClock,
        TransitionDetector::new(config.sku.clone()),
        config.market_tz,
    );

    monitor.run(shutdown_signal()).await;

    println!("Exit. CSV log at: {}", config.log_path.display());
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
