//! Worker-process wiring: one role body per process, run until signalled.

use anyhow::Result;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{info, warn};

use scrapeflow_core::application::constants::{
    DEFAULT_BROKER_URL, DEFAULT_SCRAPE_URL, ERROR_RECOVERY_SLEEP_DURATION, WORK_TOPIC,
};
use scrapeflow_core::application::{shutdown_channel, ConsumerLoop, ProducerLoop, ShutdownSender};
use scrapeflow_core::domain::Role;
use scrapeflow_core::port::WorkQueue;
use scrapeflow_infra_fetch::HttpPageFetcher;
use scrapeflow_infra_queue::RedisWorkQueue;

/// Run a worker process as `role` until SIGTERM / Ctrl+C
pub async fn run(role: Role) -> Result<()> {
    info!(pid = %std::process::id(), role = %role, "Worker process initialized");

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    listen_for_signals(shutdown_tx);

    let broker_url =
        std::env::var("SCRAPEFLOW_BROKER_URL").unwrap_or_else(|_| DEFAULT_BROKER_URL.to_string());
    let topic = std::env::var("SCRAPEFLOW_TOPIC").unwrap_or_else(|_| WORK_TOPIC.to_string());

    // Connect to the broker, retrying until shutdown; a broker outage must
    // not crash the worker
    let mut connect_token = shutdown_rx.clone();
    let queue: Arc<dyn WorkQueue> = loop {
        if connect_token.is_shutdown() {
            info!("Worker shutting down before broker connect");
            return Ok(());
        }
        match RedisWorkQueue::connect(&broker_url).await {
            Ok(queue) => break Arc::new(queue),
            Err(e) => {
                warn!(error = %e, broker = %broker_url, "Broker connect failed, retrying");
                tokio::select! {
                    _ = sleep(ERROR_RECOVERY_SLEEP_DURATION) => {},
                    _ = connect_token.wait() => {}
                }
            }
        }
    };
    info!(broker = %broker_url, "Connected successfully");

    match role {
        Role::Producer => {
            let scrape_url = std::env::var("SCRAPEFLOW_SCRAPE_URL")
                .unwrap_or_else(|_| DEFAULT_SCRAPE_URL.to_string());
            ProducerLoop::new(queue, topic, scrape_url)
                .run(shutdown_rx)
                .await?;
        }
        Role::Consumer => {
            let fetcher = Arc::new(HttpPageFetcher::new());
            ConsumerLoop::new(queue, fetcher, topic)
                .run(shutdown_rx)
                .await?;
        }
    }

    info!("Worker disconnected");
    Ok(())
}

/// Trigger the shutdown channel on SIGTERM or Ctrl+C
fn listen_for_signals(shutdown_tx: ShutdownSender) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "Failed to install SIGTERM handler");
                    return;
                }
            };
            tokio::select! {
                _ = sigterm.recv() => {},
                _ = tokio::signal::ctrl_c() => {},
            }
        }

        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }

        info!("Gracefully shutting down...");
        shutdown_tx.shutdown();
    });
}
