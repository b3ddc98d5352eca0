//! Minimal non-web host: wires the detector and coordinator from a plain
//! bootstrap function, then waits for shutdown.
//!
//! Run with `cargo run --example plain_host`, stop with Ctrl+C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use warden::config::WardenConfig;
use warden::error::WorkerError;
use warden::host::HostEnvironment;
use warden::observability::init_tracing;
use warden::{use_background_workers, Coordinator, ProcessHost, ShutdownDetector, Worker};

/// Toy background worker: a tokio task emitting a heartbeat until asked
/// to wind down.
struct HeartbeatWorker {
    winding_down: Arc<AtomicBool>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl HeartbeatWorker {
    fn spawn(label: &'static str, period: Duration) -> Self {
        let winding_down = Arc::new(AtomicBool::new(false));
        let flag = winding_down.clone();

        let task = tokio::spawn(async move {
            while !flag.load(Ordering::SeqCst) {
                tracing::info!(label, "heartbeat");
                tokio::time::sleep(period).await;
            }
            tracing::info!(label, "heartbeat loop drained");
        });

        Self {
            winding_down,
            task: Some(task),
        }
    }
}

impl Worker for HeartbeatWorker {
    fn name(&self) -> &str {
        "heartbeat"
    }

    fn stop(&mut self) -> Result<(), WorkerError> {
        self.winding_down.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn release(&mut self) -> Result<(), WorkerError> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    init_tracing("plain_host=info,warden=debug");

    let config = WardenConfig::default();

    let host = Arc::new(ProcessHost::new());
    host.listen_for_signals();

    let detector = ShutdownDetector::new(
        host.clone() as Arc<dyn HostEnvironment>,
        &config.shutdown,
    );
    detector.initialize();

    let coordinator = Coordinator::new(detector.handle());
    use_background_workers(&coordinator, || {
        Ok(vec![
            Box::new(HeartbeatWorker::spawn("primary", Duration::from_secs(2))) as Box<dyn Worker>,
            Box::new(HeartbeatWorker::spawn("secondary", Duration::from_secs(5))),
        ])
    })
    .expect("worker startup failed");

    tracing::info!("Workers running, press Ctrl+C to shut down");

    detector.handle().cancelled().await;

    // Teardown already ran via the handle; allow an outer grace period
    // before the process exits, the way a host environment would.
    tokio::time::sleep(Duration::from_millis(200)).await;
    tracing::info!(
        grace_period_secs = config.grace.grace_period_secs,
        "Shutdown complete"
    );
}
