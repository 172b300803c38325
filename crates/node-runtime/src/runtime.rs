//! # Gate Runtime
//!
//! Lifecycle of a running gate.
//!
//! ## Startup Sequence
//!
//! 1. Load the persisted access list
//! 2. Start the inbound dispatcher
//! 3. Request the current list from the edge (falls back to peers)
//! 4. Re-request it every `sync.resync_interval`, when set
//! 5. Start feeding tag scans into authentication

use std::sync::Arc;
use std::time::Duration;

use ng_04_access_list_sync::{AccessListSyncApi, SyncOutcome};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::adapters::TagReader;
use crate::container::GateContainer;
use crate::handlers::ScanHandler;
use crate::wiring::InboundDispatcher;

pub struct GateRuntime {
    container: Arc<GateContainer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl GateRuntime {
    pub fn new(container: GateContainer) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            container: Arc::new(container),
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Bring the gate up and run the boot-time list request.
    pub async fn start(&self) -> SyncOutcome {
        info!("===========================================");
        info!("  NexxGate Node {} v{}", self.container.node_id, env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        match self.container.access_list.load() {
            Ok(count) => info!("💾 Restored {} identifiers from storage", count),
            Err(e) => warn!("Persisted access list unusable, starting empty: {}", e),
        }

        let dispatcher = InboundDispatcher::new(self.container.clone());
        tokio::spawn(dispatcher.run(self.shutdown_rx.clone()));

        let outcome = self.container.sync.request_update().await;
        info!(?outcome, entries = self.container.access_list.len(), "Boot sync finished");

        if let Some(every) = self.container.config.sync.resync_interval {
            self.spawn_resync(every);
        }
        outcome
    }

    /// Re-run the list request every `every` until shutdown.
    pub fn spawn_resync(&self, every: Duration) -> JoinHandle<()> {
        let sync = self.container.sync.clone();
        let mut shutdown = self.shutdown_rx.clone();
        info!(?every, "Periodic access list re-sync enabled");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately; the boot sync already ran.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let outcome = sync.request_update().await;
                        debug!(?outcome, "Periodic re-sync finished");
                    }
                    _ = shutdown.changed() => break,
                }
            }
        })
    }

    /// Start feeding scans from `reader`.
    pub fn spawn_scanner<R>(&self, reader: R) -> JoinHandle<()>
    where
        R: TagReader + 'static,
    {
        let handler = ScanHandler::new(reader, self.container.authentication.clone());
        tokio::spawn(handler.run(self.shutdown_rx.clone()))
    }

    /// Stop background tasks and flush the access list.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
        tokio::task::yield_now().await;

        if let Err(e) = self.container.access_list.save() {
            error!("Access list not saved on shutdown: {}", e);
        }
        info!("Shutdown complete");
    }

    pub fn container(&self) -> Arc<GateContainer> {
        Arc::clone(&self.container)
    }
}
