//! Periodic out-of-band disconnect detection.
//!
//! # Responsibilities
//! - Poll the active wallet's connection state on an interval
//! - Clear the session as soon as the wallet reports it is gone
//! - Check chain RPC health on the same tick when a client is attached

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::blockchain::BlockchainClient;
use crate::session::store::SessionStore;

pub struct ConnectionMonitor {
    store: Arc<SessionStore>,
    interval: Duration,
    health: Option<BlockchainClient>,
}

impl ConnectionMonitor {
    pub fn new(store: Arc<SessionStore>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            health: None,
        }
    }

    /// Also check `client` reachability each tick (feeds `frodo_rpc_health`).
    pub fn with_health_check(mut self, client: BlockchainClient) -> Self {
        self.health = Some(client);
        self
    }

    /// Run until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Connection monitor starting");

        let mut ticker = time::interval(self.interval);
        // The first tick completes immediately; the session was just established.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.store.is_authenticated() && !self.store.refresh().await {
                        tracing::info!("Session ended by wallet");
                    }
                    if let Some(client) = &self.health {
                        if !client.is_healthy().await {
                            tracing::warn!(rpc_url = %client.config().rpc_url, "Chain RPC unreachable");
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Connection monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
