//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the provider multiplexer from the enabled wallet sections
//! - Construct the one session store and the submitter bound to it
//! - Start the background connection monitor on request

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::blockchain::BlockchainClient;
use crate::config::AppConfig;
use crate::error::Result;
use crate::lifecycle::Shutdown;
use crate::session::{ConnectionMonitor, SessionStore};
use crate::tx::TransactionSubmitter;
use crate::wallet::ProviderMultiplexer;

/// Everything a front-end needs, wired together.
pub struct App {
    pub config: AppConfig,
    pub store: Arc<SessionStore>,
    pub submitter: TransactionSubmitter,
    pub shutdown: Shutdown,
}

/// Wire the application from configuration. Does not touch the network.
pub fn bootstrap(config: AppConfig) -> Result<App> {
    let multiplexer = ProviderMultiplexer::from_config(&config)?;
    tracing::info!(
        chain_id = config.chain.chain_id,
        rpc_url = %config.chain.rpc_url,
        confirmation_blocks = config.chain.confirmation_blocks,
        "Application wired"
    );
    Ok(App::with_multiplexer(config, multiplexer))
}

impl App {
    /// Wire the application around an already-built multiplexer.
    pub fn with_multiplexer(config: AppConfig, multiplexer: ProviderMultiplexer) -> Self {
        let store = Arc::new(SessionStore::new(multiplexer));
        let submitter = TransactionSubmitter::new(store.clone());
        Self {
            config,
            store,
            submitter,
            shutdown: Shutdown::new(),
        }
    }

    /// Spawn the connection monitor; it stops on [`Shutdown::trigger`].
    ///
    /// The monitor also reports chain RPC health for the configured endpoint.
    pub fn spawn_monitor(&self, interval: Duration) -> JoinHandle<()> {
        let mut monitor = ConnectionMonitor::new(self.store.clone(), interval);
        match BlockchainClient::new(self.config.chain.clone()) {
            Ok(client) => monitor = monitor.with_health_check(client),
            Err(e) => tracing::warn!(error = %e, "RPC health checks disabled"),
        }
        tokio::spawn(monitor.run(self.shutdown.subscribe()))
    }

    /// Stop background tasks and end the session.
    pub async fn shutdown(&self) {
        self.shutdown.trigger();
        self.store.logout().await;
        tracing::info!("Shutdown complete");
    }
}
