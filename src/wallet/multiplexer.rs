//! Flat dispatch table from wallet kind to backend.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::wallet::backend::WalletBackend;
use crate::wallet::custodial::CustodialBackend;
use crate::wallet::embedded::EmbeddedBackend;
use crate::wallet::handle::ProviderHandle;
use crate::wallet::injected::InjectedBackend;
use crate::wallet::kind::WalletKind;

/// Routes `connect`/`disconnect` to the backend registered for a kind.
///
/// Registrations are fixed once the multiplexer is handed to a
/// [`SessionStore`](crate::session::SessionStore).
#[derive(Clone, Default)]
pub struct ProviderMultiplexer {
    backends: HashMap<WalletKind, Arc<dyn WalletBackend>>,
}

impl ProviderMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend, replacing any earlier registration for the same kind.
    pub fn with_backend(mut self, backend: Arc<dyn WalletBackend>) -> Self {
        let kind = backend.kind();
        if self.backends.insert(kind, backend).is_some() {
            tracing::warn!(kind = %kind, "Replacing existing wallet backend registration");
        }
        self
    }

    /// Register every backend enabled in the configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut mux = Self::new();
        let wallets = &config.wallets;

        if wallets.embedded.enabled {
            mux = mux.with_backend(Arc::new(EmbeddedBackend::from_config(
                &wallets.embedded,
                config.chain.clone(),
            )));
        }
        if wallets.injected.enabled {
            mux = mux.with_backend(Arc::new(InjectedBackend::from_config(
                &wallets.injected,
                config.chain.clone(),
            )?));
        }
        if wallets.custodial.enabled {
            mux = mux.with_backend(Arc::new(CustodialBackend::from_config(
                &wallets.custodial,
                config.chain.clone(),
            )?));
        }

        tracing::info!(kinds = ?mux.kinds(), "Wallet backends registered");
        Ok(mux)
    }

    pub fn is_registered(&self, kind: WalletKind) -> bool {
        self.backends.contains_key(&kind)
    }

    /// Registered kinds in declaration order.
    pub fn kinds(&self) -> Vec<WalletKind> {
        WalletKind::ALL
            .into_iter()
            .filter(|kind| self.backends.contains_key(kind))
            .collect()
    }

    fn backend(&self, kind: WalletKind) -> Result<&Arc<dyn WalletBackend>> {
        self.backends.get(&kind).ok_or(Error::UnsupportedKind(kind))
    }

    pub async fn connect(&self, kind: WalletKind) -> Result<Arc<dyn ProviderHandle>> {
        let backend = self.backend(kind)?;
        tracing::debug!(kind = %kind, "Connecting wallet backend");
        backend.connect().await
    }

    pub async fn disconnect(&self, kind: WalletKind) -> Result<()> {
        let backend = self.backend(kind)?;
        tracing::debug!(kind = %kind, "Disconnecting wallet backend");
        backend.disconnect().await
    }
}

impl std::fmt::Debug for ProviderMultiplexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderMultiplexer")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unregistered_kind() {
        let mux = ProviderMultiplexer::new();
        assert!(mux.kinds().is_empty());

        let err = mux.connect(WalletKind::Custodial).await.err().unwrap();
        assert!(matches!(err, Error::UnsupportedKind(WalletKind::Custodial)));

        let err = mux.disconnect(WalletKind::Embedded).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind(WalletKind::Embedded)));
    }

    #[test]
    fn test_from_default_config() {
        let mux = ProviderMultiplexer::from_config(&AppConfig::default()).unwrap();
        assert_eq!(mux.kinds(), vec![WalletKind::Embedded, WalletKind::Injected]);
        assert!(!mux.is_registered(WalletKind::Custodial));
    }

    #[test]
    fn test_from_config_with_custodial() {
        let mut config = AppConfig::default();
        config.wallets.embedded.enabled = false;
        config.wallets.custodial.enabled = true;

        let mux = ProviderMultiplexer::from_config(&config).unwrap();
        assert_eq!(mux.kinds(), vec![WalletKind::Injected, WalletKind::Custodial]);
    }
}
