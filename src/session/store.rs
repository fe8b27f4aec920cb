//! The single source of truth for who is logged in and with what capability.

use alloy::primitives::{Address, Signature};
use arc_swap::ArcSwapOption;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

use crate::error::{Error, Result};
use crate::observability::metrics;
use crate::wallet::{ProviderHandle, ProviderMultiplexer, WalletKind};

/// The live login. Installed and cleared as one unit.
struct ActiveSession {
    kind: WalletKind,
    address: Address,
    handle: Arc<dyn ProviderHandle>,
}

impl ActiveSession {
    fn info(&self) -> SessionInfo {
        SessionInfo {
            is_authenticated: true,
            wallet_kind: Some(self.kind),
            address: Some(self.address),
        }
    }
}

/// Snapshot of the session state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub is_authenticated: bool,
    pub wallet_kind: Option<WalletKind>,
    pub address: Option<Address>,
}

impl SessionInfo {
    /// Address as lowercase hex, the form the rest of the app compares against.
    pub fn address_hex(&self) -> Option<String> {
        self.address.map(|a| format!("{:#x}", a))
    }
}

/// Holds at most one wallet session.
///
/// Construct one per application and pass it around as `Arc<SessionStore>`.
pub struct SessionStore {
    multiplexer: ProviderMultiplexer,
    active: ArcSwapOption<ActiveSession>,
    /// Serializes login/logout/refresh transitions.
    transitions: Mutex<()>,
    updates: watch::Sender<SessionInfo>,
}

impl SessionStore {
    pub fn new(multiplexer: ProviderMultiplexer) -> Self {
        let (updates, _) = watch::channel(SessionInfo::default());
        Self {
            multiplexer,
            active: ArcSwapOption::const_empty(),
            transitions: Mutex::new(()),
            updates,
        }
    }

    pub fn multiplexer(&self) -> &ProviderMultiplexer {
        &self.multiplexer
    }

    /// Connect `kind` and make it the active session.
    ///
    /// On failure the previous session (if any) is left exactly as it was.
    /// Logging into the kind that is already active returns the current session
    /// while its wallet still reports connected; otherwise it reconnects.
    pub async fn login(&self, kind: WalletKind) -> Result<SessionInfo> {
        let _guard = self.transitions.lock().await;

        let mut previous = self.active.load_full();
        if let Some(current) = previous.as_ref().filter(|s| s.kind == kind) {
            if current.handle.is_connected().await {
                tracing::debug!(kind = %kind, "Already logged in with this wallet");
                return Ok(current.info());
            }
            // Gone remotely; nothing to disconnect.
            self.active.store(None);
            self.updates.send_replace(SessionInfo::default());
            metrics::record_session_dropped(kind);
            tracing::warn!(kind = %kind, address = %current.address, "Stale session found at login, reconnecting");
            previous = None;
        }

        let handle = match self.multiplexer.connect(kind).await {
            Ok(handle) => handle,
            Err(Error::UnsupportedKind(kind)) => {
                metrics::record_login(kind, "unsupported");
                tracing::warn!(kind = %kind, "Login requested for unregistered wallet kind");
                return Err(Error::UnsupportedKind(kind));
            }
            Err(e) => {
                let outcome = if e.is_user_rejected() { "rejected" } else { "failed" };
                metrics::record_login(kind, outcome);
                tracing::warn!(kind = %kind, error = %e, "Login failed");
                return Err(Error::LoginFailed {
                    kind,
                    source: Box::new(e),
                });
            }
        };

        if let Some(prev) = previous {
            tracing::info!(old = %prev.kind, new = %kind, "Switching wallet, disconnecting previous backend");
            self.disconnect_backend(prev.kind).await;
        }

        let session = Arc::new(ActiveSession {
            kind,
            address: handle.address(),
            handle,
        });
        let info = session.info();
        self.active.store(Some(session));
        self.updates.send_replace(info.clone());

        metrics::record_login(kind, "ok");
        tracing::info!(kind = %kind, address = %info.address_hex().unwrap_or_default(), "Logged in");
        Ok(info)
    }

    /// End the session.
    ///
    /// The local session is cleared before the backend is told, so a wallet
    /// that never answers the disconnect cannot keep it alive. Disconnect
    /// failures are logged.
    pub async fn logout(&self) {
        let _guard = self.transitions.lock().await;

        let Some(current) = self.active.swap(None) else {
            tracing::debug!("Logout with no active session");
            return;
        };
        self.updates.send_replace(SessionInfo::default());
        metrics::record_logout(current.kind);
        tracing::info!(kind = %current.kind, "Logged out");

        self.disconnect_backend(current.kind).await;
    }

    async fn disconnect_backend(&self, kind: WalletKind) {
        if let Err(e) = self.multiplexer.disconnect(kind).await {
            tracing::warn!(kind = %kind, error = %e, "Wallet disconnect failed, dropping session anyway");
        }
    }

    /// Check the active wallet is still connected; clear the session if not.
    ///
    /// Returns whether a session is active afterwards. The backend is not asked
    /// to disconnect since it already is.
    pub async fn refresh(&self) -> bool {
        let Some(current) = self.active.load_full() else {
            return false;
        };
        if current.handle.is_connected().await {
            return true;
        }

        let _guard = self.transitions.lock().await;
        // A login may have replaced the session while we were checking.
        let unchanged = self
            .active
            .load()
            .as_ref()
            .is_some_and(|s| Arc::ptr_eq(s, &current));
        if unchanged {
            self.active.store(None);
            self.updates.send_replace(SessionInfo::default());
            metrics::record_session_dropped(current.kind);
            tracing::warn!(kind = %current.kind, address = %current.address, "Wallet disconnected externally, session cleared");
            return false;
        }
        self.active.load().is_some()
    }

    /// The active handle, or `NotAuthenticated`.
    pub fn current_handle(&self) -> Result<Arc<dyn ProviderHandle>> {
        self.active
            .load()
            .as_ref()
            .map(|s| s.handle.clone())
            .ok_or(Error::NotAuthenticated)
    }

    pub fn info(&self) -> SessionInfo {
        self.active
            .load()
            .as_ref()
            .map(|s| s.info())
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.active.load().is_some()
    }

    pub fn address(&self) -> Option<Address> {
        self.active.load().as_ref().map(|s| s.address)
    }

    pub fn wallet_kind(&self) -> Option<WalletKind> {
        self.active.load().as_ref().map(|s| s.kind)
    }

    /// Receive a fresh [`SessionInfo`] on every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionInfo> {
        self.updates.subscribe()
    }

    /// Sign a message with the active wallet.
    pub async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        self.current_handle()?.sign_message(message).await
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.info())
            .field("multiplexer", &self.multiplexer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{CallParams, Receipt, TransactionParams};
    use crate::wallet::WalletBackend;
    use alloy::primitives::{Bytes, U256};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    struct StubHandle {
        address: Address,
        connected: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ProviderHandle for StubHandle {
        fn address(&self) -> Address {
            self.address
        }
        async fn sign_message(&self, _message: &[u8]) -> Result<Signature> {
            Err(Error::Signing("stub".into()))
        }
        async fn send_transaction(&self, _params: TransactionParams) -> Result<Receipt> {
            Err(Error::Network("stub".into()))
        }
        async fn call(&self, _params: CallParams) -> Result<Bytes> {
            Ok(Bytes::new())
        }
        async fn get_balance(&self, _address: Address) -> Result<U256> {
            Ok(U256::ZERO)
        }
        async fn is_connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }
    }

    struct StubBackend {
        kind: WalletKind,
        address: Address,
        /// Connection flag of the most recently issued handle.
        connected: std::sync::Mutex<Arc<AtomicBool>>,
        connects: AtomicU32,
        disconnects: AtomicU32,
        fail_disconnect: bool,
        /// Held by a test to keep `disconnect` from returning.
        hold_disconnect: Arc<Mutex<()>>,
    }

    impl StubBackend {
        fn new(kind: WalletKind, byte: u8) -> Arc<Self> {
            Self::build(kind, byte, false)
        }

        fn build(kind: WalletKind, byte: u8, fail_disconnect: bool) -> Arc<Self> {
            Arc::new(Self {
                kind,
                address: Address::repeat_byte(byte),
                connected: std::sync::Mutex::new(Arc::new(AtomicBool::new(false))),
                connects: AtomicU32::new(0),
                disconnects: AtomicU32::new(0),
                fail_disconnect,
                hold_disconnect: Arc::new(Mutex::new(())),
            })
        }

        /// Simulate the wallet going away outside this process.
        fn drop_connection(&self) {
            self.connected.lock().unwrap().store(false, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl WalletBackend for StubBackend {
        fn kind(&self) -> WalletKind {
            self.kind
        }
        async fn connect(&self) -> Result<Arc<dyn ProviderHandle>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            let connected = Arc::new(AtomicBool::new(true));
            *self.connected.lock().unwrap() = connected.clone();
            Ok(Arc::new(StubHandle {
                address: self.address,
                connected,
            }))
        }
        async fn disconnect(&self) -> Result<()> {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
            let _hold = self.hold_disconnect.lock().await;
            if self.fail_disconnect {
                Err(Error::BackendUnavailable("gone".into()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_initial_state_is_logged_out() {
        let store = SessionStore::new(ProviderMultiplexer::new());
        assert_eq!(store.info(), SessionInfo::default());
        assert!(matches!(store.current_handle().err().unwrap(), Error::NotAuthenticated));
        assert!(!store.refresh().await);
    }

    #[tokio::test]
    async fn test_relogin_same_kind_reconnects_stale_session() {
        let backend = StubBackend::new(WalletKind::Injected, 0xbb);
        let store = SessionStore::new(ProviderMultiplexer::new().with_backend(backend.clone()));

        store.login(WalletKind::Injected).await.unwrap();
        backend.drop_connection();

        let info = store.login(WalletKind::Injected).await.unwrap();
        assert!(info.is_authenticated);
        assert_eq!(backend.connects.load(Ordering::SeqCst), 2);
        assert_eq!(backend.disconnects.load(Ordering::SeqCst), 0);
        assert!(store.current_handle().unwrap().is_connected().await);
    }

    #[tokio::test]
    async fn test_logout_does_not_wait_for_backend() {
        let backend = StubBackend::new(WalletKind::Injected, 0xbb);
        let store = Arc::new(SessionStore::new(
            ProviderMultiplexer::new().with_backend(backend.clone()),
        ));
        store.login(WalletKind::Injected).await.unwrap();

        let hold = backend.hold_disconnect.clone().lock_owned().await;
        let pending = tokio::spawn({
            let store = store.clone();
            async move { store.logout().await }
        });

        // The backend has not answered, yet the session is already gone.
        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while store.is_authenticated() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert!(store.current_handle().is_err());

        drop(hold);
        pending.await.unwrap();
        assert_eq!(backend.disconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_relogin_same_kind_does_not_reconnect() {
        let backend = StubBackend::new(WalletKind::Embedded, 0xaa);
        let store = SessionStore::new(ProviderMultiplexer::new().with_backend(backend.clone()));

        let first = store.login(WalletKind::Embedded).await.unwrap();
        let second = store.login(WalletKind::Embedded).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(backend.connects.load(Ordering::SeqCst), 1);
        assert_eq!(backend.disconnects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_logout_survives_disconnect_failure() {
        let backend = StubBackend::build(WalletKind::Custodial, 0xcc, true);
        let store = SessionStore::new(ProviderMultiplexer::new().with_backend(backend.clone()));

        store.login(WalletKind::Custodial).await.unwrap();
        store.logout().await;

        assert!(!store.is_authenticated());
        assert_eq!(backend.disconnects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_clears_externally_disconnected_session() {
        let backend = StubBackend::new(WalletKind::Injected, 0xbb);
        let store = SessionStore::new(ProviderMultiplexer::new().with_backend(backend.clone()));
        let mut updates = store.subscribe();

        store.login(WalletKind::Injected).await.unwrap();
        assert!(store.refresh().await);

        backend.drop_connection();
        assert!(!store.refresh().await);
        assert_eq!(store.info(), SessionInfo::default());
        // Already gone remotely; no disconnect call.
        assert_eq!(backend.disconnects.load(Ordering::SeqCst), 0);

        updates.changed().await.unwrap();
        assert!(!updates.borrow().is_authenticated);
    }

    #[tokio::test]
    async fn test_subscribe_sees_login() {
        let backend = StubBackend::new(WalletKind::Embedded, 0x0a);
        let store = SessionStore::new(ProviderMultiplexer::new().with_backend(backend));
        let mut updates = store.subscribe();

        store.login(WalletKind::Embedded).await.unwrap();
        updates.changed().await.unwrap();
        let info = updates.borrow().clone();
        assert_eq!(info.wallet_kind, Some(WalletKind::Embedded));
        assert_eq!(
            info.address_hex().unwrap(),
            "0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a"
        );
    }
}
