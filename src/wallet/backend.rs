//! Pluggable wallet backend contract.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::wallet::handle::ProviderHandle;
use crate::wallet::kind::WalletKind;

/// One registered wallet backend.
///
/// `connect` may suspend for as long as the user needs to approve the
/// connection in an external application.
#[async_trait]
pub trait WalletBackend: Send + Sync {
    fn kind(&self) -> WalletKind;

    /// Run the backend's connection flow.
    ///
    /// Fails with `UserRejected` when approval is denied and
    /// `BackendUnavailable` on network or initialization failure.
    async fn connect(&self) -> Result<Arc<dyn ProviderHandle>>;

    /// Tear down the remote side of the connection.
    async fn disconnect(&self) -> Result<()>;
}
