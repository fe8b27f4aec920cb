//! Injected (extension-style) wallet.
//!
//! Accounts live behind an EIP-1193 endpoint. Connecting asks for account
//! access with `eth_requestAccounts`, which may block until the user approves
//! in the external wallet; code 4001 means they declined.

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::ChainConfig;
use crate::blockchain::BlockchainClient;
use crate::config::InjectedWalletConfig;
use crate::error::{Error, Result};
use crate::wallet::backend::WalletBackend;
use crate::wallet::handle::ProviderHandle;
use crate::wallet::kind::WalletKind;
use crate::wallet::rpc::{wallet_timeout, RpcHandle, USER_REJECTED_CODE};

/// JSON-RPC "method not found".
const METHOD_NOT_FOUND_CODE: i64 = -32601;

/// Backend for node- or extension-managed accounts.
pub struct InjectedBackend {
    url: url::Url,
    chain: ChainConfig,
}

impl InjectedBackend {
    pub fn from_config(config: &InjectedWalletConfig, chain: ChainConfig) -> Result<Self> {
        let raw = config.rpc_url.as_deref().unwrap_or(&chain.rpc_url);
        let url = raw
            .parse()
            .map_err(|e| Error::BackendUnavailable(format!("Invalid wallet URL '{}': {}", raw, e)))?;
        Ok(Self { url, chain })
    }

    fn provider(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::new(ProviderBuilder::new().connect_http(self.url.clone())) as Arc<dyn Provider + Send + Sync>
    }
}

#[async_trait]
impl WalletBackend for InjectedBackend {
    fn kind(&self) -> WalletKind {
        WalletKind::Injected
    }

    async fn connect(&self) -> Result<Arc<dyn ProviderHandle>> {
        let sender = self.provider();

        let accounts: Vec<Address> = sender
            .client()
            .request("eth_requestAccounts", ())
            .await
            .map_err(|e| match e.as_error_resp() {
                Some(payload) if payload.code == USER_REJECTED_CODE => {
                    Error::UserRejected(payload.message.to_string())
                }
                _ => Error::BackendUnavailable(e.to_string()),
            })?;

        let address = *accounts
            .first()
            .ok_or_else(|| Error::BackendUnavailable("Wallet returned no accounts".to_string()))?;

        let reader = BlockchainClient::new(self.chain.clone())
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;

        tracing::info!(address = %address, url = %self.url, "Injected wallet connected");
        Ok(Arc::new(RpcHandle::new(address, sender, None, reader)))
    }

    async fn disconnect(&self) -> Result<()> {
        let permissions = serde_json::json!([{ "eth_accounts": {} }]);
        let provider = self.provider();
        let limit = Duration::from_secs(self.chain.rpc_timeout_secs);
        let result: std::result::Result<serde_json::Value, _> =
            timeout(limit, provider.client().request("wallet_revokePermissions", permissions))
                .await
                .map_err(|_| wallet_timeout("wallet_revokePermissions", limit))?;

        match result {
            Ok(_) => Ok(()),
            // Plenty of wallets have no revoke; the local session ends regardless.
            Err(e) if e.as_error_resp().map(|p| p.code) == Some(METHOD_NOT_FOUND_CODE) => Ok(()),
            Err(e) => Err(Error::BackendUnavailable(e.to_string())),
        }
    }
}
