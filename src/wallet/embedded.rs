//! Embedded key wallet.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables (or handed in
//!   directly by the embedding application)
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::types::ChainConfig;
use crate::blockchain::BlockchainClient;
use crate::config::EmbeddedWalletConfig;
use crate::error::{Error, Result};
use crate::wallet::backend::WalletBackend;
use crate::wallet::handle::ProviderHandle;
use crate::wallet::kind::WalletKind;
use crate::wallet::rpc::RpcHandle;

/// Parse a hex-encoded private key, with or without 0x prefix.
pub fn parse_private_key(private_key_hex: &str) -> Result<PrivateKeySigner> {
    let key_hex = private_key_hex.trim();
    let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);
    key_hex
        .parse()
        .map_err(|e| Error::Signing(format!("Invalid private key format: {}", e)))
}

enum KeySource {
    /// Read at connect time so a key exported after startup is picked up.
    Env(String),
    Signer(PrivateKeySigner),
}

/// Backend holding the signing key in-process.
pub struct EmbeddedBackend {
    key: KeySource,
    chain: ChainConfig,
}

impl EmbeddedBackend {
    pub fn from_config(config: &EmbeddedWalletConfig, chain: ChainConfig) -> Self {
        Self {
            key: KeySource::Env(config.private_key_env.clone()),
            chain,
        }
    }

    pub fn from_private_key(private_key_hex: &str, chain: ChainConfig) -> Result<Self> {
        Ok(Self {
            key: KeySource::Signer(parse_private_key(private_key_hex)?),
            chain,
        })
    }

    fn signer(&self) -> Result<PrivateKeySigner> {
        let mut signer = match &self.key {
            KeySource::Signer(signer) => signer.clone(),
            KeySource::Env(var) => {
                let private_key = std::env::var(var).map_err(|_| {
                    Error::BackendUnavailable(format!("Environment variable {} not set", var))
                })?;
                parse_private_key(&private_key)
                    .map_err(|e| Error::BackendUnavailable(e.to_string()))?
            }
        };
        signer.set_chain_id(Some(self.chain.chain_id));
        Ok(signer)
    }
}

#[async_trait]
impl WalletBackend for EmbeddedBackend {
    fn kind(&self) -> WalletKind {
        WalletKind::Embedded
    }

    async fn connect(&self) -> Result<Arc<dyn ProviderHandle>> {
        let signer = self.signer()?;
        let address = signer.address();

        let url: url::Url = self.chain.rpc_url.parse().map_err(|e| {
            Error::BackendUnavailable(format!("Invalid RPC URL '{}': {}", self.chain.rpc_url, e))
        })?;
        let sender = Arc::new(
            ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer.clone()))
                .connect_http(url),
        ) as Arc<dyn Provider + Send + Sync>;
        let reader = BlockchainClient::new(self.chain.clone())
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;

        // Don't fail the login on a flaky RPC; sends will surface it.
        if let Err(e) = reader.verify_chain_id().await {
            tracing::warn!(error = %e, "Embedded wallet connected but chain verification failed");
        }

        tracing::info!(address = %address, chain_id = self.chain.chain_id, "Embedded wallet connected");
        Ok(Arc::new(RpcHandle::new(address, sender, Some(signer), reader)))
    }

    async fn disconnect(&self) -> Result<()> {
        // Nothing remote to tear down; the handle (and its key copy) is dropped by the session.
        tracing::debug!("Embedded wallet disconnected");
        Ok(())
    }
}
