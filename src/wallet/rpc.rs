//! Handle backed by a JSON-RPC provider.
//!
//! Used by the embedded backend (local key, provider signs through a wallet
//! filler) and the injected backend (node-managed accounts, signing happens
//! behind `eth_sendTransaction` / `personal_sign`).

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, Signature, U256};
use alloy::providers::{PendingTransactionError, Provider, WatchTxError};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use alloy::transports::TransportError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::{BlockchainClient, CallParams, GasPolicy, Receipt, TransactionParams};
use crate::error::{Error, Result};
use crate::wallet::handle::ProviderHandle;

/// EIP-1193 "user rejected request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// Map a transport failure from a wallet-facing request.
pub(crate) fn map_wallet_error(e: TransportError) -> Error {
    match e.as_error_resp() {
        Some(payload) if payload.code == USER_REJECTED_CODE => Error::UserRejected(payload.message.to_string()),
        Some(payload) => Error::SubmissionRejected(payload.message.to_string()),
        None => Error::Network(e.to_string()),
    }
}

pub(crate) fn wallet_timeout(method: &str, limit: Duration) -> Error {
    Error::Network(format!("Wallet did not answer {} within {:?}", method, limit))
}

/// Provider-backed handle.
pub struct RpcHandle {
    address: Address,
    /// Provider used for signing requests and broadcast.
    sender: Arc<dyn Provider + Send + Sync>,
    /// Local key when signing happens in-process.
    signer: Option<PrivateKeySigner>,
    /// Failover-aware reads.
    reader: BlockchainClient,
    gas: GasPolicy,
    confirmations: u64,
    confirmation_timeout: Duration,
    /// Bound on wallet round-trips that need no user action.
    rpc_timeout: Duration,
}

impl RpcHandle {
    pub fn new(
        address: Address,
        sender: Arc<dyn Provider + Send + Sync>,
        signer: Option<PrivateKeySigner>,
        reader: BlockchainClient,
    ) -> Self {
        let config = reader.config();
        let gas = GasPolicy::from_config(config);
        let confirmations = u64::from(config.confirmation_blocks.max(1));
        let confirmation_timeout = Duration::from_secs(config.confirmation_timeout_secs);
        let rpc_timeout = Duration::from_secs(config.rpc_timeout_secs);
        Self {
            address,
            sender,
            signer,
            reader,
            gas,
            confirmations,
            confirmation_timeout,
            rpc_timeout,
        }
    }

    /// True when signatures are produced in-process.
    pub fn signs_locally(&self) -> bool {
        self.signer.is_some()
    }
}

#[async_trait]
impl ProviderHandle for RpcHandle {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature> {
        if let Some(signer) = &self.signer {
            return signer
                .sign_message(message)
                .await
                .map_err(|e| Error::Signing(format!("Message signing failed: {}", e)));
        }

        // The user may have to approve; allow the confirmation window.
        let request = self
            .sender
            .client()
            .request("personal_sign", (Bytes::copy_from_slice(message), self.address));
        let raw: Bytes = timeout(self.confirmation_timeout, request)
            .await
            .map_err(|_| wallet_timeout("personal_sign", self.confirmation_timeout))?
            .map_err(map_wallet_error)?;
        Signature::from_raw(&raw).map_err(|e| Error::Signing(format!("Malformed signature: {}", e)))
    }

    async fn send_transaction(&self, params: TransactionParams) -> Result<Receipt> {
        let mut tx = params.into_request(self.address);
        if tx.gas_price.is_none() {
            let quoted = self.reader.get_gas_price().await?;
            tx = tx.with_gas_price(self.gas.adjust(quoted)?);
        }

        let pending = timeout(self.confirmation_timeout, self.sender.send_transaction(tx))
            .await
            .map_err(|_| wallet_timeout("eth_sendTransaction", self.confirmation_timeout))?
            .map_err(map_wallet_error)?;
        let tx_hash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, "Transaction broadcast, awaiting confirmation");

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .with_timeout(Some(self.confirmation_timeout))
            .get_receipt()
            .await
            .map_err(|e| match e {
                PendingTransactionError::TxWatcher(WatchTxError::Timeout) => {
                    Error::ConfirmationTimeout(self.confirmations as u32)
                }
                other => Error::Network(other.to_string()),
            })?;

        Ok(Receipt::from(&receipt))
    }

    async fn call(&self, params: CallParams) -> Result<Bytes> {
        self.reader.call(params.into_request()).await
    }

    async fn get_balance(&self, address: Address) -> Result<U256> {
        self.reader.get_balance(address).await
    }

    async fn is_connected(&self) -> bool {
        if self.signer.is_some() {
            return true;
        }
        // An unreachable or silent node says nothing about the account; keep the session.
        match timeout(self.rpc_timeout, self.sender.get_accounts()).await {
            Ok(Ok(accounts)) => accounts.contains(&self.address),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Could not check wallet accounts");
                true
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.rpc_timeout, "Wallet did not answer account check");
                true
            }
        }
    }
}

impl std::fmt::Debug for RpcHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcHandle")
            .field("address", &self.address)
            .field("signs_locally", &self.signs_locally())
            .field("confirmations", &self.confirmations)
            .finish()
    }
}
