//! The normalized signing/calling capability every backend produces.

use alloy::primitives::{Address, Bytes, Signature, U256};
use async_trait::async_trait;

use crate::blockchain::{CallParams, Receipt, TransactionParams};
use crate::error::Result;

/// Handle obtained from a successful wallet connection.
///
/// `send_transaction` resolves only once the transaction has a receipt with
/// the configured confirmation depth; broadcast acceptance alone is not enough.
#[async_trait]
pub trait ProviderHandle: Send + Sync {
    /// Account this handle signs for.
    fn address(&self) -> Address;

    /// Sign an arbitrary message (EIP-191 personal message).
    async fn sign_message(&self, message: &[u8]) -> Result<Signature>;

    /// Sign, broadcast and wait for confirmation.
    async fn send_transaction(&self, params: TransactionParams) -> Result<Receipt>;

    /// Read-only contract call returning raw result bytes.
    async fn call(&self, params: CallParams) -> Result<Bytes>;

    /// Native balance in wei.
    async fn get_balance(&self, address: Address) -> Result<U256>;

    /// False once the wallet has been disconnected outside this process.
    async fn is_connected(&self) -> bool {
        true
    }
}
