//! Transaction parameters, gas policy and confirmation monitoring.
//!
//! # Responsibilities
//! - Normalized send/call parameter shapes shared by every wallet handle
//! - Gas price guard for transactions built locally
//! - Receipt polling for backends that only hand back a transaction hash

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{ChainConfig, ConfirmationStatus, Receipt};
use crate::error::{Error, Result};

/// Parameters for a state-changing transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionParams {
    pub to: Address,
    /// Defaults to the session address.
    pub from: Option<Address>,
    pub value: Option<U256>,
    pub data: Option<Bytes>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
}

impl TransactionParams {
    pub fn new(to: Address) -> Self {
        Self {
            to,
            ..Self::default()
        }
    }

    /// Convert to an RPC request, filling `from` when the caller left it empty.
    pub fn into_request(self, default_from: Address) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .with_to(self.to)
            .with_from(self.from.unwrap_or(default_from));
        if let Some(value) = self.value {
            tx = tx.with_value(value);
        }
        if let Some(data) = self.data {
            tx = tx.with_input(data);
        }
        if let Some(gas_limit) = self.gas_limit {
            tx = tx.with_gas_limit(gas_limit);
        }
        if let Some(gas_price) = self.gas_price {
            tx = tx.with_gas_price(gas_price);
        }
        tx
    }
}

/// Parameters for a read-only call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallParams {
    pub to: Address,
    pub from: Option<Address>,
    pub data: Bytes,
}

impl CallParams {
    pub fn into_request(self) -> TransactionRequest {
        let mut tx = TransactionRequest::default().with_to(self.to).with_input(self.data);
        if let Some(from) = self.from {
            tx = tx.with_from(from);
        }
        tx
    }
}

/// Gas price guard applied when the caller did not pin a gas price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasPolicy {
    /// Multiplier for safety margin (1.2 = 20% buffer).
    pub multiplier: f64,
    pub max_gas_price_gwei: u64,
}

impl GasPolicy {
    pub fn from_config(config: &ChainConfig) -> Self {
        Self {
            multiplier: config.gas_price_multiplier,
            max_gas_price_gwei: config.max_gas_price_gwei,
        }
    }

    /// Check the quoted price against the ceiling and apply the multiplier.
    pub fn adjust(&self, quoted_wei: u128) -> Result<u128> {
        let gas_price_gwei = quoted_wei / 1_000_000_000;
        if gas_price_gwei > self.max_gas_price_gwei as u128 {
            return Err(Error::GasPriceTooHigh {
                current_gwei: gas_price_gwei as u64,
                max_gwei: self.max_gas_price_gwei,
            });
        }
        Ok((quoted_wei as f64 * self.multiplier) as u128)
    }
}

/// Poll until `tx_hash` has a receipt with the configured confirmation depth.
///
/// Reverted transactions resolve with `success == false`; the caller decides
/// whether that is an error.
pub async fn wait_for_confirmation(client: &BlockchainClient, tx_hash: TxHash) -> Result<Receipt> {
    let config = client.config();
    let required_confirmations = client.confirmation_blocks();
    let timeout_duration = Duration::from_secs(config.confirmation_timeout_secs);
    let poll_interval = Duration::from_millis(config.poll_interval_ms);

    let result = timeout(timeout_duration, async {
        let mut ticker = interval(poll_interval);

        loop {
            ticker.tick().await;

            let receipt = match client.get_transaction_receipt(tx_hash).await? {
                Some(r) => r,
                None => {
                    tracing::debug!(tx_hash = %tx_hash, status = ?ConfirmationStatus::Pending, "Transaction pending");
                    continue;
                }
            };

            if !receipt.status() {
                return Ok(Receipt::from(&receipt));
            }

            let current_block = client.get_block_number().await?;
            let tx_block = receipt.block_number.unwrap_or(current_block);
            // The inclusion block counts as the first confirmation.
            let confirmations = current_block.saturating_sub(tx_block) as u32 + 1;

            if confirmations >= required_confirmations {
                tracing::debug!(
                    tx_hash = %tx_hash,
                    status = ?ConfirmationStatus::Confirmed { block_number: tx_block },
                    "Transaction confirmed"
                );
                return Ok(Receipt::from(&receipt));
            }

            tracing::debug!(
                tx_hash = %tx_hash,
                status = ?ConfirmationStatus::Confirming { current: confirmations, required: required_confirmations },
                "Waiting for confirmations"
            );
        }
    })
    .await;

    match result {
        Ok(receipt) => receipt,
        Err(_) => Err(Error::ConfirmationTimeout(required_confirmations)),
    }
}
