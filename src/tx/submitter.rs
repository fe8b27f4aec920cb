//! Turns a logical call into a confirmed on-chain effect.
//!
//! # Responsibilities
//! - Look up the active handle on every call (never cached)
//! - Sign, broadcast and wait for the receipt through that handle
//! - Surface failures as typed errors, no retries, no deduplication

use alloy::primitives::{utils::format_ether, Address, Bytes, U256};
use alloy::sol_types::SolCall;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use crate::blockchain::{CallParams, Receipt};
use crate::contracts::{self, ContractCall, ViewCall};
use crate::error::{Error, Result};
use crate::observability::metrics;
use crate::session::SessionStore;
use crate::tx::pending::PendingTransaction;

/// Submits transactions and reads through the active session.
#[derive(Clone)]
pub struct TransactionSubmitter {
    session: Arc<SessionStore>,
}

impl TransactionSubmitter {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Submit and wait for the receipt.
    ///
    /// Fails with `NotAuthenticated` before touching any backend when no
    /// session is active. A mined-but-reverted transaction is `Reverted`.
    pub async fn submit(&self, tx: PendingTransaction) -> Result<Receipt> {
        let handle = self.session.current_handle()?;

        let span = tracing::info_span!(
            "submit",
            id = %tx.id,
            target = %tx.target,
            operation = contracts::describe(&tx.call_data).unwrap_or("unknown"),
        );

        async move {
            let started = Instant::now();
            tracing::info!(value = ?tx.value, "Submitting transaction");

            match handle.send_transaction(tx.into_params()).await {
                Ok(receipt) if receipt.success => {
                    metrics::record_submission("ok", started.elapsed());
                    tracing::info!(
                        tx_hash = %receipt.tx_hash,
                        block = ?receipt.block_number,
                        gas_used = receipt.gas_used,
                        "Transaction confirmed"
                    );
                    Ok(receipt)
                }
                Ok(receipt) => {
                    metrics::record_submission("reverted", started.elapsed());
                    tracing::warn!(tx_hash = %receipt.tx_hash, "Transaction reverted");
                    Err(Error::Reverted {
                        tx_hash: receipt.tx_hash,
                    })
                }
                Err(e) => {
                    metrics::record_submission(e.label(), started.elapsed());
                    tracing::warn!(error = %e, "Transaction submission failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Submit an encoded contract call with no value attached.
    pub async fn submit_call(&self, call: ContractCall) -> Result<Receipt> {
        self.submit(PendingTransaction::from(call)).await
    }

    /// Raw `eth_call`. `from` defaults to the session address.
    pub async fn get_data(&self, to: Address, from: Option<Address>, data: Bytes) -> Result<Bytes> {
        let handle = self.session.current_handle()?;
        let from = Some(from.unwrap_or_else(|| handle.address()));
        handle.call(CallParams { to, from, data }).await
    }

    /// Encode, call and decode a view function.
    pub async fn read<C: SolCall>(&self, view: &ViewCall<C>) -> Result<C::Return> {
        let encoded = view.encode();
        let raw = self.get_data(encoded.target, None, encoded.data).await?;
        view.decode(&raw)
    }

    /// Native balance of the session address, in wei.
    pub async fn get_balance(&self) -> Result<U256> {
        let handle = self.session.current_handle()?;
        handle.get_balance(handle.address()).await
    }

    /// Native balance of the session address, formatted in ether.
    pub async fn get_balance_ether(&self) -> Result<String> {
        Ok(format_ether(self.get_balance().await?))
    }
}

impl std::fmt::Debug for TransactionSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionSubmitter")
            .field("session", &self.session.info())
            .finish()
    }
}
