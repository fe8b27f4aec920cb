//! One in-flight submission.

use alloy::primitives::{Address, Bytes, U256};
use uuid::Uuid;

use crate::blockchain::TransactionParams;
use crate::contracts::ContractCall;

/// A transaction about to be submitted. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    /// Correlation id for logs.
    pub id: Uuid,
    pub target: Address,
    pub call_data: Bytes,
    pub value: Option<U256>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
}

impl PendingTransaction {
    pub fn new(target: Address, call_data: Bytes) -> Self {
        Self {
            id: Uuid::new_v4(),
            target,
            call_data,
            value: None,
            gas_limit: None,
            gas_price: None,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub(crate) fn into_params(self) -> TransactionParams {
        TransactionParams {
            to: self.target,
            from: None,
            value: self.value,
            data: (!self.call_data.is_empty()).then_some(self.call_data),
            gas_limit: self.gas_limit,
            gas_price: self.gas_price,
        }
    }
}

impl From<ContractCall> for PendingTransaction {
    fn from(call: ContractCall) -> Self {
        Self::new(call.target, call.data)
    }
}
