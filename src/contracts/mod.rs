//! Call-data encoding for the group-savings contracts.
//!
//! # Data Flow
//! ```text
//! typed arguments
//!     → circle_savings.rs | lending.rs | insurance.rs (sol! bindings)
//!     → ContractCall {target, data}     (state-changing, goes to tx::TransactionSubmitter)
//!     → ViewCall<C>                     (read-only, eth_call then decode to C::Return)
//! ```
//!
//! Everything here is pure: no I/O, same input always gives the same bytes.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::error::{Error, Result};

/// `(selector, signature)` table for a list of call types.
macro_rules! signatures {
    ($($call:ty),* $(,)?) => {
        &[$((<$call as alloy::sol_types::SolCall>::SELECTOR, <$call as alloy::sol_types::SolCall>::SIGNATURE)),*]
    };
}
pub(crate) use signatures;

pub mod circle_savings;
pub mod insurance;
pub mod lending;

pub use circle_savings::CircleSavings;
pub use insurance::{MicroInsurance, MicroInsuranceFactory};
pub use lending::{MicroLending, MicroLendingFactory};

/// Encoded state-changing call, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub target: Address,
    pub data: Bytes,
    /// Solidity signature, e.g. `contribute()`.
    pub signature: &'static str,
}

impl ContractCall {
    pub fn new<C: SolCall>(target: Address, call: &C) -> Self {
        Self {
            target,
            data: Bytes::from(call.abi_encode()),
            signature: C::SIGNATURE,
        }
    }
}

/// Read-only call whose result decodes to `C::Return`.
#[derive(Debug, Clone)]
pub struct ViewCall<C: SolCall> {
    pub target: Address,
    pub call: C,
}

impl<C: SolCall> ViewCall<C> {
    pub fn new(target: Address, call: C) -> Self {
        Self { target, call }
    }

    pub fn encode(&self) -> ContractCall {
        ContractCall::new(self.target, &self.call)
    }

    pub fn decode(&self, raw: &[u8]) -> Result<C::Return> {
        decode_return::<C>(raw)
    }
}

/// Decode the raw `eth_call` result of `C`.
pub fn decode_return<C: SolCall>(raw: &[u8]) -> Result<C::Return> {
    C::abi_decode_returns(raw).map_err(|e| Error::Decode(format!("{}: {}", C::SIGNATURE, e)))
}

/// Signature of the function `data` calls, if it is one of ours.
pub fn describe(data: &[u8]) -> Option<&'static str> {
    let selector: [u8; 4] = data.get(..4)?.try_into().ok()?;
    [
        circle_savings::SIGNATURES,
        lending::SIGNATURES,
        insurance::SIGNATURES,
    ]
    .into_iter()
    .flatten()
    .find(|(known, _)| *known == selector)
    .map(|(_, signature)| *signature)
}

/// Percentages travel on-chain scaled by 100 (5.5% is 550).
pub fn percent_to_basis_points(percent: f64) -> Result<U256> {
    if !percent.is_finite() || percent < 0.0 {
        return Err(Error::InvalidInput(format!(
            "Rate must be a non-negative percentage, got {}",
            percent
        )));
    }
    let scaled = (percent * 100.0).round();
    if scaled >= u64::MAX as f64 {
        return Err(Error::InvalidInput(format!("Rate {} is out of range", percent)));
    }
    Ok(U256::from(scaled as u64))
}
