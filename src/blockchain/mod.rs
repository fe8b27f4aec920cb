//! Chain access shared by every wallet backend.
//!
//! # Data Flow
//! ```text
//! ChainConfig (RPC URLs, confirmations, gas ceiling)
//!     → client.rs (read-side RPC with timeouts and failover)
//!     → transaction.rs (param shapes, gas policy, receipt polling)
//!     → wallet handles (sign + send, then confirm)
//! ```
//!
//! # Constraints
//! - All RPC calls have configurable timeouts
//! - Reads never need a wallet session

pub mod client;
pub mod transaction;
pub mod types;

pub use client::BlockchainClient;
pub use transaction::{wait_for_confirmation, CallParams, GasPolicy, TransactionParams};
pub use types::{ChainId, ConfirmationStatus, Receipt};
