//! Transaction submission.
//!
//! # Data Flow
//! ```text
//! ContractCall (contracts/) or raw {target, call data}
//!     → pending.rs (PendingTransaction, owned for one submission)
//!     → submitter.rs (active handle from SessionStore → sign, send, await receipt)
//!     → Receipt | typed error
//! ```

pub mod pending;
pub mod submitter;

pub use pending::PendingTransaction;
pub use submitter::TransactionSubmitter;
