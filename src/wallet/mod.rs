//! Wallet backends behind one connect/disconnect contract.
//!
//! # Data Flow
//! ```text
//! WalletKind (chosen at login)
//!     → multiplexer.rs (dispatch table kind → backend)
//!     → embedded.rs | injected.rs | custodial.rs (backend-specific connect flow)
//!     → Arc<dyn ProviderHandle> (address, sign, send, call, balance)
//! ```
//!
//! # Design Decisions
//! - One trait per capability set, closed enum for selection, no inheritance
//! - Every backend normalizes to the same handle shape
//! - One connection attempt at a time; the session store serializes logins

pub mod backend;
pub mod custodial;
pub mod embedded;
pub mod handle;
pub mod injected;
pub mod kind;
pub mod multiplexer;
pub mod rpc;

pub use backend::WalletBackend;
pub use custodial::CustodialBackend;
pub use embedded::EmbeddedBackend;
pub use handle::ProviderHandle;
pub use injected::InjectedBackend;
pub use kind::WalletKind;
pub use multiplexer::ProviderMultiplexer;
