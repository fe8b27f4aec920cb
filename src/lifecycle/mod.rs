//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     AppConfig → register enabled wallet backends → SessionStore → TransactionSubmitter
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast to background tasks (connection monitor) → logout → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Startup is offline: no backend is contacted until the first login
//! - Fail fast on configuration errors

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bootstrap, App};
