//! Wallet session and transaction core for the Frodo group-savings client.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller (CLI, app)
//!        │ typed args
//!        ▼
//!   ┌───────────┐  ContractCall   ┌──────────────────────┐
//!   │ contracts │───────────────▶ │ tx::Transaction-     │
//!   │ (encoder) │                 │     Submitter        │
//!   └───────────┘                 └──────────┬───────────┘
//!                                            │ current_handle()
//!                                            ▼
//!                                 ┌──────────────────────┐   login(kind)
//!                                 │ session::SessionStore│◀──────────────── caller
//!                                 └──────────┬───────────┘
//!                                            │ connect / disconnect
//!                                            ▼
//!                                 ┌──────────────────────┐
//!                                 │ wallet::Provider-    │
//!                                 │     Multiplexer      │
//!                                 └──┬────────┬───────┬──┘
//!                           embedded │ injected│       │ custodial
//!                                    ▼        ▼       ▼
//!                                 local key  EIP-1193  custodian HTTP API
//!                                    └────────┴───────┴──▶ blockchain::BlockchainClient (reads, receipts)
//! ```

// Core
pub mod contracts;
pub mod session;
pub mod tx;
pub mod wallet;

// Chain access
pub mod blockchain;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;

// Fixtures
pub mod catalog;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use lifecycle::{bootstrap, App, Shutdown};
pub use session::{SessionInfo, SessionStore};
pub use tx::{PendingTransaction, TransactionSubmitter};
pub use wallet::{ProviderHandle, ProviderMultiplexer, WalletBackend, WalletKind};
