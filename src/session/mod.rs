//! Wallet session subsystem.
//!
//! # State Machine
//! ```text
//!              login(k) ok                     login(k2) ok
//!  LoggedOut ───────────────▶ LoggedIn(k) ───────────────────▶ LoggedIn(k2)
//!      ▲                         │   │                         (k disconnected)
//!      │        logout           │   │ wallet gone (refresh)
//!      └─────────────────────────┘───┘
//!
//!  any login failure: no transition
//! ```
//!
//! # Design Decisions
//! - Kind, address and handle are swapped in as one `Arc`; readers never see a half-set session
//! - Transitions are serialized; reads are lock-free
//! - Other components ask the store for the handle on every use instead of caching it

pub mod monitor;
pub mod store;

pub use monitor::ConnectionMonitor;
pub use store::{SessionInfo, SessionStore};
