//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! session / wallet / tx subsystems produce:
//!     → logging.rs (structured tracing events, submission spans)
//!     → metrics.rs (counters, gauges, histograms via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Keys and API tokens are never part of any event
//! - Each submission carries a correlation id in its span

pub mod logging;
pub mod metrics;
