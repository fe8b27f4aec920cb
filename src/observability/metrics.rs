//! Metrics collection.
//!
//! # Metrics
//! - `frodo_logins_total` (counter): login attempts by kind, outcome
//! - `frodo_logouts_total` (counter): logouts by kind
//! - `frodo_session_drops_total` (counter): sessions cleared by out-of-band disconnect
//! - `frodo_submissions_total` (counter): transaction submissions by outcome
//! - `frodo_submission_duration_seconds` (histogram): submit-to-receipt latency
//! - `frodo_rpc_health` (gauge): 1=healthy, 0=unhealthy
//!
//! Only the `metrics` facade is used here; installing an exporter is left to
//! the embedding application.

use std::time::Duration;

use crate::wallet::WalletKind;

pub fn record_login(kind: WalletKind, outcome: &'static str) {
    metrics::counter!("frodo_logins_total", "kind" => kind.as_str(), "outcome" => outcome).increment(1);
}

pub fn record_logout(kind: WalletKind) {
    metrics::counter!("frodo_logouts_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_session_dropped(kind: WalletKind) {
    metrics::counter!("frodo_session_drops_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_submission(outcome: &'static str, elapsed: Duration) {
    metrics::counter!("frodo_submissions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("frodo_submission_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_rpc_health(endpoint: &str, healthy: bool) {
    metrics::gauge!("frodo_rpc_health", "endpoint" => endpoint.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}
