//! Crate-wide error type.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::wallet::WalletKind;

/// Errors surfaced by the session, wallet backends and transaction submitter.
#[derive(Debug, Error)]
pub enum Error {
    /// A login attempt failed; the session was left untouched.
    #[error("Login with {kind} failed: {source}")]
    LoginFailed {
        kind: WalletKind,
        #[source]
        source: Box<Error>,
    },

    /// The operation needs an active wallet session.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// No backend is registered for the requested kind.
    #[error("Unsupported wallet kind: {0}")]
    UnsupportedKind(WalletKind),

    /// The user declined a connection, signature or transaction.
    #[error("Rejected by user: {0}")]
    UserRejected(String),

    /// The backend could not be reached or initialised.
    #[error("Wallet backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The wallet or node refused the transaction.
    #[error("Transaction rejected: {0}")]
    SubmissionRejected(String),

    /// RPC connection or request failed.
    #[error("Network error: {0}")]
    Network(String),

    /// Transaction was mined but reverted.
    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },

    /// Transaction was not confirmed within the configured window.
    #[error("Transaction not confirmed after {0} blocks")]
    ConfirmationTimeout(u32),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Key loading or signing failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Returned bytes did not match the expected ABI shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Caller-supplied value could not be parsed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// True when the user declined, including a declined login.
    pub fn is_user_rejected(&self) -> bool {
        match self {
            Error::UserRejected(_) => true,
            Error::LoginFailed { source, .. } => source.is_user_rejected(),
            _ => false,
        }
    }

    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Error::LoginFailed { .. } => "login_failed",
            Error::NotAuthenticated => "not_authenticated",
            Error::UnsupportedKind(_) => "unsupported_kind",
            Error::UserRejected(_) => "user_rejected",
            Error::BackendUnavailable(_) => "backend_unavailable",
            Error::SubmissionRejected(_) => "submission_rejected",
            Error::Network(_) => "network",
            Error::Reverted { .. } => "reverted",
            Error::ConfirmationTimeout(_) => "confirmation_timeout",
            Error::GasPriceTooHigh { .. } => "gas_price_too_high",
            Error::Signing(_) => "signing",
            Error::Decode(_) => "decode",
            Error::InvalidInput(_) => "invalid_input",
        }
    }
}

/// Result type for wallet operations.
pub type Result<T> = std::result::Result<T, Error>;
