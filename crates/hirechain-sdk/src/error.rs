//! Error types for the HireChain SDK

use hirechain_client::ApiError;
use hirechain_wallet::WalletError;
use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK error types
#[derive(Debug, Error)]
pub enum SdkError {
    /// Backend request failed; the message is user-presentable
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Wallet interaction failed (not connected, rejected, connector error)
    #[error("{0}")]
    Wallet(#[from] WalletError),

    /// The same operation is already in flight
    #[error("{0} is already in progress")]
    Busy(&'static str),

    /// A transaction was signed and submitted but the backend record call
    /// failed; the divergence is journaled for a later resync
    #[error("Submitted but not recorded: {0}")]
    RecordFailed(String),

    /// Input rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// Client-side persistence failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Storage(err.to_string())
    }
}
