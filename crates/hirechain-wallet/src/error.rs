//! Error types for wallet operations

use thiserror::Error;

/// Result type for wallet operations
pub type Result<T> = std::result::Result<T, WalletError>;

/// Wallet error types
#[derive(Debug, Error)]
pub enum WalletError {
    /// An operation that needs an active pairing was called without one
    #[error("Wallet not connected")]
    NotConnected,

    /// The connector has a pairing but no usable signer
    #[error("No signer available")]
    NoSigner,

    /// The connector has not finished initializing
    #[error("Wallet connector is still initializing")]
    NotReady,

    /// The user declined to sign
    #[error("Signing rejected: {0}")]
    Rejected(String),

    /// The underlying connector SDK failed
    #[error("Wallet connector error: {0}")]
    Connector(String),

    /// No connector can exist in this execution environment
    #[error("Wallet connector unavailable: {0}")]
    Unsupported(String),
}
