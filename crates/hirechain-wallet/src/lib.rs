//! Wallet-connector abstraction and session lifecycle for HireChain
//!
//! The real ledger-wallet SDK only exists inside a browser, so it is
//! modeled here as an injectable capability: a [`ConnectorLoader`] yields a
//! [`WalletConnector`], and [`WalletSession`] drives the connector through
//! the connect/disconnect/sign lifecycle. Headless targets use
//! [`HeadlessLoader`] and degrade to no-ops; tests use [`MockConnector`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hirechain_wallet::{
//!     MockConnector, StaticLoader, TracingNotifier, WalletConfig, WalletSession,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connector = Arc::new(MockConnector::new());
//! let session = WalletSession::new(
//!     WalletConfig::default(),
//!     Arc::new(StaticLoader::new(connector)),
//!     Arc::new(TracingNotifier),
//! );
//!
//! session.bootstrap().await;
//! let outcome = session.connect().await;
//! # Ok(())
//! # }
//! ```

pub mod connector;
pub mod error;
pub mod mock;
pub mod notify;
pub mod session;

// Re-export main types
pub use connector::{
    ConnectorLoader, HeadlessLoader, LedgerNetwork, SignRequest, TxResult, WalletConfig,
    WalletConnector,
};
pub use error::{Result, WalletError};
pub use mock::{MockConnector, StaticLoader};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use session::{ConnectOutcome, SessionState, WalletSession};
