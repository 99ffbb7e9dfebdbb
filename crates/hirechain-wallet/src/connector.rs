//! Wallet connector abstraction
//!
//! The external ledger-wallet SDK can only be constructed inside a browser
//! execution context, so the SDK surface is modeled as a capability: a
//! [`ConnectorLoader`] produces a [`WalletConnector`] where that is possible
//! and fails cleanly where it is not (server-side rendering, headless runs).

use crate::error::{Result, WalletError};
use async_trait::async_trait;
use hirechain_client::AccountId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which ledger the connector pairs against. Fixed at construction; the
/// application never switches networks at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerNetwork {
    Testnet,
    Mainnet,
}

impl LedgerNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerNetwork::Testnet => "testnet",
            LedgerNetwork::Mainnet => "mainnet",
        }
    }
}

/// Fixed application identity presented to the wallet during pairing.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Application name shown in the wallet's pairing prompt
    pub app_name: String,
    pub description: String,
    /// Application origin URL
    pub url: String,
    pub icon: String,
    /// Relay project identifier issued by the connector service
    pub project_id: String,
    pub network: LedgerNetwork,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            app_name: "HireChain".to_string(),
            description: "Decentralized job matching".to_string(),
            url: "https://hirechain.example".to_string(),
            icon: "https://hirechain.example/icon.png".to_string(),
            project_id: String::new(),
            network: LedgerNetwork::Testnet,
        }
    }
}

/// A transaction handed to the wallet for signing and submission.
///
/// `transaction_list` is the backend-staged encoded payload; this crate
/// never inspects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub signer_account_id: AccountId,
    pub transaction_list: String,
}

/// Outcome of a signed-and-submitted transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResult {
    /// Ledger transaction identifier, echoed to the backend's record calls
    pub transaction_id: String,
}

/// The external wallet-connector SDK surface.
///
/// Mirrors the operations the application actually uses: restore an
/// existing pairing, open the pairing modal, tear the pairing down, and
/// sign-and-submit an opaque payload.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Initialize the connector and restore a persisted pairing.
    /// Returns the restored signer's account when one exists.
    async fn init(&self) -> Result<Option<AccountId>>;

    /// Open the wallet selection modal and wait for the user to pair.
    /// Returns the paired signer's account.
    async fn open_modal(&self) -> Result<AccountId>;

    /// Tear down the active pairing.
    async fn disconnect(&self) -> Result<()>;

    /// Sign and submit a staged transaction. Failures propagate to the
    /// caller unmodified; there is no retry at this layer.
    async fn sign_and_execute(&self, request: SignRequest) -> Result<TxResult>;

    /// The account of the currently paired signer, if any.
    fn active_signer(&self) -> Option<AccountId>;
}

/// Produces a connector in environments where one can exist.
///
/// Stands in for the browser-only dynamic SDK import: a browser host loads
/// the real SDK, everything else gets [`HeadlessLoader`].
#[async_trait]
pub trait ConnectorLoader: Send + Sync {
    async fn load(&self, config: &WalletConfig) -> Result<Arc<dyn WalletConnector>>;
}

/// Loader for execution contexts without a wallet (server-side rendering,
/// tests that never touch the wallet, batch tools). Always fails with
/// [`WalletError::Unsupported`].
pub struct HeadlessLoader;

#[async_trait]
impl ConnectorLoader for HeadlessLoader {
    async fn load(&self, _config: &WalletConfig) -> Result<Arc<dyn WalletConnector>> {
        Err(WalletError::Unsupported(
            "wallet connector requires a browser execution context".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn headless_loader_refuses() {
        let result = HeadlessLoader.load(&WalletConfig::default()).await;
        assert!(matches!(result, Err(WalletError::Unsupported(_))));
    }

    #[test]
    fn default_config_targets_testnet() {
        let config = WalletConfig::default();
        assert_eq!(config.network, LedgerNetwork::Testnet);
        assert_eq!(config.network.as_str(), "testnet");
    }
}
