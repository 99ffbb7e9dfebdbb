//! Wallet session lifecycle
//!
//! Owns the connector produced by a [`ConnectorLoader`] and tracks the
//! session through its states:
//!
//! `Unloaded → LibraryLoading → LibraryLoaded → ConnectorInitializing →
//! {Disconnected, Connected}`
//!
//! Every external call (library load, connector init, modal, signing) is
//! caught independently; a failure surfaces a notice and the state machine
//! simply does not advance.

use crate::connector::{ConnectorLoader, SignRequest, TxResult, WalletConfig, WalletConnector};
use crate::error::{Result, WalletError};
use crate::notify::{Notice, Notifier};
use hirechain_client::AccountId;
use std::sync::{Arc, RwLock};

/// Lifecycle state of the wallet session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    LibraryLoading,
    LibraryLoaded,
    ConnectorInitializing,
    Disconnected,
    Connected,
}

/// Outcome of a user-initiated connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Pairing succeeded; the signer's account is now authenticated
    Connected { account_id: AccountId },
    /// The connector has not finished initializing; try again shortly
    NotReady,
    /// Another connect is already awaiting the modal
    Busy,
    /// Pairing failed or yielded no signer
    Failed(String),
}

/// Wallet session shared across the application.
///
/// All methods take `&self`; the session is meant to live in an `Arc`.
pub struct WalletSession {
    config: WalletConfig,
    loader: Arc<dyn ConnectorLoader>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<SessionState>,
    connector: RwLock<Option<Arc<dyn WalletConnector>>>,
    /// Held while a connect is awaiting the modal; `try_lock` turns a
    /// concurrent second connect into `ConnectOutcome::Busy`
    connect_guard: tokio::sync::Mutex<()>,
}

impl WalletSession {
    pub fn new(
        config: WalletConfig,
        loader: Arc<dyn ConnectorLoader>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            loader,
            notifier,
            state: RwLock::new(SessionState::Unloaded),
            connector: RwLock::new(None),
            connect_guard: tokio::sync::Mutex::new(()),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    pub fn is_connected(&self) -> bool {
        self.state() == SessionState::Connected
    }

    /// Account of the active signer, when connected.
    pub fn account_id(&self) -> Option<AccountId> {
        self.current_connector().and_then(|c| c.active_signer())
    }

    /// Load the connector and restore any persisted pairing.
    ///
    /// Lands in `Connected` when a signer was restored, `Disconnected`
    /// when the connector is ready but unpaired, and an earlier state when
    /// loading or initialization failed.
    pub async fn bootstrap(&self) -> SessionState {
        self.set_state(SessionState::LibraryLoading);

        let connector = match self.loader.load(&self.config).await {
            Ok(connector) => connector,
            Err(err) => {
                tracing::warn!("Failed to load wallet connector: {}", err);
                self.notifier
                    .notify(Notice::error("Failed to load wallet connector"));
                self.set_state(SessionState::Unloaded);
                return self.state();
            }
        };

        *self
            .connector
            .write()
            .unwrap_or_else(|p| p.into_inner()) = Some(connector.clone());
        self.set_state(SessionState::LibraryLoaded);

        self.set_state(SessionState::ConnectorInitializing);
        match connector.init().await {
            Ok(Some(account)) => {
                tracing::debug!("Restored wallet pairing for {}", account);
                self.set_state(SessionState::Connected);
            }
            Ok(None) => {
                self.set_state(SessionState::Disconnected);
            }
            Err(err) => {
                tracing::warn!("Error initializing wallet connector: {}", err);
                self.notifier
                    .notify(Notice::error("Failed to initialize wallet connector"));
                self.set_state(SessionState::LibraryLoaded);
            }
        }

        self.state()
    }

    /// Open the pairing modal and wait for a signer.
    ///
    /// Never panics and never returns an error: every failure is a
    /// [`ConnectOutcome`] so a view can render it directly.
    pub async fn connect(&self) -> ConnectOutcome {
        let _guard = match self.connect_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => return ConnectOutcome::Busy,
        };

        let connector = match self.current_connector() {
            Some(connector)
                if matches!(
                    self.state(),
                    SessionState::Disconnected | SessionState::Connected
                ) =>
            {
                connector
            }
            _ => {
                self.notifier
                    .notify(Notice::info("Wallet is still initializing..."));
                return ConnectOutcome::NotReady;
            }
        };

        match connector.open_modal().await {
            Ok(account_id) => {
                self.set_state(SessionState::Connected);
                ConnectOutcome::Connected { account_id }
            }
            Err(err) => {
                tracing::warn!("Wallet pairing failed: {}", err);
                self.notifier
                    .notify(Notice::error("Failed to connect wallet"));
                ConnectOutcome::Failed(err.to_string())
            }
        }
    }

    /// Tear down the active pairing.
    ///
    /// On success the session returns to `Disconnected`; the caller is
    /// expected to clear authentication state and restart its views.
    pub async fn disconnect(&self) -> Result<()> {
        let Some(connector) = self.current_connector() else {
            return Ok(());
        };

        match connector.disconnect().await {
            Ok(()) => {
                self.set_state(SessionState::Disconnected);
                self.notifier.notify(Notice::success("Wallet disconnected"));
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Wallet disconnect failed: {}", err);
                self.notifier
                    .notify(Notice::error("Failed to disconnect wallet"));
                Err(err)
            }
        }
    }

    /// Sign and submit a backend-staged transaction payload.
    ///
    /// Requires `Connected`; otherwise fails with
    /// [`WalletError::NotConnected`] without touching the connector.
    /// Connector failures propagate unmodified; nothing is retried.
    pub async fn sign_and_execute_tx(&self, transaction_list: &str) -> Result<TxResult> {
        if !self.is_connected() {
            return Err(WalletError::NotConnected);
        }

        let connector = self.current_connector().ok_or(WalletError::NotConnected)?;
        let signer = connector.active_signer().ok_or(WalletError::NoSigner)?;

        connector
            .sign_and_execute(SignRequest {
                signer_account_id: signer,
                transaction_list: transaction_list.to_string(),
            })
            .await
    }

    fn current_connector(&self) -> Option<Arc<dyn WalletConnector>> {
        self.connector
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn set_state(&self, state: SessionState) {
        *self.state.write().unwrap_or_else(|p| p.into_inner()) = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockConnector, StaticLoader};
    use crate::notify::RecordingNotifier;
    use tokio::sync::Notify;

    fn session_with(
        connector: Arc<MockConnector>,
        notifier: Arc<RecordingNotifier>,
    ) -> Arc<WalletSession> {
        Arc::new(WalletSession::new(
            WalletConfig::default(),
            Arc::new(StaticLoader::new(connector)),
            notifier,
        ))
    }

    #[tokio::test]
    async fn sign_without_connection_makes_no_connector_call() {
        let connector = Arc::new(MockConnector::new());
        let session = session_with(connector.clone(), Arc::new(RecordingNotifier::new()));

        let err = session.sign_and_execute_tx("payload").await.unwrap_err();

        assert!(matches!(err, WalletError::NotConnected));
        assert_eq!(connector.sign_count(), 0);
    }

    #[tokio::test]
    async fn bootstrap_restores_persisted_pairing() {
        let connector = Arc::new(MockConnector::new().with_restored_signer("0.0.42"));
        let session = session_with(connector.clone(), Arc::new(RecordingNotifier::new()));

        let state = session.bootstrap().await;

        assert_eq!(state, SessionState::Connected);
        assert_eq!(session.account_id().unwrap().as_str(), "0.0.42");
        assert_eq!(connector.init_count(), 1);
    }

    #[tokio::test]
    async fn bootstrap_without_pairing_lands_disconnected() {
        let connector = Arc::new(MockConnector::new());
        let session = session_with(connector, Arc::new(RecordingNotifier::new()));

        assert_eq!(session.bootstrap().await, SessionState::Disconnected);
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn headless_loader_leaves_session_unloaded() {
        let notifier = Arc::new(RecordingNotifier::new());
        let session = WalletSession::new(
            WalletConfig::default(),
            Arc::new(crate::connector::HeadlessLoader),
            notifier.clone(),
        );

        assert_eq!(session.bootstrap().await, SessionState::Unloaded);
        assert!(notifier
            .messages()
            .iter()
            .any(|m| m.contains("Failed to load wallet connector")));
    }

    #[tokio::test]
    async fn connect_before_bootstrap_reports_not_ready() {
        let notifier = Arc::new(RecordingNotifier::new());
        let session = session_with(Arc::new(MockConnector::new()), notifier.clone());

        assert_eq!(session.connect().await, ConnectOutcome::NotReady);
        assert!(notifier
            .messages()
            .iter()
            .any(|m| m.contains("still initializing")));
    }

    #[tokio::test]
    async fn connect_pairs_and_reports_account() {
        let connector = Arc::new(MockConnector::new().with_modal_signer("0.0.77"));
        let session = session_with(connector.clone(), Arc::new(RecordingNotifier::new()));
        session.bootstrap().await;

        let outcome = session.connect().await;

        assert_eq!(
            outcome,
            ConnectOutcome::Connected {
                account_id: "0.0.77".into()
            }
        );
        assert!(session.is_connected());
        assert_eq!(connector.modal_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_connect_is_rejected_as_busy() {
        let gate = Arc::new(Notify::new());
        let connector = Arc::new(
            MockConnector::new()
                .with_modal_signer("0.0.77")
                .with_modal_gate(gate.clone()),
        );
        let session = session_with(connector, Arc::new(RecordingNotifier::new()));
        session.bootstrap().await;

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.connect().await }
        });

        // Wait for the first connect to be parked on the modal
        tokio::task::yield_now().await;

        assert_eq!(session.connect().await, ConnectOutcome::Busy);

        gate.notify_one();
        let outcome = first.await.unwrap();
        assert!(matches!(outcome, ConnectOutcome::Connected { .. }));
    }

    #[tokio::test]
    async fn modal_without_signer_fails_without_connecting() {
        let connector = Arc::new(MockConnector::new().with_no_modal_signer());
        let notifier = Arc::new(RecordingNotifier::new());
        let session = session_with(connector, notifier.clone());
        session.bootstrap().await;

        let outcome = session.connect().await;

        assert!(matches!(outcome, ConnectOutcome::Failed(_)));
        assert!(!session.is_connected());
        assert!(notifier
            .messages()
            .iter()
            .any(|m| m.contains("Failed to connect wallet")));
    }

    #[tokio::test]
    async fn disconnect_tears_down_pairing() {
        let connector = Arc::new(MockConnector::new().with_restored_signer("0.0.42"));
        let session = session_with(connector.clone(), Arc::new(RecordingNotifier::new()));
        session.bootstrap().await;

        session.disconnect().await.unwrap();

        assert_eq!(session.state(), SessionState::Disconnected);
        assert_eq!(connector.disconnect_count(), 1);
    }

    #[tokio::test]
    async fn signing_propagates_connector_rejection() {
        let connector = Arc::new(
            MockConnector::new()
                .with_restored_signer("0.0.42")
                .with_sign_failure("user rejected"),
        );
        let session = session_with(connector, Arc::new(RecordingNotifier::new()));
        session.bootstrap().await;

        let err = session.sign_and_execute_tx("payload").await.unwrap_err();
        assert!(matches!(err, WalletError::Rejected(_)));
    }
}
