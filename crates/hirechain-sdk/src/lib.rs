//! HireChain client SDK
//!
//! Ties the pieces together for a marketplace client: the REST API client
//! ([`hirechain_client`]), the wallet session ([`hirechain_wallet`]), an
//! injected auth/profile store, the prepare → sign → record transaction
//! flows, and the per-gig message poller.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hirechain_client::{ApiClient, ApiConfig, MemoryTokenStore};
//! use hirechain_sdk::{HireChain, MemorySessionStore, Route};
//! use hirechain_wallet::{HeadlessLoader, TracingNotifier, WalletConfig, WalletSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::new(ApiConfig::default(), Arc::new(MemoryTokenStore::new()));
//! let wallet = Arc::new(WalletSession::new(
//!     WalletConfig::default(),
//!     Arc::new(HeadlessLoader),
//!     Arc::new(TracingNotifier),
//! ));
//!
//! let sdk = HireChain::new(api, wallet, Arc::new(MemorySessionStore::new()));
//! sdk.start().await;
//!
//! match sdk.connect_wallet().await {
//!     hirechain_sdk::ConnectResult::Connected { route: Route::Dashboard, .. } => { /* … */ }
//!     hirechain_sdk::ConnectResult::Connected { route: Route::Registration, .. } => { /* … */ }
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod flows;
pub mod messaging;
pub mod session;
pub mod store;
pub mod views;

// Re-export main types
pub use error::{Result, SdkError};
pub use flows::{Flows, PendingKind, PendingRecord, ResyncReport};
pub use messaging::{MessageThread, POLL_INTERVAL};
pub use session::{AuthState, AuthStore};
pub use store::{
    FileSessionStore, MemorySessionStore, SessionStore, AUTH_STORAGE_KEY, PENDING_RECORDS_KEY,
};
pub use views::{
    dashboard_stats, filter_invitations, gig_actions, invitation_actions, rating_breakdown,
    DashboardStats, GigAction, InvitationAction, RatingBar,
};

// Re-export from underlying crates
pub use hirechain_client::{ApiClient, ApiConfig};
pub use hirechain_wallet::{ConnectOutcome, SessionState, WalletSession};

use hirechain_client::AccountId;
use hirechain_wallet::WalletError;
use std::sync::Arc;

/// Where to send the user after a successful wallet connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// An existing profile was found
    Dashboard,
    /// The account has no profile yet
    Registration,
}

/// Outcome of [`HireChain::connect_wallet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectResult {
    Connected { account_id: AccountId, route: Route },
    NotReady,
    Busy,
    Failed(String),
}

/// Everything a marketplace client needs, wired together.
pub struct HireChain {
    api: ApiClient,
    wallet: Arc<WalletSession>,
    auth: Arc<AuthStore>,
    flows: Flows,
}

impl HireChain {
    pub fn new(
        api: ApiClient,
        wallet: Arc<WalletSession>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let auth = Arc::new(AuthStore::new(api.clone(), store.clone()));
        let flows = Flows::new(api.clone(), wallet.clone(), auth.clone(), store);

        Self {
            api,
            wallet,
            auth,
            flows,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn wallet(&self) -> &Arc<WalletSession> {
        &self.wallet
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    pub fn flows(&self) -> &Flows {
        &self.flows
    }

    /// Bootstrap the wallet session, adopt a restored pairing into the
    /// auth store, and replay any journaled record calls.
    pub async fn start(&self) -> SessionState {
        let state = self.wallet.bootstrap().await;

        if state == SessionState::Connected {
            if let Some(account_id) = self.wallet.account_id() {
                self.auth
                    .set_authenticated_account_id(Some(account_id.clone()));
                self.auth.fetch_full_user_data(&account_id).await;
            }
        }

        match self.flows.resync().await {
            Ok(report) if report.replayed > 0 || report.remaining > 0 => {
                tracing::info!(
                    "Pending record resync: {} replayed, {} remaining",
                    report.replayed,
                    report.remaining
                );
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("Pending record resync failed: {}", err),
        }

        state
    }

    /// Connect the wallet, authenticate the paired account, and decide
    /// the landing route: dashboard for an existing profile, registration
    /// when the account has none.
    pub async fn connect_wallet(&self) -> ConnectResult {
        match self.wallet.connect().await {
            ConnectOutcome::Connected { account_id } => {
                self.auth
                    .set_authenticated_account_id(Some(account_id.clone()));

                let route = match self.auth.fetch_full_user_data(&account_id).await {
                    Some(_) => Route::Dashboard,
                    None => Route::Registration,
                };

                ConnectResult::Connected { account_id, route }
            }
            ConnectOutcome::NotReady => ConnectResult::NotReady,
            ConnectOutcome::Busy => ConnectResult::Busy,
            ConnectOutcome::Failed(message) => ConnectResult::Failed(message),
        }
    }

    /// Disconnect the wallet and clear the auth store. The caller is
    /// expected to restart its views so no residual state survives.
    pub async fn disconnect_wallet(&self) -> Result<()> {
        self.wallet.disconnect().await?;
        self.auth.logout();
        Ok(())
    }

    /// A message thread for one gig, sending as the authenticated account.
    pub fn message_thread(&self, gig_ref_id: impl Into<String>) -> Result<MessageThread> {
        let sender = self
            .auth
            .account_id()
            .ok_or(SdkError::Wallet(WalletError::NotConnected))?;
        Ok(MessageThread::new(self.api.clone(), gig_ref_id, sender))
    }
}
