//! Auth/profile session store
//!
//! An explicit, injected state container (no ambient singleton): the host
//! constructs one [`AuthStore`] at startup and hands it to the wallet
//! session and the flows. Only `{authenticated_account_id,
//! is_authenticated}` survive restarts; everything richer is refetched.

use crate::error::Result;
use crate::store::{SessionStore, AUTH_STORAGE_KEY};
use hirechain_client::{AccountId, ApiClient, Profile, UserProfileData};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Mutable session state, scoped to one running client.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub profile: Option<Profile>,
    pub full_user_data: Option<UserProfileData>,
    pub is_loading: bool,
    pub authenticated_account_id: Option<AccountId>,
}

/// The subset persisted across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedAuth {
    authenticated_account_id: Option<AccountId>,
    is_authenticated: bool,
}

/// Process-wide auth/profile container.
///
/// Mutation goes through the setters only; reads take a cheap snapshot.
pub struct AuthStore {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
    state: RwLock<AuthState>,
}

impl AuthStore {
    /// Create a store, restoring the persisted subset when present.
    pub fn new(api: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        let mut state = AuthState::default();

        if let Some(raw) = store.load(AUTH_STORAGE_KEY) {
            match serde_json::from_str::<PersistedAuth>(&raw) {
                Ok(persisted) => {
                    state.authenticated_account_id = persisted.authenticated_account_id;
                    state.is_authenticated = persisted.is_authenticated;
                }
                Err(err) => tracing::debug!("Ignoring unreadable auth storage: {}", err),
            }
        }

        Self {
            api,
            store,
            state: RwLock::new(state),
        }
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .is_authenticated
    }

    pub fn account_id(&self) -> Option<AccountId> {
        self.state
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .authenticated_account_id
            .clone()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.state
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .profile
            .clone()
    }

    pub fn set_authenticated_account_id(&self, account_id: Option<AccountId>) {
        {
            let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
            state.authenticated_account_id = account_id;
        }
        self.persist();
    }

    pub fn set_profile(&self, profile: Option<Profile>) {
        let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
        state.profile = profile;
    }

    pub fn set_loading(&self, loading: bool) {
        let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
        state.is_loading = loading;
    }

    /// Lightweight profile fetch; authenticates on success, clears the
    /// profile on any failure. The loading flag is reset on every path.
    pub async fn fetch_profile(&self, account_id: &AccountId) -> Result<()> {
        self.set_loading(true);

        let outcome = match self.api.get_profile(account_id).await {
            Ok(profile) => {
                {
                    let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
                    state.is_authenticated = true;
                    state.profile = Some(profile);
                    state.authenticated_account_id = Some(account_id.clone());
                }
                self.persist();
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Error fetching user profile: {}", err);
                let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
                state.is_authenticated = false;
                state.profile = None;
                Err(err.into())
            }
        };

        self.set_loading(false);
        outcome
    }

    /// Aggregate fetch used after wallet connection to decide routing:
    /// `Some` means an existing profile (dashboard), `None` means the
    /// account has no profile yet (registration) or the fetch failed.
    pub async fn fetch_full_user_data(&self, account_id: &AccountId) -> Option<UserProfileData> {
        self.set_loading(true);

        let result = match self.api.get_freelancer(account_id).await {
            Ok(data) => {
                self.install_full_user_data(data.clone());
                Some(data)
            }
            Err(err) => {
                tracing::warn!("Error fetching full user data: {}", err);
                None
            }
        };

        self.set_loading(false);
        result
    }

    /// Install an aggregate fetched elsewhere (e.g. right after the
    /// registration flow records a new profile).
    pub fn install_full_user_data(&self, data: UserProfileData) {
        {
            let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
            state.authenticated_account_id = Some(data.profile.user_account_id.clone());
            state.profile = Some(data.profile.clone());
            state.full_user_data = Some(data);
            state.is_authenticated = true;
        }
        self.persist();
    }

    /// Clear every field synchronously and wipe the persisted subset.
    pub fn logout(&self) {
        {
            let mut state = self.state.write().unwrap_or_else(|p| p.into_inner());
            *state = AuthState::default();
        }
        self.store.remove(AUTH_STORAGE_KEY);
    }

    fn persist(&self) {
        let persisted = {
            let state = self.state.read().unwrap_or_else(|p| p.into_inner());
            PersistedAuth {
                authenticated_account_id: state.authenticated_account_id.clone(),
                is_authenticated: state.is_authenticated,
            }
        };

        match serde_json::to_string(&persisted) {
            Ok(raw) => {
                if let Err(err) = self.store.save(AUTH_STORAGE_KEY, &raw) {
                    tracing::warn!("Failed to persist auth state: {}", err);
                }
            }
            Err(err) => tracing::warn!("Failed to serialize auth state: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySessionStore;
    use hirechain_client::{ApiConfig, MemoryTokenStore};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> ApiClient {
        ApiClient::new(
            ApiConfig {
                base_url: server.uri(),
                timeout_secs: 5,
            },
            Arc::new(MemoryTokenStore::new()),
        )
    }

    fn profile_json() -> serde_json::Value {
        json!({
            "_id": "prof-1",
            "userAccountId": "0.0.42",
            "name": "Ada",
            "email": "ada@example.com",
            "profileType": "freelancer",
            "skills": ["Rust"],
            "portfolioUrl": "https://ada.example",
            "createdAt": "2025-10-01T00:00:00.000Z",
            "updatedAt": "2025-10-01T00:00:00.000Z"
        })
    }

    #[tokio::test]
    async fn fetch_profile_authenticates_and_persists() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/profile/0.0.42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
            .mount(&server)
            .await;

        let session_store = Arc::new(MemorySessionStore::new());
        let auth = AuthStore::new(api_for(&server), session_store.clone());

        auth.fetch_profile(&"0.0.42".into()).await.unwrap();

        let state = auth.snapshot();
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.profile.unwrap().name, "Ada");

        let persisted = session_store.load(AUTH_STORAGE_KEY).unwrap();
        assert!(persisted.contains("\"isAuthenticated\":true"));
        assert!(persisted.contains("0.0.42"));
    }

    #[tokio::test]
    async fn fetch_profile_failure_clears_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/profile/0.0.42"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "profile not found"
            })))
            .mount(&server)
            .await;

        let auth = AuthStore::new(api_for(&server), Arc::new(MemorySessionStore::new()));
        let err = auth.fetch_profile(&"0.0.42".into()).await.unwrap_err();

        assert_eq!(err.to_string(), "profile not found");
        let state = auth.snapshot();
        assert!(!state.is_authenticated);
        assert!(state.profile.is_none());
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn fetch_full_user_data_routes_registration_on_missing_profile() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/freelancers/0.0.42"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "no profile"
            })))
            .mount(&server)
            .await;

        let auth = AuthStore::new(api_for(&server), Arc::new(MemorySessionStore::new()));
        assert!(auth.fetch_full_user_data(&"0.0.42".into()).await.is_none());
        assert!(!auth.snapshot().is_loading);
    }

    #[tokio::test]
    async fn persisted_subset_is_restored_on_construction() {
        let session_store = Arc::new(MemorySessionStore::new());
        session_store
            .save(
                AUTH_STORAGE_KEY,
                r#"{"authenticatedAccountId":"0.0.42","isAuthenticated":true}"#,
            )
            .unwrap();

        let server = MockServer::start().await;
        let auth = AuthStore::new(api_for(&server), session_store);

        let state = auth.snapshot();
        assert!(state.is_authenticated);
        assert_eq!(state.authenticated_account_id.unwrap().as_str(), "0.0.42");
        // Richer data is never persisted
        assert!(state.profile.is_none());
        assert!(state.full_user_data.is_none());
    }

    #[tokio::test]
    async fn logout_clears_everything_and_wipes_storage() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/profile/0.0.42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
            .mount(&server)
            .await;

        let session_store = Arc::new(MemorySessionStore::new());
        let auth = AuthStore::new(api_for(&server), session_store.clone());
        auth.fetch_profile(&"0.0.42".into()).await.unwrap();

        auth.logout();

        let state = auth.snapshot();
        assert!(!state.is_authenticated);
        assert!(state.profile.is_none());
        assert!(state.authenticated_account_id.is_none());
        assert_eq!(session_store.load(AUTH_STORAGE_KEY), None);
    }
}
