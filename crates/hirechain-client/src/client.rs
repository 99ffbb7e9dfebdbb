//! HTTP client for the HireChain marketplace API
//!
//! Two layers: generic `get`/`post`/`patch`/`delete` verbs that normalize
//! every failure into an [`ApiError`] with a user-presentable message, and
//! typed endpoint methods for the operations the application performs.

use crate::error::{extract_error_message, ApiError, Result, DEFAULT_ERROR_MESSAGE};
use crate::token::TokenStore;
use crate::types::*;
use reqwest::{header, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client for the HireChain backend
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use hirechain_client::{ApiClient, ApiConfig, MemoryTokenStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new(
///     ApiConfig {
///         base_url: "http://localhost:3500".into(),
///         ..Default::default()
///     },
///     Arc::new(MemoryTokenStore::new()),
/// );
///
/// let gigs = client.list_gigs().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    client: Client,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            config,
            client,
            tokens,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // ==================== Generic verbs ====================

    /// GET `endpoint` with optional query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let request = self.client.get(self.url_with_params(endpoint, params));
        self.execute(request, DEFAULT_ERROR_MESSAGE).await
    }

    /// POST a JSON body to `endpoint`.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.post(self.url(endpoint)).json(body);
        self.execute(request, DEFAULT_ERROR_MESSAGE).await
    }

    /// PATCH a JSON body to `endpoint`.
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let request = self.client.patch(self.url(endpoint)).json(body);
        self.execute(request, DEFAULT_ERROR_MESSAGE).await
    }

    /// DELETE `endpoint` with optional query parameters.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let request = self.client.delete(self.url_with_params(endpoint, params));
        self.execute(request, DEFAULT_ERROR_MESSAGE).await
    }

    // ==================== Users & profiles ====================

    /// Lightweight profile fetch by account id.
    pub async fn get_profile(&self, account_id: &AccountId) -> Result<Profile> {
        let request = self.client.get(self.url(&format!(
            "/api/users/profile/{}",
            urlencoding::encode(account_id.as_str())
        )));
        self.execute(request, "Unable to load profile").await
    }

    /// Stage an unsigned profile-creation transaction.
    pub async fn prepare_profile_creation(
        &self,
        input: &NewProfile,
    ) -> Result<PreparedProfileCreation> {
        let request = self
            .client
            .post(self.url("/api/users/prepare-profile-creation"))
            .json(input);
        self.execute(request, "Unable to prepare profile creation")
            .await
    }

    /// Commit a profile creation after the staged transaction was submitted.
    pub async fn record_profile_creation(
        &self,
        profile_data: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let body = serde_json::json!({ "profileData": profile_data });
        let request = self
            .client
            .post(self.url("/api/users/record-profile-creation"))
            .json(&body);
        self.execute(request, "Unable to record profile creation")
            .await
    }

    /// Full aggregate for one account: profile, stats, completed gigs,
    /// recent reviews.
    pub async fn get_freelancer(&self, account_id: &AccountId) -> Result<UserProfileData> {
        let request = self.client.get(self.url(&format!(
            "/api/freelancers/{}",
            urlencoding::encode(account_id.as_str())
        )));
        self.execute(request, "Unable to load freelancer data").await
    }

    /// All browsable freelancer profiles.
    pub async fn browse_freelancers(&self) -> Result<Vec<UserProfileData>> {
        let request = self.client.get(self.url("/api/freelancers/browse"));
        self.execute(request, "Unable to load freelancers").await
    }

    // ==================== Gigs ====================

    /// All publicly listed gigs.
    pub async fn list_gigs(&self) -> Result<Vec<Gig>> {
        let request = self.client.get(self.url("/api/gigs"));
        self.execute(request, "Unable to load gigs").await
    }

    /// A single gig by reference id.
    pub async fn get_gig(&self, gig_ref_id: &str) -> Result<Gig> {
        let request = self.client.get(self.url(&format!(
            "/api/gigs/{}",
            urlencoding::encode(gig_ref_id)
        )));
        self.execute(request, "Unable to load gig").await
    }

    /// Gigs posted by the given client.
    pub async fn my_gigs(&self, client_id: &AccountId) -> Result<Vec<Gig>> {
        let params = [("clientId", client_id.to_string())];
        let request = self
            .client
            .get(self.url_with_params("/api/myGigs", &params));
        self.execute(request, "Unable to load your gigs").await
    }

    /// Gigs assigned to the given freelancer.
    pub async fn my_gigs_as_freelancer(&self, freelancer_id: &AccountId) -> Result<Vec<Gig>> {
        let params = [("freelancerId", freelancer_id.to_string())];
        let request = self
            .client
            .get(self.url_with_params("/api/myGigs/freelancer", &params));
        self.execute(request, "Unable to load your gigs").await
    }

    /// Stage an unsigned gig-creation transaction.
    pub async fn prepare_gig_creation(&self, input: &NewGig) -> Result<PreparedGigCreation> {
        let request = self
            .client
            .post(self.url("/api/gigs/prepare-creation"))
            .json(input);
        self.execute(request, "Unable to prepare gig creation").await
    }

    /// Commit a gig creation after the staged transaction was submitted.
    pub async fn record_gig_creation(
        &self,
        gig_data: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let body = serde_json::json!({ "gigData": gig_data });
        let request = self
            .client
            .post(self.url("/api/gigs/record-creation"))
            .json(&body);
        self.execute(request, "Unable to record gig creation").await
    }

    /// Stage the two assignment transactions (contract, then consensus log).
    pub async fn prepare_assignment(
        &self,
        gig_ref_id: &str,
        client_id: &AccountId,
        freelancer_id: &AccountId,
    ) -> Result<PreparedAssignment> {
        let body = serde_json::json!({
            "clientId": client_id,
            "freelancerId": freelancer_id,
        });
        let request = self
            .client
            .post(self.url(&format!(
                "/api/gigs/{}/prepare-assignment",
                urlencoding::encode(gig_ref_id)
            )))
            .json(&body);
        self.execute(request, "Unable to prepare assignment").await
    }

    /// Commit an assignment after both transactions were submitted.
    pub async fn record_assignment(
        &self,
        gig_ref_id: &str,
        record: &RecordAssignment,
    ) -> Result<serde_json::Value> {
        let request = self
            .client
            .post(self.url(&format!(
                "/api/gigs/{}/record-assignment",
                urlencoding::encode(gig_ref_id)
            )))
            .json(record);
        self.execute(request, "Unable to record assignment").await
    }

    // ==================== Escrow ====================

    /// Stage the escrow lock transaction for a gig.
    pub async fn prepare_lock_escrow(
        &self,
        gig_ref_id: &str,
        amount: f64,
        client_id: &AccountId,
    ) -> Result<PreparedEscrowTx> {
        let body = serde_json::json!({
            "amount": amount,
            "clientId": client_id,
        });
        let request = self
            .client
            .post(self.url(&format!(
                "/api/gigs/{}/prepare-lock-escrow",
                urlencoding::encode(gig_ref_id)
            )))
            .json(&body);
        self.execute(request, "Unable to prepare escrow lock").await
    }

    /// Stage the escrow release transaction for a gig.
    pub async fn prepare_release_escrow(
        &self,
        gig_ref_id: &str,
        client_id: &AccountId,
    ) -> Result<PreparedEscrowTx> {
        let body = serde_json::json!({ "clientId": client_id });
        let request = self
            .client
            .post(self.url(&format!(
                "/api/gigs/{}/prepare-release-escrow",
                urlencoding::encode(gig_ref_id)
            )))
            .json(&body);
        self.execute(request, "Unable to prepare escrow release")
            .await
    }

    /// Commit the escrow release; the backend finalizes the gig.
    pub async fn record_release_escrow(&self, gig_ref_id: &str) -> Result<serde_json::Value> {
        let request = self
            .client
            .post(self.url(&format!(
                "/api/gigs/{}/record-release-escrow",
                urlencoding::encode(gig_ref_id)
            )))
            .json(&serde_json::json!({}));
        self.execute(request, "Unable to record escrow release")
            .await
    }

    // ==================== Messaging ====================

    /// All messages for a gig, ordered by the backend (timestamp ascending).
    pub async fn gig_messages(&self, gig_ref_id: &str) -> Result<Vec<GigMessage>> {
        let request = self.client.get(self.url(&format!(
            "/api/gigs/{}/messages",
            urlencoding::encode(gig_ref_id)
        )));
        self.execute(request, "Unable to load messages").await
    }

    /// Append a message to a gig thread.
    pub async fn send_gig_message(
        &self,
        gig_ref_id: &str,
        message: &NewMessage,
    ) -> Result<serde_json::Value> {
        let request = self
            .client
            .post(self.url(&format!(
                "/api/gigs/{}/message",
                urlencoding::encode(gig_ref_id)
            )))
            .json(message);
        self.execute(request, "Unable to send message").await
    }

    // ==================== Invitations ====================

    /// Invitations addressed to the given freelancer, with embedded gig and
    /// client profile.
    pub async fn invitations_for_freelancer(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Invitation>> {
        let request = self.client.get(self.url(&format!(
            "/api/invitations/freelancer/{}",
            urlencoding::encode(account_id.as_str())
        )));
        self.execute(request, "Unable to load invitations").await
    }

    /// Accept a pending invitation.
    pub async fn accept_invitation(&self, invitation_id: &str) -> Result<serde_json::Value> {
        let request = self
            .client
            .post(self.url(&format!(
                "/api/invitations/{}/accept",
                urlencoding::encode(invitation_id)
            )))
            .json(&serde_json::json!({}));
        self.execute(request, "Unable to accept invitation").await
    }

    /// Reject a pending invitation.
    pub async fn reject_invitation(&self, invitation_id: &str) -> Result<serde_json::Value> {
        let request = self
            .client
            .post(self.url(&format!(
                "/api/invitations/{}/reject",
                urlencoding::encode(invitation_id)
            )))
            .json(&serde_json::json!({}));
        self.execute(request, "Unable to reject invitation").await
    }

    // ==================== Helper methods ====================

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    fn url_with_params(&self, endpoint: &str, params: &[(&str, String)]) -> String {
        let mut url = self.url(endpoint);
        if !params.is_empty() {
            let query: Vec<String> = params
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    /// Attach the bearer token, send, and normalize the outcome.
    ///
    /// Never panics: transport failures, non-2xx statuses and undecodable
    /// bodies all become an [`ApiError`] whose message is non-empty.
    async fn execute<T: DeserializeOwned>(
        &self,
        mut request: RequestBuilder,
        fallback: &str,
    ) -> Result<T> {
        if let Some(token) = self.tokens.token() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("API request failed before a response: {}", err);
                return Err(ApiError::Network {
                    message: fallback.to_string(),
                });
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status,
                message: extract_error_message(&body, fallback),
            });
        }

        match response.json().await {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!("API response did not decode: {}", err);
                Err(ApiError::Decode {
                    message: fallback.to_string(),
                })
            }
        }
    }
}
