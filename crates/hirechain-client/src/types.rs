//! Types for the HireChain marketplace API
//!
//! All entities here are owned and mutated by the backend; the client only
//! holds transient copies. Field names follow the backend's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for the HireChain backend (e.g. "http://localhost:3500")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3500".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Opaque ledger account identifier (e.g. "0.0.335465")
///
/// Set on wallet connect, cleared on disconnect; the join key across
/// profiles, gigs, invitations, messages and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which side of the marketplace a profile is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    Freelancer,
    Hirer,
}

impl ProfileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Freelancer => "freelancer",
            ProfileType::Hirer => "hirer",
        }
    }
}

/// Gig lifecycle status.
///
/// The lifecycle is strictly forward-moving:
/// `Open → InProgress → Completed → Finalized`. The authoritative state
/// machine lives in the backend; the client only mirrors it for gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GigStatus {
    Open,
    InProgress,
    Completed,
    Finalized,
}

impl GigStatus {
    /// Whether the lifecycle permits moving from `self` to `next`.
    ///
    /// Only single forward steps are valid; there is no transition back
    /// to `Open` from anywhere.
    pub fn can_advance_to(&self, next: GigStatus) -> bool {
        matches!(
            (self, next),
            (GigStatus::Open, GigStatus::InProgress)
                | (GigStatus::InProgress, GigStatus::Completed)
                | (GigStatus::Completed, GigStatus::Finalized)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GigStatus::Finalized)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GigStatus::Open => "OPEN",
            GigStatus::InProgress => "IN_PROGRESS",
            GigStatus::Completed => "COMPLETED",
            GigStatus::Finalized => "FINALIZED",
        }
    }
}

/// Gig visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    Private,
}

/// Invitation lifecycle status. `Pending` transitions once, irreversibly,
/// to either `Accepted` or `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Filter for invitation list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationFilter {
    All,
    Pending,
    Accepted,
    Rejected,
}

impl InvitationFilter {
    pub fn matches(&self, status: InvitationStatus) -> bool {
        match self {
            InvitationFilter::All => true,
            InvitationFilter::Pending => status == InvitationStatus::Pending,
            InvitationFilter::Accepted => status == InvitationStatus::Accepted,
            InvitationFilter::Rejected => status == InvitationStatus::Rejected,
        }
    }
}

/// A registered user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_account_id: AccountId,
    pub name: String,
    pub email: String,
    pub profile_type: ProfileType,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A unit of work posted by a hirer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gig {
    #[serde(rename = "_id")]
    pub id: String,
    pub gig_ref_id: String,
    pub client_id: AccountId,
    pub title: String,
    pub description: String,
    /// Budget as the backend renders it (e.g. "500 HBAR")
    pub budget: String,
    pub duration: String,
    pub visibility: Visibility,
    pub status: GigStatus,
    #[serde(default)]
    pub escrow_contract_id: Option<String>,
    #[serde(default)]
    pub assigned_freelancer_id: Option<AccountId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Gig {
    /// Numeric portion of the budget string, used as the escrow amount.
    /// Returns `None` when the budget does not lead with a number.
    pub fn budget_amount(&self) -> Option<f64> {
        let numeric = self
            .budget
            .split("HBAR")
            .next()
            .unwrap_or(&self.budget)
            .trim();
        numeric.parse::<f64>().ok()
    }
}

/// An invitation from a hirer to a freelancer, one per (gig, freelancer).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    #[serde(rename = "_id")]
    pub id: String,
    pub gig_ref_id: String,
    pub freelancer_id: AccountId,
    #[serde(default)]
    pub message: String,
    pub status: InvitationStatus,
    pub invited_at: DateTime<Utc>,
    /// Embedded by the list endpoint
    #[serde(default)]
    pub gig: Option<Gig>,
    /// Embedded by the list endpoint
    #[serde(default)]
    pub client_profile: Option<Profile>,
}

/// A single chat message on a gig. Append-only, ordered by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GigMessage {
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    pub gig_ref_id: String,
    pub sender_id: AccountId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A review left after gig completion. Rating is 1..=5.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    pub gig_ref_id: String,
    pub reviewer_id: AccountId,
    pub reviewee_id: AccountId,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    /// Embedded by the aggregate endpoint
    #[serde(default)]
    pub reviewer_profile: Option<Profile>,
    /// Embedded by the aggregate endpoint
    #[serde(default)]
    pub gig: Option<Gig>,
}

/// Server-derived profile statistics; display-only on the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    pub average_rating: f64,
    pub total_reviews: u32,
    /// Review counts keyed by star rating ("1" through "5")
    #[serde(default)]
    pub rating_distribution: BTreeMap<String, u32>,
    #[serde(default)]
    pub xp_points: u64,
    pub completed_gigs_count: u32,
    #[serde(default)]
    pub active_gigs_count: Option<u32>,
    #[serde(default)]
    pub total_earned: Option<f64>,
}

impl ProfileStats {
    /// Count of reviews at the given star rating.
    pub fn count_for(&self, stars: u8) -> u32 {
        self.rating_distribution
            .get(&stars.to_string())
            .copied()
            .unwrap_or(0)
    }
}

/// Summary of a completed gig on the aggregate profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedGig {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub client_id: Option<AccountId>,
    pub title: String,
    pub budget: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate returned by `GET /api/freelancers/{id}`: profile plus stats,
/// completed gigs and recent reviews in one round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileData {
    pub profile: Profile,
    pub stats: ProfileStats,
    #[serde(default)]
    pub completed_gigs: Vec<CompletedGig>,
    #[serde(default)]
    pub recent_reviews: Vec<Review>,
}

// ==================== Write inputs ====================

/// Input for the profile registration flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub account_id: AccountId,
    pub name: String,
    pub email: String,
    pub profile_type: ProfileType,
    pub skills: Vec<String>,
    #[serde(default)]
    pub portfolio_url: Option<String>,
}

/// Input for the gig creation flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGig {
    pub client_id: AccountId,
    pub title: String,
    pub description: String,
    pub budget: String,
    pub duration: String,
    pub visibility: Visibility,
}

/// Input for sending a gig message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub sender_id: AccountId,
    pub message: String,
}

// ==================== Prepare/record envelopes ====================
//
// The backend stages an unsigned transaction and commits its effect only
// after the client supplies proof of submission. Envelopes are opaque:
// `*_data` values are echoed back verbatim on the record call.

/// Response from `POST /api/users/prepare-profile-creation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedProfileCreation {
    pub encoded_transaction: String,
    pub profile_data: serde_json::Value,
}

/// Response from `POST /api/gigs/prepare-creation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedGigCreation {
    pub encoded_transaction: String,
    pub gig_data: serde_json::Value,
}

/// Response from `POST /api/gigs/{ref}/prepare-assignment`.
///
/// Two transactions, signed in order: the escrow contract transaction,
/// then the consensus log transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedAssignment {
    pub encoded_contract_tx: String,
    pub encoded_hcs_tx: String,
    pub update_gig_data: serde_json::Value,
}

/// Response from the escrow prepare endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedEscrowTx {
    pub encoded_transaction: String,
}

/// Body for `POST /api/gigs/{ref}/record-assignment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAssignment {
    pub contract_transaction_id: String,
    pub freelancer_account_id: AccountId,
    pub update_gig_data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gig_lifecycle_is_forward_only() {
        assert!(GigStatus::Open.can_advance_to(GigStatus::InProgress));
        assert!(GigStatus::InProgress.can_advance_to(GigStatus::Completed));
        assert!(GigStatus::Completed.can_advance_to(GigStatus::Finalized));

        assert!(!GigStatus::InProgress.can_advance_to(GigStatus::Open));
        assert!(!GigStatus::Completed.can_advance_to(GigStatus::Open));
        assert!(!GigStatus::Open.can_advance_to(GigStatus::Completed));
        assert!(!GigStatus::Finalized.can_advance_to(GigStatus::Open));
        assert!(GigStatus::Finalized.is_terminal());
    }

    #[test]
    fn invitation_filter_matches() {
        assert!(InvitationFilter::All.matches(InvitationStatus::Pending));
        assert!(InvitationFilter::All.matches(InvitationStatus::Rejected));
        assert!(InvitationFilter::Pending.matches(InvitationStatus::Pending));
        assert!(!InvitationFilter::Pending.matches(InvitationStatus::Accepted));
    }

    #[test]
    fn gig_deserializes_backend_json() {
        let json = r#"{
            "_id": "66f0a1",
            "gigRefId": "0.0.12345-1700000000",
            "type": "GIG_CREATE",
            "clientId": "0.0.335465",
            "title": "Build a landing page",
            "description": "Modern and responsive",
            "budget": "500 HBAR",
            "duration": "2 Weeks",
            "visibility": "PUBLIC",
            "status": "IN_PROGRESS",
            "escrowContractId": "0.0.777",
            "assignedFreelancerId": "0.0.99",
            "__v": 0,
            "createdAt": "2025-11-01T10:00:00.000Z",
            "updatedAt": "2025-11-02T10:00:00.000Z"
        }"#;

        let gig: Gig = serde_json::from_str(json).unwrap();
        assert_eq!(gig.status, GigStatus::InProgress);
        assert_eq!(gig.visibility, Visibility::Public);
        assert_eq!(gig.client_id.as_str(), "0.0.335465");
        assert_eq!(gig.assigned_freelancer_id.as_ref().unwrap().as_str(), "0.0.99");
        assert_eq!(gig.budget_amount(), Some(500.0));
    }

    #[test]
    fn budget_amount_handles_malformed_strings() {
        let json = r#"{
            "_id": "x", "gigRefId": "r", "clientId": "0.0.1",
            "title": "t", "description": "d", "budget": "negotiable",
            "duration": "1 Week", "visibility": "PRIVATE", "status": "OPEN",
            "createdAt": "2025-11-01T10:00:00.000Z",
            "updatedAt": "2025-11-01T10:00:00.000Z"
        }"#;
        let gig: Gig = serde_json::from_str(json).unwrap();
        assert_eq!(gig.budget_amount(), None);
    }

    #[test]
    fn stats_zero_reviews_has_empty_distribution() {
        let stats = ProfileStats::default();
        assert_eq!(stats.total_reviews, 0);
        for stars in 1..=5u8 {
            assert_eq!(stats.count_for(stars), 0);
        }
    }

    #[test]
    fn record_assignment_serializes_camel_case() {
        let body = RecordAssignment {
            contract_transaction_id: "0.0.1@1700000000.000000001".into(),
            freelancer_account_id: "0.0.99".into(),
            update_gig_data: serde_json::json!({"status": "IN_PROGRESS"}),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"contractTransactionId\""));
        assert!(json.contains("\"freelancerAccountId\""));
        assert!(json.contains("\"updateGigData\""));
    }
}
