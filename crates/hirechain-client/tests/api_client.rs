//! Integration tests for the API client against a mocked backend.

use std::sync::Arc;

use hirechain_client::{
    AccountId, ApiClient, ApiConfig, MemoryTokenStore, NewMessage, TokenStore,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, tokens: Arc<dyn TokenStore>) -> ApiClient {
    ApiClient::new(
        ApiConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        },
        tokens,
    )
}

fn gig_json(status: &str) -> serde_json::Value {
    json!({
        "_id": "66f0a1",
        "gigRefId": "gig-ref-1",
        "clientId": "0.0.335465",
        "title": "Build a landing page",
        "description": "Modern and responsive",
        "budget": "500 HBAR",
        "duration": "2 Weeks",
        "visibility": "PUBLIC",
        "status": status,
        "escrowContractId": null,
        "assignedFreelancerId": null,
        "createdAt": "2025-11-01T10:00:00.000Z",
        "updatedAt": "2025-11-02T10:00:00.000Z"
    })
}

#[tokio::test]
async fn server_error_message_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/gigs"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "database unavailable"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let err = client.list_gigs().await.unwrap_err();

    assert_eq!(err.to_string(), "database unavailable");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn err_array_first_element_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/gigs/prepare-creation"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "err": ["budget is required", "duration is required"]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let input = hirechain_client::NewGig {
        client_id: "0.0.1".into(),
        title: "t".into(),
        description: "d".into(),
        budget: "10 HBAR".into(),
        duration: "1 Week".into(),
        visibility: hirechain_client::Visibility::Public,
    };
    let err = client.prepare_gig_creation(&input).await.unwrap_err();

    assert_eq!(err.to_string(), "budget is required");
}

#[tokio::test]
async fn opaque_error_body_falls_back_to_operation_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/gigs"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let err = client.list_gigs().await.unwrap_err();

    assert_eq!(err.to_string(), "Unable to load gigs");
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn network_failure_yields_error_not_panic() {
    // Nothing listens here; the connection is refused.
    let client = ApiClient::new(
        ApiConfig {
            base_url: "http://127.0.0.1:1".into(),
            timeout_secs: 1,
        },
        Arc::new(MemoryTokenStore::new()),
    );

    let err = client.list_gigs().await.unwrap_err();
    assert_eq!(err.status(), None);
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn bearer_token_is_attached_when_present() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/gigs"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::with_token("secret-token")));
    let gigs = client.list_gigs().await.unwrap();
    assert!(gigs.is_empty());
}

#[tokio::test]
async fn my_gigs_sends_client_id_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/myGigs"))
        .and(query_param("clientId", "0.0.335465"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([gig_json("OPEN")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let gigs = client.my_gigs(&AccountId::from("0.0.335465")).await.unwrap();

    assert_eq!(gigs.len(), 1);
    assert_eq!(gigs[0].gig_ref_id, "gig-ref-1");
}

#[tokio::test]
async fn send_message_posts_expected_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/gigs/gig-ref-1/message"))
        .and(body_json(json!({
            "senderId": "0.0.99",
            "message": "hello there"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    client
        .send_gig_message(
            "gig-ref-1",
            &NewMessage {
                sender_id: "0.0.99".into(),
                message: "hello there".into(),
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn prepare_lock_escrow_sends_amount_and_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/gigs/gig-ref-1/prepare-lock-escrow"))
        .and(body_json(json!({
            "amount": 500.0,
            "clientId": "0.0.335465"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "encodedTransaction": "CgZiYXNlNjQ="
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let prepared = client
        .prepare_lock_escrow("gig-ref-1", 500.0, &AccountId::from("0.0.335465"))
        .await
        .unwrap();

    assert_eq!(prepared.encoded_transaction, "CgZiYXNlNjQ=");
}

#[tokio::test]
async fn not_found_is_detectable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/profile/0.0.404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "profile not found"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let err = client
        .get_profile(&AccountId::from("0.0.404"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "profile not found");
}

#[tokio::test]
async fn invitations_deserialize_with_embeds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/invitations/freelancer/0.0.99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "_id": "inv-1",
            "gigRefId": "gig-ref-1",
            "freelancerId": "0.0.99",
            "message": "Come work with us",
            "status": "PENDING",
            "invitedAt": "2025-11-03T08:00:00.000Z",
            "gig": gig_json("OPEN"),
            "clientProfile": {
                "_id": "prof-1",
                "userAccountId": "0.0.335465",
                "name": "Acme",
                "email": "acme@example.com",
                "profileType": "hirer",
                "skills": [],
                "portfolioUrl": null,
                "createdAt": "2025-10-01T00:00:00.000Z",
                "updatedAt": "2025-10-01T00:00:00.000Z"
            }
        }])))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryTokenStore::new()));
    let invitations = client
        .invitations_for_freelancer(&AccountId::from("0.0.99"))
        .await
        .unwrap();

    assert_eq!(invitations.len(), 1);
    let invitation = &invitations[0];
    assert_eq!(invitation.status, hirechain_client::InvitationStatus::Pending);
    assert_eq!(
        invitation.gig.as_ref().unwrap().status,
        hirechain_client::GigStatus::Open
    );
    assert_eq!(
        invitation.client_profile.as_ref().unwrap().profile_type,
        hirechain_client::ProfileType::Hirer
    );
}
