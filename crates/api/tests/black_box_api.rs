use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use hearth_api::app::{self, AppServices};
use hearth_auth::hash_password;
use hearth_infra::NewUser;

const JWT_SECRET: &str = "test-secret";

const TOKEN_DENIED: &str = "Error parsing authentication token";
const POLICY_DENIED: &str = "Not authorized to perform that action";

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory stores, ephemeral port.
        let services = Arc::new(
            app::services::in_memory_services(JWT_SECRET)
                .await
                .expect("failed to build services"),
        );
        let router = app::build_app(services.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url,
            services,
            handle,
        }
    }

    async fn add_user(&self, email: &str, password: &str, role: &str) -> i64 {
        self.services
            .users
            .create(NewUser {
                email: email.to_string(),
                role: role.to_string(),
                password_hash: hash_password(password).unwrap(),
            })
            .await
            .expect("failed to create test user")
            .id
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn login(client: &reqwest::Client, base_url: &str, email: &str, password: &str) -> String {
    let res = client
        .post(format!("{}/api/login", base_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

/// Sign claims directly, bypassing the server, to fabricate expired or
/// foreign tokens.
fn mint_token(secret: &str, email: &str, role: &str, exp: chrono::DateTime<Utc>) -> String {
    let claims = json!({
        "userID": "999",
        "email": email,
        "role": role,
        "exp": exp.timestamp(),
    });
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let srv = TestServer::spawn().await;

    let res = reqwest::Client::new()
        .get(format!("{}/api/me", srv.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.text().await.unwrap(), TOKEN_DENIED);
}

#[tokio::test]
async fn login_issues_a_working_token() {
    let srv = TestServer::spawn().await;
    srv.add_user("alice@example.com", "correct horse", "user").await;

    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url, "alice@example.com", "correct horse").await;

    let res = client
        .get(format!("{}/api/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn login_rejects_bad_credentials_uniformly() {
    let srv = TestServer::spawn().await;
    srv.add_user("alice@example.com", "correct horse", "user").await;

    let client = reqwest::Client::new();

    // Wrong password and unknown account are indistinguishable.
    for (email, password) in [
        ("alice@example.com", "wrong password"),
        ("nobody@example.com", "correct horse"),
    ] {
        let res = client
            .post(format!("{}/api/login", srv.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn expired_token_is_denied() {
    let srv = TestServer::spawn().await;
    srv.add_user("alice@example.com", "pw", "user").await;

    let expired = mint_token(
        JWT_SECRET,
        "alice@example.com",
        "user",
        Utc::now() - ChronoDuration::hours(1),
    );

    let res = reqwest::Client::new()
        .get(format!("{}/api/me", srv.base_url))
        .bearer_auth(&expired)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.text().await.unwrap(), TOKEN_DENIED);
}

#[tokio::test]
async fn foreign_and_garbage_tokens_are_denied() {
    let srv = TestServer::spawn().await;
    srv.add_user("alice@example.com", "pw", "user").await;

    let client = reqwest::Client::new();

    let foreign = mint_token(
        "some-other-secret",
        "alice@example.com",
        "user",
        Utc::now() + ChronoDuration::hours(1),
    );
    for token in [foreign.as_str(), "garbage"] {
        let res = client
            .get(format!("{}/api/me", srv.base_url))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(res.text().await.unwrap(), TOKEN_DENIED);
    }
}

#[tokio::test]
async fn unknown_method_is_denied_even_on_permitted_resource() {
    let srv = TestServer::spawn().await;
    srv.add_user("alice@example.com", "pw", "user").await;

    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url, "alice@example.com", "pw").await;

    // Alice may read and update /api/me, but PATCH derives no action and no
    // action matches no rule.
    let res = client
        .patch(format!("{}/api/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.text().await.unwrap(), POLICY_DENIED);
}

#[tokio::test]
async fn ordinary_users_cannot_administer_accounts() {
    let srv = TestServer::spawn().await;
    srv.add_user("alice@example.com", "pw", "user").await;

    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url, "alice@example.com", "pw").await;

    let list = client
        .get(format!("{}/api/users", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(list.status(), StatusCode::FORBIDDEN);

    let delete = client
        .delete(format!("{}/api/users/1", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status(), StatusCode::FORBIDDEN);
    assert_eq!(delete.text().await.unwrap(), POLICY_DENIED);
}

#[tokio::test]
async fn admin_account_lifecycle() {
    let srv = TestServer::spawn().await;
    srv.add_user("root@example.com", "pw", "admin").await;

    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url, "root@example.com", "pw").await;

    // Create.
    let res = client
        .post(format!("{}/api/users", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "email": "bob@example.com", "password": "pw2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = res.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["role"], "user");

    // List.
    let res = client
        .get(format!("{}/api/users", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|u| u["email"] == "bob@example.com"));

    // Update via the item route: enforcement collapses /api/users/{id} onto
    // the /api/users rule.
    let res = client
        .put(format!("{}/api/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .json(&json!({ "role": "admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["role"], "admin");

    // Delete, then delete again: the second passes the gate but finds nothing.
    let res = client
        .delete(format!("{}/api/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .delete(format!("{}/api/users/{}", srv.base_url, id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn role_change_applies_without_reissuing_the_token() {
    let srv = TestServer::spawn().await;
    let admin_id = srv.add_user("root@example.com", "pw", "admin").await;
    let victim_id = srv.add_user("bob@example.com", "pw2", "user").await;

    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url, "root@example.com", "pw").await;

    // Downgrade the admin out-of-band; the old token still carries "admin".
    srv.services
        .users
        .update(
            admin_id,
            hearth_infra::UserUpdate {
                role: Some("user".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let res = client
        .delete(format!("{}/api/users/{}", srv.base_url, victim_id))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // The token itself is still valid; the account just enforces as "user" now.
    let res = client
        .get(format!("{}/api/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleted_account_with_live_token_is_denied() {
    let srv = TestServer::spawn().await;
    let id = srv.add_user("alice@example.com", "pw", "user").await;

    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url, "alice@example.com", "pw").await;

    srv.services.users.delete(id).await.unwrap();

    let res = client
        .get(format!("{}/api/me", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.text().await.unwrap(), POLICY_DENIED);
}

#[tokio::test]
async fn admins_can_create_accounts_with_a_session() {
    let srv = TestServer::spawn().await;
    srv.add_user("root@example.com", "pw", "admin").await;

    let client = reqwest::Client::new();
    let admin_token = login(&client, &srv.base_url, "root@example.com", "pw").await;

    let res = client
        .post(format!("{}/api/me", srv.base_url))
        .bearer_auth(&admin_token)
        .json(&json!({ "email": "carol@example.com", "password": "pw3" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let new_token = body["token"].as_str().unwrap();

    // The returned session belongs to the new account.
    let res = client
        .get(format!("{}/api/me", srv.base_url))
        .bearer_auth(new_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: serde_json::Value = res.json().await.unwrap();
    assert_eq!(me["email"], "carol@example.com");
    assert_eq!(me["role"], "user");
}

#[tokio::test]
async fn ordinary_users_cannot_create_accounts_with_a_session() {
    let srv = TestServer::spawn().await;
    srv.add_user("alice@example.com", "pw", "user").await;

    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url, "alice@example.com", "pw").await;

    let res = client
        .post(format!("{}/api/me", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "email": "mallory@example.com", "password": "pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn profile_updates_flow_through_the_gate() {
    let srv = TestServer::spawn().await;
    srv.add_user("alice@example.com", "pw", "user").await;

    let client = reqwest::Client::new();
    let token = login(&client, &srv.base_url, "alice@example.com", "pw").await;

    let res = client
        .put(format!("{}/api/me", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({ "email": "alice@new.example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["email"], "alice@new.example.com");
}
