use chrono::{Duration as ChronoDuration, Utc};
use instawrite_api::app::{AppServices, build_app};
use instawrite_auth::JwtClaims;
use instawrite_core::UserId;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, in-memory store, ephemeral port.
        let app = build_app(JWT_SECRET, AppServices::in_memory());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, token: &str, title: &str, content: &str) -> String {
        let res = self
            .client
            .post(self.url("/blog"))
            .bearer_auth(token)
            .json(&json!({ "title": title, "content": content }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["id"].as_str().expect("create returns an id").to_string()
    }

    async fn fetch(&self, token: &str, id: &str) -> Value {
        let res = self
            .client
            .get(self.url("/blog"))
            .bearer_auth(token)
            .json(&json!({ "id": id }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }

    async fn bulk(&self, token: &str) -> Vec<Value> {
        let res = self
            .client
            .get(self.url("/blog/bulk"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(secret: &str, user: UserId) -> String {
    let now = Utc::now();
    let claims = JwtClaims::new(user).with_window(now, now + ChronoDuration::minutes(10));
    encode(secret, &claims)
}

fn encode(secret: &str, claims: &impl serde::Serialize) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_required_for_every_blog_route() {
    let srv = TestServer::spawn().await;
    let post_body = json!({ "title": "T1", "content": "C1" });

    let cases = [
        (Method::POST, "/blog"),
        (Method::PUT, "/blog"),
        (Method::GET, "/blog"),
        (Method::GET, "/blog/bulk"),
        (Method::GET, "/blog/whoami"),
    ];
    for (method, path) in cases {
        let res = srv
            .client
            .request(method.clone(), srv.url(path))
            .json(&post_body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{method} {path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "unauthorized" }));
    }

    // Nothing was written by the rejected create.
    let token = mint_jwt(JWT_SECRET, UserId::new());
    assert!(srv.bulk(&token).await.is_empty());
}

#[tokio::test]
async fn rejected_update_leaves_post_untouched() {
    let srv = TestServer::spawn().await;
    let user = UserId::new();
    let token = mint_jwt(JWT_SECRET, user);
    let id = srv.create(&token, "T1", "C1").await;

    let wrong_secret = mint_jwt("another-secret", user);
    for auth in [None, Some(format!("Bearer {wrong_secret}"))] {
        let mut req = srv
            .client
            .put(srv.url("/blog"))
            .json(&json!({ "id": id, "title": "x", "content": "x" }));
        if let Some(header) = &auth {
            req = req.header("Authorization", header);
        }
        let res = req.send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "auth {auth:?}");
    }

    let post = srv.fetch(&token, &id).await;
    assert_eq!(post["title"], "T1");
    assert_eq!(post["content"], "C1");
}

#[tokio::test]
async fn malformed_or_invalid_tokens_rejected() {
    let srv = TestServer::spawn().await;
    let user = UserId::new();
    let now = Utc::now();

    let expired = encode(
        JWT_SECRET,
        &JwtClaims::new(user).with_window(now - ChronoDuration::hours(2), now - ChronoDuration::hours(1)),
    );
    let wrong_secret = mint_jwt("another-secret", user);
    let valid = mint_jwt(JWT_SECRET, user);

    let headers = [
        "Bearer".to_string(),
        format!("Basic {valid}"),
        format!("Bearer {valid} extra"),
        valid.clone(),
        format!("Bearer {wrong_secret}"),
        format!("Bearer {expired}"),
        "Bearer not-a-token".to_string(),
    ];
    for header in headers {
        let res = srv
            .client
            .post(srv.url("/blog"))
            .header("Authorization", &header)
            .json(&json!({ "title": "T1", "content": "C1" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "header {header:?}");
    }

    assert!(srv.bulk(&valid).await.is_empty());
}

#[tokio::test]
async fn create_then_fetch_returns_the_post() {
    let srv = TestServer::spawn().await;
    let user = UserId::new();
    let token = mint_jwt(JWT_SECRET, user);

    let id = srv.create(&token, "T1", "C1").await;
    let post = srv.fetch(&token, &id).await;

    assert_eq!(
        post,
        json!({
            "id": id,
            "title": "T1",
            "content": "C1",
            "authorId": user.to_string(),
        })
    );
}

#[tokio::test]
async fn fetch_is_idempotent_and_open_to_any_user() {
    let srv = TestServer::spawn().await;
    let author = mint_jwt(JWT_SECRET, UserId::new());
    let reader = mint_jwt(JWT_SECRET, UserId::new());

    let id = srv.create(&author, "T1", "C1").await;
    let first = srv.fetch(&reader, &id).await;
    let second = srv.fetch(&reader, &id).await;

    assert_eq!(first, second);
    assert_eq!(first["title"], "T1");
}

#[tokio::test]
async fn fetch_unknown_id_returns_null() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET, UserId::new());

    let missing = instawrite_core::PostId::new().to_string();
    assert_eq!(srv.fetch(&token, &missing).await, Value::Null);
}

#[tokio::test]
async fn create_with_invalid_body_rejected() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET, UserId::new());

    let bodies = [
        json!({ "title": "T1" }),
        json!({ "content": "C1" }),
        json!({ "title": 7, "content": "C1" }),
        json!([]),
    ];
    for body in bodies {
        let res = srv
            .client
            .post(srv.url("/blog"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body}");
        let err: Value = res.json().await.unwrap();
        assert_eq!(err, json!({ "error": "invalid input" }));
    }

    let res = srv
        .client
        .post(srv.url("/blog"))
        .bearer_auth(&token)
        .body("title=T1&content=C1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert!(srv.bulk(&token).await.is_empty());
}

#[tokio::test]
async fn fetch_without_body_rejected() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET, UserId::new());

    let res = srv
        .client
        .get(srv.url("/blog"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn owner_can_update_post() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET, UserId::new());
    let id = srv.create(&token, "T1", "C1").await;

    let res = srv
        .client
        .put(srv.url("/blog"))
        .bearer_auth(&token)
        .json(&json!({ "id": id, "title": "T2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "updated post");

    let post = srv.fetch(&token, &id).await;
    assert_eq!(post["title"], "T2");
    assert_eq!(post["content"], "C1");
}

#[tokio::test]
async fn update_of_someone_elses_post_is_a_silent_noop() {
    let srv = TestServer::spawn().await;
    let owner = mint_jwt(JWT_SECRET, UserId::new());
    let intruder = mint_jwt(JWT_SECRET, UserId::new());
    let id = srv.create(&owner, "T1", "C1").await;
    let before = srv.fetch(&owner, &id).await;

    let res = srv
        .client
        .put(srv.url("/blog"))
        .bearer_auth(&intruder)
        .json(&json!({ "id": id, "title": "pwned", "content": "pwned" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "updated post");

    assert_eq!(srv.fetch(&owner, &id).await, before);
}

#[tokio::test]
async fn update_with_invalid_body_rejected() {
    let srv = TestServer::spawn().await;
    let token = mint_jwt(JWT_SECRET, UserId::new());
    let id = srv.create(&token, "T1", "C1").await;

    for body in [
        json!({ "title": "T2" }),
        json!({ "id": "not-an-id", "title": "T2" }),
        json!({ "id": id }),
    ] {
        let res = srv
            .client
            .put(srv.url("/blog"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body}");
    }

    assert_eq!(srv.fetch(&token, &id).await["title"], "T1");
}

#[tokio::test]
async fn bulk_lists_every_post() {
    let srv = TestServer::spawn().await;
    let alice = mint_jwt(JWT_SECRET, UserId::new());
    let bob = mint_jwt(JWT_SECRET, UserId::new());

    let a = srv.create(&alice, "A", "a").await;
    let b = srv.create(&bob, "B", "b").await;

    let posts = srv.bulk(&alice).await;
    assert_eq!(posts.len(), 2);
    let ids: Vec<&str> = posts.iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert!(ids.contains(&a.as_str()));
    assert!(ids.contains(&b.as_str()));
}

#[tokio::test]
async fn identity_is_derived_from_token() {
    let srv = TestServer::spawn().await;
    let user = UserId::new();

    // Older tokens carry the user id under `id` instead of `sub`.
    let legacy = encode(JWT_SECRET, &json!({ "id": user.to_string() }));
    // When both are present `sub` is the identity.
    let both = encode(
        JWT_SECRET,
        &json!({ "sub": user.to_string(), "id": UserId::new().to_string() }),
    );

    for token in [mint_jwt(JWT_SECRET, user), legacy, both] {
        let res = srv
            .client
            .get(srv.url("/blog/whoami"))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["userId"], user.to_string());
    }
}
