//! End-to-end schema tests against a running MongoDB
//!
//! Gated on DEVLINK_TEST_MONGODB_URI; each test uses a throwaway database
//! that is dropped at the end.

use std::sync::Arc;

use bson::doc;
use devlink::auth::cookies::{extract_token, CookieSettings, Session};
use devlink::auth::jwt::TokenService;
use devlink::db::MongoClient;
use devlink::graphql::{build_schema, CookieSink, DevLinkSchema};
use devlink::mail::{Mailer, RecordingMailer};
use devlink::store::Stores;

struct TestApp {
    schema: DevLinkSchema,
    tokens: Arc<TokenService>,
    mailer: Arc<RecordingMailer>,
    mongo: MongoClient,
    db_name: String,
}

impl TestApp {
    async fn new() -> Option<Self> {
        let uri = std::env::var("DEVLINK_TEST_MONGODB_URI").ok()?;
        let db_name = format!("devlink_test_{}", uuid::Uuid::new_v4().simple());

        let mongo = MongoClient::new(&uri, &db_name)
            .await
            .expect("test MongoDB unreachable");
        let stores = Arc::new(Stores::init(&mongo).await.expect("store init failed"));
        let tokens = Arc::new(TokenService::new("test-secret".to_string(), 1800, 600));
        let mailer = Arc::new(RecordingMailer::new());

        let schema = build_schema(
            stores,
            Arc::clone(&tokens),
            Arc::clone(&mailer) as Arc<dyn Mailer>,
            CookieSettings::default(),
            "http://localhost:3000".to_string(),
        );

        Some(Self {
            schema,
            tokens,
            mailer,
            mongo,
            db_name,
        })
    }

    /// Execute an operation, returning the response JSON and any cookies set
    async fn execute(&self, query: &str, session: Session) -> (serde_json::Value, Vec<String>) {
        let sink = Arc::new(CookieSink::default());
        let response = self
            .schema
            .execute(
                async_graphql::Request::new(query)
                    .data(session)
                    .data(Arc::clone(&sink)),
            )
            .await;
        let json = serde_json::to_value(&response).expect("response serializes");
        (json, sink.drain())
    }

    /// Register an account and return the session carried by its cookies
    async fn register(&self, name: &str, email: &str) -> Session {
        let query = format!(
            r#"mutation {{ register(input: {{ name: "{name}", email: "{email}",
               password: "Abcd1234!", password2: "Abcd1234!" }}) {{ id email }} }}"#
        );
        let (json, cookies) = self.execute(&query, Session::default()).await;
        assert!(
            json["errors"].is_null(),
            "registration failed: {}",
            json["errors"]
        );
        self.session_from_cookies(&cookies)
    }

    fn session_from_cookies(&self, cookies: &[String]) -> Session {
        let token = cookies
            .iter()
            .find_map(|c| extract_token(Some(c)))
            .expect("session cookie issued");
        Session::from_cookie_header(&self.tokens, Some(&format!("token={token}")))
    }

    async fn teardown(self) {
        self.mongo
            .inner()
            .database(&self.db_name)
            .drop()
            .await
            .expect("test database drop failed");
    }
}

fn error_code(json: &serde_json::Value) -> &str {
    json["errors"][0]["extensions"]["code"]
        .as_str()
        .unwrap_or("")
}

#[tokio::test]
async fn feed_like_unlike_flow() {
    let Some(app) = TestApp::new().await else {
        eprintln!("DEVLINK_TEST_MONGODB_URI not set, skipping");
        return;
    };

    let alice = app.register("Alice", "alice@example.com").await;
    let bob = app.register("Bob", "bob@example.com").await;

    // Alice publishes a post
    let (json, _) = app
        .execute(
            r#"mutation { createPost(input: { text: "Hello from the integration test!" }) { id name } }"#,
            alice.clone(),
        )
        .await;
    assert!(json["errors"].is_null(), "createPost failed: {}", json["errors"]);
    let post_id = json["data"]["createPost"]["id"].as_str().unwrap().to_string();
    assert_eq!(json["data"]["createPost"]["name"], "Alice");

    // Bob cannot like without a profile
    let like = format!(r#"mutation {{ likePost(input: {{ postId: "{post_id}" }}) {{ id likes {{ user }} }} }}"#);
    let (json, _) = app.execute(&like, bob.clone()).await;
    assert_eq!(error_code(&json), "NOT_FOUND");

    // Bob creates a profile, then likes
    let (json, _) = app
        .execute(
            r#"mutation { editProfile(input: { handle: "bob-dev", status: "Developer",
               skills: "Rust, GraphQL" }) { handle skills } }"#,
            bob.clone(),
        )
        .await;
    assert!(json["errors"].is_null(), "editProfile failed: {}", json["errors"]);

    let (json, _) = app.execute(&like, bob.clone()).await;
    assert!(json["errors"].is_null(), "likePost failed: {}", json["errors"]);
    assert_eq!(json["data"]["likePost"]["likes"].as_array().unwrap().len(), 1);

    // A second like conflicts
    let (json, _) = app.execute(&like, bob.clone()).await;
    assert_eq!(error_code(&json), "CONFLICT");

    // Unlike, then unliking again fails
    let unlike = format!(r#"mutation {{ unlikePost(input: {{ postId: "{post_id}" }}) {{ likes {{ user }} }} }}"#);
    let (json, _) = app.execute(&unlike, bob.clone()).await;
    assert!(json["errors"].is_null());
    assert!(json["data"]["unlikePost"]["likes"].as_array().unwrap().is_empty());

    let (json, _) = app.execute(&unlike, bob.clone()).await;
    assert_eq!(error_code(&json), "NOT_FOUND");

    // Bob comments; only he may remove it
    let comment = format!(
        r#"mutation {{ commentOnPost(input: {{ postId: "{post_id}",
           text: "A perfectly reasonable comment." }}) {{ comments {{ id name }} }} }}"#
    );
    let (json, _) = app.execute(&comment, bob.clone()).await;
    assert!(json["errors"].is_null(), "comment failed: {}", json["errors"]);
    let comment_id = json["data"]["commentOnPost"]["comments"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let delete_comment = format!(
        r#"mutation {{ deleteComment(input: {{ postId: "{post_id}",
           commentId: "{comment_id}" }}) {{ comments {{ id }} }} }}"#
    );
    let (json, _) = app.execute(&delete_comment, alice.clone()).await;
    assert_eq!(error_code(&json), "FORBIDDEN");

    let (json, _) = app.execute(&delete_comment, bob.clone()).await;
    assert!(json["errors"].is_null());
    assert!(json["data"]["deleteComment"]["comments"].as_array().unwrap().is_empty());

    // Handle stays unique across owners but an owner keeps their own
    let claim_handle = r#"mutation { editProfile(input: { handle: "bob-dev",
        status: "Engineer", skills: "Rust" }) { handle status } }"#;
    let (json, _) = app.execute(claim_handle, bob).await;
    assert!(json["errors"].is_null(), "self re-edit failed: {}", json["errors"]);
    assert_eq!(json["data"]["editProfile"]["status"], "Engineer");

    let (json, _) = app.execute(claim_handle, alice.clone()).await;
    assert_eq!(error_code(&json), "CONFLICT");

    // Duplicate registration conflicts
    let (json, _) = app
        .execute(
            r#"mutation { register(input: { name: "Alice Again", email: "alice@example.com",
               password: "Abcd1234!", password2: "Abcd1234!" }) { id } }"#,
            Session::default(),
        )
        .await;
    assert_eq!(error_code(&json), "CONFLICT");

    // and leaves exactly one account for the address
    let accounts = app
        .mongo
        .inner()
        .database(&app.db_name)
        .collection::<bson::Document>("users")
        .count_documents(doc! { "email": "alice@example.com" })
        .await
        .unwrap();
    assert_eq!(accounts, 1);

    // The feed shows the post newest-first to anonymous readers
    let (json, _) = app
        .execute("{ allPosts { id text } }", Session::default())
        .await;
    assert!(json["errors"].is_null());
    assert_eq!(json["data"]["allPosts"][0]["id"], post_id.as_str());

    app.teardown().await;
}

#[tokio::test]
async fn password_reset_round_trip() {
    let Some(app) = TestApp::new().await else {
        eprintln!("DEVLINK_TEST_MONGODB_URI not set, skipping");
        return;
    };

    app.register("Carol", "carol@example.com").await;

    // Unknown address succeeds without dispatching anything
    let (json, _) = app
        .execute(
            r#"mutation { forgotPassword(input: { email: "nobody@example.com" }) { result } }"#,
            Session::default(),
        )
        .await;
    assert!(json["errors"].is_null());
    assert!(app.mailer.sent.lock().unwrap().is_empty());

    // Known address dispatches one reset link
    let (json, _) = app
        .execute(
            r#"mutation { forgotPassword(input: { email: "carol@example.com" }) { result } }"#,
            Session::default(),
        )
        .await;
    assert!(json["errors"].is_null());

    let link = {
        let sent = app.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "carol@example.com");
        sent[0].1.clone()
    };
    let token = link.rsplit('/').next().unwrap().to_string();
    assert!(link.contains("/reset/"));

    // The emailed token acts as the reset context
    let reset_session = Session::from_cookie_header(&app.tokens, Some(&format!("token={token}")));
    let (json, _) = app
        .execute(
            r#"mutation { resetPassword(input: { password: "NewPass99?", password2: "NewPass99?" }) { result } }"#,
            reset_session,
        )
        .await;
    assert!(json["errors"].is_null(), "resetPassword failed: {}", json["errors"]);

    // Without a token the link counts as expired
    let (json, _) = app
        .execute(
            r#"mutation { resetPassword(input: { password: "NewPass99?", password2: "NewPass99?" }) { result } }"#,
            Session::default(),
        )
        .await;
    assert_eq!(error_code(&json), "UNAUTHENTICATED");

    // Old password is rejected, new one works
    let (json, _) = app
        .execute(
            r#"mutation { login(input: { email: "carol@example.com", password: "Abcd1234!" }) { id } }"#,
            Session::default(),
        )
        .await;
    assert_eq!(error_code(&json), "UNAUTHENTICATED");
    let wrong_password_message = json["errors"][0]["message"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(
        wrong_password_message,
        "Authentication error: Email or password incorrect"
    );

    // An unregistered address fails with the very same message, so callers
    // cannot tell which half of the credentials was wrong
    let (json, _) = app
        .execute(
            r#"mutation { login(input: { email: "ghost@example.com", password: "Abcd1234!" }) { id } }"#,
            Session::default(),
        )
        .await;
    assert_eq!(error_code(&json), "UNAUTHENTICATED");
    assert_eq!(
        json["errors"][0]["message"].as_str().unwrap(),
        wrong_password_message
    );

    let (json, cookies) = app
        .execute(
            r#"mutation { login(input: { email: "carol@example.com", password: "NewPass99?" }) { email } }"#,
            Session::default(),
        )
        .await;
    assert!(json["errors"].is_null());
    assert_eq!(json["data"]["login"]["email"], "carol@example.com");
    assert!(!cookies.is_empty());

    app.teardown().await;
}
