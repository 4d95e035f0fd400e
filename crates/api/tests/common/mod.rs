#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use archive_api::auth::jwt::JwtConfig;
use archive_api::auth::password::hash_password;
use archive_api::config::{AppEnv, ServerConfig};
use archive_api::router::build_app_router;
use archive_api::state::AppState;
use archive_db::models::user::CreateUser;
use archive_db::repositories::UserRepo;
use archive_mailer::{MailError, ResetLinkSender};
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";
pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

const BOUNDARY: &str = "archive-test-boundary-7MA4YWxkTrZu0gW";

// ---------------------------------------------------------------------------
// Reset link fakes
// ---------------------------------------------------------------------------

/// Records every link it is asked to deliver.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ResetLinkSender for RecordingSender {
    async fn send_reset_link(&self, to_email: &str, reset_url: &str) -> Result<(), MailError> {
        self.sent
            .lock()
            .unwrap()
            .push((to_email.to_string(), reset_url.to_string()));
        Ok(())
    }
}

/// Always fails, like an unreachable relay.
pub struct FailingSender;

#[async_trait::async_trait]
impl ResetLinkSender for FailingSender {
    async fn send_reset_link(&self, _to: &str, _url: &str) -> Result<(), MailError> {
        Err(MailError::Build("relay unreachable".into()))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Router plus the temp upload dir it writes into (kept alive by the struct).
pub struct TestApp {
    pub router: Router,
    pub upload_dir: TempDir,
    pub sender: Arc<RecordingSender>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn upload_path(&self) -> &Path {
        self.upload_dir.path()
    }

    /// Names of the files currently in the upload dir.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: &Path, app_env: AppEnv) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 5 * 1024 * 1024,
        frontend_url: "http://localhost:3000".to_string(),
        app_env,
        min_password_length: 8,
        jwt: test_jwt_config(),
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        expiry_hours: 24,
    }
}

/// Production-mode app whose reset links land in [`TestApp::sender`].
pub fn build_test_app(pool: PgPool) -> TestApp {
    let sender = Arc::new(RecordingSender::default());
    let reset_sender: Arc<dyn ResetLinkSender> = sender.clone();
    build_app_with(pool, AppEnv::Production, Some(reset_sender), sender)
}

/// Development-mode app: reset links come back in the response body.
pub fn build_dev_app(pool: PgPool) -> TestApp {
    let sender = Arc::new(RecordingSender::default());
    build_app_with(pool, AppEnv::Development, None, sender)
}

/// Production-mode app wired to an arbitrary sender.
pub fn build_app_with_sender(pool: PgPool, sender: Arc<dyn ResetLinkSender>) -> TestApp {
    build_app_with(
        pool,
        AppEnv::Production,
        Some(sender),
        Arc::new(RecordingSender::default()),
    )
}

fn build_app_with(
    pool: PgPool,
    app_env: AppEnv,
    reset_sender: Option<Arc<dyn ResetLinkSender>>,
    recorder: Arc<RecordingSender>,
) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("temp upload dir");
    let config = test_config(upload_dir.path(), app_env);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        reset_sender,
    };

    TestApp {
        router: build_app_router(state, &config),
        upload_dir,
        sender: recorder,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert the admin account directly.
pub async fn create_admin(pool: &PgPool) -> i64 {
    let hash = hash_password(ADMIN_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: ADMIN_USERNAME.to_string(),
            email: Some(ADMIN_EMAIL.to_string()),
            password_hash: hash,
            role: None,
        },
    )
    .await
    .expect("user creation should succeed")
    .id
}

/// Create the admin and log in through the API, returning the bearer token.
pub async fn admin_token(pool: &PgPool, app: Router) -> String {
    create_admin(pool).await;
    let body = serde_json::json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .expect("login returns a token")
        .to_string()
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::delete(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

/// A file part in a multipart request.
pub struct FilePart<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// Encode text fields and an optional file as `multipart/form-data`.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: {}\r\n\r\n",
                file.field, file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Send a multipart request (`POST` or `PUT`), optionally authenticated.
pub async fn send_multipart(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<FilePart<'_>>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(multipart_body(fields, file)))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("response body is JSON")
}
