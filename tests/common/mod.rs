#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;

use crm_console::config::Config;
use crm_console::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@crm.test";
pub const USER_EMAIL: &str = "user@crm.test";
pub const BROKEN_EMAIL: &str = "broken@crm.test";
pub const PASSWORD: &str = "secret";

/// Mints a credential the way the real API would.
pub fn mint(id: i64, email: &str, role: &str, exp_offset_secs: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    encode(
        &Header::default(),
        &json!({
            "id": id,
            "email": email,
            "role": role,
            "iat": now,
            "exp": now + exp_offset_secs,
        }),
        &EncodingKey::from_secret(b"mock-api-secret"),
    )
    .unwrap()
}

/// In-process stand-in for the collections API.
#[derive(Default)]
pub struct MockApi {
    pub users: Mutex<Vec<Value>>,
    pub employees: Mutex<Vec<Value>>,
    pub products: Mutex<Vec<Value>>,
    pub next_id: AtomicU64,
    /// Answer 403 on every collection call.
    pub forbid: AtomicBool,
    /// Answer 500 on every collection call.
    pub fail: AtomicBool,
    /// Authorization headers seen on collection calls, in order.
    pub seen_auth: Mutex<Vec<Option<String>>>,
}

impl MockApi {
    fn id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 100
    }

    async fn gate(&self, headers: &HeaderMap) -> Option<Response> {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.seen_auth.lock().await.push(auth.clone());

        if self.forbid.load(Ordering::SeqCst) {
            return Some((StatusCode::FORBIDDEN, Json(json!({"error": "Forbidden"}))).into_response());
        }
        if self.fail.load(Ordering::SeqCst) {
            return Some(
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"}))).into_response(),
            );
        }
        match auth {
            Some(value) if value.starts_with("Bearer ") => None,
            _ => Some((StatusCode::UNAUTHORIZED, Json(json!({"error": "no token"}))).into_response()),
        }
    }
}

async fn login(State(_mock): State<Arc<MockApi>>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if password != PASSWORD {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad credentials"}))).into_response();
    }
    let token = match email {
        ADMIN_EMAIL => mint(1, ADMIN_EMAIL, "ADMIN", 3600),
        USER_EMAIL => mint(2, USER_EMAIL, "USER", 3600),
        BROKEN_EMAIL => "this-is-not-a-credential".to_string(),
        _ => {
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unknown"}))).into_response();
        }
    };
    Json(json!({"token": token, "message": "ok"})).into_response()
}

async fn register(
    State(mock): State<Arc<MockApi>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Some(denied) = mock.gate(&headers).await {
        return denied;
    }
    body["id"] = json!(mock.id());
    body.as_object_mut().unwrap().remove("password");
    mock.users.lock().await.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn list_users(State(mock): State<Arc<MockApi>>, headers: HeaderMap) -> Response {
    if let Some(denied) = mock.gate(&headers).await {
        return denied;
    }
    Json(Value::Array(mock.users.lock().await.clone())).into_response()
}

async fn list_employees(State(mock): State<Arc<MockApi>>, headers: HeaderMap) -> Response {
    if let Some(denied) = mock.gate(&headers).await {
        return denied;
    }
    Json(Value::Array(mock.employees.lock().await.clone())).into_response()
}

async fn create_employee(
    State(mock): State<Arc<MockApi>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Some(denied) = mock.gate(&headers).await {
        return denied;
    }
    body["id"] = json!(mock.id());
    mock.employees.lock().await.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn list_products(State(mock): State<Arc<MockApi>>, headers: HeaderMap) -> Response {
    if let Some(denied) = mock.gate(&headers).await {
        return denied;
    }
    let products = mock.products.lock().await.clone();
    if products.is_empty() {
        // Some deployments answer an empty collection with an object.
        return Json(json!({"items": null})).into_response();
    }
    Json(Value::Array(products)).into_response()
}

async fn create_product(
    State(mock): State<Arc<MockApi>>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Some(denied) = mock.gate(&headers).await {
        return denied;
    }
    body["id"] = json!(mock.id());
    mock.products.lock().await.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

/// Shared test context: a running mock API and a scratch session directory.
pub struct TestContext {
    pub mock: Arc<MockApi>,
    pub base_url: String,
    pub session_dir: tempfile::TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let mock = Arc::new(MockApi::default());
        mock.users.lock().await.extend([
            json!({"id": 1, "email": ADMIN_EMAIL, "role": "ADMIN"}),
            json!({"id": 2, "email": USER_EMAIL, "role": "USER"}),
        ]);
        mock.employees.lock().await.push(json!({
            "id": 10,
            "name": "Ana Souza",
            "phone": "555-0100",
            "salary": 3200,
            "schedules": [
                {"workday": "MONDAY", "workStartTime": "9:00 AM", "workEndTime": "5:00 PM"}
            ]
        }));

        let app = Router::new()
            .route("/api/users/login", post(login))
            .route("/api/users/register", post(register))
            .route("/api/users", get(list_users))
            .route("/api/employees", get(list_employees).post(create_employee))
            .route("/api/products", get(list_products).post(create_product))
            .with_state(mock.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            mock,
            base_url: format!("http://{}", addr),
            session_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn config(&self) -> Config {
        Config::for_origin(self.base_url.clone(), self.session_dir.path())
    }

    /// Starts a console process against the mock, as if freshly launched.
    pub async fn launch(&self) -> AppState {
        AppState::new(&self.config()).await.unwrap()
    }

    /// The credential file the console uses for this origin.
    pub fn credential_path(&self) -> std::path::PathBuf {
        crm_console::repositories::credential::FileCredentialStore::for_origin(
            self.session_dir.path(),
            &self.base_url,
        )
        .path()
        .to_path_buf()
    }

    pub fn forbid(&self, on: bool) {
        self.mock.forbid.store(on, Ordering::SeqCst);
    }

    pub fn fail(&self, on: bool) {
        self.mock.fail.store(on, Ordering::SeqCst);
    }
}
