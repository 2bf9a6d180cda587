// Local stand-in for the Google token and Sheets values endpoints.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use fest_server::interface_adapters::clients::SheetsConfig;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Value, json};

pub const PRIVATE_KEY: &str = include_str!("../fixtures/service_account_key.pem");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/service_account_pub.pem");
pub const ISSUER: &str = "fest@villagil.iam.gserviceaccount.com";
pub const SPREADSHEET_ID: &str = "sheet-1";
pub const API_KEY: &str = "read-key";
pub const ACCESS_TOKEN: &str = "stub-access-token";

#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub method: &'static str,
    pub range: String,
    pub query: HashMap<String, String>,
    pub bearer: Option<String>,
    pub body: Value,
}

#[derive(Default)]
pub struct StubState {
    token_url: String,
    grids: Mutex<HashMap<String, Vec<Vec<String>>>>,
    calls: Mutex<Vec<RecordedCall>>,
    token_requests: Mutex<usize>,
    reject_tokens: AtomicBool,
    reject_reads: AtomicBool,
}

pub struct StubGoogle {
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubGoogle {
    pub fn seed(&self, range: &str, rows: &[&[&str]]) {
        let grid = rows
            .iter()
            .map(|row| row.iter().map(|value| value.to_string()).collect())
            .collect();
        self.state
            .grids
            .lock()
            .expect("grids mutex poisoned")
            .insert(range.to_string(), grid);
    }

    pub fn reject_tokens(&self) {
        self.state.reject_tokens.store(true, Ordering::SeqCst);
    }

    pub fn reject_reads(&self) {
        self.state.reject_reads.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub fn token_requests(&self) -> usize {
        *self.state.token_requests.lock().expect("token mutex poisoned")
    }

    pub fn config(&self) -> SheetsConfig {
        SheetsConfig::new(
            Some(SPREADSHEET_ID.to_string()),
            Some(API_KEY.to_string()),
            Some(ISSUER.to_string()),
            // Same shape as a key pasted into a single-line env var.
            Some(PRIVATE_KEY.replace('\n', "\\n")),
        )
        .with_endpoints(
            format!("{}/v4/spreadsheets", self.base_url),
            self.state.token_url.clone(),
        )
    }
}

// Bind an ephemeral port and serve the stub on the current runtime.
pub async fn spawn_stub() -> StubGoogle {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral stub port");
    let addr = listener.local_addr().expect("get local addr");
    let base_url = format!("http://{addr}");
    let state = Arc::new(StubState {
        token_url: format!("{base_url}/token"),
        ..StubState::default()
    });

    let app = Router::new()
        .route("/token", post(token))
        .route(
            "/v4/spreadsheets/{id}/values/{range}",
            get(read_values).put(write_values),
        )
        .route("/v4/spreadsheets/{id}/values:batchUpdate", post(batch_update))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });

    StubGoogle { base_url, state }
}

async fn token(
    State(state): State<Arc<StubState>>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    *state.token_requests.lock().expect("token mutex poisoned") += 1;

    if state.reject_tokens.load(Ordering::SeqCst) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant"})),
        );
    }
    if form.get("grant_type").map(String::as_str)
        != Some("urn:ietf:params:oauth:grant-type:jwt-bearer")
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "unsupported_grant_type"})),
        );
    }

    // Verify the assertion the way the real endpoint would.
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[state.token_url.as_str()]);
    validation.set_issuer(&[ISSUER]);
    let key = DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes()).expect("stub public key");
    let assertion = form.get("assertion").cloned().unwrap_or_default();
    if jsonwebtoken::decode::<Value>(&assertion, &key, &validation).is_err() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid_assertion"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({"access_token": ACCESS_TOKEN, "expires_in": 3599, "token_type": "Bearer"})),
    )
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn authorized(query: &HashMap<String, String>, bearer: &Option<String>) -> bool {
    query.get("key").map(String::as_str) == Some(API_KEY)
        || bearer.as_deref() == Some(ACCESS_TOKEN)
}

fn record(state: &StubState, call: RecordedCall) {
    state.calls.lock().expect("calls mutex poisoned").push(call);
}

async fn read_values(
    State(state): State<Arc<StubState>>,
    Path((id, range)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let bearer = bearer(&headers);
    record(
        &state,
        RecordedCall {
            method: "GET",
            range: range.clone(),
            query: query.clone(),
            bearer: bearer.clone(),
            body: Value::Null,
        },
    );

    if id != SPREADSHEET_ID || !authorized(&query, &bearer) {
        return (StatusCode::FORBIDDEN, Json(json!({"error": "forbidden"})));
    }
    if state.reject_reads.load(Ordering::SeqCst) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"message": "The caller does not have permission"}})),
        );
    }

    let grid = state
        .grids
        .lock()
        .expect("grids mutex poisoned")
        .get(&range)
        .cloned();
    // Google leaves out `values` for an empty range.
    match grid {
        Some(values) => (
            StatusCode::OK,
            Json(json!({"range": range, "majorDimension": "ROWS", "values": values})),
        ),
        None => (
            StatusCode::OK,
            Json(json!({"range": range, "majorDimension": "ROWS"})),
        ),
    }
}

async fn write_values(
    State(state): State<Arc<StubState>>,
    Path((_id, range)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let bearer = bearer(&headers);
    let allowed = authorized(&query, &bearer);
    record(
        &state,
        RecordedCall {
            method: "PUT",
            range: range.clone(),
            query,
            bearer,
            body,
        },
    );

    if !allowed {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthenticated"})));
    }
    (StatusCode::OK, Json(json!({"updatedRange": range})))
}

async fn batch_update(
    State(state): State<Arc<StubState>>,
    Path(_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let bearer = bearer(&headers);
    let allowed = bearer.as_deref() == Some(ACCESS_TOKEN);
    record(
        &state,
        RecordedCall {
            method: "BATCH",
            range: String::new(),
            query: HashMap::new(),
            bearer,
            body,
        },
    );

    if !allowed {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthenticated"})));
    }
    (StatusCode::OK, Json(json!({"totalUpdatedRows": 1})))
}
