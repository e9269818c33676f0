//! Test utilities for toadr3-client
//!
//! [`MockVtn`] is an in-process VTN with a token endpoint and fixed fixture
//! data; [`TestServer`] serves any axum router on an ephemeral port.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use toadr3_core::Problem;
use uuid::Uuid;

use crate::access_token::OAuthConfig;

pub const TEST_CLIENT_ID: &str = "test_client_id";
pub const TEST_CLIENT_SECRET: &str = "test_client_secret";
pub const TEST_SCOPE: &str = "test_scope";
pub const TEST_AUDIENCE: &str = "test_audience";
pub const TEST_GRANT_TYPE: &str = "client_credentials";
/// Path of the token endpoint on a [`MockVtn`]
pub const TOKEN_PATH: &str = "/oauth/token";

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve `router` on an ephemeral localhost port
    ///
    /// # Example
    ///
    /// ```ignore
    /// let vtn = MockVtn::new();
    /// let server = TestServer::start(vtn.router()).await?;
    /// let client = ToadrClient::new(&server.base_url(), Some(vtn.oauth_config(&server)))?;
    /// ```
    pub async fn start(router: Router) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

// =============================================================================
// Mock VTN
// =============================================================================

struct MockState {
    require_auth: bool,
    token_delay: Duration,
    expires_in: i64,
    token_requests: AtomicUsize,
    issued: Mutex<HashSet<String>>,
    events: Vec<Value>,
    reports: Vec<Value>,
    programs: Mutex<Vec<Value>>,
    subscriptions: Mutex<Vec<Value>>,
}

/// In-process VTN for integration tests
///
/// Behaviour beyond plain CRUD:
/// - every VTN route answers 403 unless it gets a token issued by this mock
/// - `X-Custom-Header` other than `CustomValue` is answered with 400
/// - `x-parity=even|odd` keeps records with an even or odd numeric id
/// - `X-result-type: dict` makes list routes return a single object
/// - reports for event `35` and subscriptions for program `35` conflict (409)
/// - program `3` and subscription `1` do not exist
#[derive(Clone)]
pub struct MockVtn {
    state: Arc<MockState>,
}

impl Default for MockVtn {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVtn {
    pub fn new() -> Self {
        Self::build(true, Duration::ZERO, 3599)
    }

    /// A VTN that does not check the `Authorization` header
    pub fn without_auth() -> Self {
        Self::build(false, Duration::ZERO, 3599)
    }

    fn build(require_auth: bool, token_delay: Duration, expires_in: i64) -> Self {
        Self {
            state: Arc::new(MockState {
                require_auth,
                token_delay,
                expires_in,
                token_requests: AtomicUsize::new(0),
                issued: Mutex::new(HashSet::new()),
                events: fixture_events(),
                reports: fixture_reports(),
                programs: Mutex::new(fixture_programs()),
                subscriptions: Mutex::new(fixture_subscriptions()),
            }),
        }
    }

    /// Delay every token response; lets tests overlap token requests
    pub fn with_token_delay(self, delay: Duration) -> Self {
        Self::build(self.state.require_auth, delay, self.state.expires_in)
    }

    /// Lifetime in seconds of issued tokens
    pub fn with_expires_in(self, expires_in: i64) -> Self {
        Self::build(self.state.require_auth, self.state.token_delay, expires_in)
    }

    /// Number of requests the token endpoint has seen
    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    /// OAuth config accepted by this mock's token endpoint
    pub fn oauth_config(&self, server: &TestServer) -> OAuthConfig {
        OAuthConfig::with_scope(
            format!("{}{}", server.base_url(), TOKEN_PATH),
            TEST_GRANT_TYPE,
            TEST_SCOPE,
        )
        .credentials(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route(TOKEN_PATH, post(token))
            .route("/events", get(list_events))
            .route("/programs", get(list_programs))
            .route(
                "/programs/{id}",
                get(get_program).put(put_program).delete(delete_program),
            )
            .route("/reports", get(list_reports).post(post_report))
            .route(
                "/subscriptions",
                get(list_subscriptions).post(post_subscription),
            )
            .route(
                "/subscriptions/{id}",
                get(get_subscription)
                    .put(put_subscription)
                    .delete(delete_subscription),
            )
            .with_state(self.state.clone())
    }

    /// Start serving this mock
    pub async fn serve(&self) -> std::io::Result<TestServer> {
        TestServer::start(self.router()).await
    }
}

type AppState = Arc<MockState>;
type Params = Query<Vec<(String, String)>>;

fn problem(status: StatusCode, title: &str, detail: impl Into<String>) -> Response {
    let body = Problem::new(title, status.as_u16()).with_detail(detail);
    (status, Json(body)).into_response()
}

fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn param_all<'a>(params: &'a [(String, String)], name: &str) -> Vec<&'a str> {
    params
        .iter()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .collect()
}

/// Credential, `x-parity` and custom header checks shared by VTN routes
fn check_request(
    state: &MockState,
    headers: &HeaderMap,
    params: &[(String, String)],
) -> Result<(), Response> {
    if state.require_auth {
        let token = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        let known = token.is_some_and(|token| state.issued.lock().contains(token));
        if !known {
            return Err(problem(
                StatusCode::FORBIDDEN,
                "Forbidden",
                "Invalid or missing access token",
            ));
        }
    }

    if let Some(parity) = param(params, "x-parity") {
        if parity != "even" && parity != "odd" {
            return Err(problem(
                StatusCode::BAD_REQUEST,
                "Bad Request",
                format!("Invalid value for x-parity: {}", parity),
            ));
        }
    }

    if let Some(custom) = headers.get("x-custom-header") {
        let custom = custom.to_str().unwrap_or_default();
        if custom != "CustomValue" {
            return Err(problem(
                StatusCode::BAD_REQUEST,
                "Bad Request",
                format!("Invalid value for X-Custom-Header: {}", custom),
            ));
        }
    }

    Ok(())
}

fn wants_dict(headers: &HeaderMap) -> bool {
    headers
        .get("x-result-type")
        .is_some_and(|value| value == "dict")
}

fn field_is(item: &Value, field: &str, expected: Option<&str>) -> bool {
    match expected {
        Some(expected) => item[field].as_str() == Some(expected),
        None => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn matches_targets(item: &Value, params: &[(String, String)]) -> bool {
    let Some(target_type) = param(params, "targetType") else {
        return true;
    };
    let wanted = param_all(params, "targetValues");
    item["targets"].as_array().is_some_and(|targets| {
        targets.iter().any(|target| {
            target["type"].as_str() == Some(target_type)
                && target["values"].as_array().is_some_and(|values| {
                    values
                        .iter()
                        .any(|value| wanted.contains(&value_text(value).as_str()))
                })
        })
    })
}

/// Apply `skip`, `limit` and `x-parity` in that order
fn page(items: Vec<Value>, params: &[(String, String)]) -> Result<Vec<Value>, Response> {
    let parse = |name: &str| -> Result<Option<usize>, Response> {
        param(params, name)
            .map(|value| {
                value.parse::<usize>().map_err(|_| {
                    problem(
                        StatusCode::BAD_REQUEST,
                        "Bad Request",
                        format!("Invalid value for {}: {}", name, value),
                    )
                })
            })
            .transpose()
    };

    let skip = parse("skip")?.unwrap_or(0);
    let limit = parse("limit")?.unwrap_or(usize::MAX);
    let mut items: Vec<Value> = items.into_iter().skip(skip).take(limit).collect();

    if let Some(parity) = param(params, "x-parity") {
        let remainder = if parity == "even" { 0 } else { 1 };
        items.retain(|item| {
            item["id"]
                .as_str()
                .and_then(|id| id.parse::<u64>().ok())
                .is_some_and(|id| id % 2 == remainder)
        });
    }
    Ok(items)
}

fn list_response(
    headers: &HeaderMap,
    items: Vec<Value>,
    params: &[(String, String)],
) -> Response {
    if wants_dict(headers) {
        return Json(items.into_iter().next().unwrap_or(Value::Null)).into_response();
    }
    match page(items, params) {
        Ok(items) => Json(items).into_response(),
        Err(response) => response,
    }
}

fn not_found(kind: &str, id: &str) -> Response {
    problem(
        StatusCode::NOT_FOUND,
        "Not Found",
        format!("Unable to find {} with id: '{}'", kind, id),
    )
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

// =============================================================================
// Token endpoint
// =============================================================================

fn form_field<'a>(form: &'a HashMap<String, String>, name: &str) -> &'a str {
    form.get(name).map(String::as_str).unwrap_or_default()
}

async fn token(State(state): State<AppState>, Form(form): Form<HashMap<String, String>>) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    if !state.token_delay.is_zero() {
        tokio::time::sleep(state.token_delay).await;
    }

    let (grant_type, client_id, client_secret) = (
        form_field(&form, "grant_type"),
        form_field(&form, "client_id"),
        form_field(&form, "client_secret"),
    );
    let scope = form_field(&form, "scope");
    let claim_ok = scope == TEST_SCOPE || form_field(&form, "audience") == TEST_AUDIENCE;

    let error = |status: StatusCode, error: &str, description: String| {
        let body = json!({"error": error, "error_description": description, "error_uri": ""});
        (status, Json(body)).into_response()
    };

    let known_client = client_id == TEST_CLIENT_ID;
    let known_secret = client_secret == TEST_CLIENT_SECRET;
    let known_grant = grant_type == TEST_GRANT_TYPE;

    match (known_grant, known_client, known_secret, claim_ok) {
        (true, true, true, true) => {
            let token = Uuid::new_v4().to_string();
            state.issued.lock().insert(token.clone());
            Json(json!({
                "token_type": "Bearer",
                "expires_in": state.expires_in,
                "access_token": token,
            }))
            .into_response()
        }
        (false, true, true, true) if grant_type == "custom_grant" => error(
            StatusCode::BAD_REQUEST,
            "unsupported_grant_type",
            String::new(),
        ),
        (true, true, true, false) if scope == "wrong_scope" => {
            error(StatusCode::BAD_REQUEST, "invalid_scope", String::new())
        }
        (true, false, true, true) if client_id == "wrong_client_id" => {
            error(StatusCode::BAD_REQUEST, "unauthorized_client", String::new())
        }
        (true, true, false, true) if client_secret == "wrong_client_secret" => {
            error(StatusCode::UNAUTHORIZED, "invalid_client", String::new())
        }
        _ => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_server_error",
            format!(
                "No handling implemented for this combination of parameters: '{}' '{}' '{}'",
                grant_type, client_id, client_secret
            ),
        ),
    }
}

// =============================================================================
// Events and programs
// =============================================================================

async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Params,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    let program_id = param(&params, "programID");
    let events = state
        .events
        .iter()
        .filter(|event| field_is(event, "programID", program_id))
        .filter(|event| matches_targets(event, &params))
        .cloned()
        .collect();
    list_response(&headers, events, &params)
}

async fn list_programs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Params,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    let programs = state
        .programs
        .lock()
        .iter()
        .filter(|program| matches_targets(program, &params))
        .cloned()
        .collect();
    list_response(&headers, programs, &params)
}

/// Find, replace or remove one record in `records`
fn by_id(
    records: &Mutex<Vec<Value>>,
    kind: &str,
    id: &str,
    replacement: Option<Value>,
    remove: bool,
) -> Response {
    let mut records = records.lock();
    let Some(index) = records.iter().position(|record| record["id"] == id) else {
        return not_found(kind, id);
    };

    if remove {
        return Json(records.remove(index)).into_response();
    }

    if let Some(mut replacement) = replacement {
        replacement["id"] = json!(id);
        replacement["createdDateTime"] = records[index]["createdDateTime"].clone();
        replacement["modificationDateTime"] = json!(now());
        records[index] = replacement;
    }
    Json(records[index].clone()).into_response()
}

async fn get_program(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Params,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    by_id(&state.programs, "program", &id, None, false)
}

async fn put_program(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Params,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    by_id(&state.programs, "program", &id, Some(body), false)
}

async fn delete_program(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Params,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    by_id(&state.programs, "program", &id, None, true)
}

// =============================================================================
// Reports and subscriptions
// =============================================================================

async fn list_reports(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Params,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    let program_id = param(&params, "programID");
    let event_id = param(&params, "eventID");
    let client_name = param(&params, "clientName");
    let reports = state
        .reports
        .iter()
        .filter(|report| field_is(report, "programID", program_id))
        .filter(|report| field_is(report, "eventID", event_id))
        .filter(|report| field_is(report, "clientName", client_name))
        .cloned()
        .collect();
    list_response(&headers, reports, &params)
}

/// Store-less create: conflict check, then echo with server-side fields
fn create(mut body: Value, conflict: bool, kind: &str) -> Response {
    if conflict {
        return problem(
            StatusCode::CONFLICT,
            "Conflict",
            format!("The {} already exists", kind),
        );
    }
    body["id"] = json!(Uuid::new_v4().to_string());
    body["createdDateTime"] = json!(now());
    body["modificationDateTime"] = json!(now());
    Json(body).into_response()
}

async fn post_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Params,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    let conflict = body["eventID"] == "35";
    create(body, conflict, "report")
}

async fn list_subscriptions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Params,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    let program_id = param(&params, "programID");
    let client_name = param(&params, "clientName");
    let objects = param_all(&params, "objects");
    let subscriptions = state
        .subscriptions
        .lock()
        .iter()
        .filter(|sub| field_is(sub, "programID", program_id))
        .filter(|sub| field_is(sub, "clientName", client_name))
        .filter(|sub| objects.is_empty() || subscribes_to(sub, &objects))
        .filter(|sub| matches_targets(sub, &params))
        .cloned()
        .collect();
    list_response(&headers, subscriptions, &params)
}

fn subscribes_to(subscription: &Value, objects: &[&str]) -> bool {
    subscription["objectOperations"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|operation| operation["objects"].as_array())
        .flatten()
        .any(|object| object.as_str().is_some_and(|name| objects.contains(&name)))
}

async fn post_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Params,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    let conflict = body["programID"] == "35";
    create(body, conflict, "subscription")
}

async fn get_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Params,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    by_id(&state.subscriptions, "subscription", &id, None, false)
}

async fn put_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Params,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    by_id(&state.subscriptions, "subscription", &id, Some(body), false)
}

async fn delete_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Params,
) -> Response {
    if let Err(response) = check_request(&state, &headers, &params) {
        return response;
    }
    by_id(&state.subscriptions, "subscription", &id, None, true)
}

// =============================================================================
// Fixture data
// =============================================================================

fn fixture_event(id: &str, program_id: &str, event_name: &str, resource_name: &str) -> Value {
    json!({
        "id": id,
        "createdDateTime": "2024-08-15T08:52:55.578Z",
        "modificationDateTime": "2024-08-15T08:53:41.127Z",
        "objectType": "EVENT",
        "programID": program_id,
        "eventName": event_name,
        "targets": [
            {"type": "RESOURCE_NAME", "values": [resource_name]},
            {"type": "ORGANIZATION_ID", "values": ["1337"]}
        ],
        "reportDescriptors": [{
            "payloadType": "POWER_LIMIT_ACKNOWLEDGEMENT",
            "aggregate": false,
            "startInterval": 0,
            "numIntervals": -1,
            "historical": false,
            "frequency": -1,
            "repeat": 1,
            "targets": []
        }],
        "payloadDescriptors": [{
            "payloadType": "CONSUMPTION_POWER_LIMIT",
            "units": "KW",
            "objectType": "EVENT_PAYLOAD_DESCRIPTOR"
        }],
        "intervalPeriod": {
            "start": "2024-08-15T10:00:00.000Z",
            "duration": "PT15M",
            "randomizeStart": "PT0S"
        },
        "intervals": [
            {"id": 0, "payloads": [{"type": "CONSUMPTION_POWER_LIMIT", "values": [1000]}]}
        ]
    })
}

fn fixture_events() -> Vec<Value> {
    vec![
        fixture_event("37", "34", "testEvent", "1211"),
        fixture_event("38", "35", "testEvent", "1212"),
        fixture_event("39", "34", "powerLimit", "1213"),
        fixture_event("40", "35", "powerLimit", "1211"),
        fixture_event("41", "34", "powerLimit", "1212"),
    ]
}

fn fixture_program(id: &str, name: &str, long_name: &str) -> Value {
    json!({
        "id": id,
        "createdDateTime": "2024-08-12T12:00:00.000Z",
        "modificationDateTime": "2024-08-12T12:00:00.000Z",
        "objectType": "PROGRAM",
        "programName": name,
        "programLongName": long_name,
        "retailerName": "Retailer",
        "programType": "PRICING_TARIFF",
        "country": "NL",
        "timeZoneOffset": "PT2H",
        "intervalPeriod": {"start": "2024-08-12T12:00:00.000Z", "duration": "PT15M"},
        "programDescriptions": ["https://example.com/program"],
        "bindingEvents": false,
        "localPrice": false,
        "payloadDescriptors": [
            {"objectType": "EVENT_PAYLOAD_DESCRIPTOR", "payloadType": "PRICE", "units": "KWH", "currency": "EUR"},
            {"objectType": "REPORT_PAYLOAD_DESCRIPTOR", "payloadType": "USAGE", "readingType": "DIRECT_READ", "units": "KWH"}
        ],
        "targets": [{"type": "GROUP", "values": [format!("group-{}", id)]}]
    })
}

fn fixture_programs() -> Vec<Value> {
    vec![
        fixture_program("0", "HB", "Heartbeat"),
        fixture_program("1", "PL", "Power limit"),
        fixture_program("2", "DP", "Dynamic pricing"),
        fixture_program("4", "CP", "Capacity"),
        fixture_program("5", "FL", "Flexibility"),
    ]
}

fn fixture_report(id: &str, program_id: &str, event_id: &str, client_name: &str) -> Value {
    json!({
        "id": id,
        "createdDateTime": "2024-09-12T08:45:56.472Z",
        "modificationDateTime": "2024-09-12T08:46:56.472Z",
        "objectType": "REPORT",
        "programID": program_id,
        "eventID": event_id,
        "clientName": client_name,
        "reportName": "Test Report",
        "payloadDescriptors": [{
            "objectType": "REPORT_PAYLOAD_DESCRIPTOR",
            "payloadType": "POWER_LIMIT_ACKNOWLEDGEMENT"
        }],
        "resources": [{
            "resourceName": "121",
            "intervalPeriod": {"start": "2024-08-12T12:15:00.000Z", "duration": "PT15M"},
            "intervals": [
                {"id": 0, "payloads": [{"type": "POWER_LIMIT_ACKNOWLEDGEMENT", "values": [true]}]}
            ]
        }]
    })
}

fn fixture_reports() -> Vec<Value> {
    vec![
        fixture_report("99", "1", "86", "YAC"),
        fixture_report("100", "1", "99", "YAC"),
        fixture_report("101", "1", "100", "YAC"),
        fixture_report("102", "1", "101", "NAC"),
        fixture_report("103", "3", "102", "YAC"),
        fixture_report("104", "3", "103", "YAC"),
        fixture_report("105", "3", "104", "NAC"),
    ]
}

fn fixture_subscription(id: &str, program_id: &str, client_name: &str, objects: &[&str]) -> Value {
    json!({
        "id": id,
        "createdDateTime": "2024-09-12T08:45:56.472Z",
        "modificationDateTime": "2024-09-12T08:46:56.472Z",
        "objectType": "SUBSCRIPTION",
        "clientName": client_name,
        "programID": program_id,
        "objectOperations": [{
            "objects": objects,
            "operations": ["POST", "PUT"],
            "callbackUrl": "https://ven.example.com/callback",
            "bearerToken": "callback-token"
        }],
        "targets": [{"type": "RESOURCE_NAME", "values": ["1211"]}]
    })
}

fn fixture_subscriptions() -> Vec<Value> {
    vec![
        fixture_subscription("0", "1", "YAC", &["EVENT"]),
        fixture_subscription("2", "1", "NAC", &["EVENT", "PROGRAM"]),
        fixture_subscription("3", "2", "YAC", &["REPORT"]),
        fixture_subscription("4", "2", "YAC", &["PROGRAM"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use toadr3_core::{Event, Program, Report, Subscription, Validate};

    fn decodes<T: serde::de::DeserializeOwned + Validate>(items: Vec<Value>) {
        for item in items {
            let record: T = serde_json::from_value(item).unwrap();
            record.validate().unwrap();
        }
    }

    #[test]
    fn test_fixtures_are_valid_records() {
        decodes::<Event>(fixture_events());
        decodes::<Program>(fixture_programs());
        decodes::<Report>(fixture_reports());
        decodes::<Subscription>(fixture_subscriptions());
    }

    #[test]
    fn test_page() {
        let items: Vec<Value> = (0..6).map(|id| json!({"id": id.to_string()})).collect();
        let params = vec![
            ("skip".to_string(), "1".to_string()),
            ("limit".to_string(), "4".to_string()),
            ("x-parity".to_string(), "odd".to_string()),
        ];
        let paged = page(items, &params).unwrap();
        assert_eq!(paged, vec![json!({"id": "1"}), json!({"id": "3"})]);
    }

    #[test]
    fn test_matches_targets() {
        let event = fixture_event("37", "34", "testEvent", "1211");
        let by = |values: &[&str]| {
            let mut params = vec![("targetType".to_string(), "RESOURCE_NAME".to_string())];
            params.extend(values.iter().map(|v| ("targetValues".to_string(), v.to_string())));
            params
        };
        assert!(matches_targets(&event, &by(&["1211", "9999"])));
        assert!(!matches_targets(&event, &by(&["9999"])));
        assert!(matches_targets(&event, &[]));
    }
}
