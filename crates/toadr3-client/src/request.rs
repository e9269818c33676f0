//! Request execution and VTN error mapping

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use toadr3_core::{Problem, Validate};
use tracing::{debug, instrument, warn};

use crate::access_token::AccessToken;
use crate::error::{Result, ToadrClientError, ToadrError};
use crate::query::{ParamValue, QueryParams};

/// Prefix for errors with a status the endpoint does not document
pub const UNEXPECTED_STATUS_PREFIX: &str = "Unexpected error status!";

/// Error statuses every endpoint documents
pub const EXPECTED_ERRORS: &[StatusCode] = &[
    StatusCode::BAD_REQUEST,
    StatusCode::FORBIDDEN,
    StatusCode::INTERNAL_SERVER_ERROR,
];

/// Error statuses of endpoints that create objects
pub const EXPECTED_POST_ERRORS: &[StatusCode] = &[
    StatusCode::BAD_REQUEST,
    StatusCode::FORBIDDEN,
    StatusCode::CONFLICT,
    StatusCode::INTERNAL_SERVER_ERROR,
];

/// Error statuses of endpoints addressing one object by id
pub const EXPECTED_BY_ID_ERRORS: &[StatusCode] = &[
    StatusCode::BAD_REQUEST,
    StatusCode::FORBIDDEN,
    StatusCode::NOT_FOUND,
    StatusCode::INTERNAL_SERVER_ERROR,
];

/// Extra query parameters and headers sent with a request
///
/// Named endpoint arguments take precedence over `extra_params`. The
/// `Authorization` header is always set from the access token and cannot be
/// overridden here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub extra_params: QueryParams,
    pub custom_headers: BTreeMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.extra_params.insert(name, value);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }
}

/// A single call to a VTN
#[derive(Debug)]
pub struct Request<'a> {
    pub method: Method,
    pub url: String,
    pub token: Option<&'a AccessToken>,
    pub body: Option<Value>,
    pub params: QueryParams,
    pub headers: &'a BTreeMap<String, String>,
    /// Error statuses reported without the unexpected-status prefix
    pub expected: &'static [StatusCode],
}

impl<'a> Request<'a> {
    pub fn new(method: Method, url: String, options: &'a RequestOptions) -> Self {
        Self {
            method,
            url,
            token: None,
            body: None,
            params: options.extra_params.clone(),
            headers: &options.custom_headers,
            expected: EXPECTED_ERRORS,
        }
    }

    pub fn token(mut self, token: Option<&'a AccessToken>) -> Self {
        self.token = token;
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn expected(mut self, expected: &'static [StatusCode]) -> Self {
        self.expected = expected;
        self
    }
}

/// Join a VTN base URL and an endpoint path
pub fn endpoint_url(vtn_url: &str, path: &str) -> String {
    format!("{}/{}", vtn_url.trim_end_matches('/'), path)
}

fn build_headers(
    custom: &BTreeMap<String, String>,
    token: Option<&AccessToken>,
) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in custom {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ToadrClientError::InvalidHeader(format!("{}: {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ToadrClientError::InvalidHeader(format!("{}: {}", name, e)))?;
        headers.insert(header_name, header_value);
    }

    if let Some(token) = token {
        let value = HeaderValue::from_str(&token.bearer())
            .map_err(|e| ToadrClientError::InvalidHeader(format!("Authorization: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Send `request` and return the decoded JSON body of a successful response
///
/// An empty success body yields `Value::Null`.
#[instrument(skip(http, request), fields(method = %request.method, url = %request.url))]
pub async fn execute(http: &Client, request: Request<'_>) -> Result<Value> {
    let url = request.url.trim_end_matches('/');
    let headers = build_headers(request.headers, request.token)?;

    let mut builder = http.request(request.method.clone(), url).headers(headers);
    let pairs = request.params.to_pairs();
    if !pairs.is_empty() {
        builder = builder.query(&pairs);
    }
    if let Some(body) = &request.body {
        builder = builder.json(body);
    }

    debug!(params = pairs.len(), "Sending request");
    let response = builder.send().await?;
    let status = response.status();

    if status.is_success() {
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_slice(&bytes)
            .map_err(|e| ToadrClientError::Schema(format!("Response is not valid JSON: {}", e)));
    }

    Err(error_from_response(response, request.expected).await)
}

/// Build a [`ToadrError`] from an error response carrying a Problem body
async fn error_from_response(
    response: reqwest::Response,
    expected: &[StatusCode],
) -> ToadrClientError {
    let status = response.status();
    let headers = response.headers().clone();
    let body = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        Err(e) => return e.into(),
    };

    let mut message = match serde_json::from_value::<Problem>(body.clone()) {
        Ok(problem) => match problem.detail {
            Some(detail) => format!("{} {} - {}", problem.title, status.as_u16(), detail),
            None => problem.title,
        },
        Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
    };

    if !expected.contains(&status) {
        message = format!("{} {}", UNEXPECTED_STATUS_PREFIX, message);
    }

    warn!(status = status.as_u16(), "{}", message);
    ToadrError::new(message, status, headers, body).into()
}

/// Decode and validate one record from a response body
pub(crate) fn decode_record<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let record: T =
        serde_json::from_value(value).map_err(|e| ToadrClientError::Schema(e.to_string()))?;
    record
        .validate()
        .map_err(|e| ToadrClientError::Schema(e.to_string()))?;
    Ok(record)
}

/// Decode and validate a list of records from a response body
pub(crate) fn decode_list<T>(value: Value) -> Result<Vec<T>>
where
    T: DeserializeOwned + Validate,
{
    match value {
        Value::Array(items) => items.into_iter().map(decode_record::<T>).collect(),
        other => Err(ToadrClientError::Schema(format!(
            "Expected result to be a list. Got {} instead.",
            json_kind(&other)
        ))),
    }
}

/// Validate a record before it is sent
pub(crate) fn encode_record<T>(record: &T) -> Result<Value>
where
    T: Serialize + Validate,
{
    record
        .validate()
        .map_err(|e| ToadrClientError::Validation(e.to_string()))?;
    serde_json::to_value(record).map_err(|e| ToadrClientError::Validation(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
