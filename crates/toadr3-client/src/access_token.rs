//! OAuth2 client-credentials tokens
//!
//! Tokens are acquired from a token provider with a form-encoded POST and are
//! treated as expired 60 seconds before their actual expiry so a request never
//! goes out with a token that lapses in flight.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::{Result, ToadrClientError, ToadrError};

/// Environment variable read when no client id is configured
pub const CLIENT_ID_ENV: &str = "CLIENT_ID";
/// Environment variable read when no client secret is configured
pub const CLIENT_SECRET_ENV: &str = "CLIENT_SECRET";

/// Seconds before expiry at which a token counts as expired
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Bearer token with its expiry time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a token that expires `expires_in` seconds from now
    ///
    /// Returns `None` when the expiry is outside the representable time range.
    pub fn try_new(token: impl Into<String>, expires_in: i64) -> Option<Self> {
        let expires_at = Utc::now().checked_add_signed(TimeDelta::try_seconds(expires_in)?)?;
        Some(Self::with_expiry(token, expires_at))
    }

    pub fn with_expiry(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whole seconds until expiry, negative once expired
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }

    /// True if the token is expired or expires within the next 60 seconds
    pub fn is_expired(&self) -> bool {
        self.expires_at - Utc::now() < TimeDelta::seconds(EXPIRY_MARGIN_SECS)
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Claim sent with the token request, depending on the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthClaim {
    Scope(String),
    Audience(String),
}

impl OAuthClaim {
    /// Form field name of the claim
    pub fn field(&self) -> &'static str {
        match self {
            OAuthClaim::Scope(_) => "scope",
            OAuthClaim::Audience(_) => "audience",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            OAuthClaim::Scope(value) | OAuthClaim::Audience(value) => value,
        }
    }
}

/// Settings for acquiring tokens from a token provider
///
/// `client_id` and `client_secret` fall back to the `CLIENT_ID` and
/// `CLIENT_SECRET` environment variables when unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    pub token_url: String,
    pub grant_type: String,
    pub claim: OAuthClaim,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl OAuthConfig {
    /// Config for a provider that expects a `scope`
    pub fn with_scope(
        token_url: impl Into<String>,
        grant_type: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            grant_type: grant_type.into(),
            claim: OAuthClaim::Scope(scope.into()),
            client_id: None,
            client_secret: None,
        }
    }

    /// Config for a provider that expects an `audience`
    pub fn with_audience(
        token_url: impl Into<String>,
        grant_type: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            claim: OAuthClaim::Audience(audience.into()),
            ..Self::with_scope(token_url, grant_type, String::new())
        }
    }

    /// Set explicit client credentials
    pub fn credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Resolve credentials and build the token request form.
    ///
    /// Every missing setting is reported, in the order client_id,
    /// client_secret, grant_type, scope/audience.
    fn form(&self) -> Result<Vec<(&'static str, String)>> {
        let client_id = resolve(self.client_id.as_deref(), CLIENT_ID_ENV);
        let client_secret = resolve(self.client_secret.as_deref(), CLIENT_SECRET_ENV);

        let mut missing = Vec::new();
        if client_id.is_none() {
            missing.push("client_id is required".to_string());
        }
        if client_secret.is_none() {
            missing.push("client_secret is required".to_string());
        }
        if self.grant_type.is_empty() {
            missing.push("grant_type is required".to_string());
        }
        if self.claim.value().is_empty() {
            missing.push(format!("{} is required", self.claim.field()));
        }

        match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) if missing.is_empty() => Ok(vec![
                ("grant_type", self.grant_type.clone()),
                ("client_id", client_id),
                ("client_secret", client_secret),
                (self.claim.field(), self.claim.value().to_string()),
            ]),
            _ => Err(ToadrClientError::Validation(missing.join(", "))),
        }
    }
}

fn resolve(explicit: Option<&str>, env_var: &str) -> Option<String> {
    match explicit {
        Some(value) => Some(value.to_string()),
        None => std::env::var(env_var).ok(),
    }
    .filter(|value| !value.is_empty())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: serde_json::Number,
}

impl TokenResponse {
    /// Lifetime in whole seconds; fractional values are truncated
    fn expires_in_secs(&self) -> Option<i64> {
        self.expires_in.as_i64().or_else(|| {
            self.expires_in
                .as_f64()
                .filter(|secs| secs.is_finite() && secs.abs() < i64::MAX as f64)
                .map(|secs| secs.trunc() as i64)
        })
    }
}

/// Acquire a new access token from the provider in `config`
#[instrument(skip(http, config), fields(token_url = %config.token_url))]
pub async fn acquire_access_token(http: &Client, config: &OAuthConfig) -> Result<AccessToken> {
    let form = config.form()?;
    debug!("Requesting access token");

    let response = http.post(&config.token_url).form(&form).send().await?;
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        let headers = response.headers().clone();
        let body = response
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);

        let mut message = "Failed to acquire access token".to_string();
        if let Some(error) = body.get("error").and_then(|v| v.as_str()) {
            message = format!("{}: {}", message, error);
        }
        if let Some(description) = body
            .get("error_description")
            .and_then(|v| v.as_str())
            .filter(|d| !d.is_empty())
        {
            message = format!("{} - {}", message, description);
        }

        warn!(status = status.as_u16(), "{}", message);
        return Err(ToadrError::new(message, status, headers, body).into());
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| ToadrClientError::Schema(format!("Invalid token response: {}", e)))?;

    let token = match body.expires_in_secs() {
        Some(expires_in) => AccessToken::try_new(body.access_token, expires_in),
        None => None,
    }
    .ok_or_else(|| {
        ToadrClientError::Schema(format!(
            "Invalid token response: expires_in out of range: {}",
            body.expires_in
        ))
    })?;

    debug!(expires_in = token.expires_in(), "Access token acquired");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn valid_token(expires_in: i64) -> AccessToken {
        AccessToken::try_new("123", expires_in).unwrap()
    }

    #[test]
    fn test_access_token() {
        let token = valid_token(3600);
        assert_eq!(token.token(), "123");
        assert_eq!(token.to_string(), "123");
        assert_eq!(token.bearer(), "Bearer 123");
        assert!(!token.is_expired());
        assert!((3598..=3600).contains(&token.expires_in()));
    }

    #[test]
    fn test_access_token_expiry_margin() {
        assert!(valid_token(59).is_expired());
        assert!(valid_token(0).is_expired());
        assert!(valid_token(-10).is_expired());
        assert!(!valid_token(120).is_expired());
    }

    #[test]
    fn test_expiry_out_of_range() {
        assert!(AccessToken::try_new("123", i64::MAX).is_none());
        assert!(AccessToken::try_new("123", i64::MIN).is_none());
        assert!(AccessToken::try_new("123", 400_000 * 365 * 86_400).is_none());
    }

    #[test]
    fn test_expires_in_accepts_numbers() {
        let parse = |body: &str| {
            serde_json::from_str::<TokenResponse>(body)
                .unwrap()
                .expires_in_secs()
        };
        assert_eq!(parse(r#"{"access_token": "a", "expires_in": 3600}"#), Some(3600));
        assert_eq!(parse(r#"{"access_token": "a", "expires_in": 3600.9}"#), Some(3600));
        assert_eq!(parse(r#"{"access_token": "a", "expires_in": -1.5}"#), Some(-1));
        assert_eq!(parse(r#"{"access_token": "a", "expires_in": 1e300}"#), None);
        assert!(serde_json::from_str::<TokenResponse>(r#"{"access_token": "a", "expires_in": "60"}"#).is_err());
    }

    #[test]
    fn test_audience_claim() {
        let config = OAuthConfig::with_audience("http://idp/token", "client_credentials", "vtn")
            .credentials("id", "secret");
        assert_eq!(config.claim, OAuthClaim::Audience("vtn".to_string()));

        let form = config.form().unwrap();
        assert_eq!(form[3], ("audience", "vtn".to_string()));
    }

    #[test]
    #[serial]
    fn test_form_from_explicit_credentials() {
        let config = OAuthConfig::with_scope("http://idp/token", "client_credentials", "read")
            .credentials("id", "secret");

        let form = config.form().unwrap();
        assert_eq!(
            form,
            vec![
                ("grant_type", "client_credentials".to_string()),
                ("client_id", "id".to_string()),
                ("client_secret", "secret".to_string()),
                ("scope", "read".to_string()),
            ]
        );
    }

    #[test]
    #[serial]
    fn test_form_from_environment() {
        std::env::set_var(CLIENT_ID_ENV, "env_id");
        std::env::set_var(CLIENT_SECRET_ENV, "env_secret");

        let config = OAuthConfig::with_scope("http://idp/token", "client_credentials", "read");
        let form = config.form();

        std::env::remove_var(CLIENT_ID_ENV);
        std::env::remove_var(CLIENT_SECRET_ENV);

        let form = form.unwrap();
        assert_eq!(form[1], ("client_id", "env_id".to_string()));
        assert_eq!(form[2], ("client_secret", "env_secret".to_string()));
    }

    #[test]
    #[serial]
    fn test_missing_settings_are_aggregated() {
        std::env::remove_var(CLIENT_ID_ENV);
        std::env::remove_var(CLIENT_SECRET_ENV);

        let config = OAuthConfig::with_scope("http://idp/token", "", "");
        let err = config.form().unwrap_err();
        assert_eq!(
            err.to_string(),
            "client_id is required, client_secret is required, grant_type is required, scope is required"
        );

        let config = OAuthConfig::with_audience("http://idp/token", "client_credentials", "")
            .credentials("id", "secret");
        assert_eq!(config.form().unwrap_err().to_string(), "audience is required");
    }
}
