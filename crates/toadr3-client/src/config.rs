//! Client configuration with YAML, TOML and JSON support

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::access_token::{OAuthClaim, OAuthConfig};

/// VTN client configuration
///
/// Can be loaded from YAML, TOML, JSON, or constructed programmatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Connection settings
    pub connection: ConnectionConfig,

    /// Token provider settings, omitted for VTNs without authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OAuthSettings>,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

/// Connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the VTN
    pub vtn_url: String,
}

/// Token provider configuration
///
/// Exactly one of `scope` and `audience` is sent with the token request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthSettings {
    pub token_url: String,

    #[serde(default = "default_grant_type")]
    pub grant_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,

    /// Falls back to the `CLIENT_ID` environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Falls back to the `CLIENT_SECRET` environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

fn default_grant_type() -> String {
    "client_credentials".to_string()
}

impl OAuthSettings {
    /// Convert to the config used for token acquisition
    pub fn to_oauth_config(&self) -> Result<OAuthConfig, ConfigError> {
        let claim = match (&self.scope, &self.audience) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidValue(
                    "oauth: scope and audience are mutually exclusive".to_string(),
                ))
            }
            (None, Some(audience)) => OAuthClaim::Audience(audience.clone()),
            (scope, None) => OAuthClaim::Scope(scope.clone().unwrap_or_default()),
        };

        Ok(OAuthConfig {
            token_url: self.token_url.clone(),
            grant_type: self.grant_type.clone(),
            claim,
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
        })
    }
}

/// Timeout configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Request timeout in milliseconds (default: 30s)
    #[serde(default = "default_request_timeout")]
    pub request_ms: u64,

    /// Connect timeout in milliseconds (default: 10s)
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            request_ms: default_request_timeout(),
            connect_ms: default_connect_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_connect_timeout() -> u64 {
    10_000
}

impl ClientConfig {
    /// Load configuration from a file, picking the format from its extension
    ///
    /// `.toml` and `.json` are read as such; anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Create a builder for programmatic configuration
    pub fn builder(vtn_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(vtn_url)
    }

    /// OAuth config for the token cache, if a token provider is configured
    pub fn oauth_config(&self) -> Result<Option<OAuthConfig>, ConfigError> {
        self.oauth
            .as_ref()
            .map(OAuthSettings::to_oauth_config)
            .transpose()
    }
}

/// Builder for ClientConfig
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with the given VTN URL
    pub fn new(vtn_url: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                connection: ConnectionConfig {
                    vtn_url: vtn_url.into(),
                },
                oauth: None,
                timeouts: TimeoutsConfig::default(),
            },
        }
    }

    /// Use a token provider that expects a scope
    pub fn oauth_scope(mut self, token_url: impl Into<String>, scope: impl Into<String>) -> Self {
        self.config.oauth = Some(OAuthSettings {
            token_url: token_url.into(),
            grant_type: default_grant_type(),
            scope: Some(scope.into()),
            audience: None,
            client_id: None,
            client_secret: None,
        });
        self
    }

    /// Use a token provider that expects an audience
    pub fn oauth_audience(
        mut self,
        token_url: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        self.config.oauth = Some(OAuthSettings {
            token_url: token_url.into(),
            grant_type: default_grant_type(),
            scope: None,
            audience: Some(audience.into()),
            client_id: None,
            client_secret: None,
        });
        self
    }

    /// Set client credentials; ignored without a token provider
    pub fn credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        if let Some(oauth) = self.config.oauth.as_mut() {
            oauth.client_id = Some(client_id.into());
            oauth.client_secret = Some(client_secret.into());
        }
        self
    }

    /// Set request timeout in milliseconds
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.request_ms = ms;
        self
    }

    /// Set connect timeout in milliseconds
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.connect_ms = ms;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
