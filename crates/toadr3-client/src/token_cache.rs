//! Per-client access token cache

use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::access_token::{acquire_access_token, AccessToken, OAuthConfig};
use crate::error::Result;

/// Caches one access token and refreshes it when it expires.
///
/// All access goes through one async mutex, so concurrent callers that find
/// the token expired wait for a single acquisition and then share its result.
#[derive(Debug)]
pub struct TokenCache {
    oauth: Option<OAuthConfig>,
    token: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    /// Create an empty cache; without an OAuth config no token is ever issued
    pub fn new(oauth: Option<OAuthConfig>) -> Self {
        Self {
            oauth,
            token: Mutex::new(None),
        }
    }

    pub fn oauth_config(&self) -> Option<&OAuthConfig> {
        self.oauth.as_ref()
    }

    /// Return the cached token, acquiring a new one if missing or expired
    #[instrument(skip(self, http))]
    pub async fn token(&self, http: &Client) -> Result<Option<AccessToken>> {
        let Some(oauth) = &self.oauth else {
            return Ok(None);
        };

        let mut slot = self.token.lock().await;
        match slot.as_ref() {
            Some(token) if !token.is_expired() => Ok(Some(token.clone())),
            _ => {
                debug!("Refreshing access token");
                let token = acquire_access_token(http, oauth).await?;
                *slot = Some(token.clone());
                Ok(Some(token))
            }
        }
    }

    /// Drop the cached token so the next call acquires a new one
    pub async fn expire(&self) {
        self.token.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_oauth_config_yields_no_token() {
        let cache = TokenCache::new(None);
        let token = cache.token(&Client::new()).await.unwrap();
        assert!(token.is_none());
        assert!(cache.oauth_config().is_none());
    }

    #[tokio::test]
    async fn test_valid_cached_token_is_reused() {
        let oauth = OAuthConfig::with_scope("http://127.0.0.1:1/token", "client_credentials", "s")
            .credentials("id", "secret");
        let cache = TokenCache::new(Some(oauth));
        *cache.token.lock().await = Some(AccessToken::try_new("cached", 3600).unwrap());

        // the token URL is unreachable, so this only passes if no request is made
        let token = cache.token(&Client::new()).await.unwrap().unwrap();
        assert_eq!(token.token(), "cached");

        cache.expire().await;
        assert!(cache.token.lock().await.is_none());
    }
}
