//! VTN client owning the HTTP session and token cache

use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Client;
use toadr3_core::{Event, Program, Report, Subscription};
use tracing::{debug, info, instrument};
use url::Url;

use crate::access_token::{AccessToken, OAuthConfig};
use crate::config::ClientConfig;
use crate::error::{Result, ToadrClientError};
use crate::query::QueryArgs;
use crate::request::RequestOptions;
use crate::token_cache::TokenCache;
use crate::{events, programs, reports, subscriptions};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Turn a 404 into `None`
fn found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(record) => Ok(Some(record)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// OpenADR3 VEN client
///
/// Every operation fetches a token from the client's cache (when OAuth is
/// configured) and calls the matching endpoint function. By-id lookups
/// return `Ok(None)` for objects the VTN does not know.
///
/// # Example
/// ```rust,ignore
/// let client = ToadrClient::new("http://localhost:8080/openadr3/3.0.1", None)?;
/// let events = client
///     .events(&QueryArgs::new().program_id("1"), &RequestOptions::default())
///     .await?;
/// ```
#[derive(Debug)]
pub struct ToadrClient {
    http: RwLock<Option<Client>>,
    vtn_url: String,
    tokens: TokenCache,
}

impl ToadrClient {
    /// Create a client with default timeouts
    pub fn new(vtn_url: &str, oauth: Option<OAuthConfig>) -> Result<Self> {
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;
        Self::with_http_client(vtn_url, oauth, http)
    }

    /// Create a client on a caller-provided HTTP session
    pub fn with_http_client(vtn_url: &str, oauth: Option<OAuthConfig>, http: Client) -> Result<Self> {
        Url::parse(vtn_url)?;
        let vtn_url = vtn_url.trim_end_matches('/').to_string();
        info!("VTN client created for {}", vtn_url);

        Ok(Self {
            http: RwLock::new(Some(http)),
            vtn_url,
            tokens: TokenCache::new(oauth),
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeouts.request_ms))
            .connect_timeout(Duration::from_millis(config.timeouts.connect_ms))
            .build()?;
        Self::with_http_client(&config.connection.vtn_url, config.oauth_config()?, http)
    }

    /// Base URL of the VTN, without a trailing slash
    pub fn vtn_url(&self) -> &str {
        &self.vtn_url
    }

    /// The underlying HTTP session
    pub fn http_client(&self) -> Result<Client> {
        self.http.read().clone().ok_or(ToadrClientError::ClientClosed)
    }

    pub fn oauth_config(&self) -> Option<&OAuthConfig> {
        self.tokens.oauth_config()
    }

    /// Release the HTTP session; later calls fail with `ClientClosed`
    pub fn close(&self) {
        if self.http.write().take().is_some() {
            debug!("VTN client for {} closed", self.vtn_url);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.http.read().is_none()
    }

    /// Current access token, acquired on first use and after expiry
    ///
    /// `None` when no OAuth config was given.
    pub async fn token(&self) -> Result<Option<AccessToken>> {
        let http = self.http_client()?;
        self.tokens.token(&http).await
    }

    /// Force the next call to acquire a fresh token
    pub async fn expire_token(&self) {
        self.tokens.expire().await;
    }

    async fn session(&self) -> Result<(Client, Option<AccessToken>)> {
        let http = self.http_client()?;
        let token = self.tokens.token(&http).await?;
        Ok((http, token))
    }

    // =========================================================================
    // Events
    // =========================================================================

    #[instrument(skip(self, options))]
    pub async fn events(&self, args: &QueryArgs, options: &RequestOptions) -> Result<Vec<Event>> {
        let (http, token) = self.session().await?;
        events::get_events(&http, &self.vtn_url, token.as_ref(), args, options).await
    }

    // =========================================================================
    // Programs
    // =========================================================================

    #[instrument(skip(self, options))]
    pub async fn programs(
        &self,
        args: &QueryArgs,
        options: &RequestOptions,
    ) -> Result<Vec<Program>> {
        let (http, token) = self.session().await?;
        programs::get_programs(&http, &self.vtn_url, token.as_ref(), args, options).await
    }

    #[instrument(skip(self, options))]
    pub async fn get_program(
        &self,
        program_id: &str,
        options: &RequestOptions,
    ) -> Result<Option<Program>> {
        let (http, token) = self.session().await?;
        found(
            programs::get_program_by_id(&http, &self.vtn_url, token.as_ref(), program_id, options)
                .await,
        )
    }

    #[instrument(skip(self, program, options))]
    pub async fn put_program(
        &self,
        program_id: &str,
        program: &Program,
        options: &RequestOptions,
    ) -> Result<Option<Program>> {
        let (http, token) = self.session().await?;
        found(
            programs::put_program_by_id(
                &http,
                &self.vtn_url,
                token.as_ref(),
                program_id,
                program,
                options,
            )
            .await,
        )
    }

    #[instrument(skip(self, options))]
    pub async fn delete_program(
        &self,
        program_id: &str,
        options: &RequestOptions,
    ) -> Result<Option<Program>> {
        let (http, token) = self.session().await?;
        found(
            programs::delete_program_by_id(
                &http,
                &self.vtn_url,
                token.as_ref(),
                program_id,
                options,
            )
            .await,
        )
    }

    // =========================================================================
    // Reports
    // =========================================================================

    #[instrument(skip(self, options))]
    pub async fn reports(&self, args: &QueryArgs, options: &RequestOptions) -> Result<Vec<Report>> {
        let (http, token) = self.session().await?;
        reports::get_reports(&http, &self.vtn_url, token.as_ref(), args, options).await
    }

    #[instrument(skip(self, report, options))]
    pub async fn post_report(&self, report: &Report, options: &RequestOptions) -> Result<Report> {
        let (http, token) = self.session().await?;
        reports::post_report(&http, &self.vtn_url, token.as_ref(), report, options).await
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    #[instrument(skip(self, options))]
    pub async fn subscriptions(
        &self,
        args: &QueryArgs,
        options: &RequestOptions,
    ) -> Result<Vec<Subscription>> {
        let (http, token) = self.session().await?;
        subscriptions::get_subscriptions(&http, &self.vtn_url, token.as_ref(), args, options).await
    }

    #[instrument(skip(self, subscription, options))]
    pub async fn post_subscription(
        &self,
        subscription: &Subscription,
        options: &RequestOptions,
    ) -> Result<Subscription> {
        let (http, token) = self.session().await?;
        subscriptions::post_subscription(&http, &self.vtn_url, token.as_ref(), subscription, options)
            .await
    }

    #[instrument(skip(self, options))]
    pub async fn get_subscription(
        &self,
        subscription_id: &str,
        options: &RequestOptions,
    ) -> Result<Option<Subscription>> {
        let (http, token) = self.session().await?;
        found(
            subscriptions::get_subscription_by_id(
                &http,
                &self.vtn_url,
                token.as_ref(),
                subscription_id,
                options,
            )
            .await,
        )
    }

    #[instrument(skip(self, subscription, options))]
    pub async fn put_subscription(
        &self,
        subscription_id: &str,
        subscription: &Subscription,
        options: &RequestOptions,
    ) -> Result<Option<Subscription>> {
        let (http, token) = self.session().await?;
        found(
            subscriptions::put_subscription_by_id(
                &http,
                &self.vtn_url,
                token.as_ref(),
                subscription_id,
                subscription,
                options,
            )
            .await,
        )
    }

    #[instrument(skip(self, options))]
    pub async fn delete_subscription(
        &self,
        subscription_id: &str,
        options: &RequestOptions,
    ) -> Result<Option<Subscription>> {
        let (http, token) = self.session().await?;
        found(
            subscriptions::delete_subscription_by_id(
                &http,
                &self.vtn_url,
                token.as_ref(),
                subscription_id,
                options,
            )
            .await,
        )
    }
}
