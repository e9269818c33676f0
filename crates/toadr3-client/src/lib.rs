//! toadr3 VEN client library
//!
//! Provides a typed HTTP client for talking to an OpenADR 3 VTN.
//!
//! # Example
//!
//! ```rust,no_run
//! use toadr3_client::{OAuthConfig, QueryArgs, RequestOptions, ToadrClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let oauth = OAuthConfig::with_scope(
//!         "https://auth.example.com/oauth/token",
//!         "client_credentials",
//!         "read_all",
//!     );
//!     let client = ToadrClient::new("https://vtn.example.com/openadr3/3.0.1", Some(oauth))?;
//!
//!     // Events of program 1, second page of ten
//!     let args = QueryArgs::new().program_id("1").skip(10).limit(10);
//!     let events = client.events(&args, &RequestOptions::default()).await?;
//!
//!     // By-id lookups return None for unknown objects
//!     let program = client.get_program("1", &RequestOptions::default()).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Free functions
//!
//! Every endpoint is also available as a free function taking the HTTP
//! session, VTN URL and token explicitly. These raise a 404
//! [`ToadrError`] instead of returning `None`:
//!
//! ```rust,ignore
//! use toadr3_client::programs::get_program_by_id;
//!
//! let token = client.token().await?;
//! let program = get_program_by_id(
//!     &client.http_client()?,
//!     client.vtn_url(),
//!     token.as_ref(),
//!     "1",
//!     &RequestOptions::default(),
//! )
//! .await?;
//! ```
//!
//! # Testing
//!
//! The `testing` module provides an in-process mock VTN:
//!
//! ```rust,ignore
//! use toadr3_client::testing::MockVtn;
//!
//! let vtn = MockVtn::new();
//! let server = vtn.serve().await?;
//! let client = ToadrClient::new(&server.base_url(), Some(vtn.oauth_config(&server)))?;
//! ```

pub mod access_token;
mod client;
pub mod config;
mod error;
pub mod events;
pub mod programs;
pub mod query;
pub mod reports;
pub mod request;
pub mod subscriptions;
pub mod testing;
mod token_cache;

pub use access_token::{acquire_access_token, AccessToken, OAuthClaim, OAuthConfig};
pub use client::ToadrClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{Result, ToadrClientError, ToadrError};
pub use query::{ParamValue, QueryArgs, QueryParams};
pub use request::RequestOptions;
pub use token_cache::TokenCache;

pub use events::get_events;
pub use programs::{delete_program_by_id, get_program_by_id, get_programs, put_program_by_id};
pub use reports::{get_reports, post_report};
pub use subscriptions::{
    delete_subscription_by_id, get_subscription_by_id, get_subscriptions, post_subscription,
    put_subscription_by_id,
};

// Re-export core types for convenience
pub use toadr3_core as models;
