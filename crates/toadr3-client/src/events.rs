//! `/events` endpoint

use reqwest::{Client, Method};
use toadr3_core::Event;
use tracing::{debug, instrument};

use crate::access_token::AccessToken;
use crate::error::Result;
use crate::query::{builder, QueryArgs};
use crate::request::{decode_list, endpoint_url, execute, Request, RequestOptions};

/// List the events visible to this VEN
///
/// Accepts `program_id`, `target_type`/`target_values`, `skip` and `limit`.
#[instrument(skip(http, token, options))]
pub async fn get_events(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    args: &QueryArgs,
    options: &RequestOptions,
) -> Result<Vec<Event>> {
    let params = builder::EVENTS.check_and_build(args, &options.extra_params)?;
    let url = endpoint_url(vtn_url, "events");
    debug!("GET {}", url);

    let request = Request::new(Method::GET, url, options)
        .token(token)
        .params(params);
    decode_list(execute(http, request).await?)
}
