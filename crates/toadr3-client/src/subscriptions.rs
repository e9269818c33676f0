//! `/subscriptions` endpoints

use reqwest::{Client, Method};
use toadr3_core::Subscription;
use tracing::{debug, instrument};

use crate::access_token::AccessToken;
use crate::error::Result;
use crate::query::{builder, QueryArgs};
use crate::request::{
    decode_list, decode_record, encode_record, endpoint_url, execute, Request, RequestOptions,
    EXPECTED_BY_ID_ERRORS, EXPECTED_POST_ERRORS,
};

/// List subscriptions
///
/// Accepts `program_id`, `client_name`, `target_type`/`target_values`,
/// `objects`, `skip` and `limit`.
#[instrument(skip(http, token, options))]
pub async fn get_subscriptions(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    args: &QueryArgs,
    options: &RequestOptions,
) -> Result<Vec<Subscription>> {
    let params = builder::SUBSCRIPTIONS.check_and_build(args, &options.extra_params)?;
    let url = endpoint_url(vtn_url, "subscriptions");
    debug!("GET {}", url);

    let request = Request::new(Method::GET, url, options)
        .token(token)
        .params(params);
    decode_list(execute(http, request).await?)
}

/// Create a subscription
#[instrument(skip(http, token, subscription, options))]
pub async fn post_subscription(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    subscription: &Subscription,
    options: &RequestOptions,
) -> Result<Subscription> {
    let body = encode_record(subscription)?;
    let url = endpoint_url(vtn_url, "subscriptions");
    debug!("POST {}", url);

    let request = Request::new(Method::POST, url, options)
        .token(token)
        .body(body)
        .expected(EXPECTED_POST_ERRORS);
    decode_record(execute(http, request).await?)
}

fn subscription_url(vtn_url: &str, subscription_id: &str) -> Result<String> {
    builder::SUBSCRIPTION_BY_ID.check(&QueryArgs::new().subscription_id(subscription_id))?;
    Ok(endpoint_url(
        vtn_url,
        &format!("subscriptions/{}", subscription_id),
    ))
}

/// Fetch one subscription
#[instrument(skip(http, token, options))]
pub async fn get_subscription_by_id(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    subscription_id: &str,
    options: &RequestOptions,
) -> Result<Subscription> {
    let url = subscription_url(vtn_url, subscription_id)?;
    debug!("GET {}", url);

    let request = Request::new(Method::GET, url, options)
        .token(token)
        .expected(EXPECTED_BY_ID_ERRORS);
    decode_record(execute(http, request).await?)
}

/// Replace one subscription
#[instrument(skip(http, token, subscription, options))]
pub async fn put_subscription_by_id(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    subscription_id: &str,
    subscription: &Subscription,
    options: &RequestOptions,
) -> Result<Subscription> {
    let url = subscription_url(vtn_url, subscription_id)?;
    let body = encode_record(subscription)?;
    debug!("PUT {}", url);

    let request = Request::new(Method::PUT, url, options)
        .token(token)
        .body(body)
        .expected(EXPECTED_BY_ID_ERRORS);
    decode_record(execute(http, request).await?)
}

/// Delete one subscription and return the removed record
#[instrument(skip(http, token, options))]
pub async fn delete_subscription_by_id(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    subscription_id: &str,
    options: &RequestOptions,
) -> Result<Subscription> {
    let url = subscription_url(vtn_url, subscription_id)?;
    debug!("DELETE {}", url);

    let request = Request::new(Method::DELETE, url, options)
        .token(token)
        .expected(EXPECTED_BY_ID_ERRORS);
    decode_record(execute(http, request).await?)
}
