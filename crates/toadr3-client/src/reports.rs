//! `/reports` endpoints

use reqwest::{Client, Method};
use toadr3_core::Report;
use tracing::{debug, instrument};

use crate::access_token::AccessToken;
use crate::error::Result;
use crate::query::{builder, QueryArgs};
use crate::request::{
    decode_list, decode_record, encode_record, endpoint_url, execute, Request, RequestOptions,
    EXPECTED_POST_ERRORS,
};

/// List reports by program, event or client name
#[instrument(skip(http, token, options))]
pub async fn get_reports(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    args: &QueryArgs,
    options: &RequestOptions,
) -> Result<Vec<Report>> {
    let params = builder::REPORTS.check_and_build(args, &options.extra_params)?;
    let url = endpoint_url(vtn_url, "reports");
    debug!("GET {}", url);

    let request = Request::new(Method::GET, url, options)
        .token(token)
        .params(params);
    decode_list(execute(http, request).await?)
}

/// Submit a report and return the record the VTN stored
///
/// The VTN answers 409 when the report conflicts with an existing one.
#[instrument(skip(http, token, report, options), fields(event_id = %report.event_id))]
pub async fn post_report(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    report: &Report,
    options: &RequestOptions,
) -> Result<Report> {
    let body = encode_record(report)?;
    let url = endpoint_url(vtn_url, "reports");
    debug!("POST {}", url);

    let request = Request::new(Method::POST, url, options)
        .token(token)
        .body(body)
        .expected(EXPECTED_POST_ERRORS);
    decode_record(execute(http, request).await?)
}
