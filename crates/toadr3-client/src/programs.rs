//! `/programs` endpoints

use reqwest::{Client, Method};
use toadr3_core::Program;
use tracing::{debug, instrument};

use crate::access_token::AccessToken;
use crate::error::Result;
use crate::query::{builder, QueryArgs};
use crate::request::{
    decode_list, decode_record, encode_record, endpoint_url, execute, Request, RequestOptions,
    EXPECTED_BY_ID_ERRORS,
};

/// List programs, filtered by target and paged with `skip`/`limit`
#[instrument(skip(http, token, options))]
pub async fn get_programs(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    args: &QueryArgs,
    options: &RequestOptions,
) -> Result<Vec<Program>> {
    let params = builder::PROGRAMS.check_and_build(args, &options.extra_params)?;
    let url = endpoint_url(vtn_url, "programs");
    debug!("GET {}", url);

    let request = Request::new(Method::GET, url, options)
        .token(token)
        .params(params);
    decode_list(execute(http, request).await?)
}

fn program_url(vtn_url: &str, program_id: &str) -> Result<String> {
    builder::PROGRAM_BY_ID.check(&QueryArgs::new().program_id(program_id))?;
    Ok(endpoint_url(vtn_url, &format!("programs/{}", program_id)))
}

/// Fetch one program
///
/// A missing program is a 404 [`ToadrError`](crate::ToadrError).
#[instrument(skip(http, token, options))]
pub async fn get_program_by_id(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    program_id: &str,
    options: &RequestOptions,
) -> Result<Program> {
    let url = program_url(vtn_url, program_id)?;
    debug!("GET {}", url);

    let request = Request::new(Method::GET, url, options)
        .token(token)
        .expected(EXPECTED_BY_ID_ERRORS);
    decode_record(execute(http, request).await?)
}

/// Replace one program and return the VTN's copy
#[instrument(skip(http, token, program, options))]
pub async fn put_program_by_id(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    program_id: &str,
    program: &Program,
    options: &RequestOptions,
) -> Result<Program> {
    let url = program_url(vtn_url, program_id)?;
    let body = encode_record(program)?;
    debug!("PUT {}", url);

    let request = Request::new(Method::PUT, url, options)
        .token(token)
        .body(body)
        .expected(EXPECTED_BY_ID_ERRORS);
    decode_record(execute(http, request).await?)
}

/// Delete one program and return the removed record
#[instrument(skip(http, token, options))]
pub async fn delete_program_by_id(
    http: &Client,
    vtn_url: &str,
    token: Option<&AccessToken>,
    program_id: &str,
    options: &RequestOptions,
) -> Result<Program> {
    let url = program_url(vtn_url, program_id)?;
    debug!("DELETE {}", url);

    let request = Request::new(Method::DELETE, url, options)
        .token(token)
        .expected(EXPECTED_BY_ID_ERRORS);
    decode_record(execute(http, request).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_url_checks_id() {
        assert_eq!(
            program_url("http://vtn/", "2").unwrap(),
            "http://vtn/programs/2"
        );
        assert_eq!(
            program_url("http://vtn", "a/b").unwrap_err().to_string(),
            "program_id 'a/b' does not match regex '^[a-zA-Z0-9_-]*$'"
        );
    }
}
