//! API Gateway response shaping shared by the Lambda binaries.

use lambda_http::{Body, Error, Request, RequestExt, Response};
use serde::Serialize;

use crate::error::MatchingError;

/// Allowed methods advertised on every response.
pub const CORS_ALLOW_METHODS: &str = "OPTIONS,GET,POST";

fn json_response(status: u16, body: String) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .header("access-control-allow-origin", "*")
        .header("access-control-allow-methods", CORS_ALLOW_METHODS)
        .header("access-control-allow-headers", "Content-Type")
        .body(body.into())?)
}

/// Turns an operation result into a response. Errors become `{ "error": .. }`
/// bodies with the status of their kind and never escape as Lambda failures.
pub fn respond<T: Serialize>(
    result: Result<T, MatchingError>,
    expose_trace: bool,
) -> Result<Response<Body>, Error> {
    let encoded = result.and_then(|value| serde_json::to_string(&value).map_err(MatchingError::from));

    match encoded {
        Ok(body) => json_response(200, body),
        Err(err) => {
            let status = err.status();
            if err.is_internal() {
                tracing::error!(error = ?err, status, "request failed");
            } else {
                tracing::warn!(error = %err, status, "request rejected");
            }
            json_response(status, serde_json::to_string(&err.to_body(expose_trace))?)
        }
    }
}

pub fn query_param(event: &Request, name: &str) -> Option<String> {
    event
        .query_string_parameters_ref()
        .and_then(|params| params.first(name))
        .map(str::to_string)
}
