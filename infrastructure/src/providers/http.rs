//! HTTP plumbing shared by the provider clients

use prism_application::GatewayError;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Longest provider error body kept in an error message
const MAX_ERROR_BODY: usize = 500;

pub(crate) fn build_client(connect_timeout: Duration) -> Result<Client, GatewayError> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .build()
        .map_err(|e| GatewayError::Other(format!("Failed to create HTTP client: {}", e)))
}

/// Map a transport-level failure
pub(crate) fn transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Connection(format!("request timed out: {}", err))
    } else if err.is_connect() || err.is_request() {
        GatewayError::Connection(err.to_string())
    } else if err.is_decode() {
        GatewayError::RequestFailed(format!("malformed response body: {}", err))
    } else {
        GatewayError::Other(err.to_string())
    }
}

/// Map a non-success HTTP status and its body
pub(crate) fn status_error(status: StatusCode, body: &str) -> GatewayError {
    let detail = format!(
        "HTTP {}: {}",
        status.as_u16(),
        prism_domain::truncate(body.trim(), MAX_ERROR_BODY)
    );
    match status.as_u16() {
        401 | 403 => GatewayError::Unauthorized(detail),
        404 => GatewayError::ModelNotAvailable(detail),
        429 => GatewayError::RateLimited(detail),
        _ => GatewayError::RequestFailed(detail),
    }
}

/// Check the status and decode a JSON body
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }
    response.json::<T>().await.map_err(transport_error)
}
