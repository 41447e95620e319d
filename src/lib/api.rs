//! HTTP helpers with consistent timeouts and error handling. The user-pool
//! API speaks `x-amz-json-1.1` (POST plus an `X-Amz-Target` header), while
//! the Grammy backend is plain JSON over GET with a bearer token. Both go
//! through the same abort-timeout plumbing so a dead endpoint can never
//! hang the UI. The helpers do not store secrets or tokens; they only
//! attach what callers provide.

use gloo_net::http::Request;
use gloo_timers::callback::Timeout;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::to_string;
use web_sys::AbortController;

use super::errors::AppError;
use crate::features::auth::protocol::{decode_provider_error, sanitize_body};

/// Default request timeout (milliseconds) applied to all HTTP helpers.
const DEFAULT_TIMEOUT_MS: u32 = 10_000;

const AMZ_JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Posts one user-pool operation and parses its JSON response. Non-2xx
/// responses are decoded into the provider's own error message.
pub async fn post_target<B: Serialize, T: DeserializeOwned>(
    endpoint: &str,
    target: &str,
    body: &B,
) -> Result<T, AppError> {
    let payload = to_string(body)
        .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
    let response = send_with_timeout(move |signal| {
        Request::post(endpoint)
            .header("Content-Type", AMZ_JSON_CONTENT_TYPE)
            .header("X-Amz-Target", target)
            .abort_signal(Some(signal))
            .body(payload)
            .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
    })
    .await?;

    if response.ok() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(decode_provider_error(status, &body))
    }
}

/// Fetches JSON from the Grammy API with a bearer token.
pub async fn get_json_with_bearer<T: DeserializeOwned>(
    base_url: &str,
    path: &str,
    token: &str,
) -> Result<T, AppError> {
    let url = build_url_with_base(base_url, path);
    let authorization = format!("Bearer {token}");
    let response = send_with_timeout(move |signal| {
        Request::get(&url)
            .header("Authorization", &authorization)
            .abort_signal(Some(signal))
            .build()
            .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
    })
    .await?;

    if response.ok() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Http {
            status,
            message: sanitize_body(&body),
        })
    }
}

/// Fetches JSON from the Grammy API without authentication, used for the
/// public health endpoint.
pub async fn get_json<T: DeserializeOwned>(base_url: &str, path: &str) -> Result<T, AppError> {
    let url = build_url_with_base(base_url, path);
    let response = send_with_timeout(move |signal| {
        Request::get(&url)
            .abort_signal(Some(signal))
            .build()
            .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
    })
    .await?;

    if response.ok() {
        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Http {
            status,
            message: sanitize_body(&body),
        })
    }
}

/// Builds a URL from a base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps network errors into user-facing `AppError` variants with timeout detection.
fn map_request_error(err: gloo_net::Error) -> AppError {
    let message = err.to_string();
    let lowered = message.to_lowercase();

    if lowered.contains("timeout") || lowered.contains("abort") {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {message}"))
    }
}

/// Sends a request with an abort timeout to avoid hanging UI state.
async fn send_with_timeout(
    build_request: impl FnOnce(&web_sys::AbortSignal) -> Result<gloo_net::http::Request, AppError>,
) -> Result<gloo_net::http::Response, AppError> {
    let controller = AbortController::new()
        .map_err(|_| AppError::Config("Failed to initialize request timeout.".to_string()))?;
    let signal = controller.signal();
    let timeout_controller = controller.clone();
    let _timeout = Timeout::new(DEFAULT_TIMEOUT_MS, move || timeout_controller.abort());

    let request = build_request(&signal)?;
    request.send().await.map_err(map_request_error)
}
