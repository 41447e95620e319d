//! Client helpers for the Grammy backend endpoints.

use crate::app_lib::{api, config::AppConfig, AppError};
use crate::features::auth::client::CognitoClient;

/// Calls a protected endpoint and returns the pretty-printed JSON body.
/// The bearer token is read from the auth client per call, never cached.
pub async fn call_endpoint(client: &CognitoClient, endpoint: &str) -> Result<String, AppError> {
    let token = client.bearer_token().ok_or_else(|| {
        AppError::Config("No active session token. Please sign in again.".to_string())
    })?;
    let config = AppConfig::load();
    let value: serde_json::Value =
        api::get_json_with_bearer(&config.api_base_url, endpoint, &token).await?;
    serde_json::to_string_pretty(&value)
        .map_err(|err| AppError::Serialization(format!("Failed to render response: {err}")))
}

/// Public health endpoint, used for the backend status line.
pub async fn health() -> Result<serde_json::Value, AppError> {
    let config = AppConfig::load();
    api::get_json(&config.api_base_url, "health").await
}
