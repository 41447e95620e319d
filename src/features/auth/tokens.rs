//! Client-side token store. Issued tokens are persisted in localStorage so
//! a reload keeps the session; flow state itself is never persisted. The
//! store swallows storage failures (private browsing, quota) and degrades
//! to an in-memory-less "no session" answer.

use crate::app_lib::diag;
use crate::features::auth::types::AuthTokens;

const STORAGE_KEY: &str = "grammy.auth.tokens";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Persists a freshly issued token set.
pub(crate) fn save(tokens: &AuthTokens) {
    let Some(storage) = local_storage() else {
        diag::warn("Token store unavailable; session will not survive a reload.");
        return;
    };
    match serde_json::to_string(tokens) {
        Ok(serialized) => {
            if storage.set_item(STORAGE_KEY, &serialized).is_err() {
                diag::warn("Failed to persist session tokens.");
            }
        }
        Err(_) => diag::warn("Failed to encode session tokens."),
    }
}

/// Loads the stored token set, if any. A corrupt entry is dropped.
pub(crate) fn load() -> Option<AuthTokens> {
    let storage = local_storage()?;
    let serialized = storage.get_item(STORAGE_KEY).ok().flatten()?;
    match serde_json::from_str(&serialized) {
        Ok(tokens) => Some(tokens),
        Err(_) => {
            let _ = storage.remove_item(STORAGE_KEY);
            None
        }
    }
}

/// Discards the stored token set.
pub(crate) fn clear() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}
