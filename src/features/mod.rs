//! Domain-level frontend features and their shared logic. Routes import
//! these modules to keep view code focused while authentication and API
//! handling live in dedicated feature areas.

#[cfg(target_arch = "wasm32")]
pub(crate) mod api;
pub(crate) mod auth;
