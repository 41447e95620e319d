//! Auth feature module covering the sign-in/sign-up flows, MFA challenges,
//! password reset, and session hydration. It keeps authentication logic out
//! of the UI and must stay aligned with the user pool's protocol
//! expectations. This module touches security boundaries and must avoid
//! logging credentials, codes, or token material.
//!
//! Flow Overview: `flow` owns the state machine that turns provider
//! challenges into screens. `client` is the stateless facade over the user
//! pool's wire API, `tokens` persists the issued tokens, and `state`/`guards`
//! expose the session to the rest of the app.

#[cfg(target_arch = "wasm32")]
pub(crate) mod client;
pub(crate) mod flow;
#[cfg(target_arch = "wasm32")]
mod guards;
pub(crate) mod protocol;
pub(crate) mod provider;
#[cfg(target_arch = "wasm32")]
pub(crate) mod state;
#[cfg(target_arch = "wasm32")]
pub(crate) mod tokens;
pub(crate) mod totp;
pub(crate) mod types;

#[cfg(target_arch = "wasm32")]
pub(crate) use guards::RequireAuth;
