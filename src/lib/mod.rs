//! Shared frontend utilities: HTTP helpers, configuration, error types, and
//! console diagnostics.
//!
//! ## Core Authentication Flows
//!
//! ### Sign-in
//!
//! 1. **Submit:** The login form posts credentials to the user pool's
//!    `InitiateAuth` operation.
//! 2. **Challenge:** The response either establishes a session or names a
//!    challenge (new password, TOTP code, TOTP enrollment) that the flow
//!    controller turns into the next screen.
//! 3. **Confirm:** Challenge answers go through `RespondToAuthChallenge`
//!    until the pool issues tokens.
//!
//! ### Registration & Email Verification
//!
//! `SignUp` creates the account, the user receives a code by email, and
//! `ConfirmSignUp` activates the account. The user then signs in normally.
//!
//! Centralizing these helpers keeps network behavior consistent across
//! features. The helpers never log credentials, codes, or token material.

#[cfg(target_arch = "wasm32")]
pub(crate) mod api;
#[cfg(target_arch = "wasm32")]
pub(crate) mod build_info;
pub(crate) mod config;
pub(crate) mod diag;
pub(crate) mod errors;

pub(crate) use errors::AppError;
