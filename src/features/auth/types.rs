//! Shared auth types: issued tokens, the session summary, and the challenge
//! vocabulary exchanged between the provider facade and the flow controller.
//! Tokens and codes must never be logged.

use serde::{Deserialize, Serialize};

/// Token set issued by the user pool once sign-in completes. Persisted by
/// the token store; the id token doubles as the bearer token for API calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

/// Session summary used to hydrate auth state. Contains no secrets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub username: String,
    pub email: String,
}

/// What the provider asks for next after a sign-in attempt. Exhaustively
/// matched by the flow controller; adding a variant is a compile-time
/// checked change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignInStep {
    /// Tokens were issued; the session is established.
    Done { tokens: AuthTokens },
    /// The account must pick a new password before sign-in completes.
    NewPasswordRequired { session: String },
    /// A TOTP code from an already-enrolled authenticator is required.
    TotpCodeRequired { session: String },
    /// The account must enroll an authenticator first. `shared_secret` is
    /// the base32 seed the user adds to their authenticator app.
    TotpSetupRequired {
        session: String,
        shared_secret: String,
    },
    /// A challenge this client does not understand. Logged, never acted on.
    Unknown { name: String },
}

/// Continuation handle for an in-flight challenge: the account it belongs
/// to and the provider's opaque session token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeContext {
    pub username: String,
    pub session: String,
}

/// The user's answer to an in-flight challenge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChallengeAnswer {
    TotpCode {
        code: String,
        remember_device: bool,
    },
    TotpSetup {
        code: String,
        device_name: Option<String>,
        remember_device: bool,
    },
    NewPassword {
        password: String,
    },
}
