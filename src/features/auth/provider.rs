//! The capability set consumed from the hosted identity provider. The flow
//! controller and the session gate depend on this trait rather than on a
//! concrete client, so tests can drive the flows with a scripted fake and
//! no process-wide singleton is ever configured.

use crate::app_lib::AppError;
use crate::features::auth::types::{
    ChallengeAnswer, ChallengeContext, SignInStep, UserSession,
};

/// Operations the hosted user pool exposes to this client. Every call is a
/// single request-response exchange: no retry, no caching.
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Starts a sign-in attempt and returns what the pool asks for next.
    async fn sign_in(&self, username: &str, password: &str) -> Result<SignInStep, AppError>;

    /// Creates an account. The pool mails a verification code to the user.
    async fn sign_up(&self, username: &str, password: &str) -> Result<(), AppError>;

    /// Activates a freshly registered account with the emailed code.
    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), AppError>;

    /// Answers an in-flight sign-in challenge. The returned step may chain
    /// into a further challenge.
    async fn confirm_challenge(
        &self,
        context: &ChallengeContext,
        answer: &ChallengeAnswer,
    ) -> Result<SignInStep, AppError>;

    /// Ends the session and discards stored tokens.
    async fn sign_out(&self) -> Result<(), AppError>;

    /// Returns the current session, or `None` when no valid session exists.
    async fn current_session(&self) -> Result<Option<UserSession>, AppError>;

    /// Mails a password-reset code to the account.
    async fn start_password_reset(&self, username: &str) -> Result<(), AppError>;

    /// Completes a password reset with the mailed code.
    async fn confirm_password_reset(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AppError>;
}
