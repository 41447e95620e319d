//! The authentication flow state machine. Each provider response maps to
//! exactly one next [`FlowState`], and each user action maps to exactly one
//! provider call. The controller never navigates on its own: completion is
//! reported as a [`FlowEvent`] and the caller decides where to go.
//!
//! Local validation failures never reach the provider, and a rejected
//! provider call never escapes this boundary with the state changed: the
//! error is returned for display and the machine stays where it was so the
//! user can retry.

use std::cell::RefCell;

use crate::app_lib::{diag, AppError};
use crate::features::auth::provider::IdentityProvider;
use crate::features::auth::totp;
use crate::features::auth::types::{ChallengeAnswer, ChallengeContext, SignInStep};

/// The single active step of the authentication UI. Variant payloads are
/// the only transient state, so dropping back to `Idle` clears every field
/// associated with the abandoned step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    AwaitingEmailVerification {
        email: String,
    },
    AwaitingMfaSetup {
        email: String,
        session: String,
        shared_secret: String,
        setup_uri: String,
    },
    AwaitingMfaCode {
        email: String,
        session: String,
    },
    AwaitingNewPassword {
        email: String,
        session: String,
    },
    AwaitingPasswordReset {
        email: String,
    },
}

/// Outcome of a flow action, consumed by the UI layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    /// The machine moved to a new state; render it.
    StateChanged,
    /// A session was established. The subscriber navigates.
    Completed,
    /// The account is confirmed and ready to sign in.
    VerificationComplete,
    /// The password was reset; the user signs in with the new one.
    ResetComplete,
    /// The provider sent a challenge this client does not understand.
    /// Logged for diagnostics; no transition.
    Stalled,
}

/// Drives the flows of the login page against an injected provider.
pub struct AuthFlow<P> {
    provider: P,
    state: RefCell<FlowState>,
}

impl<P: IdentityProvider> AuthFlow<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            state: RefCell::new(FlowState::Idle),
        }
    }

    /// Snapshot of the active state.
    pub fn state(&self) -> FlowState {
        self.state.borrow().clone()
    }

    /// Unconditionally returns to `Idle`, discarding all transient state.
    pub fn cancel(&self) {
        self.set_state(FlowState::Idle);
    }

    pub async fn submit_login(&self, email: &str, password: &str) -> Result<FlowEvent, AppError> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(AppError::Validation(
                "Email and password are required.".to_string(),
            ));
        }

        let step = self.provider.sign_in(email, password).await?;
        Ok(self.apply_step(step, email))
    }

    pub async fn submit_register(
        &self,
        email: &str,
        password: &str,
        repeat_password: &str,
    ) -> Result<FlowEvent, AppError> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() || repeat_password.trim().is_empty() {
            return Err(AppError::Validation(
                "Email and both password fields are required.".to_string(),
            ));
        }
        if password != repeat_password {
            return Err(AppError::Validation("Passwords do not match.".to_string()));
        }

        self.provider.sign_up(email, password).await?;
        self.set_state(FlowState::AwaitingEmailVerification {
            email: email.to_string(),
        });
        Ok(FlowEvent::StateChanged)
    }

    pub async fn submit_email_verification_code(&self, code: &str) -> Result<FlowEvent, AppError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::Validation(
                "Enter the verification code from your email.".to_string(),
            ));
        }
        let email = match self.state() {
            FlowState::AwaitingEmailVerification { email } => email,
            _ => {
                return Err(AppError::Validation(
                    "No verification is in progress.".to_string(),
                ))
            }
        };

        self.provider.confirm_sign_up(&email, code).await?;
        self.set_state(FlowState::Idle);
        Ok(FlowEvent::VerificationComplete)
    }

    /// Answers the in-flight MFA challenge, both during enrollment and
    /// during a regular sign-in. `device_name` only applies to enrollment.
    pub async fn submit_challenge_response(
        &self,
        code: &str,
        remember_device: bool,
        device_name: Option<&str>,
    ) -> Result<FlowEvent, AppError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::Validation(
                "Enter the 6-digit code from your authenticator app.".to_string(),
            ));
        }

        let (email, context, answer) = match self.state() {
            FlowState::AwaitingMfaCode { email, session } => {
                let context = ChallengeContext {
                    username: email.clone(),
                    session,
                };
                let answer = ChallengeAnswer::TotpCode {
                    code: code.to_string(),
                    remember_device,
                };
                (email, context, answer)
            }
            FlowState::AwaitingMfaSetup { email, session, .. } => {
                let context = ChallengeContext {
                    username: email.clone(),
                    session,
                };
                let answer = ChallengeAnswer::TotpSetup {
                    code: code.to_string(),
                    device_name: device_name
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string),
                    remember_device,
                };
                (email, context, answer)
            }
            _ => {
                return Err(AppError::Validation(
                    "No verification is in progress.".to_string(),
                ))
            }
        };

        let step = self.provider.confirm_challenge(&context, &answer).await?;
        Ok(self.apply_step(step, &email))
    }

    pub async fn submit_new_password(
        &self,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<FlowEvent, AppError> {
        if new_password.trim().is_empty() || confirm_password.trim().is_empty() {
            return Err(AppError::Validation(
                "Both password fields are required.".to_string(),
            ));
        }
        if new_password != confirm_password {
            return Err(AppError::Validation("Passwords do not match.".to_string()));
        }

        let (email, session) = match self.state() {
            FlowState::AwaitingNewPassword { email, session } => (email, session),
            _ => {
                return Err(AppError::Validation(
                    "No password change is in progress.".to_string(),
                ))
            }
        };

        let context = ChallengeContext {
            username: email.clone(),
            session,
        };
        let answer = ChallengeAnswer::NewPassword {
            password: new_password.to_string(),
        };
        let step = self.provider.confirm_challenge(&context, &answer).await?;
        Ok(self.apply_step(step, &email))
    }

    pub async fn start_password_reset(&self, email: &str) -> Result<FlowEvent, AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::Validation(
                "Enter the email address of your account.".to_string(),
            ));
        }

        self.provider.start_password_reset(email).await?;
        self.set_state(FlowState::AwaitingPasswordReset {
            email: email.to_string(),
        });
        Ok(FlowEvent::StateChanged)
    }

    pub async fn confirm_password_reset(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<FlowEvent, AppError> {
        let email = email.trim();
        let code = code.trim();
        if email.is_empty() || code.is_empty() {
            return Err(AppError::Validation(
                "Email and reset code are required.".to_string(),
            ));
        }
        if new_password.trim().is_empty() || confirm_password.trim().is_empty() {
            return Err(AppError::Validation(
                "Both password fields are required.".to_string(),
            ));
        }
        if new_password != confirm_password {
            return Err(AppError::Validation("Passwords do not match.".to_string()));
        }

        self.provider
            .confirm_password_reset(email, code, new_password)
            .await?;
        self.set_state(FlowState::Idle);
        Ok(FlowEvent::ResetComplete)
    }

    fn set_state(&self, next: FlowState) {
        *self.state.borrow_mut() = next;
    }

    /// Applies the transition table: one provider step, one next state.
    fn apply_step(&self, step: SignInStep, email: &str) -> FlowEvent {
        match step {
            SignInStep::Done { .. } => {
                self.set_state(FlowState::Idle);
                FlowEvent::Completed
            }
            SignInStep::NewPasswordRequired { session } => {
                self.set_state(FlowState::AwaitingNewPassword {
                    email: email.to_string(),
                    session,
                });
                FlowEvent::StateChanged
            }
            SignInStep::TotpCodeRequired { session } => {
                self.set_state(FlowState::AwaitingMfaCode {
                    email: email.to_string(),
                    session,
                });
                FlowEvent::StateChanged
            }
            SignInStep::TotpSetupRequired {
                session,
                shared_secret,
            } => {
                let setup_uri = totp::setup_uri(&shared_secret, email);
                self.set_state(FlowState::AwaitingMfaSetup {
                    email: email.to_string(),
                    session,
                    shared_secret,
                    setup_uri,
                });
                FlowEvent::StateChanged
            }
            SignInStep::Unknown { name } => {
                diag::warn(&format!("Ignoring unrecognized sign-in challenge: {name}"));
                FlowEvent::Stalled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::totp;
    use crate::features::auth::types::{AuthTokens, UserSession};
    use std::cell::RefCell;

    /// Scripted provider: each operation returns its configured result, and
    /// unscripted operations panic so "must not call" tests fail loudly.
    #[derive(Default)]
    struct FakeProvider {
        sign_in: Option<Result<SignInStep, AppError>>,
        sign_up: Option<Result<(), AppError>>,
        confirm_sign_up: Option<Result<(), AppError>>,
        confirm_challenge: Option<Result<SignInStep, AppError>>,
        start_reset: Option<Result<(), AppError>>,
        confirm_reset: Option<Result<(), AppError>>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl FakeProvider {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }
    }

    impl IdentityProvider for FakeProvider {
        async fn sign_in(&self, _: &str, _: &str) -> Result<SignInStep, AppError> {
            self.calls.borrow_mut().push("sign_in");
            self.sign_in.clone().expect("sign_in was not scripted")
        }

        async fn sign_up(&self, _: &str, _: &str) -> Result<(), AppError> {
            self.calls.borrow_mut().push("sign_up");
            self.sign_up.clone().expect("sign_up was not scripted")
        }

        async fn confirm_sign_up(&self, _: &str, _: &str) -> Result<(), AppError> {
            self.calls.borrow_mut().push("confirm_sign_up");
            self.confirm_sign_up
                .clone()
                .expect("confirm_sign_up was not scripted")
        }

        async fn confirm_challenge(
            &self,
            _: &ChallengeContext,
            _: &ChallengeAnswer,
        ) -> Result<SignInStep, AppError> {
            self.calls.borrow_mut().push("confirm_challenge");
            self.confirm_challenge
                .clone()
                .expect("confirm_challenge was not scripted")
        }

        async fn sign_out(&self) -> Result<(), AppError> {
            self.calls.borrow_mut().push("sign_out");
            Ok(())
        }

        async fn current_session(&self) -> Result<Option<UserSession>, AppError> {
            self.calls.borrow_mut().push("current_session");
            Ok(None)
        }

        async fn start_password_reset(&self, _: &str) -> Result<(), AppError> {
            self.calls.borrow_mut().push("start_password_reset");
            self.start_reset
                .clone()
                .expect("start_password_reset was not scripted")
        }

        async fn confirm_password_reset(
            &self,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<(), AppError> {
            self.calls.borrow_mut().push("confirm_password_reset");
            self.confirm_reset
                .clone()
                .expect("confirm_password_reset was not scripted")
        }
    }

    fn tokens() -> AuthTokens {
        AuthTokens {
            id_token: "id".to_string(),
            access_token: "access".to_string(),
            refresh_token: None,
            expires_in: 3600,
        }
    }

    fn provider_error(message: &str) -> AppError {
        AppError::Provider {
            code: "NotAuthorizedException".to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn login_with_done_step_completes_and_goes_idle() {
        let provider = FakeProvider {
            sign_in: Some(Ok(SignInStep::Done { tokens: tokens() })),
            ..FakeProvider::default()
        };
        let flow = AuthFlow::new(provider);

        let event = flow.submit_login("a@b.com", "pw1").await.expect("login");
        assert_eq!(event, FlowEvent::Completed);
        assert_eq!(flow.state(), FlowState::Idle);
    }

    #[tokio::test]
    async fn login_with_empty_fields_never_calls_the_provider() {
        let flow = AuthFlow::new(FakeProvider::default());

        let err = flow.submit_login("", "pw1").await.expect_err("rejected");
        assert!(err.is_validation());
        assert!(flow.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn login_failure_reports_provider_text_and_stays_idle() {
        let provider = FakeProvider {
            sign_in: Some(Err(provider_error("Incorrect username or password."))),
            ..FakeProvider::default()
        };
        let flow = AuthFlow::new(provider);

        let err = flow.submit_login("a@b.com", "bad").await.expect_err("rejected");
        assert_eq!(err.to_string(), "Incorrect username or password.");
        assert_eq!(flow.state(), FlowState::Idle);
    }

    #[tokio::test]
    async fn mismatched_registration_passwords_never_call_sign_up() {
        let flow = AuthFlow::new(FakeProvider::default());

        let err = flow
            .submit_register("a@b.com", "pw1", "pw2")
            .await
            .expect_err("rejected");
        assert_eq!(err, AppError::Validation("Passwords do not match.".to_string()));
        assert!(flow.provider.calls().is_empty());
        assert_eq!(flow.state(), FlowState::Idle);
    }

    #[tokio::test]
    async fn registration_moves_to_email_verification() {
        let provider = FakeProvider {
            sign_up: Some(Ok(())),
            ..FakeProvider::default()
        };
        let flow = AuthFlow::new(provider);

        let event = flow
            .submit_register("a@b.com", "pw1", "pw1")
            .await
            .expect("register");
        assert_eq!(event, FlowEvent::StateChanged);
        assert_eq!(
            flow.state(),
            FlowState::AwaitingEmailVerification {
                email: "a@b.com".to_string()
            }
        );
    }

    #[tokio::test]
    async fn empty_verification_code_never_calls_confirm_sign_up() {
        let provider = FakeProvider {
            sign_up: Some(Ok(())),
            ..FakeProvider::default()
        };
        let flow = AuthFlow::new(provider);
        flow.submit_register("a@b.com", "pw1", "pw1")
            .await
            .expect("register");

        let err = flow
            .submit_email_verification_code("")
            .await
            .expect_err("rejected");
        assert!(err.is_validation());
        assert_eq!(flow.provider.calls(), vec!["sign_up"]);
        assert_eq!(
            flow.state(),
            FlowState::AwaitingEmailVerification {
                email: "a@b.com".to_string()
            }
        );
    }

    #[tokio::test]
    async fn verification_success_returns_to_idle_ready_to_sign_in() {
        let provider = FakeProvider {
            sign_up: Some(Ok(())),
            confirm_sign_up: Some(Ok(())),
            ..FakeProvider::default()
        };
        let flow = AuthFlow::new(provider);
        flow.submit_register("a@b.com", "pw1", "pw1")
            .await
            .expect("register");

        let event = flow
            .submit_email_verification_code("123456")
            .await
            .expect("confirm");
        assert_eq!(event, FlowEvent::VerificationComplete);
        assert_eq!(flow.state(), FlowState::Idle);
    }

    #[tokio::test]
    async fn totp_setup_challenge_derives_the_provisioning_uri() {
        let provider = FakeProvider {
            sign_in: Some(Ok(SignInStep::TotpSetupRequired {
                session: "s1".to_string(),
                shared_secret: "JBSWY3DPEHPK3PXP".to_string(),
            })),
            ..FakeProvider::default()
        };
        let flow = AuthFlow::new(provider);

        flow.submit_login("a@b.com", "pw1").await.expect("login");
        match flow.state() {
            FlowState::AwaitingMfaSetup {
                shared_secret,
                setup_uri,
                ..
            } => {
                assert_eq!(shared_secret, "JBSWY3DPEHPK3PXP");
                assert_eq!(
                    totp::secret_from_uri(&setup_uri).as_deref(),
                    Some("JBSWY3DPEHPK3PXP")
                );
                assert!(setup_uri.contains("a%40b.com"));
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_challenge_confirmation_keeps_the_state() {
        let provider = FakeProvider {
            sign_in: Some(Ok(SignInStep::TotpCodeRequired {
                session: "s1".to_string(),
            })),
            confirm_challenge: Some(Err(provider_error("Invalid code received for user"))),
            ..FakeProvider::default()
        };
        let flow = AuthFlow::new(provider);
        flow.submit_login("a@b.com", "pw1").await.expect("login");
        let before = flow.state();

        let err = flow
            .submit_challenge_response("000000", false, None)
            .await
            .expect_err("rejected");
        assert_eq!(err.to_string(), "Invalid code received for user");
        assert_eq!(flow.state(), before);
    }

    #[tokio::test]
    async fn challenge_confirmation_can_chain_into_done() {
        let provider = FakeProvider {
            sign_in: Some(Ok(SignInStep::TotpCodeRequired {
                session: "s1".to_string(),
            })),
            confirm_challenge: Some(Ok(SignInStep::Done { tokens: tokens() })),
            ..FakeProvider::default()
        };
        let flow = AuthFlow::new(provider);
        flow.submit_login("a@b.com", "pw1").await.expect("login");

        let event = flow
            .submit_challenge_response("123456", true, None)
            .await
            .expect("confirm");
        assert_eq!(event, FlowEvent::Completed);
        assert_eq!(flow.state(), FlowState::Idle);
    }

    #[tokio::test]
    async fn new_password_mismatch_is_rejected_locally() {
        let provider = FakeProvider {
            sign_in: Some(Ok(SignInStep::NewPasswordRequired {
                session: "s1".to_string(),
            })),
            ..FakeProvider::default()
        };
        let flow = AuthFlow::new(provider);
        flow.submit_login("a@b.com", "pw1").await.expect("login");

        let err = flow
            .submit_new_password("new-pw", "other-pw")
            .await
            .expect_err("rejected");
        assert!(err.is_validation());
        assert_eq!(flow.provider.calls(), vec!["sign_in"]);
    }

    #[tokio::test]
    async fn unknown_challenge_stalls_without_a_transition() {
        let provider = FakeProvider {
            sign_in: Some(Ok(SignInStep::Unknown {
                name: "SMS_MFA".to_string(),
            })),
            ..FakeProvider::default()
        };
        let flow = AuthFlow::new(provider);

        let event = flow.submit_login("a@b.com", "pw1").await.expect("login");
        assert_eq!(event, FlowEvent::Stalled);
        assert_eq!(flow.state(), FlowState::Idle);
    }

    #[tokio::test]
    async fn password_reset_round_trip() {
        let provider = FakeProvider {
            start_reset: Some(Ok(())),
            confirm_reset: Some(Ok(())),
            ..FakeProvider::default()
        };
        let flow = AuthFlow::new(provider);

        let err = flow.start_password_reset("  ").await.expect_err("rejected");
        assert!(err.is_validation());
        assert!(flow.provider.calls().is_empty());

        flow.start_password_reset("a@b.com").await.expect("start");
        assert_eq!(
            flow.state(),
            FlowState::AwaitingPasswordReset {
                email: "a@b.com".to_string()
            }
        );

        let err = flow
            .confirm_password_reset("a@b.com", "123456", "new-pw", "other")
            .await
            .expect_err("rejected");
        assert!(err.is_validation());
        assert_eq!(flow.provider.calls(), vec!["start_password_reset"]);

        let event = flow
            .confirm_password_reset("a@b.com", "123456", "new-pw", "new-pw")
            .await
            .expect("confirm");
        assert_eq!(event, FlowEvent::ResetComplete);
        assert_eq!(flow.state(), FlowState::Idle);
    }

    #[tokio::test]
    async fn cancel_returns_to_idle_from_every_state() {
        let states = [
            FlowState::AwaitingEmailVerification {
                email: "a@b.com".to_string(),
            },
            FlowState::AwaitingMfaSetup {
                email: "a@b.com".to_string(),
                session: "s1".to_string(),
                shared_secret: "JBSWY3DPEHPK3PXP".to_string(),
                setup_uri: totp::setup_uri("JBSWY3DPEHPK3PXP", "a@b.com"),
            },
            FlowState::AwaitingMfaCode {
                email: "a@b.com".to_string(),
                session: "s1".to_string(),
            },
            FlowState::AwaitingNewPassword {
                email: "a@b.com".to_string(),
                session: "s1".to_string(),
            },
            FlowState::AwaitingPasswordReset {
                email: "a@b.com".to_string(),
            },
        ];

        for state in states {
            let flow = AuthFlow::new(FakeProvider::default());
            flow.set_state(state);
            flow.cancel();
            assert_eq!(flow.state(), FlowState::Idle);
        }
    }

    #[tokio::test]
    async fn challenge_response_outside_a_challenge_is_rejected() {
        let flow = AuthFlow::new(FakeProvider::default());

        let err = flow
            .submit_challenge_response("123456", false, None)
            .await
            .expect_err("rejected");
        assert!(err.is_validation());
        assert!(flow.provider.calls().is_empty());
    }
}
