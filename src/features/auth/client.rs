//! Stateless facade over the hosted user pool. Each operation is one wire
//! exchange (plus the enrollment side call during TOTP setup); issued
//! tokens go straight to the token store and the id token is read back
//! immediately before each authenticated API call. Never log request or
//! response bodies here: they carry credentials, codes, and tokens.

use std::collections::HashMap;

use crate::app_lib::{api, config::AppConfig, diag, AppError};
use crate::features::auth::protocol::{
    self, target, AccessTokenRequest, AssociateSoftwareTokenRequest,
    AssociateSoftwareTokenResponse, AttributeType, AuthOutcome, AuthResponse, ChallengeKind,
    ConfirmForgotPasswordRequest, ConfirmSignUpRequest, ForgotPasswordRequest, GetUserResponse,
    InitiateAuthRequest, RespondToAuthChallengeRequest, SignUpRequest,
    VerifySoftwareTokenRequest, VerifySoftwareTokenResponse, CHALLENGE_MFA_SETUP,
    CHALLENGE_NEW_PASSWORD_REQUIRED, CHALLENGE_SOFTWARE_TOKEN_MFA,
};
use crate::features::auth::provider::IdentityProvider;
use crate::features::auth::tokens;
use crate::features::auth::types::{
    ChallengeAnswer, ChallengeContext, SignInStep, UserSession,
};

const USERNAME_KEY: &str = "USERNAME";
const TOTP_CODE_KEY: &str = "SOFTWARE_TOKEN_MFA_CODE";
const NEW_PASSWORD_KEY: &str = "NEW_PASSWORD";

/// Explicitly constructed user-pool client. Injected into the session gate,
/// the flow controller, and the API feature; never configured globally.
#[derive(Clone)]
pub struct CognitoClient {
    endpoint: String,
    client_id: String,
}

impl CognitoClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            endpoint: config.identity_endpoint(),
            client_id: config.user_pool_client_id.clone(),
        }
    }

    /// Bearer token for authenticated API calls, read from the token store
    /// immediately before each call. No caching across calls.
    pub fn bearer_token(&self) -> Option<String> {
        tokens::load().map(|issued| issued.id_token)
    }

    /// Finishes one auth exchange: persists tokens on completion, resolves
    /// the enrollment secret when the pool demands TOTP setup.
    async fn finish_exchange(&self, response: AuthResponse) -> Result<SignInStep, AppError> {
        match protocol::auth_outcome(response)? {
            AuthOutcome::Done(issued) => {
                tokens::save(&issued);
                Ok(SignInStep::Done { tokens: issued })
            }
            AuthOutcome::Challenge { kind, session } => match kind {
                ChallengeKind::NewPasswordRequired => {
                    Ok(SignInStep::NewPasswordRequired { session })
                }
                ChallengeKind::TotpCode => Ok(SignInStep::TotpCodeRequired { session }),
                ChallengeKind::TotpSetup => {
                    let associated: AssociateSoftwareTokenResponse = api::post_target(
                        &self.endpoint,
                        target::ASSOCIATE_SOFTWARE_TOKEN,
                        &AssociateSoftwareTokenRequest {
                            session: session.clone(),
                        },
                    )
                    .await?;
                    Ok(SignInStep::TotpSetupRequired {
                        // Association rotates the continuation token.
                        session: associated.session.unwrap_or(session),
                        shared_secret: associated.secret_code,
                    })
                }
                ChallengeKind::Unknown(name) => Ok(SignInStep::Unknown { name }),
            },
        }
    }

    async fn respond_to_challenge(
        &self,
        challenge_name: &'static str,
        session: String,
        challenge_responses: HashMap<String, String>,
        client_metadata: HashMap<String, String>,
    ) -> Result<SignInStep, AppError> {
        let request = RespondToAuthChallengeRequest {
            client_id: self.client_id.clone(),
            challenge_name,
            session,
            challenge_responses,
            client_metadata,
        };
        let response: AuthResponse = api::post_target(
            &self.endpoint,
            target::RESPOND_TO_AUTH_CHALLENGE,
            &request,
        )
        .await?;
        self.finish_exchange(response).await
    }
}

fn remember_device_metadata(remember_device: bool) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    if remember_device {
        metadata.insert("remember_device".to_string(), "true".to_string());
    }
    metadata
}

impl IdentityProvider for CognitoClient {
    async fn sign_in(&self, username: &str, password: &str) -> Result<SignInStep, AppError> {
        let mut parameters = HashMap::new();
        parameters.insert(USERNAME_KEY.to_string(), username.to_string());
        parameters.insert("PASSWORD".to_string(), password.to_string());
        let request = InitiateAuthRequest {
            auth_flow: "USER_PASSWORD_AUTH",
            client_id: self.client_id.clone(),
            auth_parameters: parameters,
        };

        let response: AuthResponse =
            api::post_target(&self.endpoint, target::INITIATE_AUTH, &request).await?;
        self.finish_exchange(response).await
    }

    async fn sign_up(&self, username: &str, password: &str) -> Result<(), AppError> {
        let request = SignUpRequest {
            client_id: self.client_id.clone(),
            username: username.to_string(),
            password: password.to_string(),
            user_attributes: vec![AttributeType {
                name: "email".to_string(),
                value: username.to_string(),
            }],
        };

        let _: serde_json::Value =
            api::post_target(&self.endpoint, target::SIGN_UP, &request).await?;
        Ok(())
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), AppError> {
        let request = ConfirmSignUpRequest {
            client_id: self.client_id.clone(),
            username: username.to_string(),
            confirmation_code: code.to_string(),
        };

        let _: serde_json::Value =
            api::post_target(&self.endpoint, target::CONFIRM_SIGN_UP, &request).await?;
        Ok(())
    }

    async fn confirm_challenge(
        &self,
        context: &ChallengeContext,
        answer: &ChallengeAnswer,
    ) -> Result<SignInStep, AppError> {
        match answer {
            ChallengeAnswer::TotpCode {
                code,
                remember_device,
            } => {
                let mut responses = HashMap::new();
                responses.insert(USERNAME_KEY.to_string(), context.username.clone());
                responses.insert(TOTP_CODE_KEY.to_string(), code.clone());
                self.respond_to_challenge(
                    CHALLENGE_SOFTWARE_TOKEN_MFA,
                    context.session.clone(),
                    responses,
                    remember_device_metadata(*remember_device),
                )
                .await
            }
            ChallengeAnswer::TotpSetup {
                code,
                device_name,
                remember_device,
            } => {
                // Enrollment first proves the authenticator produces valid
                // codes, then completes the interrupted sign-in.
                let verified: VerifySoftwareTokenResponse = api::post_target(
                    &self.endpoint,
                    target::VERIFY_SOFTWARE_TOKEN,
                    &VerifySoftwareTokenRequest {
                        session: context.session.clone(),
                        user_code: code.clone(),
                        friendly_device_name: device_name.clone(),
                    },
                )
                .await?;

                if let Some(status) = verified.status.as_deref() {
                    if status != "SUCCESS" {
                        return Err(AppError::Provider {
                            code: "EnableSoftwareTokenMFAException".to_string(),
                            message: "The authenticator code was not accepted.".to_string(),
                        });
                    }
                }

                let session = verified.session.unwrap_or_else(|| context.session.clone());
                let mut responses = HashMap::new();
                responses.insert(USERNAME_KEY.to_string(), context.username.clone());
                self.respond_to_challenge(
                    CHALLENGE_MFA_SETUP,
                    session,
                    responses,
                    remember_device_metadata(*remember_device),
                )
                .await
            }
            ChallengeAnswer::NewPassword { password } => {
                let mut responses = HashMap::new();
                responses.insert(USERNAME_KEY.to_string(), context.username.clone());
                responses.insert(NEW_PASSWORD_KEY.to_string(), password.clone());
                self.respond_to_challenge(
                    CHALLENGE_NEW_PASSWORD_REQUIRED,
                    context.session.clone(),
                    responses,
                    HashMap::new(),
                )
                .await
            }
        }
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        let stored = tokens::load();
        tokens::clear();

        if let Some(issued) = stored {
            let request = AccessTokenRequest {
                access_token: issued.access_token,
            };
            if let Err(err) =
                api::post_target::<_, serde_json::Value>(&self.endpoint, target::GLOBAL_SIGN_OUT, &request)
                    .await
            {
                // Local sign-out already happened; the remote revocation is
                // best effort.
                diag::warn(&format!("Remote sign-out failed: {err}"));
            }
        }
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<UserSession>, AppError> {
        let Some(stored) = tokens::load() else {
            return Ok(None);
        };

        let request = AccessTokenRequest {
            access_token: stored.access_token,
        };
        match api::post_target::<_, GetUserResponse>(&self.endpoint, target::GET_USER, &request)
            .await
        {
            Ok(user) => {
                let email = user.email().unwrap_or_else(|| user.username.clone());
                Ok(Some(UserSession {
                    username: user.username,
                    email,
                }))
            }
            Err(AppError::Provider { .. }) => {
                // The pool no longer honors these tokens.
                tokens::clear();
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    async fn start_password_reset(&self, username: &str) -> Result<(), AppError> {
        let request = ForgotPasswordRequest {
            client_id: self.client_id.clone(),
            username: username.to_string(),
        };

        let _: serde_json::Value =
            api::post_target(&self.endpoint, target::FORGOT_PASSWORD, &request).await?;
        Ok(())
    }

    async fn confirm_password_reset(
        &self,
        username: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let request = ConfirmForgotPasswordRequest {
            client_id: self.client_id.clone(),
            username: username.to_string(),
            confirmation_code: code.to_string(),
            password: new_password.to_string(),
        };

        let _: serde_json::Value =
            api::post_target(&self.endpoint, target::CONFIRM_FORGOT_PASSWORD, &request).await?;
        Ok(())
    }
}
