//! Wire types for the user-pool API. The pool speaks `x-amz-json-1.1`:
//! every operation is a POST against the regional endpoint with an
//! `X-Amz-Target` header naming the operation and PascalCase JSON bodies.
//! This module holds the request/response shapes plus the pure mapping from
//! responses onto [`ChallengeKind`] / [`AuthTokens`]; the actual network
//! calls live in `client`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::app_lib::AppError;
use crate::features::auth::types::AuthTokens;

/// `X-Amz-Target` values for the operations this client consumes.
pub(crate) mod target {
    pub(crate) const INITIATE_AUTH: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
    pub(crate) const RESPOND_TO_AUTH_CHALLENGE: &str =
        "AWSCognitoIdentityProviderService.RespondToAuthChallenge";
    pub(crate) const SIGN_UP: &str = "AWSCognitoIdentityProviderService.SignUp";
    pub(crate) const CONFIRM_SIGN_UP: &str = "AWSCognitoIdentityProviderService.ConfirmSignUp";
    pub(crate) const ASSOCIATE_SOFTWARE_TOKEN: &str =
        "AWSCognitoIdentityProviderService.AssociateSoftwareToken";
    pub(crate) const VERIFY_SOFTWARE_TOKEN: &str =
        "AWSCognitoIdentityProviderService.VerifySoftwareToken";
    pub(crate) const FORGOT_PASSWORD: &str = "AWSCognitoIdentityProviderService.ForgotPassword";
    pub(crate) const CONFIRM_FORGOT_PASSWORD: &str =
        "AWSCognitoIdentityProviderService.ConfirmForgotPassword";
    pub(crate) const GET_USER: &str = "AWSCognitoIdentityProviderService.GetUser";
    pub(crate) const GLOBAL_SIGN_OUT: &str = "AWSCognitoIdentityProviderService.GlobalSignOut";
}

/// Challenge names the pool may return from `InitiateAuth` and
/// `RespondToAuthChallenge`.
pub(crate) const CHALLENGE_NEW_PASSWORD_REQUIRED: &str = "NEW_PASSWORD_REQUIRED";
pub(crate) const CHALLENGE_SOFTWARE_TOKEN_MFA: &str = "SOFTWARE_TOKEN_MFA";
pub(crate) const CHALLENGE_MFA_SETUP: &str = "MFA_SETUP";

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct InitiateAuthRequest {
    pub auth_flow: &'static str,
    pub client_id: String,
    pub auth_parameters: HashMap<String, String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RespondToAuthChallengeRequest {
    pub client_id: String,
    pub challenge_name: &'static str,
    pub session: String,
    pub challenge_responses: HashMap<String, String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub client_metadata: HashMap<String, String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AttributeType {
    pub name: String,
    pub value: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SignUpRequest {
    pub client_id: String,
    pub username: String,
    pub password: String,
    pub user_attributes: Vec<AttributeType>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ConfirmSignUpRequest {
    pub client_id: String,
    pub username: String,
    pub confirmation_code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AssociateSoftwareTokenRequest {
    pub session: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct VerifySoftwareTokenRequest {
    pub session: String,
    pub user_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_device_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ForgotPasswordRequest {
    pub client_id: String,
    pub username: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ConfirmForgotPasswordRequest {
    pub client_id: String,
    pub username: String,
    pub confirmation_code: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AccessTokenRequest {
    pub access_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AuthenticationResult {
    pub access_token: String,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: i64,
}

/// Shared response shape of `InitiateAuth` and `RespondToAuthChallenge`.
/// Challenge parameters are ignored: everything this client needs arrives
/// through the challenge name and the session token.
#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct AuthResponse {
    pub authentication_result: Option<AuthenticationResult>,
    pub challenge_name: Option<String>,
    pub session: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AssociateSoftwareTokenResponse {
    pub secret_code: String,
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct VerifySoftwareTokenResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetUserAttribute {
    pub name: String,
    pub value: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetUserResponse {
    pub username: String,
    #[serde(default)]
    pub user_attributes: Vec<GetUserAttribute>,
}

impl GetUserResponse {
    /// The verified email attribute, when the pool returned one.
    pub(crate) fn email(&self) -> Option<String> {
        self.user_attributes
            .iter()
            .find(|attribute| attribute.name == "email")
            .map(|attribute| attribute.value.clone())
    }
}

/// Challenge classification used by the provider facade before the flow
/// controller sees a typed [`SignInStep`](super::types::SignInStep).
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ChallengeKind {
    NewPasswordRequired,
    TotpCode,
    TotpSetup,
    Unknown(String),
}

pub(crate) fn classify_challenge(name: &str) -> ChallengeKind {
    match name {
        CHALLENGE_NEW_PASSWORD_REQUIRED => ChallengeKind::NewPasswordRequired,
        CHALLENGE_SOFTWARE_TOKEN_MFA => ChallengeKind::TotpCode,
        CHALLENGE_MFA_SETUP => ChallengeKind::TotpSetup,
        other => ChallengeKind::Unknown(other.to_string()),
    }
}

/// Intermediate outcome of an auth exchange: either tokens were issued or a
/// named challenge continues the attempt.
pub(crate) enum AuthOutcome {
    Done(AuthTokens),
    Challenge { kind: ChallengeKind, session: String },
}

/// Maps a raw auth response onto [`AuthOutcome`]. A response carrying
/// neither tokens nor a challenge is malformed.
pub(crate) fn auth_outcome(response: AuthResponse) -> Result<AuthOutcome, AppError> {
    if let Some(result) = response.authentication_result {
        return Ok(AuthOutcome::Done(AuthTokens {
            id_token: result.id_token,
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            expires_in: result.expires_in,
        }));
    }

    match (response.challenge_name, response.session) {
        (Some(name), Some(session)) => Ok(AuthOutcome::Challenge {
            kind: classify_challenge(&name),
            session,
        }),
        (Some(name), None) => Err(AppError::Parse(format!(
            "Challenge {name} arrived without a session token."
        ))),
        _ => Err(AppError::Parse(
            "Auth response carried neither tokens nor a challenge.".to_string(),
        )),
    }
}

/// Error body shape used by the pool:
/// `{"__type": "NotAuthorizedException", "message": "..."}`.
#[derive(Deserialize)]
struct ProviderErrorBody {
    #[serde(rename = "__type")]
    kind: String,
    // Some operations capitalize the key.
    #[serde(alias = "Message", default)]
    message: String,
}

/// Decodes a non-2xx provider response into an [`AppError`]. Recognized
/// error bodies surface the pool's message verbatim; anything else falls
/// back to a sanitized HTTP error.
pub(crate) fn decode_provider_error(status: u16, body: &str) -> AppError {
    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(parsed) if !parsed.kind.is_empty() => {
            let message = if parsed.message.trim().is_empty() {
                parsed.kind.clone()
            } else {
                parsed.message
            };
            AppError::Provider {
                code: parsed.kind,
                message,
            }
        }
        _ => AppError::Http {
            status,
            message: sanitize_body(body),
        },
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
pub(crate) fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn done_response_maps_to_tokens() {
        let response: AuthResponse = serde_json::from_str(
            r#"{
                "AuthenticationResult": {
                    "AccessToken": "access",
                    "IdToken": "id",
                    "RefreshToken": "refresh",
                    "ExpiresIn": 3600,
                    "TokenType": "Bearer"
                },
                "ChallengeParameters": {}
            }"#,
        )
        .expect("deserialize");

        match auth_outcome(response).expect("outcome") {
            AuthOutcome::Done(tokens) => {
                assert_eq!(tokens.id_token, "id");
                assert_eq!(tokens.access_token, "access");
                assert_eq!(tokens.refresh_token.as_deref(), Some("refresh"));
                assert_eq!(tokens.expires_in, 3600);
            }
            AuthOutcome::Challenge { .. } => panic!("expected tokens"),
        }
    }

    #[test]
    fn named_challenges_classify_exhaustively() {
        for (name, kind) in [
            ("NEW_PASSWORD_REQUIRED", ChallengeKind::NewPasswordRequired),
            ("SOFTWARE_TOKEN_MFA", ChallengeKind::TotpCode),
            ("MFA_SETUP", ChallengeKind::TotpSetup),
        ] {
            assert_eq!(classify_challenge(name), kind);
        }

        assert_eq!(
            classify_challenge("SMS_MFA"),
            ChallengeKind::Unknown("SMS_MFA".to_string())
        );
    }

    #[test]
    fn challenge_response_keeps_session() {
        let response: AuthResponse = serde_json::from_str(
            r#"{"ChallengeName": "SOFTWARE_TOKEN_MFA", "Session": "opaque-session"}"#,
        )
        .expect("deserialize");

        match auth_outcome(response).expect("outcome") {
            AuthOutcome::Challenge { kind, session } => {
                assert_eq!(kind, ChallengeKind::TotpCode);
                assert_eq!(session, "opaque-session");
            }
            AuthOutcome::Done(_) => panic!("expected challenge"),
        }
    }

    #[test]
    fn empty_response_is_a_parse_error() {
        let outcome = auth_outcome(AuthResponse::default());
        assert!(matches!(outcome, Err(AppError::Parse(_))));
    }

    #[test]
    fn challenge_without_session_is_a_parse_error() {
        let response: AuthResponse =
            serde_json::from_str(r#"{"ChallengeName": "MFA_SETUP"}"#).expect("deserialize");
        assert!(matches!(auth_outcome(response), Err(AppError::Parse(_))));
    }

    #[test]
    fn provider_error_body_surfaces_message_verbatim() {
        let err = decode_provider_error(
            400,
            r#"{"__type": "NotAuthorizedException", "message": "Incorrect username or password."}"#,
        );
        assert_eq!(
            err,
            AppError::Provider {
                code: "NotAuthorizedException".to_string(),
                message: "Incorrect username or password.".to_string(),
            }
        );
    }

    #[test]
    fn provider_error_without_message_falls_back_to_code() {
        let err = decode_provider_error(400, r#"{"__type": "TooManyRequestsException"}"#);
        assert_eq!(
            err,
            AppError::Provider {
                code: "TooManyRequestsException".to_string(),
                message: "TooManyRequestsException".to_string(),
            }
        );
    }

    #[test]
    fn unrecognized_error_body_becomes_http_error() {
        let err = decode_provider_error(502, "<html>Bad Gateway</html>");
        assert_eq!(
            err,
            AppError::Http {
                status: 502,
                message: "<html>Bad Gateway</html>".to_string(),
            }
        );
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        let long = "x".repeat(500);
        assert_eq!(sanitize_body(&long).len(), 200);
    }

    #[test]
    fn initiate_auth_request_serializes_pascal_case() {
        let mut parameters = HashMap::new();
        parameters.insert("USERNAME".to_string(), "a@b.com".to_string());
        parameters.insert("PASSWORD".to_string(), "pw".to_string());
        let request = InitiateAuthRequest {
            auth_flow: "USER_PASSWORD_AUTH",
            client_id: "client".to_string(),
            auth_parameters: parameters,
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["AuthFlow"], "USER_PASSWORD_AUTH");
        assert_eq!(value["ClientId"], "client");
        assert_eq!(value["AuthParameters"]["USERNAME"], "a@b.com");
    }

    #[test]
    fn get_user_response_exposes_email() {
        let response: GetUserResponse = serde_json::from_str(
            r#"{
                "Username": "a@b.com",
                "UserAttributes": [
                    {"Name": "sub", "Value": "1234"},
                    {"Name": "email", "Value": "a@b.com"}
                ]
            }"#,
        )
        .expect("deserialize");

        assert_eq!(response.email().as_deref(), Some("a@b.com"));
    }
}
