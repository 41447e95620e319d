use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppError {
    /// Local input validation failure. Never reaches the network.
    Validation(String),
    /// Rejection reported by the identity provider. The message is shown to
    /// the user verbatim.
    Provider { code: String, message: String },
    Config(String),
    Network(String),
    Timeout(String),
    Http { status: u16, message: String },
    Parse(String),
    Serialization(String),
}

impl AppError {
    /// True when the error was produced locally, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(message) => write!(formatter, "{message}"),
            // Provider text is surfaced untouched so the user sees exactly
            // what the pool rejected.
            AppError::Provider { message, .. } => write!(formatter, "{message}"),
            AppError::Config(message) => write!(formatter, "Config error: {message}"),
            AppError::Network(message) => write!(formatter, "Network error: {message}"),
            AppError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            AppError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            AppError::Parse(message) => write!(formatter, "Response error: {message}"),
            AppError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn provider_message_is_displayed_verbatim() {
        let err = AppError::Provider {
            code: "NotAuthorizedException".to_string(),
            message: "Incorrect username or password.".to_string(),
        };
        assert_eq!(err.to_string(), "Incorrect username or password.");
    }

    #[test]
    fn validation_message_is_displayed_verbatim() {
        let err = AppError::Validation("Passwords do not match.".to_string());
        assert_eq!(err.to_string(), "Passwords do not match.");
        assert!(err.is_validation());
    }
}
