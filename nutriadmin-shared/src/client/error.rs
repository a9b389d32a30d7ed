use reqwest::StatusCode;
use thiserror::Error;

use crate::resource::FALLBACK_MESSAGE;

/// Failure of a call against the platform API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token is held; the request was not sent.
    #[error("not signed in")]
    MissingToken,
    /// The API answered 401.
    #[error("unauthorized: {}", .message.as_deref().unwrap_or(FALLBACK_MESSAGE))]
    Unauthorized { message: Option<String> },
    /// Any other non-success status.
    #[error("request failed with {status}: {}", .message.as_deref().unwrap_or(FALLBACK_MESSAGE))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Text for the error banner: the server's message when it sent one,
    /// a generic fallback otherwise.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingToken => "You are not signed in.".to_string(),
            Self::Unauthorized { message } | Self::Server { message, .. } => message
                .clone()
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            Self::Transport(_) | Self::Decode(_) | Self::InvalidUrl(_) => {
                FALLBACK_MESSAGE.to_string()
            }
        }
    }

    /// Whether the failure means the stored credentials are no longer usable.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::MissingToken | Self::Unauthorized { .. })
    }

    /// HTTP status of the failed response, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Server { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let error = ApiError::Server {
            status: StatusCode::CONFLICT,
            message: Some("Email already in use".to_string()),
        };
        assert_eq!(error.user_message(), "Email already in use");
        assert_eq!(error.status(), Some(StatusCode::CONFLICT));
        assert_eq!(
            error.to_string(),
            "request failed with 409 Conflict: Email already in use"
        );
    }

    #[test]
    fn missing_message_uses_fallback() {
        let error = ApiError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: None,
        };
        assert_eq!(error.user_message(), FALLBACK_MESSAGE);

        let error = ApiError::Unauthorized { message: None };
        assert_eq!(error.user_message(), FALLBACK_MESSAGE);
        assert!(error.is_auth_failure());
    }

    #[test]
    fn missing_token_is_an_auth_failure() {
        assert!(ApiError::MissingToken.is_auth_failure());
        assert_eq!(ApiError::MissingToken.user_message(), "You are not signed in.");
        assert_eq!(ApiError::MissingToken.status(), None);
    }

    #[test]
    fn decode_errors_hide_details_from_the_banner() {
        let error = ApiError::from(serde_json::from_str::<u32>("\"x\"").unwrap_err());
        assert_eq!(error.user_message(), FALLBACK_MESSAGE);
    }
}
