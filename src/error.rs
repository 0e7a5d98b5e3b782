use std::fmt::{Display, Formatter};

use figment::Error as ConfigError;
use reqwest::Error as HttpError;
use serde_json::Error as DecodeError;
use thiserror::Error;

use crate::validation::ValidationErrors;

pub type Result<T> = std::result::Result<T, Error>;

/// Fallback message when neither the server nor the transport gave us anything better.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

#[derive(Debug, Error)]
pub enum Error {
    /// Caught client-side before any network call.
    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),
    /// The server refused the request; the message is the server's own.
    #[error("{message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },
    /// Connection failure or client-side timeout.
    #[error("Network error: {0}")]
    Network(String),
    /// An authenticated request came back 401: the session is over.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// A verification window elapsed.
    #[error("Expired: {0}")]
    Expired(String),
    /// The operation is not valid in the current flow state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("A ballot submission is already in progress")]
    SubmissionPending,
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Storage(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] Box<ConfigError>),
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl Error {
    /// The HTTP status associated with this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => *status,
            Self::Unauthorized(_) => Some(401),
            _ => None,
        }
    }

    /// Can the user simply retry the same action with their input intact?
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::Rejected { .. }
            | Self::Network(_)
            | Self::InvalidState(_)
            | Self::SubmissionPending => true,
            Self::Unauthorized(_) | Self::Expired(_) => false,
            Self::Decode(_) | Self::Storage(_) | Self::Config(_) | Self::Http(_) => false,
        }
    }

    /// Does this error end the authenticated session?
    pub fn is_session_expiry(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Does this error mean the pending verification step can no longer succeed?
    ///
    /// The server signals this with `410 Gone`, or with a rejection message
    /// that talks about expiry.
    pub fn indicates_expiry(&self) -> bool {
        match self {
            Self::Expired(_) => true,
            Self::Rejected { status, message } => {
                *status == Some(410) || message.to_lowercase().contains("expired")
            }
            _ => false,
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// The message a user should see for this error.
pub struct DisplayMessage<'a>(pub &'a Error);

impl Display for DisplayMessage<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Error::Rejected { message, .. }
            | Error::Unauthorized(message)
            | Error::Expired(message)
            | Error::InvalidState(message) => write!(f, "{message}"),
            Error::Network(_) | Error::Decode(_) | Error::Http(_) => {
                write!(f, "{GENERIC_ERROR_MESSAGE}")
            }
            Error::Validation(errors) => write!(f, "{errors}"),
            other => write!(f, "{other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_classification() {
        let gone = Error::Rejected {
            status: Some(410),
            message: "Gone".to_string(),
        };
        assert!(gone.indicates_expiry());

        let worded = Error::Rejected {
            status: Some(400),
            message: "OTP has Expired, request a new one".to_string(),
        };
        assert!(worded.indicates_expiry());

        let wrong_code = Error::Rejected {
            status: Some(400),
            message: "Invalid OTP".to_string(),
        };
        assert!(!wrong_code.indicates_expiry());
        assert!(wrong_code.is_recoverable());
    }

    #[test]
    fn unauthorized_is_session_expiry() {
        let err = Error::Unauthorized("Token expired".to_string());
        assert!(err.is_session_expiry());
        assert!(!err.is_recoverable());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn network_errors_show_generic_message() {
        let err = Error::Network("timeout of 30000ms exceeded".to_string());
        assert_eq!(
            DisplayMessage(&err).to_string(),
            GENERIC_ERROR_MESSAGE.to_string()
        );
    }
}
