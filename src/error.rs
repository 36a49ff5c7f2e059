use figment::Error as ConfigError;
use reqwest::Error as HttpError;
use serde_json::{Error as JsonError, Value};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Shown when the server gave no usable reason for a failure.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum Error {
    /// The request never reached the server, or no response came back.
    #[error("Transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The server answered with a non-2xx status.
    #[error("Server returned {status}: {}", .message.as_deref().unwrap_or("no reason given"))]
    Api {
        status: u16,
        message: Option<String>,
    },
    #[error(transparent)]
    Decode(#[from] JsonError),
    #[error("Local storage failure: {0}")]
    Storage(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] Box<ConfigError>),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Build an [`Error::Api`] from a status code and the JSON body the server sent,
    /// picking up `error` or `message` as the reason.
    pub fn from_response(status: u16, body: &Value) -> Self {
        let message = ["error", "message"]
            .iter()
            .find_map(|field| body.get(field).and_then(Value::as_str))
            .map(str::to_string);
        Self::Api { status, message }
    }

    /// The HTTP status, if the server responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// A human-readable message suitable for an alert dialog.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Self::Transport(_) => "Unable to reach the server. Check your connection.".to_string(),
            Self::InvalidRequest(reason) => reason.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<HttpError> for Error {
    fn from(err: HttpError) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn server_reason_prefers_error_field() {
        let err = Error::from_response(400, &json!({"error": "Already voted", "message": "x"}));
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.user_message(), "Already voted");

        let err = Error::from_response(403, &json!({"message": "Not eligible"}));
        assert_eq!(err.user_message(), "Not eligible");
    }

    #[test]
    fn missing_reason_falls_back() {
        let err = Error::from_response(500, &json!({"detail": 3}));
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert_eq!(err.to_string(), "Server returned 500: no reason given");

        let err = Error::from_response(502, &Value::Null);
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn transport_errors_have_no_status() {
        let err = Error::Transport("connection refused".into());
        assert_eq!(err.status(), None);
        assert!(err.user_message().contains("Unable to reach"));
        assert_eq!(err.to_string(), "Transport failure: connection refused");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("connection refused"));
    }
}
