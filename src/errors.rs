use axum::http::StatusCode;
use tracing::warn;

/// User-input errors raised by the session tracker, time resolution and
/// feeding log. All of them are reported back to the recipient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("time must be in HH:MM format, got `{0}`")]
    InvalidTimeFormat(String),
    #[error("sleep end must be after sleep start")]
    InvalidRange,
    #[error("no active sleep session")]
    NoActiveSession,
    #[error("recipient {0} is not registered, call start first")]
    UnknownRecipient(i64),
    #[error("a sleep session is already open")]
    SessionAlreadyOpen,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<TrackerError> for AppError {
    fn from(err: TrackerError) -> Self {
        warn!("rejected action: {err}");
        let message = err.to_string();
        match err {
            TrackerError::InvalidTimeFormat(_) | TrackerError::InvalidRange => {
                Self::bad_request(message)
            }
            TrackerError::UnknownRecipient(_) => Self::not_found(message),
            TrackerError::NoActiveSession | TrackerError::SessionAlreadyOpen => {
                Self::conflict(message)
            }
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
