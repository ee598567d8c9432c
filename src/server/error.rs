use axum::{
    http::StatusCode,
    response::{IntoResponse, Response}
};

use teller::LedgerError;

pub(crate) enum ServerError{
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    InternalError(anyhow::Error)
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(msg) =>
                (StatusCode::NOT_FOUND, format!("Resource not found: {}", msg)).into_response(),
            Self::BadRequest(msg) =>
                (StatusCode::BAD_REQUEST, format!("Bad request: {}", msg)).into_response(),
            Self::Conflict(msg) =>
                (StatusCode::CONFLICT, format!("Refused: {}", msg)).into_response(),
            Self::InternalError(err) =>
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", err)).into_response()
        }
    }
}

impl From<LedgerError> for ServerError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            LedgerError::InvalidAmount(_) => Self::BadRequest(err.to_string()),
            LedgerError::InsufficientFunds { .. } | LedgerError::NumbersExhausted =>
                Self::Conflict(err.to_string()),
            LedgerError::PersistenceFailure(_) => Self::InternalError(err.into())
        }
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::InternalError(err.into())
    }
}
