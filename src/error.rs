use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::wizard::Stage;

pub type Result<T> = std::result::Result<T, SurveyError>;

#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: Stage, to: Stage },

    #[error("Action not available while in {0:?}")]
    WrongStage(Stage),

    #[error("No location has been chosen yet")]
    LocationMissing,

    #[error("Candidate index {index} is out of range ({available} available)")]
    NoSuchCandidate { index: usize, available: usize },

    #[error("Exactly three policies must be ranked, {0} held")]
    SelectionIncomplete(usize),

    #[error("Unknown policy: {0}")]
    UnknownPolicy(String),

    #[error("Invalid ranking: {0}")]
    InvalidRanking(String),

    #[error("This session has already submitted its vote")]
    AlreadySubmitted,

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("No records match the current filter")]
    NothingToExport,

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SurveyError {
    pub fn config(msg: impl Into<String>) -> Self {
        SurveyError::Config(msg.into())
    }

    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SurveyError::Store(_) | SurveyError::Io(_))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            SurveyError::SessionNotFound(_) | SurveyError::NothingToExport => StatusCode::NOT_FOUND,
            SurveyError::InvalidTransition { .. }
            | SurveyError::WrongStage(_)
            | SurveyError::LocationMissing
            | SurveyError::SelectionIncomplete(_)
            | SurveyError::AlreadySubmitted => StatusCode::CONFLICT,
            SurveyError::NoSuchCandidate { .. }
            | SurveyError::UnknownPolicy(_)
            | SurveyError::InvalidRanking(_)
            | SurveyError::InvalidFilter(_) => StatusCode::BAD_REQUEST,
            SurveyError::Store(_) | SurveyError::Io(_) => StatusCode::SERVICE_UNAVAILABLE,
            SurveyError::Csv(_) | SurveyError::Json(_) | SurveyError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub retryable: bool,
}

impl IntoResponse for SurveyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::warn!("Request rejected: {}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
            retryable: self.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}
