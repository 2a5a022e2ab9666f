use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Failures while turning a command line into a request descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,

    #[error("command must start with curl")]
    InvalidCommand,

    #[error("no URL provided")]
    MissingUrl,
}

impl ParseError {
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::EmptyInput => "EMPTY_INPUT",
            ParseError::InvalidCommand => "INVALID_COMMAND",
            ParseError::MissingUrl => "MISSING_URL",
        }
    }
}

impl IntoResponse for ParseError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "ok": false,
            "error": self.to_string(),
            "code": self.code(),
        }));

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Failures while executing a resolved request.
#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Failed to read form file {path}: {source}")]
    FormFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request aborted")]
    Aborted,
}

impl ExecuteError {
    pub fn code(&self) -> &'static str {
        match self {
            ExecuteError::InvalidRequest(_) => "INVALID_REQUEST",
            ExecuteError::FormFile { .. } => "FORM_FILE",
            ExecuteError::Transport(_) => "TRANSPORT_ERROR",
            ExecuteError::Timeout(_) => "TIMEOUT",
            ExecuteError::Aborted => "ABORTED",
        }
    }
}

impl From<reqwest::Error> for ExecuteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ExecuteError::InvalidRequest(e.to_string())
        } else {
            ExecuteError::Transport(e.to_string())
        }
    }
}
