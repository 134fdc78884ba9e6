use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unsupported timeframe '{timeframe}'. Supported: {supported}")]
    UnsupportedTimeframe { timeframe: String, supported: String },

    #[error("No candle data available: {0}")]
    NoDataAvailable(String),

    #[error("Indicator {0} has no defined values (insufficient history)")]
    IndicatorUnavailable(&'static str),

    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Failures that originate in the candle source rather than in the pipeline.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::NoDataAvailable(_) | AppError::UpstreamFetch(_)
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::UnsupportedTimeframe { .. } | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UpstreamFetch(_) => StatusCode::BAD_GATEWAY,
            AppError::NoDataAvailable(_)
            | AppError::IndicatorUnavailable(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::UpstreamFetch(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::UpstreamFetch(format!("malformed payload: {}", e))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("worker task failed: {}", e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
