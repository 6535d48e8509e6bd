//! Error bodies returned by the expense policy API.
//!
//! Every failure is a JSON [`ApiError`]; its [`ApiErrorCode`] decides the
//! HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Machine-readable reason an API call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    /// The body is not JSON, or not shaped like a request.
    MalformedJson,
    /// The body is JSON but a required field is missing.
    ValidationError,
    /// The request was not sent as `application/json`.
    MissingContentType,
    /// A foreign-currency expense arrived without any way to get rates.
    MissingRates,
    /// The supplied rate table cannot be used.
    InvalidRates,
    /// The rate service could not be reached or answered badly.
    RateFetchFailed,
    /// The server's own policy or settings are broken.
    ConfigError,
    /// Anything else.
    InternalError,
}

impl ApiErrorCode {
    /// HTTP status sent with this code.
    pub fn status(self) -> StatusCode {
        match self {
            Self::MalformedJson
            | Self::ValidationError
            | Self::MissingContentType
            | Self::MissingRates
            | Self::InvalidRates => StatusCode::BAD_REQUEST,
            Self::RateFetchFailed => StatusCode::BAD_GATEWAY,
            Self::ConfigError | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Why the call failed.
    pub code: ApiErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// What the caller can do about it, when there is something to say.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates an error without details.
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidPolicy { .. }
            | EngineError::InvalidSetting { .. } => {
                ApiError::new(ApiErrorCode::ConfigError, "Configuration error").with_details(message)
            }
            EngineError::RateFetchFailed { .. } => ApiError::new(ApiErrorCode::RateFetchFailed, message)
                .with_details("Supply a rate table in the request or retry later"),
            EngineError::MissingRateTable { .. } => ApiError::new(ApiErrorCode::MissingRates, message),
            EngineError::CurrencyNotFound { .. } | EngineError::InvalidRate { .. } => {
                ApiError::new(ApiErrorCode::InvalidRates, message)
            }
            EngineError::CsvError { .. } => ApiError::new(ApiErrorCode::ValidationError, message),
            EngineError::Io(_) | EngineError::ServerError { .. } => {
                ApiError::new(ApiErrorCode::InternalError, message)
            }
        }
    }
}
