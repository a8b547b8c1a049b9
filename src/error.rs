//! Error types and HTTP error mapping for the city recipes service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Main error type returned by the request handlers
#[derive(Error, Debug)]
pub enum AppError {
    /// The city or recipe does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Recipe content failed validation
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The inbound JSON body could not be parsed
    #[error("Malformed request body: {message}")]
    MalformedRequestBody { message: String },

    /// The city data service answered with a failure
    #[error("City data service unavailable: {source}")]
    UpstreamUnavailable {
        #[from]
        source: UpstreamError,
    },

    /// The city data service has no record where one is expected
    #[error("City data missing: {message}")]
    UpstreamDataMissing { message: String },

    /// Anything else
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new malformed body error
    pub fn malformed_body<S: Into<String>>(message: S) -> Self {
        Self::MalformedRequestBody {
            message: message.into(),
        }
    }

    /// Create a new missing upstream data error
    pub fn data_missing<S: Into<String>>(message: S) -> Self {
        Self::UpstreamDataMissing {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation { .. } | AppError::MalformedRequestBody { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::UpstreamUnavailable { .. }
            | AppError::UpstreamDataMissing { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the message exposed to API clients.
    ///
    /// Server-side failures get a fixed message; the cause only goes to the log.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound { message }
            | AppError::Validation { message }
            | AppError::MalformedRequestBody { message } => message.clone(),
            AppError::UpstreamUnavailable { source } => source.user_message().to_string(),
            AppError::UpstreamDataMissing { .. } => "Weather predictions missing".to_string(),
            AppError::Internal { .. } => "Internal error".to_string(),
        }
    }
}

/// JSON body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::malformed_body(rejection.body_text())
    }
}

/// Failures talking to the city data service
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} answered with status {status}")]
    Status {
        endpoint: Endpoint,
        status: reqwest::StatusCode,
    },

    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        match self {
            UpstreamError::Transport { endpoint, .. }
            | UpstreamError::Status { endpoint, .. }
            | UpstreamError::Decode { endpoint, .. } => *endpoint,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self.endpoint() {
            Endpoint::Cities => "Cities API error",
            Endpoint::Insights => "Error fetching city insights",
            Endpoint::WeatherPredictions => "Weather API error",
            Endpoint::Submissions => "Submission API error",
        }
    }
}

/// City data service endpoints, used to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Cities,
    Insights,
    WeatherPredictions,
    Submissions,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Endpoint::Cities => "cities",
            Endpoint::Insights => "insights",
            Endpoint::WeatherPredictions => "weather-predictions",
            Endpoint::Submissions => "submissions",
        };
        f.write_str(name)
    }
}
