//! HTTP error mapping.
//!
//! Every failure leaves the API as `{ "code": "...", "message": "..." }`
//! with a status derived from the [`ErrorCode`]. Messages of 5xx responses
//! are replaced with a generic text unless verbose errors are switched on.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::{AnalyticsError, ChatError, KnowledgeError, WidgetError};
use crate::domain::foundation::{AuthError, ErrorCode, ValidationError};

static VERBOSE_ERRORS: AtomicBool = AtomicBool::new(false);

/// Exposes internal error details in 5xx bodies. Development only.
pub fn expose_internal_errors(enabled: bool) {
    VERBOSE_ERRORS.store(enabled, Ordering::Relaxed);
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: ErrorCode,
    message: String,
    retry_after_secs: Option<u32>,
}

impl ApiError {
    /// Builds an error whose status follows from `code`.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: status_for(code),
            code,
            message: message.into(),
            retry_after_secs: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn rate_limited(retry_after_secs: u32, message: impl Into<String>) -> Self {
        Self {
            retry_after_secs: Some(retry_after_secs),
            ..Self::new(ErrorCode::RateLimited, message)
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden | ErrorCode::FeatureNotAvailable => StatusCode::FORBIDDEN,
        ErrorCode::BusinessNotFound
        | ErrorCode::ConversationNotFound
        | ErrorCode::KnowledgeItemNotFound => StatusCode::NOT_FOUND,
        ErrorCode::QuotaExceeded | ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::AIProviderError
        | ErrorCode::DatabaseError
        | ErrorCode::CacheError
        | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            tracing::error!(code = %self.code, error = %self.message, "Request failed");
            if VERBOSE_ERRORS.load(Ordering::Relaxed) {
                self.message
            } else {
                "Internal server error".to_string()
            }
        } else {
            self.message
        };

        let body = ErrorBody {
            code: self.code.to_string(),
            message,
        };
        let mut response = (self.status, Json(body)).into_response();
        if let Some(secs) = self.retry_after_secs {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

macro_rules! from_application_error {
    ($($err:ty),+ $(,)?) => {
        $(
            impl From<$err> for ApiError {
                fn from(err: $err) -> Self {
                    ApiError::new(err.code(), err.to_string())
                }
            }
        )+
    };
}

from_application_error!(ChatError, KnowledgeError, AnalyticsError, WidgetError);

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ServiceUnavailable(msg) => {
                ApiError::new(ErrorCode::InternalError, format!("Auth service unavailable: {}", msg))
            }
            other => ApiError::unauthorized(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
