//! Error handling for the SHELF HTTP layer
//!
//! Handlers return [`AppError`]. Converting one into a response attaches an
//! [`ErrorReport`] extension; the [`normalize_errors`] middleware is the single
//! place that turns reports into the `{ "message", "error" }` body, choosing
//! between detailed and terse output from the run mode.

use axum::{
    body::to_bytes,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shelf_kernel::settings::Environment;
use thiserror::Error;
use uuid::Uuid;

const ROUTE_NOT_FOUND_MESSAGE: &str = "Page Not Found";
const INTERNAL_MESSAGE: &str = "Internal Server Error";
/// Enough for any extractor or middleware rejection text.
const REJECTION_BODY_LIMIT: usize = 16 * 1024;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed identifier
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Required field absent
    #[error("missing field: {message}")]
    MissingField { message: String },

    /// Malformed nested structure
    #[error("schema violation: {message}")]
    SchemaViolation { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    /// Credential or answer mismatch
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("no route for {path}")]
    RouteNotFound { path: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::MissingField {
            message: message.into(),
        }
    }

    pub fn schema_violation(message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn route_not_found(path: impl Into<String>) -> Self {
        Self::RouteNotFound { path: path.into() }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. }
            | AppError::MissingField { .. }
            | AppError::SchemaViolation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } | AppError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::InvalidInput { message }
            | AppError::MissingField { message }
            | AppError::SchemaViolation { message }
            | AppError::NotFound { message }
            | AppError::Unauthorized { message } => message.clone(),
            AppError::RouteNotFound { .. } => ROUTE_NOT_FOUND_MESSAGE.to_string(),
            AppError::Internal(e) => e.to_string(),
        }
    }

    fn detail(&self) -> String {
        match self {
            // Includes the context chain and, when captured, the backtrace.
            AppError::Internal(e) => format!("{e:?}"),
            other => other.to_string(),
        }
    }
}

/// Everything the normalizer needs to render an error body.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    pub detail: String,
    pub error_id: Uuid,
}

impl ErrorReport {
    /// Render the `{ message, error }` body. `error` is the detail string when
    /// `verbose`, an empty object otherwise.
    pub fn render(&self, verbose: bool) -> Response {
        let message = if !verbose && self.status == StatusCode::INTERNAL_SERVER_ERROR {
            INTERNAL_MESSAGE.to_string()
        } else {
            self.message.clone()
        };

        let body = if verbose {
            json!({ "message": message, "error": self.detail })
        } else {
            json!({ "message": message, "error": {} })
        };

        let mut response = (self.status, Json(body)).into_response();
        response.extensions_mut().insert(self.clone());
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let report = ErrorReport {
            status: self.status(),
            message: self.message(),
            detail: self.detail(),
            error_id: Uuid::new_v4(),
        };

        if report.status.is_server_error() {
            tracing::error!(
                error_id = %report.error_id,
                status_code = %report.status.as_u16(),
                detail = %report.detail,
                "request failed"
            );
        } else {
            tracing::warn!(
                error_id = %report.error_id,
                status_code = %report.status.as_u16(),
                detail = %report.detail,
                "request rejected"
            );
        }

        // Terse until the normalizer decides otherwise.
        report.render(false)
    }
}

/// How much error detail reaches clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorMode {
    pub verbose: bool,
}

impl ErrorMode {
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            verbose: environment.is_development(),
        }
    }
}

/// Terminal error stage: re-renders every reported error for the run mode.
/// Error responses produced outside handlers (extractor rejections, body
/// limits, timeouts) carry no report and are converted here.
pub async fn normalize_errors(State(mode): State<ErrorMode>, response: Response) -> Response {
    if let Some(report) = response.extensions().get::<ErrorReport>() {
        return report.render(mode.verbose);
    }

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let detail = match to_bytes(response.into_body(), REJECTION_BODY_LIMIT).await {
        Ok(bytes) if !bytes.is_empty() => String::from_utf8_lossy(&bytes).into_owned(),
        _ => status.to_string(),
    };
    let report = ErrorReport {
        status,
        message: status.canonical_reason().unwrap_or("Error").to_string(),
        detail,
        error_id: Uuid::new_v4(),
    };

    tracing::warn!(
        error_id = %report.error_id,
        status_code = %report.status.as_u16(),
        detail = %report.detail,
        "request rejected before reaching a handler"
    );

    report.render(mode.verbose)
}

/// Fallback for unmatched routes and unsupported methods.
pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::route_not_found(uri.path())
}
