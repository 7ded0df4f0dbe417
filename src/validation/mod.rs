//! Per-endpoint request validation.
//!
//! Bodies arrive as raw bytes and are decoded to `serde_json::Value` first;
//! each endpoint then checks its own shape before any store is touched.

use axum::extract::{rejection::PathRejection, Path};
use serde::Deserialize;
use serde_json::Value;
use shelf_http::AppError;

use crate::modules::books::models::BookFields;
use crate::modules::users::models::{LoginRequest, VerifySecurityQuestionsRequest};

pub const INVALID_ID_MESSAGE: &str = "Input must be a number.";
pub const TITLE_REQUIRED_MESSAGE: &str = "Book title is required.";
pub const BAD_REQUEST_MESSAGE: &str = "Bad Request";

/// Decode a request body. An empty body reads as `{}`.
pub fn decode_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "request body is not valid JSON");
        AppError::schema_violation(BAD_REQUEST_MESSAGE)
    })
}

/// Parse the `{id}` path segment of a book route.
pub fn parse_book_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::invalid_input(INVALID_ID_MESSAGE))
}

/// Book id from an extracted path. A segment that is not valid UTF-8 is as
/// much "not a number" as one holding letters.
pub fn book_id(path: Result<Path<String>, PathRejection>) -> Result<i64, AppError> {
    match path {
        Ok(Path(raw)) => parse_book_id(&raw),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "book id segment rejected");
            Err(AppError::invalid_input(INVALID_ID_MESSAGE))
        }
    }
}

/// Email from the verification path.
pub fn path_email(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    path.map(|Path(email)| email).map_err(|rejection| {
        tracing::debug!(error = %rejection, "email segment rejected");
        AppError::schema_violation(BAD_REQUEST_MESSAGE)
    })
}

/// Validate a create/update book body: non-empty string `title`, optional
/// string `author`. Other fields are ignored.
pub fn book_payload(body: &Value) -> Result<BookFields, AppError> {
    let title = match body.get("title") {
        Some(Value::String(title)) if !title.is_empty() => title.clone(),
        _ => return Err(AppError::missing_field(TITLE_REQUIRED_MESSAGE)),
    };

    let author = match body.get("author") {
        None | Some(Value::Null) => None,
        Some(Value::String(author)) => Some(author.clone()),
        Some(_) => return Err(AppError::schema_violation(BAD_REQUEST_MESSAGE)),
    };

    Ok(BookFields { title, author })
}

/// Validate a login body: string `email` and `password` are both required.
pub fn login_payload(body: &Value) -> Result<LoginRequest, AppError> {
    // serde would also read a two-element array into the struct.
    if !body.is_object() {
        return Err(AppError::missing_field(BAD_REQUEST_MESSAGE));
    }

    LoginRequest::deserialize(body).map_err(|e| {
        tracing::debug!(error = %e, "login body rejected");
        AppError::missing_field(BAD_REQUEST_MESSAGE)
    })
}

/// Validate a security-question body: exactly `expected` answers, each
/// exactly `{ "answer": string }`. A body `email` must agree with the path.
/// Returns the answers in order.
pub fn security_answers_payload(
    body: &Value,
    path_email: &str,
    expected: usize,
) -> Result<Vec<String>, AppError> {
    if !is_object_with_object_answers(body) {
        return Err(AppError::schema_violation(BAD_REQUEST_MESSAGE));
    }

    let request = VerifySecurityQuestionsRequest::deserialize(body).map_err(|e| {
        tracing::debug!(error = %e, "security answers body rejected");
        AppError::schema_violation(BAD_REQUEST_MESSAGE)
    })?;

    if request.answers.len() != expected {
        return Err(AppError::schema_violation(BAD_REQUEST_MESSAGE));
    }

    if matches!(request.email.as_deref(), Some(email) if email != path_email) {
        return Err(AppError::schema_violation(BAD_REQUEST_MESSAGE));
    }

    Ok(request.answers.into_iter().map(|a| a.answer).collect())
}

/// The body and every `answers` element must be JSON objects, not arrays
/// that serde would accept positionally.
fn is_object_with_object_answers(body: &Value) -> bool {
    let Value::Object(fields) = body else {
        return false;
    };

    match fields.get("answers") {
        Some(Value::Array(answers)) => answers.iter().all(Value::is_object),
        _ => true,
    }
}
