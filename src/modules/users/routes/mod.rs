use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    routing::post,
    Json, Router,
};
use shelf_db::{SecurityQuestion, UserStore};
use shelf_http::AppError;

use super::credentials::PasswordVerifier;
use super::models::MessageResponse;
use crate::validation;

const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
const LOGIN_SUCCESS_MESSAGE: &str = "Authentication successful";
const VERIFY_SUCCESS_MESSAGE: &str = "Security questions successfully answered";

/// Handler state for the account routes
#[derive(Clone)]
pub struct UsersState {
    pub users: Arc<dyn UserStore>,
    pub verifier: Arc<PasswordVerifier>,
    pub security_question_count: usize,
}

/// Routes relative to `/api`
pub fn router(state: UsersState) -> Router {
    Router::new()
        .route("/login", post(login))
        .route(
            "/users/{email}/verify-security-questions",
            post(verify_security_questions),
        )
        .with_state(state)
}

async fn login(
    State(state): State<UsersState>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let credentials = validation::login_payload(&validation::decode_body(&body)?)?;

    let stored_hash = state
        .users
        .find_by_email(&credentials.email)
        .await
        .map(|user| user.password_hash);

    // Unknown account and wrong password are indistinguishable to the client.
    if !state
        .verifier
        .verify(credentials.password, stored_hash)
        .await?
    {
        tracing::info!("login rejected");
        return Err(AppError::unauthorized(UNAUTHORIZED_MESSAGE));
    }

    tracing::info!("login succeeded");
    Ok(Json(MessageResponse::new(LOGIN_SUCCESS_MESSAGE)))
}

async fn verify_security_questions(
    State(state): State<UsersState>,
    email: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let email = validation::path_email(email)?;
    let answers = validation::security_answers_payload(
        &validation::decode_body(&body)?,
        &email,
        state.security_question_count,
    )?;

    let user = state
        .users
        .find_by_email(&email)
        .await
        .ok_or_else(|| AppError::unauthorized(UNAUTHORIZED_MESSAGE))?;

    if !answers_match(&user.security_questions, &answers) {
        tracing::info!("security question verification rejected");
        return Err(AppError::unauthorized(UNAUTHORIZED_MESSAGE));
    }

    Ok(Json(MessageResponse::new(VERIFY_SUCCESS_MESSAGE)))
}

/// Positional, case-sensitive comparison.
fn answers_match(stored: &[SecurityQuestion], given: &[String]) -> bool {
    stored.len() == given.len()
        && stored
            .iter()
            .zip(given)
            .all(|(question, answer)| question.answer == *answer)
}
