use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shelf_db::{Book, BookStore};
use shelf_http::AppError;

use super::models::CreatedBook;
use crate::validation;

const BOOK_NOT_FOUND_MESSAGE: &str = "Book not found";

/// Handler state for the books routes
#[derive(Clone)]
pub struct BooksState {
    pub store: Arc<dyn BookStore>,
}

/// Routes relative to the module mount path
pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .with_state(state)
}

async fn list_books(State(state): State<BooksState>) -> Json<Vec<Book>> {
    Json(state.store.find_all().await)
}

async fn get_book(
    State(state): State<BooksState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = validation::book_id(raw_id)?;

    state
        .store
        .find_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found(BOOK_NOT_FOUND_MESSAGE))
}

async fn create_book(
    State(state): State<BooksState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreatedBook>), AppError> {
    let fields = validation::book_payload(&validation::decode_body(&body)?)?;

    let book = state
        .store
        .insert(fields.into_new_book())
        .await
        .map_err(anyhow::Error::from)?;
    tracing::info!(id = book.id, "book created");

    Ok((StatusCode::CREATED, Json(CreatedBook { id: book.id })))
}

async fn update_book(
    State(state): State<BooksState>,
    raw_id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let id = validation::book_id(raw_id)?;
    let fields = validation::book_payload(&validation::decode_body(&body)?)?;

    match state.store.update(id, fields.into_changes()).await {
        Some(_) => {
            tracing::info!(id, "book updated");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::not_found(BOOK_NOT_FOUND_MESSAGE)),
    }
}

async fn delete_book(
    State(state): State<BooksState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = validation::book_id(raw_id)?;

    match state.store.delete(id).await {
        Some(_) => {
            tracing::info!(id, "book deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(AppError::not_found(BOOK_NOT_FOUND_MESSAGE)),
    }
}
