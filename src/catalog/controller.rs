use std::sync::Arc;
use axum::{
    body::HttpBody,
    extract::{Path, Query, State},
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    BoxError, Router,
};
use serde_json::{Value};
use crate::books::dto::BookDto;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::find_books_cmd::{FindBooksCommand, FindBooksCommandRequest, FindBooksCommandResponse};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest};
use crate::core::command::Command;
use crate::core::controller::{AppState, rejection_to_server_error, ServerError};

pub(crate) async fn add_book(
    State(state): State<AppState>,
    json: Result<Json<Value>, JsonRejection>) -> Result<(StatusCode, Json<BookDto>), ServerError> {
    let Json(json) = json.map_err(|err| rejection_to_server_error(err.status(), err.body_text()))?;
    let req = AddBookCommandRequest::from_json(&json)?;
    let res = AddBookCommand::new(Arc::clone(&state.catalog_service)).execute(req).await?;
    Ok((StatusCode::CREATED, Json(res.book)))
}

pub(crate) async fn find_book_by_id(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<Json<BookDto>, ServerError> {
    let req = GetBookCommandRequest::new(book_id);
    let res = GetBookCommand::new(Arc::clone(&state.catalog_service)).execute(req).await?;
    Ok(Json(res.book))
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> Result<StatusCode, ServerError> {
    let req = RemoveBookCommandRequest::new(book_id);
    let _ = RemoveBookCommand::new(Arc::clone(&state.catalog_service)).execute(req).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    json: Result<Json<Value>, JsonRejection>) -> Result<Json<BookDto>, ServerError> {
    let Json(json) = json.map_err(|err| rejection_to_server_error(err.status(), err.body_text()))?;
    let req = UpdateBookCommandRequest::from_json(book_id.as_str(), &json)?;
    let res = UpdateBookCommand::new(Arc::clone(&state.catalog_service)).execute(req).await?;
    Ok(Json(res.book))
}

pub(crate) async fn find_books(
    State(state): State<AppState>,
    query: Result<Query<FindBooksCommandRequest>, QueryRejection>) -> Result<Json<FindBooksCommandResponse>, ServerError> {
    let Query(req) = query.map_err(|err| rejection_to_server_error(StatusCode::BAD_REQUEST, err.body_text()))?;
    let res = FindBooksCommand::new(Arc::clone(&state.catalog_service), &state.config).execute(req).await?;
    Ok(Json(res))
}

// generic over the body so the same routes serve lambda events and plain hyper requests
pub fn router<B>(state: AppState) -> Router<(), B>
    where
        B: HttpBody + Send + 'static,
        B::Data: Send,
        B::Error: Into<BoxError> {
    Router::new()
        .route("/api/books",
               post(add_book).get(find_books))
        .route("/api/books/:id",
               get(find_book_by_id).put(update_book).delete(remove_book))
        .with_state(state)
}
