//! JSON book API.
//!
//! Mounted under `/api`:
//! - `GET /books` - all books
//! - `POST /books` - create
//! - `GET /books/:id` - one book
//! - `PUT /books/:id` - full replace, path id wins
//! - `DELETE /books/:id` - permanent delete

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use bookshelf_core::{Book, BookService, CatalogService};
use log::info;

use crate::error::ApiError;
use crate::state::AppState;

pub fn book_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/books", get(list_books).post(create_book))
        .route(
            "/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(state)
}

async fn list_books(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Book>>, ApiError> {
    let books = state
        .with_store(|store| CatalogService::new(store).list_all())
        .await?;
    Ok(Json(books))
}

async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book = state
        .with_store(move |store| BookService::new(store).get(&id))
        .await?;
    Ok(Json(book))
}

async fn create_book(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let Json(book) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

    let created = state
        .with_store(move |store| BookService::new(store).create(book))
        .await?;
    info!(
        "event=book_create module=gateway status=ok book_id={}",
        created.id
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<Book>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let Json(book) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;

    let updated = state
        .with_store(move |store| BookService::new(store).update(&id, book))
        .await?;
    info!(
        "event=book_update module=gateway status=ok book_id={}",
        updated.id
    );
    Ok(Json(updated))
}

async fn delete_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted_id = id.clone();
    state
        .with_store(move |store| BookService::new(store).delete(&id))
        .await?;
    info!(
        "event=book_delete module=gateway status=ok book_id={}",
        deleted_id
    );
    Ok(StatusCode::OK)
}
