//! HTML presentation routes.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use bookshelf_core::CatalogService;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BookSearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

pub fn view_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/books", get(books_table))
        .route("/authors", get(authors_list))
        .route("/years", get(years_list))
        .route("/search", get(search_bar))
        .route("/create", get(create_probe))
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.renderer().render_index())
}

async fn books_table(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookSearchQuery>,
) -> Result<Html<String>, ApiError> {
    let needle = query.q.unwrap_or_default();
    let books = state
        .with_store(move |store| CatalogService::new(store).search(&needle))
        .await?;
    Ok(Html(state.renderer().render_table(&books)))
}

async fn authors_list(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let authors = state
        .with_store(|store| CatalogService::new(store).distinct_authors())
        .await?;
    let authors: Vec<String> = authors.into_iter().collect();
    Ok(Html(state.renderer().render_list("Authors", &authors)))
}

async fn years_list(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let years = state
        .with_store(|store| CatalogService::new(store).distinct_years())
        .await?;
    let years: Vec<String> = years.into_iter().collect();
    Ok(Html(state.renderer().render_list("Years", &years)))
}

async fn search_bar(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.renderer().render_search())
}

async fn create_probe() -> StatusCode {
    StatusCode::NO_CONTENT
}
