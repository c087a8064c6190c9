//! Shared handler state.

use crate::error::ApiError;
use bookshelf_core::db::open_db;
use bookshelf_core::{BookServiceResult, HtmlRenderer, SqliteBookStore, ViewRenderer};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// State shared by every route.
///
/// Holds the store address, not a connection: each request opens its own
/// connection on a blocking worker.
pub struct AppState {
    db_path: PathBuf,
    renderer: Arc<dyn ViewRenderer>,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self::with_renderer(db_path, Arc::new(HtmlRenderer::new()))
    }

    pub fn with_renderer(db_path: impl Into<PathBuf>, renderer: Arc<dyn ViewRenderer>) -> Self {
        Self {
            db_path: db_path.into(),
            renderer,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn renderer(&self) -> &dyn ViewRenderer {
        self.renderer.as_ref()
    }

    /// Runs `op` against a freshly opened store on the blocking pool.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteBookStore<'_>) -> BookServiceResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || -> Result<T, ApiError> {
            let conn = open_db(&db_path)?;
            let store = SqliteBookStore::try_new(&conn)?;
            Ok(op(&store)?)
        })
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?
    }
}
