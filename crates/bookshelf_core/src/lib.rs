//! Core catalog logic for Bookshelf.
//! This crate is the single source of truth for record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookField, BookValidationError, StorageKey};
pub use render::{HtmlRenderer, ViewRenderer};
pub use repo::book_store::{BookStore, SqliteBookStore, StoreError, StoreResult};
pub use repo::memory_store::MemoryBookStore;
pub use service::book_service::{BookService, BookServiceError, BookServiceResult};
pub use service::catalog_service::CatalogService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
