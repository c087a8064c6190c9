//! Book write use-cases.
//!
//! # Responsibility
//! - Enforce identifier uniqueness on create.
//! - Apply full-record replace on update, keyed by the path identifier.
//! - Report missing targets on update and delete.
//!
//! # Invariants
//! - At most one stored book per `id`. The service checks before insert and
//!   the store's unique constraint catches the concurrent case.
//! - Stored books always pass `Book::validate_for_create`.
//! - Errors are returned to the caller unchanged; nothing is retried.

use crate::model::book::{Book, BookValidationError};
use crate::repo::book_store::{BookStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for book use-cases.
#[derive(Debug)]
pub enum BookServiceError {
    /// A required field is missing from the request.
    InvalidInput(BookValidationError),
    /// Create collided with an existing `id`.
    DuplicateId(String),
    /// Update or delete target does not exist.
    NotFound(String),
    /// The underlying store call failed.
    StoreUnavailable(StoreError),
}

impl Display for BookServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::DuplicateId(id) => write!(f, "book with id `{id}` already exists"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::StoreUnavailable(err) => write!(f, "store unavailable: {err}"),
        }
    }
}

impl Error for BookServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BookValidationError> for BookServiceError {
    fn from(value: BookValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<StoreError> for BookServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateId(id) => Self::DuplicateId(id),
            other => Self::StoreUnavailable(other),
        }
    }
}

pub type BookServiceResult<T> = Result<T, BookServiceError>;

/// Write-side service over a book store.
pub struct BookService<S: BookStore> {
    store: S,
}

impl<S: BookStore> BookService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a book after validation and the uniqueness check.
    ///
    /// Returns the stored book with its assigned storage key.
    pub fn create(&self, book: Book) -> BookServiceResult<Book> {
        let mut book = book.normalized();
        book.validate_for_create()?;

        if self.store.count_by_id(&book.id)? > 0 {
            return Err(BookServiceError::DuplicateId(book.id));
        }

        let storage_key = self.store.insert(&book)?;
        book.storage_key = Some(storage_key);
        Ok(book)
    }

    /// Replaces the book stored under `id`.
    ///
    /// Any `id` carried by `book` is overwritten with the path `id`, so an
    /// update can never move a record to another identifier.
    pub fn update(&self, id: &str, book: Book) -> BookServiceResult<Book> {
        let mut book = book.normalized();
        book.validate_for_update()?;
        book.id = id.to_string();
        book.storage_key = None;

        if self.store.replace_by_id(id, &book)? == 0 {
            return Err(BookServiceError::NotFound(id.to_string()));
        }

        Ok(book)
    }

    /// Permanently deletes the book stored under `id`.
    pub fn delete(&self, id: &str) -> BookServiceResult<()> {
        if self.store.delete_by_id(id)? == 0 {
            return Err(BookServiceError::NotFound(id.to_string()));
        }

        Ok(())
    }

    /// Loads one book by business identifier.
    pub fn get(&self, id: &str) -> BookServiceResult<Book> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| BookServiceError::NotFound(id.to_string()))
    }
}
