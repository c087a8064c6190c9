//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical book record shared by write and read paths.
//! - Provide pure validation predicates for create and update requests.
//!
//! # Invariants
//! - `id` is the business identifier; all lookups key on it.
//! - `storage_key` is assigned by the store and never leaves core.
//! - Stored books always carry non-empty `title` and `author`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque storage-internal identity, assigned on insert.
pub type StorageKey = Uuid;

/// Required book field named by validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Id,
    Title,
    Author,
}

impl BookField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Author => "author",
        }
    }
}

/// Validation error for book write requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookValidationError {
    MissingField(BookField),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{} is required", field.as_str()),
        }
    }
}

impl Error for BookValidationError {}

/// Canonical book record.
///
/// Serialized with the external schema names (`id`, `title`, `author`,
/// `edition`, `pages`, `year`). Every field defaults when absent so that
/// missing required values reach validation instead of failing decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identity. Never serialized.
    #[serde(skip)]
    pub storage_key: Option<StorageKey>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub edition: Option<String>,
    /// Page count as free text, e.g. `"320"`.
    #[serde(default)]
    pub pages: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

impl Book {
    /// Creates a book with the required fields and no optional metadata.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            storage_key: None,
            id: id.into(),
            title: title.into(),
            author: author.into(),
            edition: None,
            pages: None,
            year: None,
        }
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = Some(edition.into());
        self
    }

    pub fn with_pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = Some(pages.into());
        self
    }

    /// Checks the fields a client must supply when creating a book.
    ///
    /// Fields are checked in `id`, `title`, `author` order; the first empty
    /// one is reported.
    pub fn validate_for_create(&self) -> Result<(), BookValidationError> {
        require(&self.id, BookField::Id)?;
        self.validate_for_update()
    }

    /// Checks the fields a client must supply when replacing a book.
    ///
    /// `id` is not checked here: updates take it from the request path.
    pub fn validate_for_update(&self) -> Result<(), BookValidationError> {
        require(&self.title, BookField::Title)?;
        require(&self.author, BookField::Author)?;
        Ok(())
    }

    /// Returns a copy with empty optional fields collapsed to `None`.
    pub fn normalized(mut self) -> Self {
        self.edition = non_empty(self.edition);
        self.pages = non_empty(self.pages);
        self.year = non_empty(self.year);
        self
    }
}

fn require(value: &str, field: BookField) -> Result<(), BookValidationError> {
    if value.trim().is_empty() {
        return Err(BookValidationError::MissingField(field));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
