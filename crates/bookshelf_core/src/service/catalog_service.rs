//! Catalog read and aggregation use-cases.
//!
//! # Responsibility
//! - List every stored book for table views.
//! - Derive deduplicated author and year listings.
//!
//! # Invariants
//! - Aggregations never contain duplicates or empty values.
//! - All operations are read-only full scans of the store.

use crate::model::book::Book;
use crate::repo::book_store::BookStore;
use crate::service::book_service::BookServiceResult;
use std::collections::BTreeSet;

/// Read-side service over a book store.
pub struct CatalogService<S: BookStore> {
    store: S,
}

impl<S: BookStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns every book in store order. Callers must not rely on the order.
    pub fn list_all(&self) -> BookServiceResult<Vec<Book>> {
        Ok(self.store.find_all()?)
    }

    /// Distinct non-empty authors, sorted.
    pub fn distinct_authors(&self) -> BookServiceResult<BTreeSet<String>> {
        self.distinct_values(|book| Some(book.author.as_str()))
    }

    /// Distinct non-empty publication years, sorted.
    pub fn distinct_years(&self) -> BookServiceResult<BTreeSet<String>> {
        self.distinct_values(|book| book.year.as_deref())
    }

    /// Books whose title, author or year contains `query`, ignoring case.
    ///
    /// A blank query matches every book.
    pub fn search(&self, query: &str) -> BookServiceResult<Vec<Book>> {
        let needle = query.trim().to_lowercase();
        let books = self.store.find_all()?;
        if needle.is_empty() {
            return Ok(books);
        }

        Ok(books
            .into_iter()
            .filter(|book| {
                [
                    Some(book.title.as_str()),
                    Some(book.author.as_str()),
                    book.year.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|value| value.to_lowercase().contains(&needle))
            })
            .collect())
    }

    fn distinct_values(
        &self,
        field: impl Fn(&Book) -> Option<&str>,
    ) -> BookServiceResult<BTreeSet<String>> {
        let books = self.store.find_all()?;
        Ok(collect_distinct(&books, field))
    }
}

/// Collects the non-empty values of `field` across `books` into a set.
pub fn collect_distinct<'a>(
    books: &'a [Book],
    field: impl Fn(&'a Book) -> Option<&'a str>,
) -> BTreeSet<String> {
    books
        .iter()
        .filter_map(field)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_owned)
        .collect()
}
