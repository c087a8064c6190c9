//! Process-local book store.
//!
//! Keeps records in insertion order behind an `RwLock`. Used by tests and by
//! embedders that want the catalog rules without SQLite. The unique `id`
//! constraint is checked under the write lock, so it holds for concurrent
//! inserts the same way the SQLite index does.

use crate::model::book::{Book, StorageKey};
use crate::repo::book_store::{BookStore, StoreError, StoreResult};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Book>>> {
        self.books.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<Book>>> {
        self.books.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl BookStore for MemoryBookStore {
    fn find_all(&self) -> StoreResult<Vec<Book>> {
        Ok(self.read()?.clone())
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>> {
        Ok(self.read()?.iter().find(|book| book.id == id).cloned())
    }

    fn count_by_id(&self, id: &str) -> StoreResult<u64> {
        Ok(self.read()?.iter().filter(|book| book.id == id).count() as u64)
    }

    fn insert(&self, book: &Book) -> StoreResult<StorageKey> {
        let mut books = self.write()?;
        if books.iter().any(|stored| stored.id == book.id) {
            return Err(StoreError::DuplicateId(book.id.clone()));
        }

        let storage_key = Uuid::new_v4();
        let mut stored = book.clone();
        stored.storage_key = Some(storage_key);
        books.push(stored);
        Ok(storage_key)
    }

    fn replace_by_id(&self, id: &str, book: &Book) -> StoreResult<u64> {
        let mut books = self.write()?;
        if book.id != id && books.iter().any(|stored| stored.id == book.id) {
            return Err(StoreError::DuplicateId(book.id.clone()));
        }

        let Some(stored) = books.iter_mut().find(|stored| stored.id == id) else {
            return Ok(0);
        };
        let storage_key = stored.storage_key;
        *stored = Book {
            storage_key,
            ..book.clone()
        };
        Ok(1)
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<u64> {
        let mut books = self.write()?;
        let before = books.len();
        books.retain(|book| book.id != id);
        Ok((before - books.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryBookStore;
    use crate::model::book::Book;
    use crate::repo::book_store::{BookStore, StoreError};

    #[test]
    fn insert_assigns_storage_key_and_rejects_duplicate_id() {
        let store = MemoryBookStore::new();
        let key = store.insert(&Book::new("1", "A", "X")).unwrap();

        let stored = store.find_by_id("1").unwrap().unwrap();
        assert_eq!(stored.storage_key, Some(key));

        let err = store.insert(&Book::new("1", "B", "Y")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(id) if id == "1"));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn replace_keeps_storage_key() {
        let store = MemoryBookStore::new();
        let key = store.insert(&Book::new("1", "A", "X")).unwrap();

        let matched = store.replace_by_id("1", &Book::new("1", "C", "X")).unwrap();
        assert_eq!(matched, 1);

        let stored = store.find_by_id("1").unwrap().unwrap();
        assert_eq!(stored.title, "C");
        assert_eq!(stored.storage_key, Some(key));
        assert_eq!(store.replace_by_id("2", &Book::new("2", "C", "X")).unwrap(), 0);
    }

    #[test]
    fn delete_reports_removed_count() {
        let store = MemoryBookStore::new();
        store.insert(&Book::new("1", "A", "X")).unwrap();

        assert_eq!(store.delete_by_id("1").unwrap(), 1);
        assert_eq!(store.delete_by_id("1").unwrap(), 0);
        assert!(store.is_empty().unwrap());
    }
}
