//! Book store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide a uniform find/count/insert/replace/delete contract over the
//!   single book collection.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every filter keys on `books.id`; `storage_key` is only ever written.
//! - The unique index on `books.id` is reported as `StoreError::DuplicateId`.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - No retries: a failed call is reported once to the caller.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::book::{Book, StorageKey};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const BOOK_SELECT_SQL: &str = "SELECT
    storage_key,
    id,
    title,
    author,
    edition,
    pages,
    year
FROM books";

const REQUIRED_BOOK_COLUMNS: &[&str] = &[
    "storage_key",
    "id",
    "title",
    "author",
    "edition",
    "pages",
    "year",
];

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for book persistence and query operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Another record already owns this business identifier.
    DuplicateId(String),
    InvalidData(String),
    /// A shared in-process store was poisoned by a panicking writer.
    LockPoisoned,
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "book id already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
            Self::LockPoisoned => write!(f, "book store lock poisoned"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Uniform contract over the book collection.
///
/// Each call is a point-in-time snapshot and atomic on its own; nothing here
/// spans more than one statement.
pub trait BookStore {
    /// Returns every stored book in store iteration order.
    fn find_all(&self) -> StoreResult<Vec<Book>>;
    fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>>;
    fn count_by_id(&self, id: &str) -> StoreResult<u64>;
    /// Inserts `book` and returns the storage key assigned to it.
    fn insert(&self, book: &Book) -> StoreResult<StorageKey>;
    /// Replaces every field except the storage key; returns matched rows.
    fn replace_by_id(&self, id: &str, book: &Book) -> StoreResult<u64>;
    /// Deletes by business id; returns deleted rows.
    fn delete_by_id(&self, id: &str) -> StoreResult<u64>;
}

impl<S: BookStore + ?Sized> BookStore for &S {
    fn find_all(&self) -> StoreResult<Vec<Book>> {
        (**self).find_all()
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>> {
        (**self).find_by_id(id)
    }

    fn count_by_id(&self, id: &str) -> StoreResult<u64> {
        (**self).count_by_id(id)
    }

    fn insert(&self, book: &Book) -> StoreResult<StorageKey> {
        (**self).insert(book)
    }

    fn replace_by_id(&self, id: &str, book: &Book) -> StoreResult<u64> {
        (**self).replace_by_id(id, book)
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<u64> {
        (**self).delete_by_id(id)
    }
}

/// SQLite-backed book store.
pub struct SqliteBookStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookStore<'conn> {
    /// Wraps a connection after checking it was opened through `db::open_db`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not have the expected `books` shape.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_books_shape(conn)?;
        Ok(Self { conn })
    }
}

impl BookStore for SqliteBookStore<'_> {
    fn find_all(&self) -> StoreResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();

        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }

        Ok(books)
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    fn count_by_id(&self, id: &str) -> StoreResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM books WHERE id = ?1;", [id], |row| {
                    row.get(0)
                })?;
        Ok(count_to_u64(count))
    }

    fn insert(&self, book: &Book) -> StoreResult<StorageKey> {
        let storage_key = Uuid::new_v4();

        let result = self.conn.execute(
            "INSERT INTO books (
                storage_key,
                id,
                title,
                author,
                edition,
                pages,
                year
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                storage_key.to_string(),
                book.id.as_str(),
                book.title.as_str(),
                book.author.as_str(),
                book.edition.as_deref(),
                book.pages.as_deref(),
                book.year.as_deref(),
            ],
        );

        match result {
            Ok(_) => Ok(storage_key),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateId(book.id.clone())),
            Err(err) => Err(err.into()),
        }
    }

    fn replace_by_id(&self, id: &str, book: &Book) -> StoreResult<u64> {
        let result = self.conn.execute(
            "UPDATE books
             SET
                id = ?1,
                title = ?2,
                author = ?3,
                edition = ?4,
                pages = ?5,
                year = ?6
             WHERE id = ?7;",
            params![
                book.id.as_str(),
                book.title.as_str(),
                book.author.as_str(),
                book.edition.as_deref(),
                book.pages.as_deref(),
                book.year.as_deref(),
                id,
            ],
        );

        match result {
            Ok(changed) => Ok(changed as u64),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateId(book.id.clone())),
            Err(err) => Err(err.into()),
        }
    }

    fn delete_by_id(&self, id: &str) -> StoreResult<u64> {
        let changed = self.conn.execute("DELETE FROM books WHERE id = ?1;", [id])?;
        Ok(changed as u64)
    }
}

fn ensure_books_shape(conn: &Connection) -> StoreResult<()> {
    let table_exists: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'books';",
            [],
            |row| row.get(0),
        )
        .optional()?;
    if table_exists.is_none() {
        return Err(StoreError::MissingRequiredTable("books"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('books');")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for &column in REQUIRED_BOOK_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: "books",
                column,
            });
        }
    }

    Ok(())
}

fn parse_book_row(row: &Row<'_>) -> StoreResult<Book> {
    let key_text: String = row.get("storage_key")?;
    let storage_key = Uuid::parse_str(&key_text).map_err(|_| {
        StoreError::InvalidData(format!(
            "invalid storage key `{key_text}` in books.storage_key"
        ))
    })?;

    let book = Book {
        storage_key: Some(storage_key),
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        edition: row.get("edition")?,
        pages: row.get("pages")?,
        year: row.get("year")?,
    };

    if book.validate_for_create().is_err() {
        return Err(StoreError::InvalidData(format!(
            "book `{}` is missing a required field",
            book.id
        )));
    }

    Ok(book)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}

fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}
