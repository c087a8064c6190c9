use bookshelf_core::db::migrations::latest_version;
use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{Book, BookStore, SqliteBookStore, StoreError};
use rusqlite::Connection;

#[test]
fn insert_assigns_storage_key_and_find_by_id_reads_it_back() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    let book = Book::new("1", "Dune", "Herbert")
        .with_edition("1st")
        .with_pages("412")
        .with_year("1965");
    let key = store.insert(&book).unwrap();

    let loaded = store.find_by_id("1").unwrap().unwrap();
    assert_eq!(loaded.storage_key, Some(key));
    assert_eq!(loaded.title, "Dune");
    assert_eq!(loaded.edition.as_deref(), Some("1st"));
    assert_eq!(loaded.pages.as_deref(), Some("412"));
    assert_eq!(loaded.year.as_deref(), Some("1965"));
    assert!(store.find_by_id("2").unwrap().is_none());
}

#[test]
fn insert_with_existing_id_is_reported_as_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    store.insert(&Book::new("1", "A", "X")).unwrap();
    let err = store.insert(&Book::new("1", "B", "Y")).unwrap_err();

    assert!(matches!(err, StoreError::DuplicateId(id) if id == "1"));
    assert_eq!(store.count_by_id("1").unwrap(), 1);
}

#[test]
fn find_all_returns_books_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    for id in ["b", "a", "c"] {
        store.insert(&Book::new(id, "T", "A")).unwrap();
    }

    let ids: Vec<_> = store
        .find_all()
        .unwrap()
        .into_iter()
        .map(|book| book.id)
        .collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
}

#[test]
fn replace_by_id_keeps_storage_key_and_reports_matches() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    let key = store.insert(&Book::new("1", "A", "X").with_year("2001")).unwrap();
    let matched = store
        .replace_by_id("1", &Book::new("1", "C", "X"))
        .unwrap();
    assert_eq!(matched, 1);

    let loaded = store.find_by_id("1").unwrap().unwrap();
    assert_eq!(loaded.storage_key, Some(key));
    assert_eq!(loaded.title, "C");
    assert_eq!(loaded.year, None);

    let missing = store
        .replace_by_id("404", &Book::new("404", "C", "X"))
        .unwrap();
    assert_eq!(missing, 0);
    assert_eq!(store.count_by_id("404").unwrap(), 0);
}

#[test]
fn delete_by_id_only_removes_matching_book() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    store.insert(&Book::new("1", "A", "X")).unwrap();
    store.insert(&Book::new("2", "B", "Y")).unwrap();

    assert_eq!(store.delete_by_id("1").unwrap(), 1);
    assert_eq!(store.delete_by_id("1").unwrap(), 0);
    assert_eq!(store.find_all().unwrap().len(), 1);
    assert_eq!(store.count_by_id("2").unwrap(), 1);
}

#[test]
fn lookups_never_match_on_storage_key() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    let key = store.insert(&Book::new("1", "A", "X")).unwrap();
    let key_text = key.to_string();

    assert_eq!(store.count_by_id(&key_text).unwrap(), 0);
    assert!(store.find_by_id(&key_text).unwrap().is_none());
    assert_eq!(store.delete_by_id(&key_text).unwrap(), 0);
}

#[test]
fn read_rejects_persisted_row_with_invalid_storage_key() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO books (storage_key, id, title, author) VALUES ('not-a-uuid', '1', 'A', 'X');",
        [],
    )
    .unwrap();
    let store = SqliteBookStore::try_new(&conn).unwrap();

    let err = store.find_all().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteBookStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_books_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteBookStore::try_new(&conn);
    assert!(matches!(result, Err(StoreError::MissingRequiredTable("books"))));
}

#[test]
fn store_rejects_connection_missing_books_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE books (
            storage_key TEXT PRIMARY KEY NOT NULL,
            id TEXT NOT NULL,
            title TEXT NOT NULL,
            author TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteBookStore::try_new(&conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredColumn {
            table: "books",
            column: "edition"
        })
    ));
}
