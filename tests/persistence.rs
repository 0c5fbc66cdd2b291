use bookshelf::db::{open_in_memory, KeyValueStore, SqliteStore};
use bookshelf::{Book, BookStore, LoadOutcome, NewBook, Persistence, StorageError, STORAGE_KEY};
use tempfile::tempdir;

fn sample_books() -> Vec<Book> {
    let mut store = BookStore::new();
    store.add(NewBook::new("Dune", "Herbert", 1965));
    store.add(NewBook::new("Emma", "Austen", 1815).completed(true));
    store.add(NewBook::new("Beowulf", "Unknown", -1000));
    store.books().to_vec()
}

fn memory_persistence() -> Persistence {
    Persistence::new(SqliteStore::new(open_in_memory().unwrap()))
}

#[test]
fn save_then_load_round_trips_content_and_order() {
    let mut persistence = memory_persistence();
    let books = sample_books();

    let bytes = persistence.save(&books).unwrap();
    assert!(bytes > 0);

    let (loaded, outcome) = persistence.load();
    assert_eq!(loaded, books);
    assert_eq!(outcome, LoadOutcome::Loaded(3));
}

#[test]
fn nothing_stored_loads_empty() {
    let persistence = memory_persistence();
    let (loaded, outcome) = persistence.load();
    assert!(loaded.is_empty());
    assert_eq!(outcome, LoadOutcome::Empty);
}

#[test]
fn stored_json_uses_camel_case_fields() {
    let mut persistence = memory_persistence();
    persistence.save(&sample_books()[..1]).unwrap();

    let payload = persistence.stored_payload().unwrap();
    let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
    let record = &value[0];
    assert_eq!(record["title"], "Dune");
    assert_eq!(record["author"], "Herbert");
    assert_eq!(record["year"], 1965);
    assert_eq!(record["isComplete"], false);
    assert!(record["id"].is_i64());
}

#[test]
fn existing_payload_in_original_format_loads() {
    let mut kv = SqliteStore::new(open_in_memory().unwrap());
    kv.set(
        STORAGE_KEY,
        r#"[{"id":1700000000000,"title":"Dune","author":"Herbert","year":1965,"isComplete":true}]"#,
    )
    .unwrap();

    let (loaded, outcome) = Persistence::new(kv).load();
    assert_eq!(outcome, LoadOutcome::Loaded(1));
    assert_eq!(loaded[0].id, 1_700_000_000_000);
    assert!(loaded[0].is_complete);
}

#[test]
fn null_year_from_original_format_reads_as_zero() {
    let mut kv = SqliteStore::new(open_in_memory().unwrap());
    kv.set(
        STORAGE_KEY,
        r#"[{"id":1700000000000,"title":"Dune","author":"Herbert","year":1965,"isComplete":false},{"id":1700000000001,"title":"Untitled","author":"Anon","year":null,"isComplete":true}]"#,
    )
    .unwrap();

    let (loaded, outcome) = Persistence::new(kv).load();
    assert_eq!(outcome, LoadOutcome::Loaded(2));
    assert_eq!(loaded[0].year, 1965);
    assert_eq!(loaded[1].year, 0);
    assert_eq!(loaded[1].title, "Untitled");
    assert!(loaded[1].is_complete);
}

#[test]
fn null_payload_loads_empty() {
    let mut kv = SqliteStore::new(open_in_memory().unwrap());
    kv.set(STORAGE_KEY, "null").unwrap();

    let (loaded, outcome) = Persistence::new(kv).load();
    assert!(loaded.is_empty());
    assert_eq!(outcome, LoadOutcome::Empty);
}

#[test]
fn malformed_payload_is_discarded() {
    let mut kv = SqliteStore::new(open_in_memory().unwrap());
    kv.set(STORAGE_KEY, "{not json").unwrap();

    let (loaded, outcome) = Persistence::new(kv).load();
    assert!(loaded.is_empty());
    assert!(matches!(outcome, LoadOutcome::Discarded { .. }));
}

#[test]
fn unavailable_storage_refuses_to_save() {
    let mut persistence = Persistence::unavailable();
    assert!(!persistence.is_available());
    assert!(matches!(
        persistence.save(&sample_books()),
        Err(StorageError::Unavailable)
    ));

    let (loaded, outcome) = persistence.load();
    assert!(loaded.is_empty());
    assert_eq!(outcome, LoadOutcome::Unavailable);
}

#[test]
fn file_database_survives_reopen() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("nested").join("bookshelf.sqlite");
    let books = sample_books();

    {
        let mut persistence = Persistence::open(&db_path);
        assert!(persistence.is_available());
        persistence.save(&books).unwrap();
    }

    let (loaded, outcome) = Persistence::open(&db_path).load();
    assert_eq!(outcome, LoadOutcome::Loaded(books.len()));
    assert_eq!(loaded, books);
}

#[test]
fn unopenable_database_is_unavailable() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let persistence = Persistence::open(&blocker.join("bookshelf.sqlite"));
    assert!(!persistence.is_available());
}
