//! Persistence adapter: serializes the whole collection to JSON and keeps it
//! under a single key of a [`KeyValueStore`].

use std::path::Path;

use log::{debug, info, warn};

use crate::db::{ensure_schema, KeyValueStore, SqliteStore};
use crate::error::{StorageError, StorageResult};
use crate::models::Book;

/// Key holding the serialized collection.
pub const STORAGE_KEY: &str = "BOOK_APPS";

/// What startup found under [`STORAGE_KEY`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet.
    Empty,
    Loaded(usize),
    /// Stored data could not be read back; the session starts empty.
    Discarded { reason: String },
    /// No backend for this session.
    Unavailable,
}

pub struct Persistence {
    backend: Option<Box<dyn KeyValueStore>>,
}

impl Persistence {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Some(Box::new(backend)),
        }
    }

    /// Adapter with no backing store. Every save fails with
    /// [`StorageError::Unavailable`].
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    /// Open the SQLite file at `db_path`. A database that cannot be opened
    /// leaves the adapter unavailable for the rest of the session.
    pub fn open(db_path: &Path) -> Self {
        match ensure_schema(db_path) {
            Ok(conn) => Self::new(SqliteStore::new(conn)),
            Err(err) => {
                warn!("event=storage_open module=persistence status=unavailable error={err:#}");
                Self::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Write the full collection under [`STORAGE_KEY`]. Returns the number of
    /// bytes written.
    pub fn save(&mut self, books: &[Book]) -> StorageResult<usize> {
        let backend = self.backend.as_mut().ok_or(StorageError::Unavailable)?;
        let payload = serde_json::to_string(books)?;
        backend.set(STORAGE_KEY, &payload)?;
        debug!(
            "event=save module=persistence status=ok books={} bytes={}",
            books.len(),
            payload.len()
        );
        Ok(payload.len())
    }

    /// Read the stored collection. Missing or malformed data yields an empty
    /// list; the outcome says which case applied.
    pub fn load(&self) -> (Vec<Book>, LoadOutcome) {
        let Some(backend) = self.backend.as_ref() else {
            return (Vec::new(), LoadOutcome::Unavailable);
        };

        let raw = match backend.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return (Vec::new(), LoadOutcome::Empty),
            Err(err) => return discard(err.to_string()),
        };

        match serde_json::from_str::<Option<Vec<Book>>>(&raw) {
            Ok(Some(books)) => {
                info!(
                    "event=load module=persistence status=ok books={}",
                    books.len()
                );
                let count = books.len();
                (books, LoadOutcome::Loaded(count))
            }
            Ok(None) => (Vec::new(), LoadOutcome::Empty),
            Err(err) => discard(err.to_string()),
        }
    }

    /// Raw text currently stored, if any.
    pub fn stored_payload(&self) -> Option<String> {
        self.backend
            .as_ref()
            .and_then(|backend| backend.get(STORAGE_KEY).ok().flatten())
    }
}

fn discard(reason: String) -> (Vec<Book>, LoadOutcome) {
    warn!("event=load module=persistence status=discarded reason={reason}");
    (Vec::new(), LoadOutcome::Discarded { reason })
}
