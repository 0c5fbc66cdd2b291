//! In-memory book collection. The store is the only owner of the records;
//! every other layer receives read-only snapshots through [`BookStore::books`].

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{Book, NewBook};

/// Hands out timestamp-derived ids that never repeat within a collection.
#[derive(Debug, Default, Clone)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    /// Next id for the current wall clock time.
    pub fn next_id(&mut self) -> Option<i64> {
        self.next_from(now_millis())
    }

    /// Next id given a millisecond timestamp. Falls back to `last + 1` when
    /// the clock has not advanced (or went backwards) since the previous id.
    /// `None` once `last` is `i64::MAX` and no larger id exists.
    pub fn next_from(&mut self, millis: i64) -> Option<i64> {
        let id = if millis > self.last {
            millis
        } else {
            self.last.checked_add(1)?
        };
        self.last = id;
        Some(id)
    }

    /// Make sure future ids land above an id that already exists.
    pub fn observe(&mut self, id: i64) {
        if id > self.last {
            self.last = id;
        }
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

/// Insertion-ordered collection of books.
#[derive(Debug, Default)]
pub struct BookStore {
    books: Vec<Book>,
    ids: IdGenerator,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a book with a fresh id and append it. Always succeeds; duplicate
    /// titles or authors are allowed.
    pub fn add(&mut self, draft: NewBook) -> Book {
        let id = self
            .ids
            .next_id()
            .unwrap_or_else(|| self.lowest_free_id());
        let book = Book {
            id,
            title: draft.title,
            author: draft.author,
            year: draft.year,
            is_complete: draft.is_complete,
        };
        self.books.push(book.clone());
        book
    }

    /// Append previously persisted books in their stored order.
    pub fn extend(&mut self, loaded: impl IntoIterator<Item = Book>) {
        for book in loaded {
            self.ids.observe(book.id);
            self.books.push(book);
        }
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn find_index_by_id(&self, id: i64) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    /// Remove the book with `id`, keeping the rest in order. Returns the
    /// removed record, or `None` when nothing matched.
    pub fn remove(&mut self, id: i64) -> Option<Book> {
        let index = self.find_index_by_id(id)?;
        Some(self.books.remove(index))
    }

    /// Set the completion flag in place. Returns `false` when the id is
    /// unknown.
    pub fn mark_complete(&mut self, id: i64, value: bool) -> bool {
        match self.books.iter_mut().find(|book| book.id == id) {
            Some(book) => {
                book.is_complete = value;
                true
            }
            None => false,
        }
    }

    /// Smallest positive id not taken yet. Only used once the timestamp
    /// sequence has run out of room above a stored id.
    fn lowest_free_id(&self) -> i64 {
        let taken: HashSet<i64> = self.books.iter().map(|book| book.id).collect();
        (1..=i64::MAX)
            .find(|id| !taken.contains(id))
            .unwrap_or_default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
