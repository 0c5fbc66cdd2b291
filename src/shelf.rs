//! The shelf ties the store, the renderer, the persistence adapter and the
//! display together. Each user action runs one fixed pipeline:
//!
//! 1. mutate the [`BookStore`]
//! 2. emit [`ShelfEvent::RenderRequested`] and redraw the display
//! 3. save the whole collection
//! 4. emit [`ShelfEvent::Saved`]
//!
//! Actions aimed at an unknown id stop before step 2.

use log::{debug, info, log_enabled, warn, Level};

use crate::error::StorageResult;
use crate::events::{EventBus, ShelfEvent};
use crate::models::{Book, NewBook};
use crate::persistence::{LoadOutcome, Persistence};
use crate::render::{render, BookAction, BookDisplay};
use crate::search;
use crate::store::BookStore;

pub struct Shelf<D> {
    store: BookStore,
    persistence: Persistence,
    events: EventBus,
    display: D,
}

impl<D: BookDisplay> Shelf<D> {
    /// Hydrate the store from persistence and draw it once. Loading never
    /// writes back.
    pub fn load(persistence: Persistence, display: D) -> (Self, LoadOutcome) {
        let (books, outcome) = persistence.load();
        let mut store = BookStore::new();
        store.extend(books);
        info!(
            "event=shelf_load module=shelf status=ok books={} outcome={outcome:?}",
            store.len()
        );

        let mut shelf = Self {
            store,
            persistence,
            events: EventBus::new(),
            display,
        };
        shelf.redraw();
        (shelf, outcome)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ShelfEvent) + 'static) {
        self.events.subscribe(listener);
    }

    /// Add a book and run the pipeline. On `Err` the book is already in the
    /// store and on screen; only the save failed.
    pub fn add_book(&mut self, draft: NewBook) -> StorageResult<Book> {
        let book = self.store.add(draft);
        info!("event=book_add module=shelf id={}", book.id);
        self.commit()?;
        Ok(book)
    }

    /// Move a book to the completed group. `Ok(false)` means the id was
    /// unknown and nothing happened.
    pub fn mark_complete(&mut self, id: i64) -> StorageResult<bool> {
        self.set_complete(id, true)
    }

    /// Move a book back to the incomplete group.
    pub fn undo_complete(&mut self, id: i64) -> StorageResult<bool> {
        self.set_complete(id, false)
    }

    /// Delete a book. `Ok(None)` means the id was unknown.
    pub fn remove_book(&mut self, id: i64) -> StorageResult<Option<Book>> {
        let Some(removed) = self.store.remove(id) else {
            return Ok(None);
        };
        info!("event=book_remove module=shelf id={id}");
        self.commit()?;
        Ok(Some(removed))
    }

    /// Dispatch an action taken from a rendered item.
    pub fn apply(&mut self, action: BookAction) -> StorageResult<bool> {
        match action {
            BookAction::Complete(id) => self.mark_complete(id),
            BookAction::Undo(id) => self.undo_complete(id),
            BookAction::Delete(id) => self.remove_book(id).map(|removed| removed.is_some()),
        }
    }

    /// Filter the rendered output by title. Returns the number of items left
    /// visible.
    pub fn search(&mut self, query: &str) -> usize {
        search::filter(self.display.groups_mut(), query)
    }

    pub fn store(&self) -> &BookStore {
        &self.store
    }

    pub fn books(&self) -> &[Book] {
        self.store.books()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn storage_available(&self) -> bool {
        self.persistence.is_available()
    }

    fn set_complete(&mut self, id: i64, value: bool) -> StorageResult<bool> {
        if !self.store.mark_complete(id, value) {
            return Ok(false);
        }
        info!("event=book_toggle module=shelf id={id} complete={value}");
        self.commit()?;
        Ok(true)
    }

    fn commit(&mut self) -> StorageResult<()> {
        self.redraw();
        self.save()
    }

    fn redraw(&mut self) {
        self.events.emit(&ShelfEvent::RenderRequested {
            total: self.store.len(),
        });
        self.display.display(render(self.store.books()));
    }

    fn save(&mut self) -> StorageResult<()> {
        match self.persistence.save(self.store.books()) {
            Ok(bytes) => {
                if log_enabled!(Level::Debug) {
                    let payload = self.persistence.stored_payload().unwrap_or_default();
                    debug!("event=saved module=shelf payload={payload}");
                }
                self.events.emit(&ShelfEvent::Saved { bytes });
                Ok(())
            }
            Err(err) => {
                warn!("event=save module=shelf status=error error={err}");
                Err(err)
            }
        }
    }
}
