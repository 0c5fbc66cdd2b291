//! Core library surface for the Bookshelf TUI.
//!
//! The store, renderer and persistence adapter do not depend on the terminal
//! front-end; `ui` is only one implementation of [`BookDisplay`].
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod persistence;
pub mod render;
pub mod search;
pub mod shelf;
pub mod store;
pub mod ui;

pub use config::Config;
pub use error::{StorageError, StorageResult};
pub use events::{EventBus, ShelfEvent};
pub use models::{Book, NewBook};
pub use persistence::{LoadOutcome, Persistence, STORAGE_KEY};
pub use render::{render, BookAction, BookDisplay, BookGroups, BookItem, Group};
pub use shelf::Shelf;
pub use store::BookStore;

/// The interactive application entry point and state container.
pub use ui::{run_app, App, ShelfView};
