//! SQLite-backed key-value storage split across logical submodules.

mod connection;
mod kv;

pub use connection::{ensure_schema, open_in_memory};
pub use kv::{KeyValueStore, SqliteStore};
