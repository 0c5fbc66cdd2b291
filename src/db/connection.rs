use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{error, info};
use rusqlite::Connection;

/// Open (or create) the database file, create the key-value table when it is
/// missing, and return a live connection.
pub fn ensure_schema(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(db_path)
        .inspect_err(|err| {
            error!(
                "event=db_open module=db status=error path={} error={err}",
                db_path.display()
            )
        })
        .context("failed to open SQLite database")?;
    create_tables(&conn)?;

    info!(
        "event=db_open module=db status=ok path={}",
        db_path.display()
    );
    Ok(conn)
}

/// Same schema as [`ensure_schema`] but without touching the filesystem.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    create_tables(&conn)?;
    Ok(conn)
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create kv_store table")?;
    Ok(())
}
