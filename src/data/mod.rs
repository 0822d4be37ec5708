//! Persistence layer: a single SQLite table of uploaded text files.

pub mod queries;
pub mod schema;
pub mod store;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

pub use store::{FileStore, SqliteFileStore};

/// One uploaded document as stored in the `Files` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: i64,
    pub file_name: String,
    pub contents: String,
}

/// Open (or create) the database at `path` and make sure the table exists.
pub fn initialize(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory for {}", path.display()))?;
        }
    }
    let conn = Connection::open(path)
        .with_context(|| format!("opening database at {}", path.display()))?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    schema::create_table(&conn)?;
    info!(path = %path.display(), "opened file store");
    Ok(conn)
}
