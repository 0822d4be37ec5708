//! Table lifecycle for the `Files` table.

use anyhow::{Context, Result};
use rusqlite::Connection;

pub const TABLE_NAME: &str = "Files";

/// Create the table if it does not exist yet. Safe to call on every start.
///
/// Rows are addressed through SQLite's native `ROWID`; no explicit key column.
pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS Files (
            File_name TEXT NOT NULL,
            Contents TEXT NOT NULL
        );",
    )
    .context("creating Files table")?;
    Ok(())
}

/// Drop the table if it exists.
pub fn drop_table(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS Files;")
        .context("dropping Files table")?;
    Ok(())
}
