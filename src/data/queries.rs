//! Parameter-bound statements against the `Files` table.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::FileRecord;

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        id: row.get(0)?,
        file_name: row.get(1)?,
        contents: row.get(2)?,
    })
}

/// Append one row and return its ROWID.
pub fn add_entry(conn: &Connection, file_name: &str, contents: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO Files (File_name, Contents) VALUES (?1, ?2)",
        params![file_name, contents],
    )?;
    Ok(conn.last_insert_rowid())
}

/// All rows in insertion order.
pub fn get_all_entries(conn: &Connection) -> Result<Vec<FileRecord>> {
    let mut stmt = conn.prepare("SELECT ROWID, File_name, Contents FROM Files ORDER BY ROWID")?;
    let rows = stmt.query_map([], record_from_row)?;
    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }
    Ok(records)
}

/// A single row, or `None` when no row has that ROWID.
pub fn get_entry_by_id(conn: &Connection, id: i64) -> Result<Option<FileRecord>> {
    let record = conn
        .query_row(
            "SELECT ROWID, File_name, Contents FROM Files WHERE ROWID = ?1",
            params![id],
            record_from_row,
        )
        .optional()?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::create_table(&conn).unwrap();
        conn
    }

    #[test]
    fn entries_come_back_in_insertion_order() {
        let conn = conn();
        let a = add_entry(&conn, "a.txt", "first").unwrap();
        let b = add_entry(&conn, "b.txt", "second").unwrap();
        assert!(b > a);

        let all = get_all_entries(&conn).unwrap();
        let names: Vec<_> = all.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
        assert_eq!(all[0].id, a);
    }

    #[test]
    fn quotes_are_stored_verbatim() {
        let conn = conn();
        let name = "it's'); DROP TABLE Files; --";
        let id = add_entry(&conn, name, "O'Brien said \"hi\"").unwrap();
        let record = get_entry_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(record.file_name, name);
        assert_eq!(record.contents, "O'Brien said \"hi\"");
        assert_eq!(get_all_entries(&conn).unwrap().len(), 1);
    }

    #[test]
    fn missing_id_is_none() {
        let conn = conn();
        assert!(get_entry_by_id(&conn, 999).unwrap().is_none());
    }
}
