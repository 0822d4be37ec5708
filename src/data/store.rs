//! Async storage interface injected into the HTTP handlers.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::{queries, FileRecord};
use crate::error::ServiceError;

/// Storage operations the service depends on.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist a new document and return its identifier.
    async fn add_entry(&self, file_name: &str, contents: &str) -> Result<i64, ServiceError>;

    /// Every stored document, oldest first.
    async fn get_all_entries(&self) -> Result<Vec<FileRecord>, ServiceError>;

    /// Fetch one document, failing with [`ServiceError::NotFound`] when absent.
    async fn get_entry_by_id(&self, id: i64) -> Result<FileRecord, ServiceError>;
}

/// rusqlite backend. `Connection` is not `Sync`, so it sits behind an async
/// mutex; the guard is never held across an `.await`.
pub struct SqliteFileStore {
    conn: Mutex<Connection>,
}

impl SqliteFileStore {
    /// Wrap an already-initialised connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open the database file, creating it and the table when missing.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(super::initialize(path)?))
    }
}

#[async_trait]
impl FileStore for SqliteFileStore {
    async fn add_entry(&self, file_name: &str, contents: &str) -> Result<i64, ServiceError> {
        let conn = self.conn.lock().await;
        queries::add_entry(&conn, file_name, contents).map_err(ServiceError::Storage)
    }

    async fn get_all_entries(&self) -> Result<Vec<FileRecord>, ServiceError> {
        let conn = self.conn.lock().await;
        queries::get_all_entries(&conn).map_err(ServiceError::Storage)
    }

    async fn get_entry_by_id(&self, id: i64) -> Result<FileRecord, ServiceError> {
        let conn = self.conn.lock().await;
        queries::get_entry_by_id(&conn, id)
            .map_err(ServiceError::Storage)?
            .ok_or(ServiceError::NotFound(id))
    }
}
