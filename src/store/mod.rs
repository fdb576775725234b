//! Relational store for the raw INE series.
//!
//! Each indicator owns a table pair:
//! - a dimension table (`ipc` / `ipv`) with one row per series
//! - an observation table (`data_ipc` / `data_ipv`) foreign-keyed to it
//!
//! The store is an embedded SQLite file; one connection is opened per phase
//! (ingestion or analysis) and dropped when the phase ends.

use std::fs::create_dir_all;

use rusqlite::{Connection, OpenFlags};

use crate::domain::StoreConfig;
use crate::error::AppError;

pub mod load;
pub mod read;
pub mod schema;

pub use load::{LoadReport, load_series};
pub use read::{RawTables, read_indicator, read_tables};
pub use schema::ensure_schema;

/// Open the database file described by `config`, creating its directory.
pub fn open(config: &StoreConfig) -> Result<Connection, AppError> {
    if !config.data_dir.as_os_str().is_empty() {
        create_dir_all(&config.data_dir).map_err(|e| {
            AppError::store(format!(
                "Failed to create data dir '{}': {e}",
                config.data_dir.display()
            ))
        })?;
    }

    let path = config.database_path();
    let conn = Connection::open(&path)
        .map_err(|e| AppError::store(format!("Failed to open store '{}': {e}", path.display())))?;
    configure(&conn)?;

    tracing::debug!(
        path = %path.display(),
        host = %config.host,
        user = %config.user,
        "opened store"
    );
    Ok(conn)
}

/// Open a database file that must already exist (analysis phase).
///
/// Neither the file nor its directory is created, so a mistyped database name
/// or data dir is a store error instead of an empty run.
pub fn open_existing(config: &StoreConfig) -> Result<Connection, AppError> {
    let path = config.database_path();
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(&path, flags)
        .map_err(|e| AppError::store(format!("Failed to open store '{}': {e}", path.display())))?;
    configure(&conn)?;

    tracing::debug!(
        path = %path.display(),
        host = %config.host,
        user = %config.user,
        "opened existing store"
    );
    Ok(conn)
}

/// In-memory store with the same settings as [`open`].
pub fn open_in_memory() -> Result<Connection, AppError> {
    let conn = Connection::open_in_memory()
        .map_err(|e| AppError::store(format!("Failed to open in-memory store: {e}")))?;
    configure(&conn)?;
    Ok(conn)
}

fn configure(conn: &Connection) -> Result<(), AppError> {
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| AppError::store(format!("Failed to enable foreign keys: {e}")))
}
