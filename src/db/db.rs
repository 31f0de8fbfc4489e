use super::migrations::init_with_migrations;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

/// Database file name inside the application data directory.
pub const DB_FILE_NAME: &str = "caltask.db";

/// An open SQLite connection with the schema migrated to the latest version.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the application database in the platform data directory.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        Self::open(db_file_path)
    }

    /// Opens (or creates) the database at `path` and applies pending migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Db> {
        let mut conn = Self::open_without_migrations(path)?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }

    /// Opens the application database as is, for inspecting the schema version.
    pub fn new_without_migrations() -> Result<Connection> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        Self::open_without_migrations(db_file_path)
    }

    pub fn open_without_migrations<P: AsRef<Path>>(path: P) -> Result<Connection> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(conn)
    }
}
