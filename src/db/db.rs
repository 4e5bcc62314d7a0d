use crate::db::migrations::init_with_migrations;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "mytime.sqlite";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database configured in `config.json`, or the default file in
    /// the data directory, and brings its schema up to date.
    pub fn new() -> Result<Db> {
        let storage = DataStorage::new();
        let db_file_path = Config::read_from(&storage)?.db_path(&storage)?;
        Self::open(db_file_path)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        let mut conn = Connection::open(path)?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }

    /// In-memory database with the full schema applied.
    pub fn in_memory() -> Result<Db> {
        let mut conn = Connection::open_in_memory()?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }
}
