use rusqlite::Connection;
use std::path::Path;

use super::cache::CommodityCache;
use super::schema_gen::{generate_create_table, generate_indexes};
use crate::error::Result;
use crate::schema::ALL_TABLES;

/// Explicit handle to the store and the commodity reference cache.
///
/// Passed to every component that touches durable state; there are no
/// module-level connection or cache singletons. All mutation goes through
/// one connection, one transaction at a time.
pub struct IngestContext {
    pub(crate) conn: Connection,
    pub(crate) commodities: CommodityCache,
}

impl IngestContext {
    /// Open (creating if needed) the database at the given path.
    pub fn open(db_path: &Path) -> Result<Self> {
        Self::init(Connection::open(db_path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;

        for schema in ALL_TABLES {
            conn.execute(&generate_create_table(schema), [])?;
            for index_sql in generate_indexes(schema) {
                conn.execute(&index_sql, [])?;
            }
        }

        Ok(Self {
            conn,
            commodities: CommodityCache::default(),
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn commodities(&self) -> &CommodityCache {
        &self.commodities
    }
}
