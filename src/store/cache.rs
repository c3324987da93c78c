use rusqlite::Connection;
use std::collections::HashMap;

use crate::error::Result;

/// Bidirectional commodity name/id lookup, read through from the store.
///
/// Never authoritative: the maps are a copy of commodity_tbl, rebuilt by a
/// full rescan after any write that may have inserted commodities. A rebuild
/// constructs fresh maps and swaps them in, so a reader sees either the old
/// or the new mapping, never a mix.
#[derive(Debug, Default)]
pub struct CommodityCache {
    by_id: HashMap<i64, String>,
    by_name: HashMap<String, i64>,
}

impl CommodityCache {
    /// Rescan commodity_tbl and swap in the new mapping.
    pub fn rebuild(&mut self, conn: &Connection) -> Result<()> {
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();

        let mut stmt = conn.prepare_cached("SELECT id, name FROM commodity_tbl")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (id, name) = row?;
            by_id.insert(id, name.clone());
            by_name.insert(name, id);
        }

        tracing::debug!(entries = by_id.len(), "commodity cache rebuilt");
        self.by_id = by_id;
        self.by_name = by_name;
        Ok(())
    }

    pub fn id_of(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: i64) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE commodity_tbl(id INTEGER PRIMARY KEY, name TEXT UNIQUE NOT NULL, category TEXT, israre INTEGER);
             INSERT INTO commodity_tbl(name, category, israre) VALUES ('Gold', 'Metals', 0), ('Tritium', 'Chemicals', 0);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_bidirectional_lookup() {
        let conn = seeded_conn();
        let mut cache = CommodityCache::default();
        cache.rebuild(&conn).unwrap();

        let id = cache.id_of("Gold").unwrap();
        assert_eq!(cache.name_of(id), Some("Gold"));
        assert_eq!(cache.len(), 2);
        assert!(cache.id_of("Painite").is_none());
    }

    #[test]
    fn test_rebuild_picks_up_new_rows() {
        let conn = seeded_conn();
        let mut cache = CommodityCache::default();
        cache.rebuild(&conn).unwrap();
        assert!(cache.id_of("Painite").is_none());

        conn.execute(
            "INSERT INTO commodity_tbl(name, category, israre) VALUES ('Painite', 'Minerals', 0)",
            [],
        )
        .unwrap();
        cache.rebuild(&conn).unwrap();
        assert!(cache.id_of("Painite").is_some());
        assert_eq!(cache.len(), 3);
    }
}
