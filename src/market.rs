//! Market snapshot ingestion: commodity catalog update, reference-cache
//! rebuild, then full price replacement, all in one atomic unit.

use rusqlite::params;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Error, Result};
use crate::projection::{tables as projections, ProjectedRow, SqlValue};
use crate::store::IngestContext;

static NULL: SqlValue = SqlValue::Null;

fn bind<'a>(row: &'a ProjectedRow, column: &str) -> &'a SqlValue {
    row.get(column).unwrap_or(&NULL)
}

/// One decoded market snapshot document.
#[derive(Debug, Deserialize)]
pub struct MarketSnapshot {
    #[serde(rename = "MarketID")]
    pub market_id: i64,
    pub timestamp: String,
    #[serde(rename = "Items", default)]
    pub items: Vec<Map<String, Value>>,
}

/// Counters for one snapshot ingestion.
#[derive(Debug, Default, Clone, Copy)]
pub struct PriceStats {
    /// Commodities newly added to the catalog.
    pub commodities: u64,
    /// Price rows replaced.
    pub prices: u64,
    /// Line items skipped for a missing or unresolvable name.
    pub skipped: u64,
}

/// Read and decode a market snapshot file (Market.json).
pub fn read_market_file(path: &Path) -> Result<MarketSnapshot> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::Decode(e.to_string()))
}

/// Ingest one market snapshot.
///
/// The commodity catalog is written first (first sighting wins, rows are
/// never updated), the name/id cache is rebuilt from the store, and every
/// line item's price row is then fully replaced. One transaction covers all
/// three steps.
pub fn ingest_market_snapshot(
    ctx: &mut IngestContext,
    snapshot: &MarketSnapshot,
) -> Result<PriceStats> {
    let IngestContext { conn, commodities } = ctx;
    let mut stats = PriceStats::default();
    let tx = conn.transaction()?;

    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO commodity_tbl (name, category, israre) VALUES (?, ?, ?) \
             ON CONFLICT(name) DO NOTHING",
        )?;
        for item in &snapshot.items {
            let row = projections::COMMODITY.project(item)?;
            let Some(name) = row.get("name") else {
                tracing::warn!("commodity line item without a name, skipping");
                continue;
            };
            stats.commodities +=
                stmt.execute(params![name, bind(&row, "category"), bind(&row, "israre")])? as u64;
        }
    }

    commodities.rebuild(&tx)?;

    {
        let mut stmt = tx.prepare_cached(
            "REPLACE INTO market_price_tbl (market_id, commodity_id, buyprice, sellprice, \
             stockbracket, demandbracket, stock, demand, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )?;
        for item in &snapshot.items {
            let catalog = projections::COMMODITY.project(item)?;
            let Some(SqlValue::Text(name)) = catalog.get("name") else {
                stats.skipped += 1;
                continue;
            };
            let Some(commodity_id) = commodities.id_of(name) else {
                tracing::warn!(name = %name, "commodity not in cache after rebuild, skipping");
                stats.skipped += 1;
                continue;
            };

            let row = projections::MARKET_PRICE.project(item)?;
            stmt.execute(params![
                snapshot.market_id,
                commodity_id,
                bind(&row, "buyprice"),
                bind(&row, "sellprice"),
                bind(&row, "stockbracket"),
                bind(&row, "demandbracket"),
                bind(&row, "stock"),
                bind(&row, "demand"),
                snapshot.timestamp,
            ])?;
            stats.prices += 1;
        }
    }

    tx.commit()?;
    tracing::info!(
        market_id = snapshot.market_id,
        commodities = stats.commodities,
        prices = stats.prices,
        skipped = stats.skipped,
        "market snapshot ingested"
    );
    Ok(stats)
}
