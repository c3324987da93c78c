//! Per-entity update operations for decoded journal records.

use rusqlite::Connection;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::projection::record::merge_localised;
use crate::projection::{tables as projections, SqlValue};
use crate::schema::tables;
use crate::store::upsert;

pub fn update_system(conn: &Connection, record: &Map<String, Value>) -> Result<usize> {
    let mut row = projections::SYSTEM.project(record)?;

    // An FSDJump is an arrival; stamp it separately from updated_at.
    if record.get("event").and_then(Value::as_str) == Some("FSDJump") {
        if let Some(ts) = record.get("timestamp").and_then(Value::as_str) {
            row.set("lastarrived_at", SqlValue::Text(ts.to_string()));
        }
    }

    upsert(conn, &tables::SYSTEMS, &row)
}

pub fn update_body(conn: &Connection, record: &Map<String, Value>) -> Result<usize> {
    let row = projections::BODY.project(record)?;
    upsert(conn, &tables::BODIES, &row)
}

pub fn update_market(conn: &Connection, record: &Map<String, Value>) -> Result<usize> {
    let row = projections::MARKET.project(record)?;
    upsert(conn, &tables::MARKETS, &row)
}

/// Upsert one faction row per entry of the record's Factions array.
pub fn update_faction(conn: &Connection, record: &Map<String, Value>) -> Result<usize> {
    let Some(factions) = record.get("Factions") else {
        return Ok(0);
    };
    let list = factions
        .as_array()
        .ok_or_else(|| Error::MalformedRecord("Factions is not an array".to_string()))?;

    let mut written = 0;
    for item in list {
        let obj = item
            .as_object()
            .ok_or_else(|| Error::MalformedRecord("faction entry is not an object".to_string()))?;
        let mut raw = obj.clone();
        if let Some(ts) = record.get("timestamp") {
            raw.insert("timestamp".to_string(), ts.clone());
        }
        let row = projections::FACTION.project(&raw)?;
        written += upsert(conn, &tables::FACTIONS, &row)?;
    }
    Ok(written)
}

/// Upsert the per-system faction presence rows. Must run after
/// [`update_faction`] so the name lookup finds the faction.
pub fn update_system_faction(conn: &Connection, record: &Map<String, Value>) -> Result<usize> {
    let Some(factions) = record.get("Factions") else {
        return Ok(0);
    };
    let list = factions
        .as_array()
        .ok_or_else(|| Error::MalformedRecord("Factions is not an array".to_string()))?;

    let mut written = 0;
    for item in list {
        let obj = item
            .as_object()
            .ok_or_else(|| Error::MalformedRecord("faction entry is not an object".to_string()))?;
        let mut raw = merge_localised(obj);
        if let Some(addr) = record.get("SystemAddress") {
            raw.insert("SystemAddress".to_string(), addr.clone());
        }
        if let Some(ts) = record.get("timestamp") {
            raw.insert("timestamp".to_string(), ts.clone());
        }
        let row = projections::SYSTEM_FACTION.project(&raw)?;
        written += upsert(conn, &tables::SYSTEM_FACTIONS, &row)?;
    }
    Ok(written)
}

/// Record a statistics snapshot. Records with no statistics payload are
/// skipped.
pub fn update_statistics(conn: &Connection, record: &Map<String, Value>) -> Result<usize> {
    let row = projections::STATISTICS.project(record)?;
    if row.detail.is_none() {
        return Ok(0);
    }
    upsert(conn, &tables::STATISTICS, &row)
}
