//! Two-level event routing: event kind, then scan sub-kind.

use rusqlite::Connection;
use serde_json::{Map, Value};

use super::events::*;
use crate::error::{Error, Result};

/// Route one decoded journal record to its entity updates.
///
/// Unrecognized kinds are ignored. A malformed field aborts only the entity
/// update it belongs to; the event's remaining updates still run. Returns
/// the number of rows written.
pub fn dispatch(conn: &Connection, record: &Map<String, Value>) -> Result<usize> {
    let event = record
        .get("event")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let mut written = 0;

    match event {
        "ApproachSettlement" | "Docked" | "Location" => {
            apply(&mut written, "market", update_market(conn, record))?;
        }
        "Scan" => dispatch_scan(conn, record, &mut written)?,
        "StartJump" => {
            apply(&mut written, "system", update_system(conn, record))?;
        }
        "Statistics" => {
            apply(&mut written, "statistics", update_statistics(conn, record))?;
        }
        "SupercruiseExit" => {
            apply(&mut written, "body", update_body(conn, record))?;
        }
        "FSDJump" => {
            // Faction rows must exist before the system-faction rows that
            // resolve them by name, all within the enclosing transaction.
            apply(&mut written, "system", update_system(conn, record))?;
            apply(&mut written, "body", update_body(conn, record))?;
            apply(&mut written, "faction", update_faction(conn, record))?;
            apply(
                &mut written,
                "system_faction",
                update_system_faction(conn, record),
            )?;
        }
        _ => {
            tracing::trace!(event, "no handler for event");
        }
    }

    Ok(written)
}

fn dispatch_scan(
    conn: &Connection,
    record: &Map<String, Value>,
    written: &mut usize,
) -> Result<()> {
    match record.get("ScanType").and_then(Value::as_str) {
        Some("AutoScan") => {
            apply(written, "system", update_system(conn, record))?;
            apply(written, "body", update_body(conn, record))?;
        }
        Some("Detailed" | "NavBeaconDetail") => {
            apply(written, "body", update_body(conn, record))?;
        }
        other => {
            tracing::debug!(scan_type = ?other, "no handler for scan type");
        }
    }
    Ok(())
}

fn apply(written: &mut usize, entity: &str, result: Result<usize>) -> Result<()> {
    match result {
        Ok(n) => {
            *written += n;
            Ok(())
        }
        Err(Error::MalformedRecord(reason)) => {
            tracing::warn!(entity, %reason, "skipping entity update");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
