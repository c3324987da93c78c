//! Batch ingestion driver for line-oriented journal sources.

use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::dispatch::dispatch;
use crate::error::{Error, Result};
use crate::store::IngestContext;

/// Counters for one ingestion run.
#[derive(Debug, Default, Clone, Copy)]
pub struct BatchStats {
    /// Non-empty lines consumed.
    pub lines: u64,
    /// Rows written across all entity tables.
    pub applied: u64,
    /// Records that could not be decoded (logged and skipped).
    pub decode_failures: u64,
}

impl BatchStats {
    pub fn merge(&mut self, other: BatchStats) {
        self.lines += other.lines;
        self.applied += other.applied;
        self.decode_failures += other.decode_failures;
    }
}

/// Decode one raw line into a tagged journal record.
fn decode_line(line: &str) -> Result<Map<String, Value>> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| Error::Decode(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(Error::Decode("record is not a JSON object".to_string()));
    };
    if !map.get("event").map_or(false, Value::is_string) {
        return Err(Error::Decode("record carries no event tag".to_string()));
    }
    Ok(map)
}

/// Drain an ordered line source into the store inside one transaction.
///
/// Decode failures are counted and skipped without interrupting the unit of
/// work; a store failure rolls the whole unit back.
pub fn ingest_lines<R: BufRead>(ctx: &mut IngestContext, reader: R) -> Result<BatchStats> {
    let mut stats = BatchStats::default();
    let tx = ctx.conn.transaction()?;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        stats.lines += 1;

        let record = match decode_line(&line) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line = line_num + 1, error = %e, "skipping undecodable record");
                stats.decode_failures += 1;
                continue;
            }
        };

        stats.applied += dispatch(&tx, &record)? as u64;
    }

    tx.commit()?;
    Ok(stats)
}

/// Import one journal file as a single atomic unit.
pub fn import_journal_file(ctx: &mut IngestContext, path: &Path) -> Result<BatchStats> {
    tracing::info!(path = %path.display(), "importing journal");
    let file = File::open(path)?;
    let stats = ingest_lines(ctx, BufReader::new(file))?;
    tracing::info!(
        lines = stats.lines,
        applied = stats.applied,
        decode_failures = stats.decode_failures,
        "journal imported"
    );
    Ok(stats)
}

/// Enumerate journal logs under a directory, sorted by name. Journal file
/// names sort chronologically.
pub fn discover_journals(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut logs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "log"))
        .collect();
    logs.sort();
    Ok(logs)
}

/// Import every journal log under a directory, one atomic unit per file.
pub fn import_journal_dir(ctx: &mut IngestContext, dir: &Path) -> Result<BatchStats> {
    let logs = discover_journals(dir)?;
    tracing::info!(count = logs.len(), dir = %dir.display(), "found journal logs");

    let mut total = BatchStats::default();
    for path in &logs {
        total.merge(import_journal_file(ctx, path)?);
    }
    Ok(total)
}
