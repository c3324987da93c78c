//! Merge-upsert synthesis: one parameterized insert-or-merge statement per
//! projected row, built from the static table schema instead of ad-hoc SQL
//! text per call.

use rusqlite::{Connection, ToSql};

use crate::error::Result;
use crate::projection::ProjectedRow;
use crate::schema::{ColumnType, TableSchema};

/// A synthesized statement with its parameters in binding order.
struct UpsertSql<'a> {
    sql: String,
    params: Vec<&'a dyn ToSql>,
}

/// Build the insert-or-merge statement for one projected row.
///
/// Returns None when a key column is neither supplied nor covered by a
/// reference lookup; such an update is skipped, not an error.
///
/// Key columns bind first. A reference that targets a key column turns the
/// statement into an INSERT..SELECT filtered on the referenced table's
/// natural key, so an unmatched lookup inserts nothing. A reference to a
/// non-key column becomes a scalar sub-select and an unmatched lookup leaves
/// the column NULL. On conflict, scalar columns take the new value and the
/// attribute bag is merge-patched (or replaced, for a Json bag).
fn synthesize<'a>(table: &TableSchema, row: &'a ProjectedRow) -> Option<UpsertSql<'a>> {
    let mut insert_cols: Vec<&str> = Vec::new();
    let mut exprs: Vec<String> = Vec::new();
    let mut params: Vec<&'a dyn ToSql> = Vec::new();
    let mut from_clause: Option<(String, &'a dyn ToSql)> = None;
    let mut update_set: Vec<String> = Vec::new();

    for key in table.upsert_key {
        if let Some(value) = row.get(key) {
            insert_cols.push(key);
            exprs.push("?".to_string());
            params.push(value);
        } else if let Some(r) = row.reference_for(key) {
            insert_cols.push(key);
            exprs.push(format!("{}.id", r.table));
            from_clause = Some((
                format!(" FROM {t} WHERE {t}.{k} = ?", t = r.table, k = r.natural_key),
                &r.value,
            ));
        } else {
            return None;
        }
    }

    for (column, value) in &row.columns {
        if table.is_upsert_key(column) {
            continue;
        }
        insert_cols.push(column);
        exprs.push("?".to_string());
        params.push(value);
        update_set.push(format!("{column} = excluded.{column}"));
    }

    if let Some(detail) = &row.detail {
        if let Some(bag) = table.bag_column() {
            insert_cols.push(bag.name);
            exprs.push("jsonb(?)".to_string());
            params.push(detail);
            update_set.push(match bag.col_type {
                ColumnType::Detail => {
                    format!("{0} = jsonb_patch({0}, excluded.{0})", bag.name)
                }
                _ => format!("{0} = excluded.{0}", bag.name),
            });
        }
    }

    for r in &row.references {
        if table.is_upsert_key(r.column) {
            continue;
        }
        insert_cols.push(r.column);
        exprs.push(format!(
            "(SELECT id FROM {t} WHERE {t}.{k} = ?)",
            t = r.table,
            k = r.natural_key
        ));
        params.push(&r.value);
        update_set.push(format!("{col} = excluded.{col}", col = r.column));
    }

    let conflict = table.upsert_key.join(", ");
    let action = if update_set.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", update_set.join(", "))
    };

    let sql = match from_clause {
        Some((from, param)) => {
            params.push(param);
            format!(
                "INSERT INTO {} ({}) SELECT {}{} ON CONFLICT({}) {}",
                table.name,
                insert_cols.join(", "),
                exprs.join(", "),
                from,
                conflict,
                action
            )
        }
        None => format!(
            "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) {}",
            table.name,
            insert_cols.join(", "),
            exprs.join(", "),
            conflict,
            action
        ),
    };

    Some(UpsertSql { sql, params })
}

/// Execute one insert-or-merge operation for a projected row.
///
/// Returns the number of rows written: 0 when the update was skipped for a
/// missing key, or when a key-reference lookup matched nothing.
pub fn upsert(conn: &Connection, table: &TableSchema, row: &ProjectedRow) -> Result<usize> {
    let Some(op) = synthesize(table, row) else {
        tracing::debug!(table = table.name, "missing key value, skipping update");
        return Ok(0);
    };

    for r in &row.references {
        if table.is_upsert_key(r.column) {
            continue;
        }
        let probe = format!(
            "SELECT EXISTS(SELECT 1 FROM {t} WHERE {t}.{k} = ?)",
            t = r.table,
            k = r.natural_key
        );
        let found: bool = conn
            .prepare_cached(&probe)?
            .query_row([&r.value], |row| row.get(0))?;
        if !found {
            tracing::warn!(
                table = table.name,
                column = r.column,
                name = %r.value,
                "unresolved reference, column left unset"
            );
        }
    }

    tracing::debug!(sql = %op.sql, "upsert");
    let mut stmt = conn.prepare_cached(&op.sql)?;
    let changed = stmt.execute(&op.params[..])?;
    if changed == 0 {
        tracing::debug!(table = table.name, "key reference matched nothing, no row written");
    }
    Ok(changed)
}
