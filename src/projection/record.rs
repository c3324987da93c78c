use rusqlite::types::ToSqlOutput;
use rusqlite::ToSql;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::projection::types::{FieldKind, Projection};

/// A scalar value ready for parameter binding.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::from(rusqlite::types::Null),
            SqlValue::Integer(i) => ToSqlOutput::from(*i),
            SqlValue::Real(f) => ToSqlOutput::from(*f),
            SqlValue::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

/// A natural-key lookup the synthesized statement must perform.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceDirective {
    pub column: &'static str,
    pub table: &'static str,
    pub natural_key: &'static str,
    pub value: String,
}

/// The result of projecting one raw record: ordered column values, an
/// optional attribute-bag payload, and reference-resolution directives.
#[derive(Debug, Default)]
pub struct ProjectedRow {
    pub columns: Vec<(&'static str, SqlValue)>,
    pub detail: Option<String>,
    pub references: Vec<ReferenceDirective>,
}

impl ProjectedRow {
    /// Set a column value, replacing any earlier value for the same column.
    pub fn set(&mut self, column: &'static str, value: SqlValue) {
        if let Some(slot) = self.columns.iter_mut().find(|(c, _)| *c == column) {
            slot.1 = value;
        } else {
            self.columns.push((column, value));
        }
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    pub fn reference_for(&self, column: &str) -> Option<&ReferenceDirective> {
        self.references.iter().find(|r| r.column == column)
    }
}

/// Raw fields carrying an empty string are treated as absent.
fn is_absent(value: &Value) -> bool {
    matches!(value, Value::Null) || matches!(value, Value::String(s) if s.is_empty())
}

fn scalar(value: &Value) -> Option<SqlValue> {
    match value {
        Value::Bool(b) => Some(SqlValue::Integer(*b as i64)),
        Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Integer)
            .or_else(|| n.as_f64().map(SqlValue::Real)),
        Value::String(s) if !s.is_empty() => Some(SqlValue::Text(s.clone())),
        _ => None,
    }
}

fn reference_name(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(obj) => obj.get("Name").and_then(Value::as_str),
        _ => None,
    }
}

impl Projection {
    /// Project a raw record into a row for this projection's table.
    ///
    /// Pure and total over well-shaped input: unknown raw fields are dropped,
    /// empty-string values are treated as absent, and the detail payload is
    /// omitted when no detail field is present. Wrong-shaped special fields
    /// fail with [`Error::MalformedRecord`].
    pub fn project(&self, raw: &Map<String, Value>) -> Result<ProjectedRow> {
        let mut row = ProjectedRow::default();

        for map in self.fields {
            let Some(value) = raw.get(map.raw) else {
                continue;
            };
            if is_absent(value) {
                continue;
            }

            match &map.kind {
                FieldKind::Column => {
                    if let Some(v) = scalar(value) {
                        row.set(map.column, v);
                    }
                }
                FieldKind::Position(columns) => {
                    let parts: Option<Vec<f64>> = value
                        .as_array()
                        .filter(|a| a.len() == 3)
                        .map(|a| a.iter().filter_map(Value::as_f64).collect());
                    match parts {
                        Some(parts) if parts.len() == 3 => {
                            for (column, part) in columns.iter().zip(parts) {
                                row.set(*column, SqlValue::Real(part));
                            }
                        }
                        _ => {
                            return Err(Error::MalformedRecord(format!(
                                "field {} is not a 3-element numeric array",
                                map.raw
                            )))
                        }
                    }
                }
                FieldKind::Flatten(fields) => {
                    let Some(obj) = value.as_object() else {
                        return Err(Error::MalformedRecord(format!(
                            "field {} is not an object",
                            map.raw
                        )));
                    };
                    for (member, column) in *fields {
                        if let Some(v) = obj.get(*member).and_then(scalar) {
                            row.set(*column, v);
                        }
                    }
                }
                FieldKind::Reference { table, natural_key } => {
                    let Some(name) = reference_name(value) else {
                        return Err(Error::MalformedRecord(format!(
                            "field {} carries no reference name",
                            map.raw
                        )));
                    };
                    if !name.is_empty() {
                        row.references.push(ReferenceDirective {
                            column: map.column,
                            table: *table,
                            natural_key: *natural_key,
                            value: name.to_string(),
                        });
                    }
                }
            }
        }

        let mut detail = Map::new();
        for field in self.detail_fields {
            if let Some(value) = raw.get(*field) {
                if !is_absent(value) {
                    detail.insert((*field).to_string(), value.clone());
                }
            }
        }
        if !detail.is_empty() {
            row.detail = Some(Value::Object(detail).to_string());
        }

        Ok(row)
    }
}

/// Copy `*_Localised` values down onto their base field, as the journal's
/// localised variants take precedence for display text.
pub fn merge_localised(raw: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = raw.clone();
    for (key, value) in raw {
        if let Some(base) = key.strip_suffix("_Localised") {
            merged.insert(base.to_string(), value.clone());
        }
    }
    merged
}
