use crate::schema::TableSchema;

/// How a raw journal field lands in its target table.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Scalar copy into a single column
    Column,
    /// 3-element numeric array decomposed into three columns
    Position(&'static [&'static str; 3]),
    /// Named members of a sub-object copied into columns
    Flatten(&'static [(&'static str, &'static str)]),
    /// Cross-reference resolved by natural key at write time. The raw value
    /// is either a plain string or an object whose "Name" member is the key.
    Reference {
        table: &'static str,
        natural_key: &'static str,
    },
}

/// Mapping from one raw field name to its target column(s).
#[derive(Debug, Clone)]
pub struct FieldMap {
    pub raw: &'static str,
    /// Target column. Ignored for Position/Flatten, which carry their own.
    pub column: &'static str,
    pub kind: FieldKind,
}

impl FieldMap {
    pub const fn map(raw: &'static str, column: &'static str) -> Self {
        Self {
            raw,
            column,
            kind: FieldKind::Column,
        }
    }

    pub const fn position(raw: &'static str, columns: &'static [&'static str; 3]) -> Self {
        Self {
            raw,
            column: "",
            kind: FieldKind::Position(columns),
        }
    }

    pub const fn flatten(raw: &'static str, fields: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            raw,
            column: "",
            kind: FieldKind::Flatten(fields),
        }
    }

    pub const fn reference(
        raw: &'static str,
        column: &'static str,
        table: &'static str,
        natural_key: &'static str,
    ) -> Self {
        Self {
            raw,
            column,
            kind: FieldKind::Reference { table, natural_key },
        }
    }
}

/// Declarative projection from raw event fields to one entity table.
///
/// `fields` is processed in order; when two maps target the same column the
/// later entry wins (localised variants are listed after their base field).
/// `detail_fields` are folded into the table's attribute bag and are disjoint
/// from the column mappings.
#[derive(Debug, Clone)]
pub struct Projection {
    pub table: &'static TableSchema,
    pub fields: &'static [FieldMap],
    pub detail_fields: &'static [&'static str],
}
