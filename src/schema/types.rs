/// Column data type
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Boolean,
    /// ISO 8601 timestamp stored as text
    Timestamp,
    /// JSONB attribute bag, merge-patched on conflict
    Detail,
    /// JSONB payload, replaced wholesale on conflict
    Json,
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub not_null: bool,
    pub unique: bool,
}

impl Column {
    /// Create a nullable column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            not_null: false,
            unique: false,
        }
    }

    /// Create a NOT NULL column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            not_null: true,
            unique: false,
        }
    }

    /// Create a NOT NULL UNIQUE column
    pub const fn unique(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            not_null: true,
            unique: true,
        }
    }
}

/// Index definition
#[derive(Debug, Clone)]
pub struct Index {
    pub columns: &'static [&'static str],
}

impl Index {
    pub const fn on(columns: &'static [&'static str]) -> Self {
        Self { columns }
    }
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    /// Primary key columns, in order.
    pub primary_key: &'static [&'static str],
    /// Conflict target for insert-or-merge. Equals the primary key except
    /// where a store-assigned id is keyed by a unique natural column
    /// (faction and commodity merge on name).
    pub upsert_key: &'static [&'static str],
    pub without_rowid: bool,
    pub indexes: &'static [Index],
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The table's single attribute-bag column, if it has one.
    pub fn bag_column(&self) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| matches!(c.col_type, ColumnType::Detail | ColumnType::Json))
    }

    pub fn is_upsert_key(&self, name: &str) -> bool {
        self.upsert_key.contains(&name)
    }
}
