//! Table schema definitions for all journal entity tables

use super::types::*;

// =============================================================================
// Externally keyed entities (identifiers supplied by the journal)
// =============================================================================

pub static SYSTEMS: TableSchema = TableSchema {
    name: "system_tbl",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::unique("name", ColumnType::Text),
        Column::new("posx", ColumnType::Real),
        Column::new("posy", ColumnType::Real),
        Column::new("posz", ColumnType::Real),
        Column::new("startype", ColumnType::Text),
        Column::new("systemfaction_id", ColumnType::Integer),
        Column::new("allegiance", ColumnType::Text),
        Column::new("economy", ColumnType::Text),
        Column::new("economysecond", ColumnType::Text),
        Column::new("government", ColumnType::Text),
        Column::new("security", ColumnType::Text),
        Column::new("population", ColumnType::Integer),
        Column::required("detail", ColumnType::Detail),
        Column::new("lastarrived_at", ColumnType::Timestamp),
        Column::new("updated_at", ColumnType::Timestamp),
    ],
    primary_key: &["id"],
    upsert_key: &["id"],
    without_rowid: true,
    indexes: &[],
};

pub static BODIES: TableSchema = TableSchema {
    name: "body_tbl",
    columns: &[
        Column::required("system_id", ColumnType::Integer),
        Column::required("body_id", ColumnType::Integer),
        Column::new("name", ColumnType::Text),
        Column::new("type", ColumnType::Text),
        Column::new("wasdiscovered", ColumnType::Boolean),
        Column::new("wasmapped", ColumnType::Boolean),
        Column::required("detail", ColumnType::Detail),
        Column::new("updated_at", ColumnType::Timestamp),
    ],
    primary_key: &["system_id", "body_id"],
    upsert_key: &["system_id", "body_id"],
    without_rowid: true,
    indexes: &[],
};

pub static MARKETS: TableSchema = TableSchema {
    name: "market_tbl",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("system_id", ColumnType::Integer),
        Column::new("body_id", ColumnType::Integer),
        Column::new("type", ColumnType::Text),
        Column::new("government", ColumnType::Text),
        Column::new("economy", ColumnType::Text),
        Column::new("distfromstarls", ColumnType::Real),
        Column::new("pads", ColumnType::Integer),
        Column::new("padm", ColumnType::Integer),
        Column::new("padl", ColumnType::Integer),
        Column::new("stationfaction_id", ColumnType::Integer),
        Column::required("detail", ColumnType::Detail),
        Column::new("updated_at", ColumnType::Timestamp),
    ],
    primary_key: &["id"],
    upsert_key: &["id"],
    without_rowid: false,
    indexes: &[],
};

pub static MARKET_PRICES: TableSchema = TableSchema {
    name: "market_price_tbl",
    columns: &[
        Column::required("market_id", ColumnType::Integer),
        Column::required("commodity_id", ColumnType::Integer),
        Column::new("buyprice", ColumnType::Integer),
        Column::new("sellprice", ColumnType::Integer),
        Column::new("stockbracket", ColumnType::Integer),
        Column::new("demandbracket", ColumnType::Integer),
        Column::new("stock", ColumnType::Integer),
        Column::new("demand", ColumnType::Integer),
        Column::new("updated_at", ColumnType::Timestamp),
    ],
    primary_key: &["market_id", "commodity_id"],
    upsert_key: &["market_id", "commodity_id"],
    without_rowid: true,
    indexes: &[],
};

// =============================================================================
// Store-assigned entities (merged on their natural key)
// =============================================================================

pub static FACTIONS: TableSchema = TableSchema {
    name: "faction_tbl",
    columns: &[
        Column::new("id", ColumnType::Integer),
        Column::unique("name", ColumnType::Text),
        Column::new("allegiance", ColumnType::Text),
        Column::new("government", ColumnType::Text),
        Column::new("myreputation", ColumnType::Real),
        Column::new("updated_at", ColumnType::Timestamp),
    ],
    primary_key: &["id"],
    upsert_key: &["name"],
    without_rowid: false,
    indexes: &[Index::on(&["name"])],
};

pub static SYSTEM_FACTIONS: TableSchema = TableSchema {
    name: "system_faction_tbl",
    columns: &[
        Column::required("faction_id", ColumnType::Integer),
        Column::required("system_id", ColumnType::Integer),
        Column::required("state", ColumnType::Json),
        Column::new("influence", ColumnType::Real),
        Column::new("happiness", ColumnType::Text),
        Column::new("updated_at", ColumnType::Timestamp),
    ],
    primary_key: &["faction_id", "system_id"],
    upsert_key: &["faction_id", "system_id"],
    without_rowid: true,
    indexes: &[],
};

pub static COMMODITIES: TableSchema = TableSchema {
    name: "commodity_tbl",
    columns: &[
        Column::new("id", ColumnType::Integer),
        Column::unique("name", ColumnType::Text),
        Column::new("category", ColumnType::Text),
        Column::new("israre", ColumnType::Boolean),
    ],
    primary_key: &["id"],
    upsert_key: &["name"],
    without_rowid: false,
    indexes: &[],
};

pub static STATISTICS: TableSchema = TableSchema {
    name: "statistics_tbl",
    columns: &[
        Column::new("id", ColumnType::Integer),
        Column::unique("updated_at", ColumnType::Timestamp),
        Column::required("detail", ColumnType::Detail),
    ],
    primary_key: &["id"],
    upsert_key: &["updated_at"],
    without_rowid: false,
    indexes: &[],
};

/// All tables, parents before the tables that reference them.
pub static ALL_TABLES: &[&TableSchema] = &[
    &SYSTEMS,
    &BODIES,
    &FACTIONS,
    &SYSTEM_FACTIONS,
    &MARKETS,
    &COMMODITIES,
    &MARKET_PRICES,
    &STATISTICS,
];

pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
