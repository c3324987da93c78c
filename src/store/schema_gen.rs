use crate::schema::{ColumnType, TableSchema};

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let inline_pk = schema.primary_key.len() == 1;
    let mut columns = Vec::new();

    for col in schema.columns {
        let sql_type = match col.col_type {
            ColumnType::Integer | ColumnType::Boolean => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text | ColumnType::Timestamp => "TEXT",
            ColumnType::Detail | ColumnType::Json => "BLOB",
        };

        let mut def = format!("    {} {}", col.name, sql_type);
        if inline_pk && schema.primary_key[0] == col.name {
            def.push_str(" PRIMARY KEY");
        }
        if matches!(col.col_type, ColumnType::Detail | ColumnType::Json) {
            def.push_str(" NOT NULL DEFAULT (jsonb('{}'))");
        } else {
            if col.not_null {
                def.push_str(" NOT NULL");
            }
            if col.unique {
                def.push_str(" UNIQUE");
            }
        }
        columns.push(def);
    }

    if !inline_pk {
        columns.push(format!(
            "    PRIMARY KEY ({})",
            schema.primary_key.join(", ")
        ));
    }

    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        schema.name,
        columns.join(",\n")
    );
    if schema.without_rowid {
        sql.push_str(" WITHOUT ROWID");
    }

    sql
}

/// Generate CREATE INDEX statements for a table schema
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .indexes
        .iter()
        .map(|idx| {
            format!(
                "CREATE INDEX IF NOT EXISTS {}_{}_idx ON {}({})",
                schema.name,
                idx.columns.join("_"),
                schema.name,
                idx.columns.join(", ")
            )
        })
        .collect()
}
