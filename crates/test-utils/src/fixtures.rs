// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures: statement config documents and the SQL they build

use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};

/// Sample statement configs for testing
pub struct ConfigFixtures;

impl ConfigFixtures {
    // ===== Two-table configs over the standard schema =====

    /// `table_1` joined to `table_2`, two columns each
    pub fn two_tables() -> Value {
        json!({
            "statement_configs": {
                "selection": {
                    "table_1": ["table_1_col_1", "table_1_col_2"],
                    "table_2": ["table_2_col_1", "table_2_col_2"]
                },
                "joins": [
                    {"table_2": [["table_2", "table_2_col_1"], ["table_1", "table_1_col_1"]]}
                ],
                "aliases": {}
            }
        })
    }

    /// SQL built from [`two_tables`](Self::two_tables)
    pub const fn two_tables_sql() -> &'static str {
        "SELECT table_1.table_1_col_1, table_1.table_1_col_2, table_2.table_2_col_1, \
         table_2.table_2_col_2 FROM table_1 JOIN table_2 ON table_2.table_2_col_1 = table_1.table_1_col_1"
    }

    /// [`two_tables`](Self::two_tables) with both tables aliased
    pub fn two_tables_aliased() -> Value {
        let mut config = Self::two_tables();
        config["statement_configs"]["aliases"] =
            json!({"table_1": "table_1_label", "table_2": "table_2_label"});
        config
    }

    /// SQL built from [`two_tables_aliased`](Self::two_tables_aliased)
    pub const fn two_tables_aliased_sql() -> &'static str {
        "SELECT table_1_label.table_1_col_1, table_1_label.table_1_col_2, \
         table_2_label.table_2_col_1, table_2_label.table_2_col_2 \
         FROM table_1 AS table_1_label JOIN table_2 AS table_2_label \
         ON table_2_label.table_2_col_1 = table_1_label.table_1_col_1"
    }

    // ===== Drillhole configs =====

    /// Collars with their surveys (inner) and assays (left outer)
    pub fn drillholes() -> Value {
        json!({
            "statement_configs": {
                "selection": {
                    "collars": ["hole_id", "easting", "northing"],
                    "surveys": ["depth", "dip"],
                    "assays": ["from_m", "to_m", "au_ppm"]
                },
                "joins": [
                    {"surveys": [["surveys", "hole_id"], ["collars", "hole_id"]]},
                    {"assays": {"on": [["assays", "hole_id"], ["collars", "hole_id"]], "how": "left"}}
                ],
                "aliases": {"collars": "c"}
            }
        })
    }

    // ===== Broken configs =====

    /// Selection sits at the top level instead of under `statement_configs`
    pub fn missing_section() -> Value {
        json!({
            "selection": {"table_1": ["table_1_col_1"]},
            "joins": []
        })
    }

    /// Selects a table the standard schema lacks
    pub fn unknown_table() -> Value {
        json!({
            "statement_configs": {
                "selection": {"t1": ["c1"]},
                "joins": [],
                "aliases": {}
            }
        })
    }

    /// Write `config` as pretty JSON into `dir/name`
    pub fn write(dir: &Path, name: &str, config: &Value) -> io::Result<PathBuf> {
        let path = dir.join(name);
        let text = serde_json::to_string_pretty(config)?;
        std::fs::write(&path, text)?;
        Ok(path)
    }
}
