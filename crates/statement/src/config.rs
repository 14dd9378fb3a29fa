// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement config parsing
//!
//! Turns a config document into the three structures the builder works from:
//!
//! ```json
//! {
//!   "statement_configs": {
//!     "selection": { "collars": ["hole_id", "easting"], "assays": ["au_ppm"] },
//!     "joins": [
//!       { "assays": [["assays", "hole_id"], ["collars", "hole_id"]] },
//!       { "surveys": { "on": [["surveys", "hole_id"], ["collars", "hole_id"]], "how": "left" } }
//!     ],
//!     "aliases": { "collars": "c" }
//!   }
//! }
//! ```
//!
//! A join written as a bare endpoint pair is an inner join. The object form
//! takes an explicit `how` of `inner`, `left` (or `outer`) or `full`.
//!
//! Parsing is a pure function of the document and never touches a schema.
//! Key order is preserved throughout, so projection order follows the file.

use std::collections::HashMap;
use std::path::Path;

use gdt_ir::JoinType;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};

/// Top-level key holding the statement sections
pub const CONFIG_KEY: &str = "statement_configs";

/// Table name → ordered column names
pub type Selection = IndexMap<String, Vec<String>>;

/// Table name → alias
pub type AliasMap = IndexMap<String, String>;

/// One side of a join condition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnEndpoint {
    pub table: String,
    pub column: String,
}

impl ColumnEndpoint {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// One join entry: attach `target` where `left = right`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub target: String,
    pub left: ColumnEndpoint,
    pub right: ColumnEndpoint,
    pub join_type: JoinType,
}

impl JoinSpec {
    pub fn new(target: impl Into<String>, left: ColumnEndpoint, right: ColumnEndpoint) -> Self {
        Self {
            target: target.into(),
            left,
            right,
            join_type: JoinType::Inner,
        }
    }

    pub fn with_join_type(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }
}

/// Parsed `statement_configs` section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementConfig {
    pub selection: Selection,
    pub joins: Vec<JoinSpec>,
    pub aliases: AliasMap,
}

impl StatementConfig {
    pub fn new(selection: Selection, joins: Vec<JoinSpec>, aliases: AliasMap) -> Self {
        Self {
            selection,
            joins,
            aliases,
        }
    }

    /// Load a config file, choosing JSON or YAML by extension
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let document = read_document(path.as_ref())?;
        parse(&document)
    }

    /// Check the cross-section rules that need no schema
    pub fn validate(&self) -> ConfigResult<()> {
        validate(&self.selection, &self.joins, &self.aliases)
    }

    /// Serialize back into document form (the whole `{"statement_configs": ...}` object)
    pub fn to_value(&self) -> Value {
        let selection: Map<String, Value> = self
            .selection
            .iter()
            .map(|(table, columns)| {
                let columns = columns.iter().cloned().map(Value::String).collect();
                (table.clone(), Value::Array(columns))
            })
            .collect();

        let joins: Vec<Value> = self.joins.iter().map(join_to_value).collect();

        let aliases: Map<String, Value> = self
            .aliases
            .iter()
            .map(|(table, alias)| (table.clone(), Value::String(alias.clone())))
            .collect();

        let mut section = Map::new();
        section.insert("selection".to_string(), Value::Object(selection));
        section.insert("joins".to_string(), Value::Array(joins));
        section.insert("aliases".to_string(), Value::Object(aliases));

        let mut root = Map::new();
        root.insert(CONFIG_KEY.to_string(), Value::Object(section));
        Value::Object(root)
    }
}

fn join_to_value(join: &JoinSpec) -> Value {
    let endpoint = |e: &ColumnEndpoint| {
        Value::Array(vec![
            Value::String(e.table.clone()),
            Value::String(e.column.clone()),
        ])
    };
    let on = Value::Array(vec![endpoint(&join.left), endpoint(&join.right)]);

    let condition = match join.join_type {
        JoinType::Inner => on,
        other => {
            let mut fields = Map::new();
            fields.insert("on".to_string(), on);
            fields.insert("how".to_string(), Value::String(other.name().to_string()));
            Value::Object(fields)
        }
    };

    let mut entry = Map::new();
    entry.insert(join.target.clone(), condition);
    Value::Object(entry)
}

/// Read a JSON (`.json`) or YAML (`.yaml`, `.yml`) document
pub fn read_document(path: &Path) -> ConfigResult<Value> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
        path: display.clone(),
        message: e.to_string(),
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| ConfigError::Syntax {
            path: display,
            format: "JSON",
            message: e.to_string(),
        }),
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).map_err(|e| ConfigError::Syntax {
                path: display,
                format: "YAML",
                message: e.to_string(),
            })
        }
        _ => Err(ConfigError::UnsupportedFormat { path: display }),
    }
}

fn malformed(path: impl Into<String>, expected: &str) -> ConfigError {
    ConfigError::Malformed {
        path: path.into(),
        expected: expected.to_string(),
    }
}

/// Parse a config document into its selection, joins and aliases
pub fn parse(raw: &Value) -> ConfigResult<StatementConfig> {
    let section = raw
        .get(CONFIG_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            malformed(
                CONFIG_KEY,
                "an object with 'selection', 'joins' and optional 'aliases'",
            )
        })?;

    let selection = parse_selection(section.get("selection"))?;
    let joins = parse_joins(section.get("joins"))?;
    let aliases = parse_aliases(section.get("aliases"))?;

    let config = StatementConfig::new(selection, joins, aliases);
    config.validate()?;
    Ok(config)
}

fn parse_selection(value: Option<&Value>) -> ConfigResult<Selection> {
    const PATH: &str = "statement_configs.selection";
    let tables = value
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(PATH, "a mapping of table names to column lists"))?;

    let mut selection = Selection::new();
    for (table, columns) in tables {
        let path = format!("{PATH}.{table}");
        let columns = columns
            .as_array()
            .ok_or_else(|| malformed(path.as_str(), "a list of column names"))?;

        let mut names = Vec::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let name = column
                .as_str()
                .ok_or_else(|| malformed(format!("{path}[{i}]"), "a column name"))?;
            names.push(name.to_string());
        }
        selection.insert(table.clone(), names);
    }
    Ok(selection)
}

fn parse_joins(value: Option<&Value>) -> ConfigResult<Vec<JoinSpec>> {
    const PATH: &str = "statement_configs.joins";
    let entries = value
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(PATH, "a list of join entries"))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_join(entry, &format!("{PATH}[{index}]")))
        .collect()
}

fn parse_join(entry: &Value, path: &str) -> ConfigResult<JoinSpec> {
    let single = entry.as_object().filter(|o| o.len() == 1);
    let Some((target, condition)) = single.and_then(|o| o.iter().next()) else {
        return Err(malformed(path, "an object with exactly one target table key"));
    };
    let path = format!("{path}.{target}");

    let (on, on_path, join_type) = match condition {
        Value::Array(_) => (condition, path.clone(), JoinType::Inner),
        Value::Object(fields) => {
            if let Some(unknown) = fields.keys().find(|k| *k != "on" && *k != "how") {
                return Err(malformed(
                    format!("{path}.{unknown}"),
                    "only the keys 'on' and 'how'",
                ));
            }
            let on_path = format!("{path}.on");
            let on = fields
                .get("on")
                .ok_or_else(|| malformed(on_path.as_str(), "a pair of [table, column] endpoints"))?;
            let join_type = match fields.get("how") {
                None | Some(Value::Null) => JoinType::Inner,
                Some(how) => how
                    .as_str()
                    .and_then(|s| s.parse::<JoinType>().ok())
                    .ok_or_else(|| {
                        malformed(format!("{path}.how"), "one of inner, left, outer, full")
                    })?,
            };
            (on, on_path, join_type)
        }
        _ => {
            return Err(malformed(
                path,
                "a pair of [table, column] endpoints or an object with 'on' and 'how'",
            ));
        }
    };

    let pair = on
        .as_array()
        .filter(|a| a.len() == 2)
        .ok_or_else(|| malformed(on_path.as_str(), "a pair of [table, column] endpoints"))?;
    let left = parse_endpoint(&pair[0], &format!("{on_path}[0]"))?;
    let right = parse_endpoint(&pair[1], &format!("{on_path}[1]"))?;

    Ok(JoinSpec::new(target.clone(), left, right).with_join_type(join_type))
}

fn parse_endpoint(value: &Value, path: &str) -> ConfigResult<ColumnEndpoint> {
    match value.as_array().map(Vec::as_slice) {
        Some([Value::String(table), Value::String(column)]) => {
            Ok(ColumnEndpoint::new(table.clone(), column.clone()))
        }
        _ => Err(malformed(path, "a [table, column] pair of strings")),
    }
}

fn parse_aliases(value: Option<&Value>) -> ConfigResult<AliasMap> {
    const PATH: &str = "statement_configs.aliases";
    let entries = match value {
        None | Some(Value::Null) => return Ok(AliasMap::new()),
        Some(v) => v
            .as_object()
            .ok_or_else(|| malformed(PATH, "a mapping of table names to aliases"))?,
    };

    let mut aliases = AliasMap::new();
    for (table, alias) in entries {
        let alias = alias
            .as_str()
            .ok_or_else(|| malformed(format!("{PATH}.{table}"), "an alias name"))?;
        aliases.insert(table.clone(), alias.to_string());
    }
    Ok(aliases)
}

/// Rules spanning sections: at least one projected column, and aliases that
/// can't be confused with each other or with a table name
pub fn validate(selection: &Selection, joins: &[JoinSpec], aliases: &AliasMap) -> ConfigResult<()> {
    if selection.values().all(Vec::is_empty) {
        return Err(ConfigError::EmptyProjection);
    }

    let mut referenced: Vec<&str> = selection.keys().map(String::as_str).collect();
    for join in joins {
        referenced.extend([
            join.target.as_str(),
            join.left.table.as_str(),
            join.right.table.as_str(),
        ]);
    }

    let mut owners: HashMap<&str, &str> = HashMap::new();
    for (table, alias) in aliases {
        if let Some(first) = owners.insert(alias.as_str(), table.as_str()) {
            return Err(ConfigError::DuplicateAlias {
                alias: alias.clone(),
                first: first.to_string(),
                second: table.clone(),
            });
        }
        if referenced.iter().any(|r| *r == alias.as_str() && *r != table.as_str()) {
            return Err(ConfigError::AliasConflict {
                alias: alias.clone(),
                table: table.clone(),
            });
        }
    }
    Ok(())
}
