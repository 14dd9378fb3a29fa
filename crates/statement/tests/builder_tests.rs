// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! End-to-end tests for building statements from configs

use gdt_catalog::CatalogError;
use gdt_ir::JoinType;
use gdt_statement::{
    ConfigError, Endpoint, Location, ResolutionError, StatementError, load_and_build, parse,
};
use gdt_test_utils::{ConfigFixtures, MockCatalog, MockCatalogBuilder, StatementAssertions};
use serde_json::json;

fn standard() -> MockCatalog {
    MockCatalogBuilder::new().with_standard_schema().build()
}

#[test]
fn test_two_table_join() {
    let catalog = MockCatalogBuilder::new()
        .with_columns("t1", &["a"])
        .with_columns("t2", &["b"])
        .build();
    let config = parse(&json!({"statement_configs": {
        "selection": {"t1": ["a"], "t2": ["b"]},
        "joins": [{"t2": [["t2", "b"], ["t1", "a"]]}]
    }}))
    .unwrap();

    let stmt = config.build(&catalog).unwrap();
    assert_eq!(stmt.to_string(), "SELECT t1.a, t2.b FROM t1 JOIN t2 ON t2.b = t1.a");
}

#[test]
fn test_two_table_join_with_aliases() {
    let catalog = MockCatalogBuilder::new()
        .with_columns("t1", &["a"])
        .with_columns("t2", &["b"])
        .build();
    let config = parse(&json!({"statement_configs": {
        "selection": {"t1": ["a"], "t2": ["b"]},
        "joins": [{"t2": [["t2", "b"], ["t1", "a"]]}],
        "aliases": {"t1": "t1_label", "t2": "t2_label"}
    }}))
    .unwrap();

    let stmt = config.build(&catalog).unwrap();
    assert_eq!(
        stmt.to_string(),
        "SELECT t1_label.a, t2_label.b FROM t1 AS t1_label JOIN t2 AS t2_label ON t2_label.b = t1_label.a"
    );
    StatementAssertions::assert_never_references(&stmt, "t1");
    StatementAssertions::assert_never_references(&stmt, "t2");
}

#[test]
fn test_standard_fixtures() {
    let catalog = standard();

    let plain = parse(&ConfigFixtures::two_tables()).unwrap();
    assert_eq!(
        plain.build(&catalog).unwrap().to_string(),
        ConfigFixtures::two_tables_sql()
    );

    let aliased = parse(&ConfigFixtures::two_tables_aliased()).unwrap();
    assert_eq!(
        aliased.build(&catalog).unwrap().to_string(),
        ConfigFixtures::two_tables_aliased_sql()
    );
}

#[test]
fn test_missing_table() {
    let catalog = standard();
    let config = parse(&ConfigFixtures::unknown_table()).unwrap();

    let err = config.build(&catalog).unwrap_err();
    assert_eq!(
        err,
        StatementError::Resolution(ResolutionError::MissingTable {
            table: "t1".to_string(),
            location: Location::Selection,
        })
    );
    assert!(err.to_string().contains("t1"));
    assert!(!err.is_connectivity());
}

#[test]
fn test_missing_column_lists_available() {
    let catalog = MockCatalogBuilder::new().with_columns("t1", &["c2"]).build();
    let config = parse(&json!({"statement_configs": {
        "selection": {"t1": ["c1"]},
        "joins": []
    }}))
    .unwrap();

    let err = config.build(&catalog).unwrap_err();
    match &err {
        StatementError::Resolution(ResolutionError::MissingColumn {
            column, available, ..
        }) => {
            assert_eq!(column, "c1");
            assert_eq!(available, &vec!["c2".to_string()]);
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
    assert!(err.to_string().contains("[c2]"));
}

#[test]
fn test_missing_section_fails_before_schema_access() {
    let catalog = standard();

    let err = parse(&ConfigFixtures::missing_section()).unwrap_err();
    assert!(matches!(err, ConfigError::Malformed { ref path, .. } if path == "statement_configs"));
    assert_eq!(catalog.lookup_count(), 0);
}

#[test]
fn test_config_rules_checked_before_schema_access() {
    let catalog = standard();
    let mut config = parse(&ConfigFixtures::two_tables()).unwrap();
    config
        .aliases
        .insert("table_1".to_string(), "table_2".to_string());

    let err = config.build(&catalog).unwrap_err();
    assert!(matches!(err, StatementError::Config(ConfigError::AliasConflict { .. })));
    assert_eq!(catalog.lookup_count(), 0);
}

#[test]
fn test_connectivity_is_not_a_missing_table() {
    let catalog = MockCatalogBuilder::new()
        .with_standard_schema()
        .unreachable("could not reach host")
        .build();
    let config = parse(&ConfigFixtures::two_tables()).unwrap();

    let err = config.build(&catalog).unwrap_err();
    assert!(err.is_connectivity());
    assert_eq!(
        err,
        StatementError::Connectivity {
            table: "table_1".to_string(),
            source: CatalogError::ConnectionFailed("could not reach host".to_string()),
        }
    );
}

#[test]
fn test_driver_failure_on_one_table() {
    let catalog = MockCatalogBuilder::new()
        .with_standard_schema()
        .with_broken_table("table_2", "ODBC driver not found")
        .build();
    let config = parse(&ConfigFixtures::two_tables()).unwrap();

    let err = config.build(&catalog).unwrap_err();
    assert!(err.is_connectivity());
    assert_eq!(catalog.lookups(), vec!["table_1", "table_2"]);
}

#[test]
fn test_build_is_deterministic_and_uncached() {
    let catalog = standard();
    let config = parse(&ConfigFixtures::drillholes()).unwrap();

    let first = config.build(&catalog).unwrap();
    let second = config.build(&catalog).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());

    // every build re-resolves its tables
    assert_eq!(
        catalog.lookups(),
        vec!["collars", "surveys", "assays", "collars", "surveys", "assays"]
    );
}

#[test]
fn test_schema_drift_is_seen() {
    let mut catalog = standard();
    let config = parse(&ConfigFixtures::two_tables()).unwrap();
    assert!(config.build(&catalog).is_ok());

    catalog.remove_table("table_2");
    let err = config.build(&catalog).unwrap_err();
    assert!(matches!(
        err,
        StatementError::Resolution(ResolutionError::MissingTable { ref table, .. }) if table == "table_2"
    ));
}

#[test]
fn test_projection_follows_selection_order() {
    let catalog = standard();
    let forward = parse(&json!({"statement_configs": {
        "selection": {"table_1": ["table_1_col_2", "table_1_col_1"], "table_2": ["table_2_col_2"]},
        "joins": []
    }}))
    .unwrap();
    let reversed = parse(&json!({"statement_configs": {
        "selection": {"table_2": ["table_2_col_2"], "table_1": ["table_1_col_2", "table_1_col_1"]},
        "joins": []
    }}))
    .unwrap();

    StatementAssertions::assert_projection(
        &forward.build(&catalog).unwrap(),
        &["table_1.table_1_col_2", "table_1.table_1_col_1", "table_2.table_2_col_2"],
    );
    StatementAssertions::assert_projection(
        &reversed.build(&catalog).unwrap(),
        &["table_2.table_2_col_2", "table_1.table_1_col_2", "table_1.table_1_col_1"],
    );
}

#[test]
fn test_join_order_follows_list_order() {
    let catalog = standard();
    let mut config = parse(&ConfigFixtures::drillholes()).unwrap();

    let stmt = config.build(&catalog).unwrap();
    StatementAssertions::assert_join_chain(&stmt, &["surveys", "assays"]);
    StatementAssertions::assert_join_types(&stmt, &[JoinType::Inner, JoinType::Left]);

    config.joins.reverse();
    let swapped = config.build(&catalog).unwrap();
    StatementAssertions::assert_join_chain(&swapped, &["assays", "surveys"]);
    StatementAssertions::assert_join_types(&swapped, &[JoinType::Left, JoinType::Inner]);
    assert_ne!(stmt.to_string(), swapped.to_string());
}

#[test]
fn test_alias_applies_to_join_endpoints() {
    let catalog = standard();
    let stmt = parse(&ConfigFixtures::drillholes())
        .unwrap()
        .build(&catalog)
        .unwrap();

    assert_eq!(
        stmt.to_string(),
        "SELECT c.hole_id, c.easting, c.northing, surveys.depth, surveys.dip, \
         assays.from_m, assays.to_m, assays.au_ppm \
         FROM collars AS c JOIN surveys ON surveys.hole_id = c.hole_id \
         LEFT OUTER JOIN assays ON assays.hole_id = c.hole_id"
    );
    StatementAssertions::assert_never_references(&stmt, "collars");
}

#[test]
fn test_duplicate_join_target_is_kept() {
    let catalog = standard();
    let config = parse(&json!({"statement_configs": {
        "selection": {"collars": ["hole_id"]},
        "joins": [
            {"surveys": [["surveys", "hole_id"], ["collars", "hole_id"]]},
            {"surveys": [["surveys", "hole_id"], ["collars", "hole_id"]]}
        ]
    }}))
    .unwrap();

    let stmt = config.build(&catalog).unwrap();
    StatementAssertions::assert_join_chain(&stmt, &["surveys", "surveys"]);
}

#[test]
fn test_join_target_outside_selection() {
    let catalog = standard();
    let config = parse(&json!({"statement_configs": {
        "selection": {"collars": ["hole_id"], "assays": ["au_ppm"]},
        "joins": [
            {"surveys": [["surveys", "hole_id"], ["collars", "hole_id"]]},
            {"assays": [["assays", "hole_id"], ["surveys", "hole_id"]]}
        ]
    }}))
    .unwrap();

    let stmt = config.build(&catalog).unwrap();
    assert_eq!(
        stmt.to_string(),
        "SELECT collars.hole_id, assays.au_ppm FROM collars \
         JOIN surveys ON surveys.hole_id = collars.hole_id \
         JOIN assays ON assays.hole_id = surveys.hole_id"
    );
    assert_eq!(catalog.lookups(), vec!["collars", "assays", "surveys"]);
}

#[test]
fn test_endpoint_joined_later_is_rejected() {
    let catalog = standard();
    let config = parse(&json!({"statement_configs": {
        "selection": {"collars": ["hole_id"]},
        "joins": [
            {"assays": [["assays", "hole_id"], ["surveys", "hole_id"]]},
            {"surveys": [["surveys", "hole_id"], ["collars", "hole_id"]]}
        ]
    }}))
    .unwrap();

    let err = config.build(&catalog).unwrap_err();
    assert_eq!(
        err,
        StatementError::Resolution(ResolutionError::NotInStatement {
            table: "surveys".to_string(),
            location: Location::join(0, Endpoint::Right),
        })
    );
}

#[test]
fn test_missing_join_target() {
    let catalog = standard();
    let config = parse(&json!({"statement_configs": {
        "selection": {"collars": ["hole_id"]},
        "joins": [{"lithology": [["lithology", "hole_id"], ["collars", "hole_id"]]}]
    }}))
    .unwrap();

    let err = config.build(&catalog).unwrap_err();
    assert_eq!(
        err,
        StatementError::Resolution(ResolutionError::MissingTable {
            table: "lithology".to_string(),
            location: Location::join(0, Endpoint::Target),
        })
    );
}

#[test]
fn test_load_and_build_from_json_and_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = standard();

    let json_path = ConfigFixtures::write(dir.path(), "stmt.json", &ConfigFixtures::two_tables())
        .unwrap();
    let stmt = load_and_build(&json_path, &catalog).unwrap();
    assert_eq!(stmt.to_string(), ConfigFixtures::two_tables_sql());

    let yaml_path = dir.path().join("stmt.yaml");
    std::fs::write(
        &yaml_path,
        "statement_configs:\n\
         \x20 selection:\n\
         \x20   table_1: [table_1_col_1, table_1_col_2]\n\
         \x20   table_2: [table_2_col_1, table_2_col_2]\n\
         \x20 joins:\n\
         \x20   - table_2: [[table_2, table_2_col_1], [table_1, table_1_col_1]]\n",
    )
    .unwrap();
    let stmt = load_and_build(&yaml_path, &catalog).unwrap();
    assert_eq!(stmt.to_string(), ConfigFixtures::two_tables_sql());
}

#[test]
fn test_load_and_build_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = standard();

    let missing = load_and_build(dir.path().join("absent.json"), &catalog).unwrap_err();
    assert!(missing.to_string().contains("malformed or missing : Should"));

    let bad_path =
        ConfigFixtures::write(dir.path(), "bad.json", &ConfigFixtures::missing_section()).unwrap();
    let bad = load_and_build(&bad_path, &catalog).unwrap_err();
    assert!(bad.to_string().contains("malformed or missing : Should"));

    let garbled = dir.path().join("garbled.json");
    std::fs::write(&garbled, "{\"statement_configs\": ").unwrap();
    assert!(matches!(
        load_and_build(&garbled, &catalog),
        Err(StatementError::Config(ConfigError::Syntax { format: "JSON", .. }))
    ));

    let toml = dir.path().join("stmt.toml");
    std::fs::write(&toml, "").unwrap();
    assert!(matches!(
        load_and_build(&toml, &catalog),
        Err(StatementError::Config(ConfigError::UnsupportedFormat { .. }))
    ));

    assert_eq!(catalog.lookup_count(), 0);
}
