// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::panic)]

use std::path::PathBuf;

use hydronet_core::{
    ConfigError, EdgeOptions, Model, NetworkError, NodeSpec, NodeTable, NodeType, Point,
    TableRole,
};
use hydronet_io::{
    load_model, read_model, save_model, write_model, IoError, Manifest, MemoryStore, TableStore,
};
use hydronet_schema::{tables, Columns, SchemaError, Table, Timestamp, Value};

fn model() -> Model {
    let mut model = Model::new(
        Timestamp::from_ymd(2020, 1, 1).unwrap(),
        Timestamp::from_ymd(2021, 1, 1).unwrap(),
    )
    .unwrap();
    let basin = model
        .add_node(
            NodeType::Basin,
            NodeSpec::new(1, Point::new(0.0, 0.0)).with_name("upper"),
            vec![
                NodeTable::new(
                    TableRole::Profile,
                    Columns::new().col("area", [0.01, 1000.0]).col("level", [0.0, 1.0]),
                ),
                NodeTable::new(TableRole::State, Columns::new().scalar("level", 0.5)),
            ],
        )
        .unwrap();
    let resistance = model
        .add_node(
            NodeType::LinearResistance,
            NodeSpec::new(2, Point::new(1.0, 0.0)),
            vec![NodeTable::new(
                TableRole::Static,
                Columns::new().scalar("resistance", 5e3),
            )],
        )
        .unwrap();
    let boundary = model
        .add_node(
            NodeType::LevelBoundary,
            NodeSpec::new(3, Point::new(2.0, 0.5)),
            vec![NodeTable::new(
                TableRole::Time,
                Columns::new()
                    .col(
                        "time",
                        [
                            Timestamp::from_ymd(2020, 1, 1).unwrap(),
                            Timestamp::from_ymd(2020, 6, 1).unwrap(),
                        ],
                    )
                    .col("level", [1.0, 1.5]),
            )],
        )
        .unwrap();
    model
        .add_edge(
            basin,
            resistance,
            EdgeOptions::new()
                .name("outflow")
                .subnetwork_id(7)
                .attribute("reach", Value::from("river")),
        )
        .unwrap();
    model
        .add_edge(resistance, boundary, EdgeOptions::new())
        .unwrap();
    model
}

#[test]
fn files_round_trip_with_identical_content_hash() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model").join("hydronet.toml");
    let mut original = model();
    original.config.input_dir = PathBuf::from("input");

    write_model(&original, &path).unwrap();
    for file in [
        "input/node.json",
        "input/edge.json",
        "input/basin_profile.json",
        "input/basin_state.json",
        "input/linear_resistance_static.json",
        "input/level_boundary_time.json",
    ] {
        assert!(dir.path().join("model").join(file).is_file(), "{file}");
    }

    let back = read_model(&path).unwrap();
    assert_eq!(back.config, original.config);
    assert_eq!(
        back.graph().content_hash().unwrap(),
        original.graph().content_hash().unwrap()
    );
    let edge = &back.graph().edges().records()[0];
    assert_eq!(edge.name, "outflow");
    assert_eq!(edge.subnetwork_id, Some(7));
    assert_eq!(edge.attributes["reach"], Value::from("river"));
}

#[test]
fn edge_attributes_keep_their_kinds() {
    let mut model = model();
    let pump = model
        .add_node(
            NodeType::Pump,
            NodeSpec::new(4, Point::new(0.0, 1.0)),
            vec![NodeTable::new(
                TableRole::Static,
                Columns::new().scalar("flow_rate", 1.0),
            )],
        )
        .unwrap();
    let basin = model.node(NodeType::Basin, 1).unwrap();
    let boundary = model.node(NodeType::LevelBoundary, 3).unwrap();
    model
        .add_edge(
            basin,
            pump,
            EdgeOptions::new()
                .attribute("lanes", 2_i64)
                .attribute("slope", 1.0)
                .attribute("navigable", true),
        )
        .unwrap();
    model.add_edge(pump, boundary, EdgeOptions::new()).unwrap();

    let since = Timestamp::from_ymd(2020, 3, 1).unwrap();
    let err = model
        .add_edge(basin, boundary, EdgeOptions::new().attribute("since", since))
        .unwrap_err();
    assert!(matches!(err, NetworkError::UnsupportedAttribute { .. }));

    let store = MemoryStore::new();
    save_model(&store, "hydronet.toml", &model).unwrap();
    let back = load_model(&store, "hydronet.toml").unwrap();
    for (before, after) in model
        .graph()
        .edges()
        .records()
        .iter()
        .zip(back.graph().edges().records())
    {
        assert_eq!(after.attributes, before.attributes, "edge #{}", before.edge_id);
    }
    let attributes = &back.graph().edges().records()[2].attributes;
    assert_eq!(attributes["lanes"], Value::Int(2));
    assert_eq!(attributes["slope"], Value::Float(1.0));
    assert_eq!(attributes["navigable"], Value::Bool(true));
}

#[test]
fn non_finite_floats_never_reach_the_files() {
    let mut model = model();
    let err = model
        .add_node(
            NodeType::LinearResistance,
            NodeSpec::new(5, Point::new(1.0, 1.0)),
            vec![NodeTable::new(
                TableRole::Static,
                Columns::new().scalar("resistance", f64::NAN),
            )],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        NetworkError::Schema(SchemaError::NullValue { ref column, .. }) if column == "resistance"
    ));

    let mut table = model
        .graph()
        .container(NodeType::LinearResistance)
        .and_then(|c| c.table(TableRole::Static))
        .unwrap()
        .clone();
    table.set_column("max_flow_rate", Value::Float(f64::NAN)).unwrap();
    model
        .replace_table(NodeType::LinearResistance, TableRole::Static, table)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hydronet.toml");
    write_model(&model, &path).unwrap();
    let back = read_model(&path).unwrap();
    let row = &back
        .graph()
        .container(NodeType::LinearResistance)
        .and_then(|c| c.table(TableRole::Static))
        .unwrap()
        .rows()[0];
    assert_eq!(row["max_flow_rate"], Value::Null);
    assert_eq!(row["resistance"], Value::Float(5e3));
}

#[test]
fn allocators_continue_after_reading() {
    let store = MemoryStore::new();
    save_model(&store, "hydronet.toml", &model()).unwrap();
    let mut back = load_model(&store, "hydronet.toml").unwrap();

    let terminal = back
        .add_node(NodeType::Terminal, NodeSpec::at(Point::new(3.0, 0.0)), vec![])
        .unwrap();
    assert_eq!(terminal.node_id.0, 4);
    let pump = back
        .add_node(NodeType::Pump, NodeSpec::at(Point::new(0.0, 1.0)), vec![])
        .unwrap();
    let basin = back.node(NodeType::Basin, 1).unwrap();
    let edge = back.add_edge(basin, pump, EdgeOptions::new()).unwrap();
    assert_eq!(edge.edge_id.0, 3);
}

#[test]
fn emptied_tables_are_removed_on_rewrite() {
    let store = MemoryStore::new();
    let mut model = model();
    save_model(&store, "hydronet.toml", &model).unwrap();
    assert!(store.contains_key("basin_state.json"));

    model
        .replace_table(
            NodeType::Basin,
            TableRole::State,
            Table::new(&tables::BASIN_STATE),
        )
        .unwrap();
    save_model(&store, "hydronet.toml", &model).unwrap();
    assert!(!store.contains_key("basin_state.json"));
    assert!(store.contains_key("basin_profile.json"));

    let back = load_model(&store, "hydronet.toml").unwrap();
    assert!(back
        .graph()
        .tables()
        .all(|(_, role, _)| role != TableRole::State));
}

#[test]
fn invalid_model_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("hydronet.toml");
    let mut model = model();
    model
        .add_node(NodeType::Pump, NodeSpec::new(9, Point::new(5.0, 5.0)), vec![])
        .unwrap();

    let err = write_model(&model, &path).unwrap_err();
    assert!(matches!(err, IoError::Network(NetworkError::Validation(_))));
    assert!(!dir.path().join("out").exists());

    let store = MemoryStore::new();
    assert!(save_model(&store, "hydronet.toml", &model).is_err());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn manifest_path_must_be_toml() {
    let dir = tempfile::tempdir().unwrap();
    let err = write_model(&model(), &dir.path().join("model.json")).unwrap_err();
    assert!(matches!(err, IoError::ManifestPath(_)));
}

#[test]
fn storage_failures_surface() {
    let store = MemoryStore::new();
    store.set_fail_on_save(true);
    let err = save_model(&store, "hydronet.toml", &model()).unwrap_err();
    assert!(matches!(err, IoError::Store(_)));
    assert!(store.keys().is_empty());
}

#[test]
fn schema_errors_in_tables_are_reported() {
    let store = MemoryStore::new();
    save_model(&store, "hydronet.toml", &model()).unwrap();
    store
        .save_raw(
            "basin_profile.json",
            br#"[{"node_id": 1, "area": "wide", "level": 0.0}]"#,
        )
        .unwrap();
    let err = load_model(&store, "hydronet.toml").unwrap_err();
    assert!(matches!(err, IoError::Schema(_)));
}

#[test]
fn dangling_edges_fail_on_read() {
    let store = MemoryStore::new();
    save_model(&store, "hydronet.toml", &model()).unwrap();
    store
        .save_raw(
            "edge.json",
            br#"[{"edge_id": 1, "from_node_id": 1, "to_node_id": 2, "geometry": "LINESTRING (0 0, 1 0)"},
                {"edge_id": 2, "from_node_id": 2, "to_node_id": 42, "geometry": "LINESTRING (1 0, 5 5)"}]"#,
        )
        .unwrap();
    let err = load_model(&store, "hydronet.toml").unwrap_err();
    assert!(matches!(err, IoError::Network(NetworkError::Validation(_))));
}

#[test]
fn input_dir_cannot_leave_the_model_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model").join("hydronet.toml");
    let mut escaping = model();
    escaping.config.input_dir = PathBuf::from("../shared");
    let err = write_model(&escaping, &path).unwrap_err();
    assert!(matches!(
        err,
        IoError::Config(ConfigError::OutsideModelDir { field: "input_dir", .. })
    ));
    assert!(!dir.path().join("shared").exists());

    let store = MemoryStore::new();
    save_model(&store, "hydronet.toml", &model()).unwrap();
    let manifest = Manifest::new(escaping.config.clone()).to_toml().unwrap();
    store.save_raw("hydronet.toml", manifest.as_bytes()).unwrap();
    let err = load_model(&store, "hydronet.toml").unwrap_err();
    assert!(matches!(err, IoError::Config(_)));
}
