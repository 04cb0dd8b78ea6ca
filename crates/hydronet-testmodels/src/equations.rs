// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Models around a single connector node type.
use anyhow::Result;
use hydronet_core::{EdgeOptions, Model, NodeSpec, NodeTable, NodeType, Point, TableRole};
use hydronet_schema::{Columns, Timestamp};

use crate::{basin_tables, empty_model};

/// Basin draining through a rating curve into a terminal.
pub fn trivial_model() -> Result<Model> {
    let mut model = empty_model("2020-01-01", "2021-01-01")?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(6, Point::new(400.0, 200.0)),
        basin_tables(0.045),
    )?;
    let curve = model.add_node(
        NodeType::TabulatedRatingCurve,
        NodeSpec::new(0, Point::new(450.0, 200.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .col("level", [0.0, 1.0])
                .col("flow_rate", [0.0, 10.0 / 86400.0]),
        )],
    )?;
    let terminal = model.add_node(
        NodeType::Terminal,
        NodeSpec::new(2147483647, Point::new(500.0, 200.0)),
        vec![],
    )?;
    model.add_edge(basin, curve, EdgeOptions::new().edge_id(100))?;
    model.add_edge(curve, terminal, EdgeOptions::new())?;
    Ok(model)
}

/// Basin against a level boundary through a linear resistance.
pub fn linear_resistance_model() -> Result<Model> {
    let mut model = empty_model("2020-01-01", "2021-01-01")?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        vec![
            NodeTable::new(
                TableRole::Profile,
                Columns::new().scalar("area", 100.0).col("level", [0.0, 10.0]),
            ),
            NodeTable::new(TableRole::State, Columns::new().scalar("level", 10.0)),
        ],
    )?;
    let resistance = model.add_node(
        NodeType::LinearResistance,
        NodeSpec::new(2, Point::new(1.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .scalar("resistance", 5e4)
                .scalar("max_flow_rate", 6e-5),
        )],
    )?;
    let boundary = model.add_node(
        NodeType::LevelBoundary,
        NodeSpec::new(3, Point::new(2.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("level", 5.0),
        )],
    )?;
    model.add_edge(basin, resistance, EdgeOptions::new())?;
    model.add_edge(resistance, boundary, EdgeOptions::new())?;
    Ok(model)
}

/// Basin emptying along a quadratic rating curve.
pub fn rating_curve_model() -> Result<Model> {
    const LEVEL_MIN: f64 = 1.0;
    let mut model = empty_model("2020-01-01", "2021-01-01")?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        basin_tables(10.5),
    )?;
    let levels: Vec<f64> = (0..100).map(|i| f64::from(i) * 12.0 / 99.0).collect();
    let flows: Vec<f64> = levels
        .iter()
        .map(|level| (level - LEVEL_MIN).powi(2) / 86400.0)
        .collect();
    let curve = model.add_node(
        NodeType::TabulatedRatingCurve,
        NodeSpec::new(2, Point::new(1.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().col("level", levels).col("flow_rate", flows),
        )],
    )?;
    let terminal = model.add_node(
        NodeType::Terminal,
        NodeSpec::new(3, Point::new(2.0, 0.0)),
        vec![],
    )?;
    model.add_edge(basin, curve, EdgeOptions::new())?;
    model.add_edge(curve, terminal, EdgeOptions::new())?;
    Ok(model)
}

/// Two basins joined by a Manning channel.
pub fn manning_resistance_model() -> Result<Model> {
    let mut model = empty_model("2020-01-01", "2021-01-01")?;
    let upstream = model.add_node(
        NodeType::Basin,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        basin_tables(9.5),
    )?;
    let channel = model.add_node(
        NodeType::ManningResistance,
        NodeSpec::new(2, Point::new(1.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .scalar("manning_n", 1e7)
                .scalar("profile_width", 50.0)
                .scalar("profile_slope", 0.0)
                .scalar("length", 2000.0),
        )],
    )?;
    let downstream = model.add_node(
        NodeType::Basin,
        NodeSpec::new(3, Point::new(2.0, 0.0)),
        basin_tables(4.5),
    )?;
    model.add_edge(upstream, channel, EdgeOptions::new())?;
    model.add_edge(channel, downstream, EdgeOptions::new())?;
    Ok(model)
}

/// A flow boundary split by fractional flows, and a pump between basins.
pub fn misc_nodes_model() -> Result<Model> {
    let mut model = empty_model("2020-01-01", "2021-01-01")?;
    model.config.solver.dt = Some(86400.0);
    "Euler".clone_into(&mut model.config.solver.algorithm);

    let fraction = |f: f64| {
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("fraction", f),
        )]
    };
    let boundary = model.add_node(
        NodeType::FlowBoundary,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("flow_rate", 3e-4),
        )],
    )?;
    let left = model.add_node(
        NodeType::FractionalFlow,
        NodeSpec::new(2, Point::new(0.0, 1.0)),
        fraction(0.5),
    )?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(3, Point::new(0.0, 2.0)),
        basin_tables(10.5),
    )?;
    let pump = model.add_node(
        NodeType::Pump,
        NodeSpec::new(4, Point::new(0.0, 3.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("flow_rate", 1e-4),
        )],
    )?;
    let storage = model.add_node(
        NodeType::Basin,
        NodeSpec::new(5, Point::new(0.0, 4.0)),
        basin_tables(10.5),
    )?;
    let right = model.add_node(
        NodeType::FractionalFlow,
        NodeSpec::new(6, Point::new(1.0, 0.0)),
        fraction(0.5),
    )?;
    let terminal = model.add_node(
        NodeType::Terminal,
        NodeSpec::new(7, Point::new(2.0, 0.0)),
        vec![],
    )?;

    for (from, to) in [
        (boundary, left),
        (left, basin),
        (basin, pump),
        (pump, storage),
        (boundary, right),
        (right, terminal),
    ] {
        model.add_edge(from, to, EdgeOptions::new())?;
    }
    Ok(model)
}

/// A basin fed by a time-varying inflow.
pub fn flow_boundary_time_model() -> Result<Model> {
    let mut model = empty_model("2020-01-01", "2021-01-01")?;
    let times: Vec<Timestamp> = ["2020-03-01", "2020-03-02", "2020-03-03"]
        .into_iter()
        .map(str::parse::<Timestamp>)
        .collect::<Result<_, _>>()?;
    let inflow = model.add_node(
        NodeType::FlowBoundary,
        NodeSpec::new(1, Point::new(0.0, 0.0)).with_name("seasonal inflow"),
        vec![NodeTable::new(
            TableRole::Time,
            Columns::new()
                .col("time", times)
                .col("flow_rate", [1.0, 2.0, 1.0]),
        )],
    )?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(2, Point::new(1.0, 0.0)),
        basin_tables(1.0),
    )?;
    let curve = model.add_node(
        NodeType::TabulatedRatingCurve,
        NodeSpec::new(3, Point::new(2.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .col("level", [0.0, 2.0])
                .col("flow_rate", [0.0, 2.0]),
        )],
    )?;
    let terminal = model.add_node(
        NodeType::Terminal,
        NodeSpec::new(4, Point::new(3.0, 0.0)),
        vec![],
    )?;
    model.add_edge(inflow, basin, EdgeOptions::new())?;
    model.add_edge(basin, curve, EdgeOptions::new())?;
    model.add_edge(curve, terminal, EdgeOptions::new())?;
    Ok(model)
}
