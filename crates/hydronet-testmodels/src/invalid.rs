// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Models every `add_node`/`add_edge` call accepts, but which are not
//! finished networks. The validator must reject each of them.
use anyhow::Result;
use hydronet_core::{
    EdgeOptions, Model, NodeHandle, NodeSpec, NodeTable, NodeType, Point, TableRole,
};
use hydronet_schema::Columns;

use crate::{basin_tables, empty_model};

fn pump(model: &mut Model, id: u32, x: f64) -> Result<NodeHandle> {
    Ok(model.add_node(
        NodeType::Pump,
        NodeSpec::new(id, Point::new(x, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("flow_rate", 1e-3),
        )],
    )?)
}

/// A pump with no outflow and a terminal with no inflow.
pub fn invalid_unconnected_model() -> Result<Model> {
    let mut model = empty_model("2020-01-01", "2020-12-01")?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        basin_tables(1.0),
    )?;
    let pump = pump(&mut model, 2, 1.0)?;
    model.add_node(
        NodeType::Terminal,
        NodeSpec::new(3, Point::new(2.0, 0.0)),
        vec![],
    )?;
    model.add_edge(basin, pump, EdgeOptions::new())?;
    Ok(model)
}

/// A rating curve split over two fractional flows, one of which leads
/// nowhere.
pub fn invalid_fractional_flow_model() -> Result<Model> {
    let mut model = empty_model("2020-01-01", "2020-12-01")?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(1, Point::new(0.0, 1.0)),
        basin_tables(1.4),
    )?;
    let fraction = |f: f64| {
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("fraction", f),
        )]
    };
    let left = model.add_node(
        NodeType::FractionalFlow,
        NodeSpec::new(3, Point::new(0.0, -1.0)),
        fraction(0.5),
    )?;
    let right = model.add_node(
        NodeType::FractionalFlow,
        NodeSpec::new(4, Point::new(1.0, 0.0)),
        fraction(0.5),
    )?;
    let terminal = model.add_node(
        NodeType::Terminal,
        NodeSpec::new(5, Point::new(0.0, -2.0)),
        vec![],
    )?;
    let curve = model.add_node(
        NodeType::TabulatedRatingCurve,
        NodeSpec::new(7, Point::new(0.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .col("level", [0.0, 1.0])
                .col("flow_rate", [0.0, 50.0]),
        )],
    )?;
    model.add_edge(basin, curve, EdgeOptions::new())?;
    model.add_edge(curve, left, EdgeOptions::new())?;
    model.add_edge(left, terminal, EdgeOptions::new())?;
    model.add_edge(curve, right, EdgeOptions::new())?;
    Ok(model)
}

/// A PID controller that controls nothing.
pub fn invalid_pid_control_model() -> Result<Model> {
    let mut model = empty_model("2020-01-01", "2020-12-01")?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        basin_tables(10.5),
    )?;
    let pump = pump(&mut model, 2, 1.0)?;
    let terminal = model.add_node(
        NodeType::Terminal,
        NodeSpec::new(3, Point::new(2.0, 0.0)),
        vec![],
    )?;
    model.add_node(
        NodeType::PidControl,
        NodeSpec::new(4, Point::new(1.0, 1.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .scalar("listen_node_id", 1)
                .scalar("target", 10.0)
                .scalar("proportional", -2.5)
                .scalar("integral", -0.001)
                .scalar("derivative", 10.0),
        )],
    )?;
    model.add_edge(basin, pump, EdgeOptions::new())?;
    model.add_edge(pump, terminal, EdgeOptions::new())?;
    Ok(model)
}
