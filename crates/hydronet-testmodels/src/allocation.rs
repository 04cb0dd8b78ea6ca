// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Models with demand nodes, run with allocation enabled.
use anyhow::Result;
use hydronet_core::{EdgeOptions, Model, NodeSpec, NodeTable, NodeType, Point, TableRole};
use hydronet_schema::{Columns, Timestamp};

use crate::{basin_tables, empty_model};

fn allocated(start: &str, end: &str) -> Result<Model> {
    let mut model = empty_model(start, end)?;
    model.config.allocation.use_allocation = true;
    model.config.allocation.timestep = Some(86400.0);
    Ok(model)
}

/// A user abstracting from a basin fed by a flow boundary.
pub fn user_demand_model() -> Result<Model> {
    let mut model = allocated("2020-01-01", "2021-01-01")?;
    let inflow = model.add_node(
        NodeType::FlowBoundary,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("flow_rate", 1e-3),
        )],
    )?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(2, Point::new(1.0, 0.0)),
        basin_tables(1.0),
    )?;
    let user = model.add_node(
        NodeType::UserDemand,
        NodeSpec::new(3, Point::new(1.0, 1.0)).with_name("irrigation"),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .scalar("demand", 1e-4)
                .scalar("return_factor", 0.9)
                .scalar("min_level", 0.9)
                .scalar("priority", 1),
        )],
    )?;
    let curve = model.add_node(
        NodeType::TabulatedRatingCurve,
        NodeSpec::new(4, Point::new(2.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .col("level", [0.0, 1.0])
                .col("flow_rate", [0.0, 1e-3]),
        )],
    )?;
    let terminal = model.add_node(
        NodeType::Terminal,
        NodeSpec::new(5, Point::new(3.0, 0.0)),
        vec![],
    )?;

    model.add_edge(inflow, basin, EdgeOptions::new().subnetwork_id(1))?;
    model.add_edge(basin, user, EdgeOptions::new())?;
    model.add_edge(user, terminal, EdgeOptions::new())?;
    model.add_edge(basin, curve, EdgeOptions::new())?;
    model.add_edge(curve, terminal, EdgeOptions::new())?;
    Ok(model)
}

/// A level demand keeping a basin between bounds that change over time.
pub fn level_demand_model() -> Result<Model> {
    let mut model = allocated("2020-01-01", "2020-02-01")?;
    let inflow = model.add_node(
        NodeType::FlowBoundary,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("flow_rate", 1e-3),
        )],
    )?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(2, Point::new(1.0, 0.0)),
        basin_tables(0.5),
    )?;
    let user = model.add_node(
        NodeType::UserDemand,
        NodeSpec::new(3, Point::new(2.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .scalar("demand", 1.5e-3)
                .scalar("return_factor", 0.0)
                .scalar("min_level", 0.2)
                .scalar("priority", 2),
        )],
    )?;
    let terminal = model.add_node(
        NodeType::Terminal,
        NodeSpec::new(4, Point::new(3.0, 0.0)),
        vec![],
    )?;
    let times = [
        Timestamp::from_ymd(2020, 1, 1)?,
        Timestamp::from_ymd(2020, 1, 16)?,
    ];
    let demand = model.add_node(
        NodeType::LevelDemand,
        NodeSpec::new(5, Point::new(1.0, 1.0)),
        vec![NodeTable::new(
            TableRole::Time,
            Columns::new()
                .col("time", times)
                .col("min_level", [1.0, 1.2])
                .col("max_level", [1.5, 1.5])
                .scalar("priority", 1),
        )],
    )?;

    model.add_edge(inflow, basin, EdgeOptions::new().subnetwork_id(2))?;
    model.add_edge(basin, user, EdgeOptions::new())?;
    model.add_edge(user, terminal, EdgeOptions::new())?;
    model.add_edge(demand, basin, EdgeOptions::new())?;
    Ok(model)
}

/// A flow demand on the pump between a boundary and a basin.
pub fn flow_demand_model() -> Result<Model> {
    let mut model = allocated("2020-01-01", "2021-01-01")?;
    let source = model.add_node(
        NodeType::LevelBoundary,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("level", 2.0),
        )],
    )?;
    let pump = model.add_node(
        NodeType::Pump,
        NodeSpec::new(2, Point::new(1.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .scalar("flow_rate", 1e-3)
                .scalar("max_flow_rate", 2e-3),
        )],
    )?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(3, Point::new(2.0, 0.0)),
        basin_tables(1.0),
    )?;
    let resistance = model.add_node(
        NodeType::LinearResistance,
        NodeSpec::new(4, Point::new(3.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("resistance", 1e4),
        )],
    )?;
    let sink = model.add_node(
        NodeType::LevelBoundary,
        NodeSpec::new(5, Point::new(4.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("level", 0.5),
        )],
    )?;
    let demand = model.add_node(
        NodeType::FlowDemand,
        NodeSpec::new(6, Point::new(1.0, 1.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("demand", 5e-4).scalar("priority", 1),
        )],
    )?;

    model.add_edge(source, pump, EdgeOptions::new().subnetwork_id(1))?;
    model.add_edge(pump, basin, EdgeOptions::new())?;
    model.add_edge(basin, resistance, EdgeOptions::new())?;
    model.add_edge(resistance, sink, EdgeOptions::new())?;
    model.add_edge(demand, pump, EdgeOptions::new())?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use hydronet_core::EdgeType;

    use super::*;

    #[test]
    fn subnetwork_sources_are_marked() {
        for model in [user_demand_model(), level_demand_model(), flow_demand_model()] {
            let model = model.unwrap();
            assert!(model.config.allocation.use_allocation);
            let marked: Vec<_> = model
                .graph()
                .edges()
                .iter()
                .filter(|e| e.subnetwork_id.is_some())
                .collect();
            assert_eq!(marked.len(), 1);
            assert_eq!(marked[0].edge_type, EdgeType::Flow);
        }
    }
}
