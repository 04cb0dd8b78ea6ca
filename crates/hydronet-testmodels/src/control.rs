// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Models with controller nodes attached through control edges.
use anyhow::Result;
use hydronet_core::{EdgeOptions, Model, NodeSpec, NodeTable, NodeType, Point, TableRole};
use hydronet_schema::Columns;

use crate::{basin_tables, empty_model};

/// Two basins joined by a pump and a resistance, each switched by its own
/// discrete controller listening to the upstream level.
pub fn pump_discrete_control_model() -> Result<Model> {
    let mut model = empty_model("2020-01-01", "2021-01-01")?;
    let upstream = model.add_node(
        NodeType::Basin,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        basin_tables(1.0),
    )?;
    let pump = model.add_node(
        NodeType::Pump,
        NodeSpec::new(2, Point::new(1.0, -1.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .col("control_state", ["off", "on"])
                .col("flow_rate", [0.0, 1e-5]),
        )],
    )?;
    let downstream = model.add_node(
        NodeType::Basin,
        NodeSpec::new(3, Point::new(2.0, 0.0)),
        basin_tables(1e-5),
    )?;
    let resistance = model.add_node(
        NodeType::LinearResistance,
        NodeSpec::new(4, Point::new(1.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new()
                .col("active", [true, false])
                .scalar("resistance", 1e5)
                .col("control_state", ["active", "inactive"]),
        )],
    )?;

    let discrete = |listen: u32, states: [&str; 2]| {
        vec![
            NodeTable::new(
                TableRole::Variable,
                Columns::new()
                    .scalar("listen_node_id", listen)
                    .scalar("variable", "level"),
            ),
            NodeTable::new(
                TableRole::Condition,
                Columns::new().scalar("greater_than", 0.8),
            ),
            NodeTable::new(
                TableRole::Logic,
                Columns::new()
                    .col("truth_state", ["T", "F"])
                    .col("control_state", states),
            ),
        ]
    };
    let pump_control = model.add_node(
        NodeType::DiscreteControl,
        NodeSpec::new(5, Point::new(1.0, 1.0)),
        discrete(1, ["on", "off"]),
    )?;
    let resistance_control = model.add_node(
        NodeType::DiscreteControl,
        NodeSpec::new(6, Point::new(2.0, 1.0)),
        discrete(3, ["inactive", "active"]),
    )?;

    model.add_edge(upstream, resistance, EdgeOptions::new())?;
    model.add_edge(resistance, downstream, EdgeOptions::new())?;
    model.add_edge(upstream, pump, EdgeOptions::new())?;
    model.add_edge(pump, downstream, EdgeOptions::new())?;
    model.add_edge(pump_control, pump, EdgeOptions::new())?;
    model.add_edge(resistance_control, resistance, EdgeOptions::new())?;
    Ok(model)
}

/// A PID controller driving a pump towards a basin level target.
pub fn pid_control_model() -> Result<Model> {
    let mut model = empty_model("2020-01-01", "2020-01-01 00:05:00")?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        basin_tables(10.5),
    )?;
    let pump = model.add_node(
        NodeType::Pump,
        NodeSpec::new(2, Point::new(1.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("flow_rate", 0.0),
        )],
    )?;
    let terminal = model.add_node(
        NodeType::Terminal,
        NodeSpec::new(3, Point::new(2.0, 0.0)),
        vec![],
    )?;
    let pid = model.add_node(
        NodeType::PidControl,
        NodeSpec::new(4, Point::new(0.5, 1.0)),
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
    model.add_edge(pid, pump, EdgeOptions::new())?;
    Ok(model)
}

/// An inlet and a pump whose flow rates follow piecewise linear functions
/// of the basin level.
pub fn continuous_control_model() -> Result<Model> {
    let mut model = empty_model("2020-01-01", "2021-01-01")?;
    let boundary = model.add_node(
        NodeType::LevelBoundary,
        NodeSpec::new(1, Point::new(0.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("level", 1.0),
        )],
    )?;
    let inlet = model.add_node(
        NodeType::Outlet,
        NodeSpec::new(2, Point::new(1.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("flow_rate", 0.0),
        )],
    )?;
    let basin = model.add_node(
        NodeType::Basin,
        NodeSpec::new(3, Point::new(2.0, 0.0)),
        basin_tables(1.0),
    )?;
    let pump = model.add_node(
        NodeType::Pump,
        NodeSpec::new(4, Point::new(3.0, 0.0)),
        vec![NodeTable::new(
            TableRole::Static,
            Columns::new().scalar("flow_rate", 0.0),
        )],
    )?;
    let terminal = model.add_node(
        NodeType::Terminal,
        NodeSpec::new(5, Point::new(4.0, 0.0)),
        vec![],
    )?;

    let controller = |output: [f64; 2]| {
        vec![
            NodeTable::new(
                TableRole::Variable,
                Columns::new()
                    .scalar("listen_node_id", 3)
                    .scalar("variable", "level"),
            ),
            NodeTable::new(
                TableRole::Function,
                Columns::new()
                    .col("input", [0.0, 1.0])
                    .col("output", output)
                    .scalar("controlled_variable", "flow_rate"),
            ),
        ]
    };
    let inlet_control = model.add_node(
        NodeType::ContinuousControl,
        NodeSpec::new(6, Point::new(1.0, 1.0)),
        controller([1e-3, 0.0]),
    )?;
    let pump_control = model.add_node(
        NodeType::ContinuousControl,
        NodeSpec::new(7, Point::new(3.0, 1.0)),
        controller([0.0, 1e-3]),
    )?;

    model.add_edge(boundary, inlet, EdgeOptions::new())?;
    model.add_edge(inlet, basin, EdgeOptions::new())?;
    model.add_edge(basin, pump, EdgeOptions::new())?;
    model.add_edge(pump, terminal, EdgeOptions::new())?;
    model.add_edge(inlet_control, inlet, EdgeOptions::new())?;
    model.add_edge(pump_control, pump, EdgeOptions::new())?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use hydronet_core::{Direction, EdgeType, NodeId};

    use super::*;

    #[test]
    fn controllers_attach_with_control_edges() {
        let model = pump_discrete_control_model().unwrap();
        let edges = model.graph().edges();
        assert_eq!(
            edges.degree(NodeId(5), Direction::Out, EdgeType::Control),
            1
        );
        assert_eq!(edges.degree(NodeId(2), Direction::In, EdgeType::Control), 1);
        assert_eq!(edges.degree(NodeId(2), Direction::In, EdgeType::Flow), 1);
    }

    #[test]
    fn pid_span_is_five_minutes() {
        let model = pid_control_model().unwrap();
        assert_eq!(model.config.starttime.to_string(), "2020-01-01 00:00:00");
        assert_eq!(model.config.endtime.to_string(), "2020-01-01 00:05:00");
    }
}
