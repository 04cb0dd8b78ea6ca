// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Named hydronet models for tests and the batch generator.
//!
//! Every constructor builds its network through `add_node`/`add_edge` with
//! explicit node ids, so the generated files are stable across runs.
//!
//! # Modules
//!
//! - [`equations`] - single-connector models (resistances, rating curves, pumps)
//! - [`control`] - discrete, PID and continuous controllers
//! - [`allocation`] - demand nodes and subnetworks
//! - [`invalid`] - models that build but fail validation

pub mod allocation;
pub mod control;
pub mod equations;
pub mod invalid;

use anyhow::Result;
use hydronet_core::{Model, NodeTable, TableRole};
use hydronet_schema::{Columns, Timestamp};

/// Builds one named model.
pub type Constructor = fn() -> Result<Model>;

/// Every model that must pass validation, by name.
pub fn constructors() -> &'static [(&'static str, Constructor)] {
    &[
        ("trivial", equations::trivial_model),
        ("linear_resistance", equations::linear_resistance_model),
        ("rating_curve", equations::rating_curve_model),
        ("manning_resistance", equations::manning_resistance_model),
        ("misc_nodes", equations::misc_nodes_model),
        ("flow_boundary_time", equations::flow_boundary_time_model),
        ("pump_discrete_control", control::pump_discrete_control_model),
        ("pid_control", control::pid_control_model),
        ("continuous_control", control::continuous_control_model),
        ("user_demand", allocation::user_demand_model),
        ("level_demand", allocation::level_demand_model),
        ("flow_demand", allocation::flow_demand_model),
    ]
}

/// Models that build but must be rejected by the validator, by name.
pub fn invalid_constructors() -> &'static [(&'static str, Constructor)] {
    &[
        ("invalid_unconnected", invalid::invalid_unconnected_model),
        ("invalid_fractional_flow", invalid::invalid_fractional_flow_model),
        ("invalid_pid_control", invalid::invalid_pid_control_model),
    ]
}

/// Looks up a valid or invalid constructor by name.
pub fn constructor(name: &str) -> Option<Constructor> {
    constructors()
        .iter()
        .chain(invalid_constructors())
        .find(|(n, _)| *n == name)
        .map(|&(_, c)| c)
}

/// Empty model over `start..end` (`YYYY-MM-DD[ HH:MM:SS]`).
pub(crate) fn empty_model(start: &str, end: &str) -> Result<Model> {
    let starttime: Timestamp = start.parse()?;
    let endtime: Timestamp = end.parse()?;
    Ok(Model::new(starttime, endtime)?)
}

/// Profile and initial level shared by most basins.
pub(crate) fn basin_tables(level: f64) -> Vec<NodeTable> {
    vec![
        NodeTable::new(
            TableRole::Profile,
            Columns::new()
                .col("area", [0.01, 100.0, 100.0])
                .col("level", [0.0, 1.0, 2.0]),
        ),
        NodeTable::new(TableRole::State, Columns::new().scalar("level", level)),
    ]
}
