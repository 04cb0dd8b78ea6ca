// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Column tables for every persisted table.
//!
//! One `static` per (node type, role) plus the shared node and edge tables.

use crate::column::{ColumnDef, ColumnType, Fill, TableSchema};

use ColumnType::{Bool, DateTime, Float64, Geometry, Int32, String as Text};

const fn req(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef::required(name, ty)
}

const fn opt(name: &'static str, ty: ColumnType) -> ColumnDef {
    ColumnDef::nullable(name, ty)
}

const NODE_ID: ColumnDef = req("node_id", Int32).with_default(Fill::Int(0));
const LISTEN_NODE_ID: ColumnDef = req("listen_node_id", Int32).with_default(Fill::Int(0));
const COMPOUND_VARIABLE_ID: ColumnDef =
    req("compound_variable_id", Int32).with_default(Fill::Int(0));
const PRIORITY: ColumnDef = req("priority", Int32).with_default(Fill::Int(0));
const ACTIVE: ColumnDef = opt("active", Bool);
const CONTROL_STATE: ColumnDef = opt("control_state", Text);
const TIME: ColumnDef = req("time", DateTime);
const SUBSTANCE: ColumnDef = req("substance", Text);

macro_rules! table {
    ($name:literal, [$($col:expr),* $(,)?] $(,)?) => {
        table!($name, [$($col),*], sort = [])
    };
    ($name:literal, [$($col:expr),* $(,)?], sort = [$($key:literal),* $(,)?] $(,)?) => {
        TableSchema {
            name: $name,
            columns: &[$($col),*],
            sort_keys: &[$($key),*],
            extra_columns: false,
        }
    };
}

/// Node table: one row per node.
pub static NODE: TableSchema = table!(
    "Node",
    [
        req("node_id", Int32),
        req("node_type", Text),
        req("name", Text).with_default(Fill::Str("")),
        req("geometry", Geometry),
    ],
);

/// Edge table: one row per edge. Undeclared columns are kept as edge attributes.
pub static EDGE: TableSchema = TableSchema {
    name: "Edge",
    columns: &[
        req("edge_id", Int32),
        req("name", Text).with_default(Fill::Str("")),
        req("from_node_id", Int32),
        req("to_node_id", Int32),
        req("edge_type", Text).with_default(Fill::Str("flow")),
        opt("subnetwork_id", Int32),
        opt("geometry", Geometry),
    ],
    sort_keys: &[],
    extra_columns: true,
};

/// `Basin / concentration_external`
pub static BASIN_CONCENTRATION_EXTERNAL: TableSchema = table!(
    "Basin / concentration_external",
    [NODE_ID, TIME, SUBSTANCE, opt("concentration", Float64)],
);

/// `Basin / concentration_state`
pub static BASIN_CONCENTRATION_STATE: TableSchema = table!(
    "Basin / concentration_state",
    [NODE_ID, SUBSTANCE, opt("concentration", Float64)],
);

/// `Basin / concentration`
pub static BASIN_CONCENTRATION: TableSchema = table!(
    "Basin / concentration",
    [
        NODE_ID,
        TIME,
        SUBSTANCE,
        opt("drainage", Float64),
        opt("precipitation", Float64),
    ],
);

/// `Basin / profile`
pub static BASIN_PROFILE: TableSchema = table!(
    "Basin / profile",
    [NODE_ID, req("area", Float64), req("level", Float64)],
    sort = ["node_id", "level"],
);

/// `Basin / state`
pub static BASIN_STATE: TableSchema = table!("Basin / state", [NODE_ID, req("level", Float64)]);

/// `Basin / static`
pub static BASIN_STATIC: TableSchema = table!(
    "Basin / static",
    [
        NODE_ID,
        opt("drainage", Float64),
        opt("potential_evaporation", Float64),
        opt("infiltration", Float64),
        opt("precipitation", Float64),
    ],
);

/// `Basin / subgrid`
pub static BASIN_SUBGRID: TableSchema = table!(
    "Basin / subgrid",
    [
        req("subgrid_id", Int32).with_default(Fill::Int(0)),
        NODE_ID,
        req("basin_level", Float64),
        req("subgrid_level", Float64),
    ],
);

/// `Basin / time`
pub static BASIN_TIME: TableSchema = table!(
    "Basin / time",
    [
        NODE_ID,
        TIME,
        opt("drainage", Float64),
        opt("potential_evaporation", Float64),
        opt("infiltration", Float64),
        opt("precipitation", Float64),
    ],
    sort = ["time", "node_id"],
);

/// `ContinuousControl / function`
pub static CONTINUOUS_CONTROL_FUNCTION: TableSchema = table!(
    "ContinuousControl / function",
    [
        NODE_ID,
        req("input", Float64),
        req("output", Float64),
        req("controlled_variable", Text),
    ],
);

/// `ContinuousControl / variable`
pub static CONTINUOUS_CONTROL_VARIABLE: TableSchema = table!(
    "ContinuousControl / variable",
    [
        NODE_ID,
        LISTEN_NODE_ID,
        req("variable", Text),
        opt("weight", Float64),
        opt("look_ahead", Float64),
    ],
);

/// `DiscreteControl / condition`
pub static DISCRETE_CONTROL_CONDITION: TableSchema = table!(
    "DiscreteControl / condition",
    [NODE_ID, COMPOUND_VARIABLE_ID, req("greater_than", Float64)],
);

/// `DiscreteControl / logic`
pub static DISCRETE_CONTROL_LOGIC: TableSchema = table!(
    "DiscreteControl / logic",
    [
        NODE_ID,
        req("truth_state", Text),
        req("control_state", Text),
    ],
);

/// `DiscreteControl / variable`
pub static DISCRETE_CONTROL_VARIABLE: TableSchema = table!(
    "DiscreteControl / variable",
    [
        NODE_ID,
        COMPOUND_VARIABLE_ID,
        LISTEN_NODE_ID,
        req("variable", Text),
        opt("weight", Float64),
        opt("look_ahead", Float64),
    ],
);

/// `FlowBoundary / concentration`
pub static FLOW_BOUNDARY_CONCENTRATION: TableSchema = table!(
    "FlowBoundary / concentration",
    [NODE_ID, TIME, SUBSTANCE, req("concentration", Float64)],
);

/// `FlowBoundary / static`
pub static FLOW_BOUNDARY_STATIC: TableSchema = table!(
    "FlowBoundary / static",
    [NODE_ID, ACTIVE, req("flow_rate", Float64)],
);

/// `FlowBoundary / time`
pub static FLOW_BOUNDARY_TIME: TableSchema = table!(
    "FlowBoundary / time",
    [NODE_ID, TIME, req("flow_rate", Float64)],
    sort = ["time", "node_id"],
);

/// `FlowDemand / static`
pub static FLOW_DEMAND_STATIC: TableSchema = table!(
    "FlowDemand / static",
    [NODE_ID, req("demand", Float64), PRIORITY],
);

/// `FlowDemand / time`
pub static FLOW_DEMAND_TIME: TableSchema = table!(
    "FlowDemand / time",
    [NODE_ID, TIME, req("demand", Float64), PRIORITY],
    sort = ["node_id", "priority", "time"],
);

/// `FractionalFlow / static`
pub static FRACTIONAL_FLOW_STATIC: TableSchema = table!(
    "FractionalFlow / static",
    [NODE_ID, req("fraction", Float64), CONTROL_STATE],
);

/// `LevelBoundary / concentration`
pub static LEVEL_BOUNDARY_CONCENTRATION: TableSchema = table!(
    "LevelBoundary / concentration",
    [NODE_ID, TIME, SUBSTANCE, req("concentration", Float64)],
);

/// `LevelBoundary / static`
pub static LEVEL_BOUNDARY_STATIC: TableSchema = table!(
    "LevelBoundary / static",
    [NODE_ID, ACTIVE, req("level", Float64)],
);

/// `LevelBoundary / time`
pub static LEVEL_BOUNDARY_TIME: TableSchema = table!(
    "LevelBoundary / time",
    [NODE_ID, TIME, req("level", Float64)],
    sort = ["time", "node_id"],
);

/// `LevelDemand / static`
pub static LEVEL_DEMAND_STATIC: TableSchema = table!(
    "LevelDemand / static",
    [
        NODE_ID,
        opt("min_level", Float64),
        opt("max_level", Float64),
        PRIORITY,
    ],
);

/// `LevelDemand / time`
pub static LEVEL_DEMAND_TIME: TableSchema = table!(
    "LevelDemand / time",
    [
        NODE_ID,
        TIME,
        opt("min_level", Float64),
        opt("max_level", Float64),
        PRIORITY,
    ],
    sort = ["node_id", "time"],
);

/// `LinearResistance / static`
pub static LINEAR_RESISTANCE_STATIC: TableSchema = table!(
    "LinearResistance / static",
    [
        NODE_ID,
        ACTIVE,
        req("resistance", Float64),
        opt("max_flow_rate", Float64),
        CONTROL_STATE,
    ],
);

/// `ManningResistance / static`
pub static MANNING_RESISTANCE_STATIC: TableSchema = table!(
    "ManningResistance / static",
    [
        NODE_ID,
        ACTIVE,
        req("length", Float64),
        req("manning_n", Float64),
        req("profile_width", Float64),
        req("profile_slope", Float64),
        CONTROL_STATE,
    ],
);

/// `Outlet / static`
pub static OUTLET_STATIC: TableSchema = table!(
    "Outlet / static",
    [
        NODE_ID,
        ACTIVE,
        req("flow_rate", Float64),
        opt("min_flow_rate", Float64),
        opt("max_flow_rate", Float64),
        opt("min_crest_level", Float64),
        CONTROL_STATE,
    ],
);

/// `PidControl / static`
pub static PID_CONTROL_STATIC: TableSchema = table!(
    "PidControl / static",
    [
        NODE_ID,
        ACTIVE,
        LISTEN_NODE_ID,
        req("target", Float64),
        req("proportional", Float64),
        req("integral", Float64),
        req("derivative", Float64),
        CONTROL_STATE,
    ],
);

/// `PidControl / time`
pub static PID_CONTROL_TIME: TableSchema = table!(
    "PidControl / time",
    [
        NODE_ID,
        LISTEN_NODE_ID,
        TIME,
        req("target", Float64),
        req("proportional", Float64),
        req("integral", Float64),
        req("derivative", Float64),
        CONTROL_STATE,
    ],
    sort = ["time", "node_id"],
);

/// `Pump / static`
pub static PUMP_STATIC: TableSchema = table!(
    "Pump / static",
    [
        NODE_ID,
        ACTIVE,
        req("flow_rate", Float64),
        opt("min_flow_rate", Float64),
        opt("max_flow_rate", Float64),
        CONTROL_STATE,
    ],
);

/// `TabulatedRatingCurve / static`
pub static TABULATED_RATING_CURVE_STATIC: TableSchema = table!(
    "TabulatedRatingCurve / static",
    [
        NODE_ID,
        ACTIVE,
        req("level", Float64),
        req("flow_rate", Float64),
        CONTROL_STATE,
    ],
    sort = ["node_id", "level"],
);

/// `TabulatedRatingCurve / time`
pub static TABULATED_RATING_CURVE_TIME: TableSchema = table!(
    "TabulatedRatingCurve / time",
    [NODE_ID, TIME, req("level", Float64), req("flow_rate", Float64)],
    sort = ["time", "node_id", "level"],
);

/// `Terminal / static`
pub static TERMINAL_STATIC: TableSchema = table!("Terminal / static", [NODE_ID]);

/// `UserDemand / static`
pub static USER_DEMAND_STATIC: TableSchema = table!(
    "UserDemand / static",
    [
        NODE_ID,
        ACTIVE,
        opt("demand", Float64),
        req("return_factor", Float64),
        req("min_level", Float64),
        PRIORITY,
    ],
    sort = ["node_id", "priority"],
);

/// `UserDemand / time`
pub static USER_DEMAND_TIME: TableSchema = table!(
    "UserDemand / time",
    [
        NODE_ID,
        TIME,
        req("demand", Float64),
        req("return_factor", Float64),
        req("min_level", Float64),
        PRIORITY,
    ],
    sort = ["node_id", "priority", "time"],
);
