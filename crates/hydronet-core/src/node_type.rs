// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node types and the attribute tables each one owns.
use std::fmt;
use std::str::FromStr;

use hydronet_schema::{tables, TableSchema};
use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

/// Kind of a hydraulic node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Storage with a level/area profile.
    Basin,
    /// Controller computing a setpoint from a function of observed variables.
    ContinuousControl,
    /// Controller switching control states on conditions.
    DiscreteControl,
    /// Prescribed inflow.
    FlowBoundary,
    /// Demand on the flow through a connector node.
    FlowDemand,
    /// Splits the incoming flow by a fixed fraction.
    FractionalFlow,
    /// Prescribed water level.
    LevelBoundary,
    /// Demand on a basin level.
    LevelDemand,
    /// Linear resistance between two levels.
    LinearResistance,
    /// Manning open-channel resistance.
    ManningResistance,
    /// Gravity outlet.
    Outlet,
    /// PID controller.
    PidControl,
    /// Pump with a prescribed flow rate.
    Pump,
    /// Level/discharge relation.
    TabulatedRatingCurve,
    /// Sink leaving the model.
    Terminal,
    /// Water user with a demand and return factor.
    UserDemand,
}

use NodeType::{
    Basin, ContinuousControl, DiscreteControl, FlowBoundary, FlowDemand, FractionalFlow,
    LevelBoundary, LevelDemand, LinearResistance, ManningResistance, Outlet, PidControl, Pump,
    TabulatedRatingCurve, Terminal, UserDemand,
};

impl NodeType {
    /// Every node type, in name order.
    pub const ALL: [Self; 16] = [
        Basin,
        ContinuousControl,
        DiscreteControl,
        FlowBoundary,
        FlowDemand,
        FractionalFlow,
        LevelBoundary,
        LevelDemand,
        LinearResistance,
        ManningResistance,
        Outlet,
        PidControl,
        Pump,
        TabulatedRatingCurve,
        Terminal,
        UserDemand,
    ];

    /// Persisted name, e.g. `TabulatedRatingCurve`.
    pub const fn name(self) -> &'static str {
        match self {
            Basin => "Basin",
            ContinuousControl => "ContinuousControl",
            DiscreteControl => "DiscreteControl",
            FlowBoundary => "FlowBoundary",
            FlowDemand => "FlowDemand",
            FractionalFlow => "FractionalFlow",
            LevelBoundary => "LevelBoundary",
            LevelDemand => "LevelDemand",
            LinearResistance => "LinearResistance",
            ManningResistance => "ManningResistance",
            Outlet => "Outlet",
            PidControl => "PidControl",
            Pump => "Pump",
            TabulatedRatingCurve => "TabulatedRatingCurve",
            Terminal => "Terminal",
            UserDemand => "UserDemand",
        }
    }

    /// Snake-case name used for table file names, e.g. `tabulated_rating_curve`.
    pub const fn snake_name(self) -> &'static str {
        match self {
            Basin => "basin",
            ContinuousControl => "continuous_control",
            DiscreteControl => "discrete_control",
            FlowBoundary => "flow_boundary",
            FlowDemand => "flow_demand",
            FractionalFlow => "fractional_flow",
            LevelBoundary => "level_boundary",
            LevelDemand => "level_demand",
            LinearResistance => "linear_resistance",
            ManningResistance => "manning_resistance",
            Outlet => "outlet",
            PidControl => "pid_control",
            Pump => "pump",
            TabulatedRatingCurve => "tabulated_rating_curve",
            Terminal => "terminal",
            UserDemand => "user_demand",
        }
    }

    /// Controller types emit control edges only.
    pub const fn is_controller(self) -> bool {
        matches!(
            self,
            DiscreteControl | PidControl | ContinuousControl | FlowDemand | LevelDemand
        )
    }

    /// Table roles this node type owns.
    pub const fn table_roles(self) -> &'static [TableRole] {
        use TableRole::{
            Concentration, ConcentrationExternal, ConcentrationState, Condition, Function, Logic,
            Profile, State, Static, Subgrid, Time, Variable,
        };
        match self {
            Basin => &[
                Profile,
                State,
                Static,
                Time,
                Subgrid,
                Concentration,
                ConcentrationState,
                ConcentrationExternal,
            ],
            ContinuousControl => &[Variable, Function],
            DiscreteControl => &[Variable, Condition, Logic],
            FlowBoundary | LevelBoundary => &[Static, Time, Concentration],
            FlowDemand | LevelDemand | PidControl | TabulatedRatingCurve | UserDemand => {
                &[Static, Time]
            }
            FractionalFlow | LinearResistance | ManningResistance | Outlet | Pump | Terminal => {
                &[Static]
            }
        }
    }

    /// Schema of the `role` table, or `None` if this type does not own it.
    pub fn schema(self, role: TableRole) -> Option<&'static TableSchema> {
        use TableRole as R;
        let schema = match (self, role) {
            (Basin, R::Concentration) => &tables::BASIN_CONCENTRATION,
            (Basin, R::ConcentrationExternal) => &tables::BASIN_CONCENTRATION_EXTERNAL,
            (Basin, R::ConcentrationState) => &tables::BASIN_CONCENTRATION_STATE,
            (Basin, R::Profile) => &tables::BASIN_PROFILE,
            (Basin, R::State) => &tables::BASIN_STATE,
            (Basin, R::Static) => &tables::BASIN_STATIC,
            (Basin, R::Subgrid) => &tables::BASIN_SUBGRID,
            (Basin, R::Time) => &tables::BASIN_TIME,
            (ContinuousControl, R::Function) => &tables::CONTINUOUS_CONTROL_FUNCTION,
            (ContinuousControl, R::Variable) => &tables::CONTINUOUS_CONTROL_VARIABLE,
            (DiscreteControl, R::Condition) => &tables::DISCRETE_CONTROL_CONDITION,
            (DiscreteControl, R::Logic) => &tables::DISCRETE_CONTROL_LOGIC,
            (DiscreteControl, R::Variable) => &tables::DISCRETE_CONTROL_VARIABLE,
            (FlowBoundary, R::Concentration) => &tables::FLOW_BOUNDARY_CONCENTRATION,
            (FlowBoundary, R::Static) => &tables::FLOW_BOUNDARY_STATIC,
            (FlowBoundary, R::Time) => &tables::FLOW_BOUNDARY_TIME,
            (FlowDemand, R::Static) => &tables::FLOW_DEMAND_STATIC,
            (FlowDemand, R::Time) => &tables::FLOW_DEMAND_TIME,
            (FractionalFlow, R::Static) => &tables::FRACTIONAL_FLOW_STATIC,
            (LevelBoundary, R::Concentration) => &tables::LEVEL_BOUNDARY_CONCENTRATION,
            (LevelBoundary, R::Static) => &tables::LEVEL_BOUNDARY_STATIC,
            (LevelBoundary, R::Time) => &tables::LEVEL_BOUNDARY_TIME,
            (LevelDemand, R::Static) => &tables::LEVEL_DEMAND_STATIC,
            (LevelDemand, R::Time) => &tables::LEVEL_DEMAND_TIME,
            (LinearResistance, R::Static) => &tables::LINEAR_RESISTANCE_STATIC,
            (ManningResistance, R::Static) => &tables::MANNING_RESISTANCE_STATIC,
            (Outlet, R::Static) => &tables::OUTLET_STATIC,
            (PidControl, R::Static) => &tables::PID_CONTROL_STATIC,
            (PidControl, R::Time) => &tables::PID_CONTROL_TIME,
            (Pump, R::Static) => &tables::PUMP_STATIC,
            (TabulatedRatingCurve, R::Static) => &tables::TABULATED_RATING_CURVE_STATIC,
            (TabulatedRatingCurve, R::Time) => &tables::TABULATED_RATING_CURVE_TIME,
            (Terminal, R::Static) => &tables::TERMINAL_STATIC,
            (UserDemand, R::Static) => &tables::USER_DEMAND_STATIC,
            (UserDemand, R::Time) => &tables::USER_DEMAND_TIME,
            _ => return None,
        };
        Some(schema)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NodeType {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| NetworkError::UnknownNodeType(s.to_owned()))
    }
}

/// Name of one attribute sub-table of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    /// Time-invariant parameters.
    Static,
    /// Time series parameters.
    Time,
    /// Level/area profile.
    Profile,
    /// Initial state.
    State,
    /// Subgrid level interpolation.
    Subgrid,
    /// Discrete control conditions.
    Condition,
    /// Discrete control truth-state logic.
    Logic,
    /// Observed control variables.
    Variable,
    /// Continuous control function.
    Function,
    /// Substance concentrations.
    Concentration,
    /// Initial substance concentrations.
    ConcentrationState,
    /// External substance concentrations.
    ConcentrationExternal,
}

impl TableRole {
    /// Persisted role name, e.g. `concentration_state`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Time => "time",
            Self::Profile => "profile",
            Self::State => "state",
            Self::Subgrid => "subgrid",
            Self::Condition => "condition",
            Self::Logic => "logic",
            Self::Variable => "variable",
            Self::Function => "function",
            Self::Concentration => "concentration",
            Self::ConcentrationState => "concentration_state",
            Self::ConcentrationExternal => "concentration_external",
        }
    }
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
