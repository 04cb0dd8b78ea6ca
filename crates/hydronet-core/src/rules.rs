// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Connectivity rules: which node types may be linked, and how many edges
//! of each kind a node may carry.
//!
//! The tables are static domain data. `add_edge` enforces the maxima and type
//! compatibility eagerly; minima only hold for a finished graph and are left
//! to the validator.
use std::fmt;

use crate::edge::EdgeType;
use crate::node_type::NodeType::{
    self, Basin, ContinuousControl, DiscreteControl, FlowBoundary, FlowDemand, FractionalFlow,
    LevelBoundary, LevelDemand, LinearResistance, ManningResistance, Outlet, PidControl, Pump,
    TabulatedRatingCurve, Terminal, UserDemand,
};

/// Marker for an unbounded maximum degree.
pub const UNBOUNDED: usize = usize::MAX;

/// Side of a node an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    /// Incoming edges (the node is `to_node_id`).
    In,
    /// Outgoing edges (the node is `from_node_id`).
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::In => "in",
            Self::Out => "out",
        })
    }
}

/// Inclusive degree bounds for one edge type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborBounds {
    /// Minimum number of incoming edges.
    pub in_min: usize,
    /// Maximum number of incoming edges.
    pub in_max: usize,
    /// Minimum number of outgoing edges.
    pub out_min: usize,
    /// Maximum number of outgoing edges.
    pub out_max: usize,
}

impl NeighborBounds {
    const fn new(in_min: usize, in_max: usize, out_min: usize, out_max: usize) -> Self {
        Self {
            in_min,
            in_max,
            out_min,
            out_max,
        }
    }

    /// Minimum degree on `side`.
    pub const fn min(self, side: Direction) -> usize {
        match side {
            Direction::In => self.in_min,
            Direction::Out => self.out_min,
        }
    }

    /// Maximum degree on `side`; [`UNBOUNDED`] when unlimited.
    pub const fn max(self, side: Direction) -> usize {
        match side {
            Direction::In => self.in_max,
            Direction::Out => self.out_max,
        }
    }
}

const NONE: NeighborBounds = NeighborBounds::new(0, 0, 0, 0);

/// Flow edge degree bounds of `node_type`.
pub const fn flow_degree_bounds(node_type: NodeType) -> NeighborBounds {
    match node_type {
        Basin | LevelBoundary => NeighborBounds::new(0, UNBOUNDED, 0, UNBOUNDED),
        LinearResistance | ManningResistance | FractionalFlow | Outlet | UserDemand => {
            NeighborBounds::new(1, 1, 1, 1)
        }
        TabulatedRatingCurve | Pump => NeighborBounds::new(1, 1, 1, UNBOUNDED),
        FlowBoundary => NeighborBounds::new(0, 0, 1, UNBOUNDED),
        Terminal => NeighborBounds::new(1, UNBOUNDED, 0, 0),
        PidControl | ContinuousControl | DiscreteControl | LevelDemand | FlowDemand => NONE,
    }
}

/// Control edge degree bounds of `node_type`.
pub const fn control_degree_bounds(node_type: NodeType) -> NeighborBounds {
    match node_type {
        Basin | LinearResistance | ManningResistance | TabulatedRatingCurve | FractionalFlow
        | Pump | Outlet => NeighborBounds::new(0, 1, 0, 0),
        LevelBoundary | FlowBoundary | Terminal | UserDemand => NONE,
        PidControl => NeighborBounds::new(0, 1, 1, 1),
        ContinuousControl | DiscreteControl | LevelDemand => {
            NeighborBounds::new(0, 0, 1, UNBOUNDED)
        }
        FlowDemand => NeighborBounds::new(0, 0, 1, 1),
    }
}

/// Degree bounds of `node_type` for edges of `edge_type`.
pub const fn degree_bounds(node_type: NodeType, edge_type: EdgeType) -> NeighborBounds {
    match edge_type {
        EdgeType::Flow => flow_degree_bounds(node_type),
        EdgeType::Control => control_degree_bounds(node_type),
    }
}

/// Node types `from` may be directly upstream of.
pub const fn downstream_types(from: NodeType) -> &'static [NodeType] {
    match from {
        Pump | Outlet | UserDemand | TabulatedRatingCurve | FlowBoundary => {
            &[Basin, FractionalFlow, Terminal, LevelBoundary]
        }
        LevelDemand => &[Basin],
        Basin => &[
            LinearResistance,
            TabulatedRatingCurve,
            ManningResistance,
            Pump,
            Outlet,
            UserDemand,
        ],
        Terminal => &[],
        FractionalFlow => &[Basin, Terminal, LevelBoundary],
        LevelBoundary => &[LinearResistance, Pump, Outlet, TabulatedRatingCurve],
        LinearResistance => &[Basin, LevelBoundary],
        ManningResistance => &[Basin],
        DiscreteControl => &[
            Pump,
            Outlet,
            TabulatedRatingCurve,
            LinearResistance,
            ManningResistance,
            FractionalFlow,
            PidControl,
        ],
        ContinuousControl | PidControl => &[Pump, Outlet],
        FlowDemand => &[
            LinearResistance,
            ManningResistance,
            TabulatedRatingCurve,
            Pump,
            Outlet,
        ],
    }
}

/// Whether an edge `from → to` is structurally allowed.
pub fn can_connect(from: NodeType, to: NodeType) -> bool {
    downstream_types(from).contains(&to)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn compatibility_is_directional() {
        assert!(can_connect(Basin, LinearResistance));
        assert!(can_connect(LinearResistance, LevelBoundary));
        assert!(!can_connect(LevelBoundary, Basin));
        assert!(!can_connect(Terminal, Basin));
        assert!(can_connect(PidControl, Pump));
        assert!(!can_connect(Pump, PidControl));
    }

    #[test]
    fn controllers_never_carry_flow_edges() {
        for t in NodeType::ALL.into_iter().filter(|t| t.is_controller()) {
            assert_eq!(flow_degree_bounds(t), NONE, "{t}");
            assert!(control_degree_bounds(t).out_min >= 1, "{t}");
        }
    }

    #[test]
    fn controller_targets_accept_control_edges() {
        for from in NodeType::ALL.into_iter().filter(|t| t.is_controller()) {
            for &to in downstream_types(from) {
                assert!(control_degree_bounds(to).in_max >= 1, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn flow_targets_accept_flow_edges() {
        for from in NodeType::ALL.into_iter().filter(|t| !t.is_controller()) {
            for &to in downstream_types(from) {
                assert!(flow_degree_bounds(from).out_max >= 1, "{from}");
                assert!(flow_degree_bounds(to).in_max >= 1, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn bounds_are_ordered() {
        for t in NodeType::ALL {
            for et in [EdgeType::Flow, EdgeType::Control] {
                let b = degree_bounds(t, et);
                assert!(b.in_min <= b.in_max && b.out_min <= b.out_max, "{t} {et}");
            }
        }
    }
}
