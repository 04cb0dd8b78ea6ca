// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Whole-graph structural checks.
//!
//! `add_edge` only guards what can be decided one edge at a time. Before a
//! network is persisted, and after one is imported, [`validate`] re-checks
//! every rule over the committed graph and reports all violations at once.
use std::collections::BTreeSet;
use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::edge::EdgeType;
use crate::graph::GraphStore;
use crate::ident::{EdgeId, NodeId};
use crate::node_type::{NodeType, TableRole};
use crate::rules::{self, Direction, UNBOUNDED};

/// One broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// An edge endpoint that names no node.
    DanglingEndpoint {
        /// Offending edge.
        edge_id: EdgeId,
        /// Missing node id.
        node_id: NodeId,
        /// Which end of the edge (`Out` = from, `In` = to).
        end: Direction,
    },
    /// Fewer edges than the node type requires.
    DegreeBelowMinimum {
        /// Offending node.
        node_id: NodeId,
        /// Its type.
        node_type: NodeType,
        /// Edge type counted.
        edge_type: EdgeType,
        /// Side counted.
        direction: Direction,
        /// Declared minimum.
        min: usize,
        /// Observed degree.
        actual: usize,
    },
    /// More edges than the node type allows.
    DegreeAboveMaximum {
        /// Offending node.
        node_id: NodeId,
        /// Its type.
        node_type: NodeType,
        /// Edge type counted.
        edge_type: EdgeType,
        /// Side counted.
        direction: Direction,
        /// Declared maximum.
        max: usize,
        /// Observed degree.
        actual: usize,
    },
    /// A second edge between the same endpoints.
    DuplicateEdge {
        /// The later of the two edges.
        edge_id: EdgeId,
        /// Upstream node.
        from: NodeId,
        /// Downstream node.
        to: NodeId,
    },
    /// Endpoint types that may not be connected.
    IncompatibleNodeTypes {
        /// Offending edge.
        edge_id: EdgeId,
        /// Upstream type.
        from: NodeType,
        /// Downstream type.
        to: NodeType,
    },
    /// Stored edge type differs from the one implied by the upstream node.
    EdgeTypeMismatch {
        /// Offending edge.
        edge_id: EdgeId,
        /// Type implied by the upstream node.
        expected: EdgeType,
        /// Stored type.
        found: EdgeType,
    },
    /// A node on a cycle of control edges.
    ControlCycle {
        /// Node inside the cycle.
        node_id: NodeId,
    },
    /// A table row for a node id that is not a node of the owning type.
    OrphanTableRow {
        /// Owning node type.
        node_type: NodeType,
        /// Table role.
        role: TableRole,
        /// Referenced id as stored.
        node_id: i64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingEndpoint {
                edge_id,
                node_id,
                end,
            } => {
                let end = match end {
                    Direction::Out => "from",
                    Direction::In => "to",
                };
                write!(f, "edge #{edge_id}: {end} node #{node_id} does not exist")
            }
            Self::DegreeBelowMinimum {
                node_id,
                node_type,
                edge_type,
                direction,
                min,
                actual,
            } => write!(
                f,
                "{node_type} #{node_id} must have at least {min} {edge_type} {direction}-neighbor(s), got {actual}"
            ),
            Self::DegreeAboveMaximum {
                node_id,
                node_type,
                edge_type,
                direction,
                max,
                actual,
            } => write!(
                f,
                "{node_type} #{node_id} can have at most {max} {edge_type} {direction}-neighbor(s), got {actual}"
            ),
            Self::DuplicateEdge { edge_id, from, to } => {
                write!(f, "edge #{edge_id}: duplicate edge from node #{from} to node #{to}")
            }
            Self::IncompatibleNodeTypes { edge_id, from, to } => {
                write!(f, "edge #{edge_id}: {from} cannot be upstream of {to}")
            }
            Self::EdgeTypeMismatch {
                edge_id,
                expected,
                found,
            } => write!(f, "edge #{edge_id}: edge type is {found}, expected {expected}"),
            Self::ControlCycle { node_id } => {
                write!(f, "node #{node_id} is part of a control cycle")
            }
            Self::OrphanTableRow {
                node_type,
                role,
                node_id,
            } => write!(
                f,
                "{node_type} / {role}: node #{node_id} is not a {node_type} node"
            ),
        }
    }
}

/// Every violation found in one graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// Violations in detection order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` if the graph is valid.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        for v in &self.violations {
            write!(f, "\n  - {v}")?;
        }
        Ok(())
    }
}

/// Checks `graph` against every structural rule.
pub fn validate(graph: &GraphStore) -> Result<(), ValidationReport> {
    let mut report = ValidationReport::default();
    check_edges(graph, &mut report);
    check_degrees(graph, &mut report);
    check_control_cycles(graph, &mut report);
    check_table_rows(graph, &mut report);
    if report.is_empty() {
        Ok(())
    } else {
        warn!(violations = report.len(), "network failed validation");
        Err(report)
    }
}

fn check_edges(graph: &GraphStore, report: &mut ValidationReport) {
    let mut seen = BTreeSet::new();
    for edge in graph.edges().iter() {
        if !seen.insert((edge.from_node_id, edge.to_node_id)) {
            report.push(Violation::DuplicateEdge {
                edge_id: edge.edge_id,
                from: edge.from_node_id,
                to: edge.to_node_id,
            });
        }
        let from = graph.record(edge.from_node_id);
        let to = graph.record(edge.to_node_id);
        for (end, node_id, found) in [
            (Direction::Out, edge.from_node_id, from.is_some()),
            (Direction::In, edge.to_node_id, to.is_some()),
        ] {
            if !found {
                report.push(Violation::DanglingEndpoint {
                    edge_id: edge.edge_id,
                    node_id,
                    end,
                });
            }
        }
        let (Some(from), Some(to)) = (from, to) else {
            continue;
        };
        if !rules::can_connect(from.node_type, to.node_type) {
            report.push(Violation::IncompatibleNodeTypes {
                edge_id: edge.edge_id,
                from: from.node_type,
                to: to.node_type,
            });
        }
        let expected = EdgeType::infer(from.node_type);
        if edge.edge_type != expected {
            report.push(Violation::EdgeTypeMismatch {
                edge_id: edge.edge_id,
                expected,
                found: edge.edge_type,
            });
        }
    }
}

fn check_degrees(graph: &GraphStore, report: &mut ValidationReport) {
    for node in graph.nodes() {
        for edge_type in [EdgeType::Flow, EdgeType::Control] {
            let bounds = rules::degree_bounds(node.node_type, edge_type);
            for direction in [Direction::In, Direction::Out] {
                let actual = graph.edges().degree(node.node_id, direction, edge_type);
                let min = bounds.min(direction);
                let max = bounds.max(direction);
                if actual < min {
                    report.push(Violation::DegreeBelowMinimum {
                        node_id: node.node_id,
                        node_type: node.node_type,
                        edge_type,
                        direction,
                        min,
                        actual,
                    });
                }
                if max != UNBOUNDED && actual > max {
                    report.push(Violation::DegreeAboveMaximum {
                        node_id: node.node_id,
                        node_type: node.node_type,
                        edge_type,
                        direction,
                        max,
                        actual,
                    });
                }
            }
        }
    }
}

fn check_control_cycles(graph: &GraphStore, report: &mut ValidationReport) {
    let mut control: DiGraphMap<NodeId, ()> = DiGraphMap::new();
    for edge in graph.edges().iter() {
        if edge.edge_type == EdgeType::Control {
            control.add_edge(edge.from_node_id, edge.to_node_id, ());
        }
    }

    let mut cyclic = BTreeSet::new();
    for component in tarjan_scc(&control) {
        let looped = match component.as_slice() {
            &[single] => control.contains_edge(single, single),
            _ => true,
        };
        if looped {
            cyclic.extend(component);
        }
    }
    for node_id in cyclic {
        report.push(Violation::ControlCycle { node_id });
    }
}

fn check_table_rows(graph: &GraphStore, report: &mut ValidationReport) {
    for container in graph.containers() {
        for (role, table) in container.tables() {
            let mut reported = BTreeSet::new();
            for value in table.column("node_id") {
                let Some(id) = value.as_i64() else {
                    continue;
                };
                let known = u32::try_from(id).is_ok_and(|id| container.contains(NodeId(id)));
                if !known && reported.insert(id) {
                    report.push(Violation::OrphanTableRow {
                        node_type: container.node_type(),
                        role,
                        node_id: id,
                    });
                }
            }
        }
    }
}
