// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Edge records and the indexed edge table.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use hydronet_schema::{tables::EDGE, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::NetworkError;
use crate::geometry::LineString;
use crate::ident::{EdgeId, NodeId, UsedIds};
use crate::node::NodeHandle;
use crate::node_type::NodeType;
use crate::rules::{self, Direction};

/// Kind of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Water moves along the edge.
    Flow,
    /// The upstream controller steers the downstream node.
    Control,
}

impl EdgeType {
    /// Edge type implied by the upstream node: controllers emit control
    /// edges, every other type emits flow edges.
    pub const fn infer(from: NodeType) -> Self {
        if from.is_controller() {
            Self::Control
        } else {
            Self::Flow
        }
    }

    /// Persisted name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Flow => "flow",
            Self::Control => "control",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EdgeType {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flow" => Ok(Self::Flow),
            "control" => Ok(Self::Control),
            other => Err(NetworkError::UnknownEdgeType(other.to_owned())),
        }
    }
}

/// One committed edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRecord {
    /// Unique edge id.
    pub edge_id: EdgeId,
    /// Upstream node.
    pub from_node_id: NodeId,
    /// Downstream node.
    pub to_node_id: NodeId,
    /// Flow or control.
    pub edge_type: EdgeType,
    /// Free-form label.
    pub name: String,
    /// Marks the edge as the source of an allocation subnetwork.
    pub subnetwork_id: Option<u32>,
    /// Edge line.
    pub geometry: LineString,
    /// Extra columns carried through persistence untouched.
    pub attributes: BTreeMap<String, Value>,
}

impl EdgeRecord {
    /// Lightweight handle to this edge.
    pub const fn handle(&self) -> EdgeHandle {
        EdgeHandle {
            edge_id: self.edge_id,
            from_node_id: self.from_node_id,
            to_node_id: self.to_node_id,
            edge_type: self.edge_type,
        }
    }
}

/// Returned by `add_edge`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeHandle {
    /// Edge id.
    pub edge_id: EdgeId,
    /// Upstream node.
    pub from_node_id: NodeId,
    /// Downstream node.
    pub to_node_id: NodeId,
    /// Inferred edge type.
    pub edge_type: EdgeType,
}

/// Optional inputs of `add_edge`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeOptions {
    /// Explicit edge id; allocated when absent.
    pub edge_id: Option<EdgeId>,
    /// Label.
    pub name: String,
    /// Subnetwork marker.
    pub subnetwork_id: Option<u32>,
    /// Edge line; the straight segment between the endpoints when absent.
    pub geometry: Option<LineString>,
    /// Extra columns.
    pub attributes: BTreeMap<String, Value>,
}

impl EdgeOptions {
    /// No options set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `id` instead of allocating one.
    #[must_use]
    pub fn edge_id(mut self, id: u32) -> Self {
        self.edge_id = Some(EdgeId(id));
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the edge as a subnetwork source.
    #[must_use]
    pub const fn subnetwork_id(mut self, id: u32) -> Self {
        self.subnetwork_id = Some(id);
        self
    }

    /// Uses an explicit line geometry.
    #[must_use]
    pub fn geometry(mut self, line: LineString) -> Self {
        self.geometry = Some(line);
        self
    }

    /// Adds an extra column.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Extra edge columns must not shadow declared ones and must hold values
/// with a JSON form of the same kind.
fn check_attributes(attributes: &BTreeMap<String, Value>) -> Result<(), NetworkError> {
    for (name, value) in attributes {
        if EDGE.has_column(name) {
            return Err(NetworkError::ReservedColumn(name.clone()));
        }
        let unsupported = match value {
            Value::Time(_) => Some("timestamp"),
            Value::Float(v) if !v.is_finite() => Some("non-finite float"),
            _ => None,
        };
        if let Some(kind) = unsupported {
            return Err(NetworkError::UnsupportedAttribute {
                name: name.clone(),
                kind,
            });
        }
    }
    Ok(())
}

/// Edge rows in insertion order, with adjacency indexes for degree checks.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    rows: Vec<EdgeRecord>,
    used_ids: UsedIds<EdgeId>,
    by_id: BTreeMap<EdgeId, usize>,
    outgoing: BTreeMap<NodeId, Vec<usize>>,
    incoming: BTreeMap<NodeId, Vec<usize>>,
}

impl EdgeTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a table from persisted rows.
    ///
    /// Only id uniqueness is enforced here; structural rules are left to the
    /// validator so that an imported graph reports every violation at once.
    pub fn from_records(records: Vec<EdgeRecord>) -> Result<Self, NetworkError> {
        let mut table = Self::new();
        for record in records {
            check_attributes(&record.attributes)?;
            table.used_ids.reserve(record.edge_id)?;
            table.rows.push(record);
            table.index_last();
        }
        Ok(table)
    }

    /// Validates and commits one edge. On error nothing changes.
    pub(crate) fn add(
        &mut self,
        from: NodeHandle,
        to: NodeHandle,
        options: EdgeOptions,
    ) -> Result<EdgeHandle, NetworkError> {
        check_attributes(&options.attributes)?;
        if !rules::can_connect(from.node_type, to.node_type) {
            return Err(NetworkError::IncompatibleNodeTypes {
                from: from.node_type,
                to: to.node_type,
            });
        }
        let edge_type = EdgeType::infer(from.node_type);
        let edge_id = match options.edge_id {
            Some(id) => {
                self.used_ids.ensure_free(id)?;
                id
            }
            None => self.used_ids.new_id()?,
        };
        if self.contains_pair(from.node_id, to.node_id) {
            return Err(NetworkError::DuplicateEdge {
                from: from.node_id,
                to: to.node_id,
            });
        }
        self.check_max_degree(to, Direction::In, edge_type)?;
        self.check_max_degree(from, Direction::Out, edge_type)?;

        let geometry = options
            .geometry
            .unwrap_or_else(|| LineString::segment(from.geometry, to.geometry));
        self.rows.push(EdgeRecord {
            edge_id,
            from_node_id: from.node_id,
            to_node_id: to.node_id,
            edge_type,
            name: options.name,
            subnetwork_id: options.subnetwork_id,
            geometry,
            attributes: options.attributes,
        });
        // Scan the rows rather than the indexes so the check stands on its own.
        let shared = self
            .rows
            .iter()
            .filter(|e| e.from_node_id == from.node_id && e.to_node_id == to.node_id)
            .count();
        if shared > 1 {
            self.rows.pop();
            return Err(NetworkError::DuplicateEdge {
                from: from.node_id,
                to: to.node_id,
            });
        }
        if let Err(err) = self.used_ids.reserve(edge_id) {
            self.rows.pop();
            return Err(err);
        }
        self.index_last();
        debug!(
            edge_id = edge_id.0,
            from = from.node_id.0,
            to = to.node_id.0,
            %edge_type,
            "added edge"
        );
        Ok(EdgeHandle {
            edge_id,
            from_node_id: from.node_id,
            to_node_id: to.node_id,
            edge_type,
        })
    }

    fn check_max_degree(
        &self,
        node: NodeHandle,
        direction: Direction,
        edge_type: EdgeType,
    ) -> Result<(), NetworkError> {
        let max = rules::degree_bounds(node.node_type, edge_type).max(direction);
        let current = self.degree(node.node_id, direction, edge_type);
        if current >= max {
            return Err(NetworkError::DegreeBoundExceeded {
                node_id: node.node_id,
                node_type: node.node_type,
                edge_type,
                direction,
                max,
                actual: current + 1,
            });
        }
        Ok(())
    }

    fn index_last(&mut self) {
        let Some(idx) = self.rows.len().checked_sub(1) else {
            return;
        };
        let row = &self.rows[idx];
        self.by_id.insert(row.edge_id, idx);
        self.outgoing.entry(row.from_node_id).or_default().push(idx);
        self.incoming.entry(row.to_node_id).or_default().push(idx);
    }

    /// Number of `edge_type` edges on `direction` of `node`.
    pub fn degree(&self, node: NodeId, direction: Direction, edge_type: EdgeType) -> usize {
        self.neighbors(node, direction)
            .filter(|e| e.edge_type == edge_type)
            .count()
    }

    /// Edges leaving (`Out`) or entering (`In`) `node`, in insertion order.
    pub fn neighbors(
        &self,
        node: NodeId,
        direction: Direction,
    ) -> impl Iterator<Item = &EdgeRecord> + '_ {
        let index = match direction {
            Direction::In => &self.incoming,
            Direction::Out => &self.outgoing,
        };
        index
            .get(&node)
            .into_iter()
            .flatten()
            .filter_map(|&i| self.rows.get(i))
    }

    /// Returns `true` if an edge `from → to` exists.
    pub fn contains_pair(&self, from: NodeId, to: NodeId) -> bool {
        self.neighbors(from, Direction::Out)
            .any(|e| e.to_node_id == to)
    }

    /// Looks up an edge by id.
    pub fn get(&self, edge_id: EdgeId) -> Option<&EdgeRecord> {
        self.by_id.get(&edge_id).and_then(|&i| self.rows.get(i))
    }

    /// Rows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &EdgeRecord> + '_ {
        self.rows.iter()
    }

    /// Rows in insertion order.
    pub fn records(&self) -> &[EdgeRecord] {
        &self.rows
    }

    /// Edge ids in use.
    pub const fn used_ids(&self) -> &UsedIds<EdgeId> {
        &self.used_ids
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if there are no edges.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::geometry::Point;

    fn handle(id: u32, node_type: NodeType, x: f64) -> NodeHandle {
        NodeHandle {
            node_id: NodeId(id),
            node_type,
            geometry: Point::new(x, 0.0),
        }
    }

    #[test]
    fn inference_follows_the_upstream_type() {
        assert_eq!(EdgeType::infer(NodeType::PidControl), EdgeType::Control);
        assert_eq!(EdgeType::infer(NodeType::LevelDemand), EdgeType::Control);
        assert_eq!(EdgeType::infer(NodeType::Basin), EdgeType::Flow);
        assert_eq!("control".parse::<EdgeType>().unwrap(), EdgeType::Control);
        assert!("Flow".parse::<EdgeType>().is_err());
    }

    #[test]
    fn geometry_defaults_to_straight_segment() {
        let mut table = EdgeTable::new();
        let a = handle(1, NodeType::Basin, 0.0);
        let b = handle(2, NodeType::Pump, 3.0);
        let h = table.add(a, b, EdgeOptions::new()).unwrap();
        assert_eq!(h.edge_id, EdgeId(1));
        let row = table.get(h.edge_id).unwrap();
        assert_eq!(row.geometry, LineString::segment(a.geometry, b.geometry));
    }

    #[test]
    fn reserved_attribute_names_are_rejected() {
        let mut table = EdgeTable::new();
        let err = table
            .add(
                handle(1, NodeType::Basin, 0.0),
                handle(2, NodeType::Pump, 1.0),
                EdgeOptions::new().attribute("edge_type", "control"),
            )
            .unwrap_err();
        assert_eq!(err, NetworkError::ReservedColumn("edge_type".into()));
        assert!(table.is_empty());
    }

    #[test]
    fn attributes_without_a_json_form_are_rejected() {
        let mut table = EdgeTable::new();
        let since = hydronet_schema::Timestamp::from_ymd(2020, 3, 1).unwrap();
        let err = table
            .add(
                handle(1, NodeType::Basin, 0.0),
                handle(2, NodeType::Pump, 1.0),
                EdgeOptions::new().attribute("since", since),
            )
            .unwrap_err();
        assert_eq!(
            err,
            NetworkError::UnsupportedAttribute {
                name: "since".into(),
                kind: "timestamp",
            }
        );
        let err = table
            .add(
                handle(1, NodeType::Basin, 0.0),
                handle(2, NodeType::Pump, 1.0),
                EdgeOptions::new().attribute("slope", f64::NAN),
            )
            .unwrap_err();
        assert!(matches!(err, NetworkError::UnsupportedAttribute { .. }));
        assert!(table.is_empty());
        assert_eq!(table.used_ids().new_id().unwrap(), EdgeId(1));
    }

    #[test]
    fn imported_rows_keep_order_and_indexes() {
        let mut source = EdgeTable::new();
        let basin = handle(1, NodeType::Basin, 0.0);
        source
            .add(basin, handle(2, NodeType::Pump, 1.0), EdgeOptions::new().edge_id(9))
            .unwrap();
        source
            .add(basin, handle(3, NodeType::Outlet, 2.0), EdgeOptions::new())
            .unwrap();
        let rebuilt = EdgeTable::from_records(source.records().to_vec()).unwrap();
        assert_eq!(rebuilt.records(), source.records());
        assert_eq!(rebuilt.degree(NodeId(1), Direction::Out, EdgeType::Flow), 2);
        assert_eq!(rebuilt.used_ids().new_id().unwrap(), EdgeId(11));
    }
}
