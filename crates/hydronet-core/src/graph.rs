// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The network store: nodes, per-type containers and the edge table.
use std::collections::BTreeMap;

use hydronet_schema::{Table, Value};
use tracing::{debug, info};

use crate::edge::{EdgeHandle, EdgeOptions, EdgeRecord, EdgeTable};
use crate::error::NetworkError;
use crate::ident::{NodeId, UsedIds};
use crate::node::{NodeContainer, NodeHandle, NodeRecord, NodeSpec, NodeTable};
use crate::node_type::{NodeType, TableRole};
use crate::validate;

/// In-memory network.
///
/// Mutation goes through [`add_node`](Self::add_node),
/// [`add_edge`](Self::add_edge) and [`replace_table`](Self::replace_table);
/// each either commits completely or leaves the store untouched.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<NodeRecord>,
    node_index: BTreeMap<NodeId, usize>,
    node_ids: UsedIds<NodeId>,
    containers: BTreeMap<NodeType, NodeContainer>,
    edges: EdgeTable,
}

impl GraphStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node of `node_type` with its attribute tables.
    ///
    /// Tables are validated and stamped with the node id before anything is
    /// committed.
    pub fn add_node(
        &mut self,
        node_type: NodeType,
        spec: NodeSpec,
        tables: Vec<NodeTable>,
    ) -> Result<NodeHandle, NetworkError> {
        let node_id = match spec.node_id {
            Some(id) => {
                self.node_ids.ensure_free(id)?;
                id
            }
            None => self.node_ids.new_id()?,
        };

        let mut prepared = Vec::with_capacity(tables.len());
        for NodeTable { role, columns } in tables {
            let schema = node_type
                .schema(role)
                .ok_or(NetworkError::UnsupportedTable { node_type, role })?;
            let mut table = Table::from_columns(schema, columns)?;
            table.set_column("node_id", Value::from(node_id.0))?;
            prepared.push((role, table));
        }

        self.node_ids.reserve(node_id)?;
        let container = self
            .containers
            .entry(node_type)
            .or_insert_with(|| NodeContainer::new(node_type));
        container.push_node(node_id);
        for (role, table) in prepared {
            container.append(role, table)?;
        }
        let record = NodeRecord {
            node_id,
            node_type,
            name: spec.name,
            geometry: spec.geometry,
        };
        let handle = record.handle();
        self.node_index.insert(node_id, self.nodes.len());
        self.nodes.push(record);
        debug!(node_id = node_id.0, %node_type, "added node");
        Ok(handle)
    }

    /// Adds an edge `from → to`, inferring its type.
    ///
    /// Both handles must name stored nodes; the stored geometry is used for
    /// the default edge line.
    pub fn add_edge(
        &mut self,
        from: NodeHandle,
        to: NodeHandle,
        options: EdgeOptions,
    ) -> Result<EdgeHandle, NetworkError> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.edges.add(from, to, options)
    }

    fn resolve(&self, handle: NodeHandle) -> Result<NodeHandle, NetworkError> {
        self.handle(handle.node_id)
            .filter(|stored| stored.node_type == handle.node_type)
            .ok_or(NetworkError::NodeNotFound {
                node_id: handle.node_id,
                node_type: handle.node_type,
            })
    }

    /// Node `id` of `node_type`.
    pub fn node(&self, node_type: NodeType, id: impl Into<NodeId>) -> Option<NodeHandle> {
        self.handle(id.into())
            .filter(|h| h.node_type == node_type)
    }

    /// Node `id` of any type.
    pub fn handle(&self, id: NodeId) -> Option<NodeHandle> {
        self.record(id).map(NodeRecord::handle)
    }

    /// Stored record of node `id`.
    pub fn record(&self, id: NodeId) -> Option<&NodeRecord> {
        self.node_index.get(&id).and_then(|&i| self.nodes.get(i))
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    /// The edge table.
    pub const fn edges(&self) -> &EdgeTable {
        &self.edges
    }

    /// Node ids in use.
    pub const fn node_ids(&self) -> &UsedIds<NodeId> {
        &self.node_ids
    }

    /// Container of `node_type`, if any node or table of that type exists.
    pub fn container(&self, node_type: NodeType) -> Option<&NodeContainer> {
        self.containers.get(&node_type)
    }

    /// Containers in node type order.
    pub fn containers(&self) -> impl Iterator<Item = &NodeContainer> + '_ {
        self.containers.values()
    }

    /// Every attached table with its owner and role.
    pub fn tables(&self) -> impl Iterator<Item = (NodeType, TableRole, &Table)> + '_ {
        self.containers
            .values()
            .flat_map(|c| c.tables().map(move |(role, t)| (c.node_type(), role, t)))
    }

    /// Replaces the `role` table of `node_type` wholesale.
    pub fn replace_table(
        &mut self,
        node_type: NodeType,
        role: TableRole,
        table: Table,
    ) -> Result<Option<Table>, NetworkError> {
        let schema = node_type
            .schema(role)
            .ok_or(NetworkError::UnsupportedTable { node_type, role })?;
        if table.schema().name != schema.name {
            return Err(hydronet_schema::SchemaError::SchemaMismatch {
                expected: schema.name,
                found: table.schema().name,
            }
            .into());
        }
        let container = self
            .containers
            .entry(node_type)
            .or_insert_with(|| NodeContainer::new(node_type));
        Ok(container.replace(role, table))
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Runs every structural check over the committed graph.
    pub fn validate(&self) -> Result<(), NetworkError> {
        validate::validate(self).map_err(NetworkError::Validation)
    }

    /// Rebuilds a store from bulk data and validates it.
    ///
    /// Allocator state is derived from the imported ids.
    pub fn from_parts(
        nodes: Vec<NodeRecord>,
        edges: Vec<EdgeRecord>,
        tables: Vec<(NodeType, TableRole, Table)>,
    ) -> Result<Self, NetworkError> {
        let mut store = Self::new();
        for record in nodes {
            store.node_ids.reserve(record.node_id)?;
            store
                .containers
                .entry(record.node_type)
                .or_insert_with(|| NodeContainer::new(record.node_type))
                .push_node(record.node_id);
            store.node_index.insert(record.node_id, store.nodes.len());
            store.nodes.push(record);
        }
        store.edges = EdgeTable::from_records(edges)?;
        for (node_type, role, table) in tables {
            store.replace_table(node_type, role, table)?;
        }
        store.validate()?;
        info!(
            nodes = store.node_count(),
            edges = store.edge_count(),
            "imported network"
        );
        Ok(store)
    }

    /// Drops every node, edge and table and resets both allocators.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use hydronet_schema::Columns;

    use super::*;
    use crate::geometry::Point;

    fn basin_tables() -> Vec<NodeTable> {
        vec![
            NodeTable::new(
                TableRole::Profile,
                Columns::new()
                    .col("area", [0.01, 1000.0])
                    .col("level", [0.0, 1.0]),
            ),
            NodeTable::new(TableRole::State, Columns::new().scalar("level", 0.5)),
        ]
    }

    #[test]
    fn tables_are_stamped_with_the_node_id() {
        let mut g = GraphStore::new();
        g.add_node(NodeType::Basin, NodeSpec::new(3, Point::new(0.0, 0.0)), basin_tables())
            .unwrap();
        let profile = g.container(NodeType::Basin).unwrap().table(TableRole::Profile).unwrap();
        assert_eq!(profile.len(), 2);
        assert!(profile.column("node_id").all(|v| *v == Value::Int(3)));
    }

    #[test]
    fn ids_are_allocated_past_explicit_ones() {
        let mut g = GraphStore::new();
        g.add_node(NodeType::Terminal, NodeSpec::new(10, Point::new(0.0, 0.0)), vec![])
            .unwrap();
        let h = g
            .add_node(NodeType::Terminal, NodeSpec::at(Point::new(1.0, 0.0)), vec![])
            .unwrap();
        assert_eq!(h.node_id, NodeId(11));
        assert_eq!(g.node(NodeType::Terminal, 11), Some(h));
        assert_eq!(g.node(NodeType::Basin, 11), None);
    }

    #[test]
    fn rejected_node_leaves_no_trace() {
        let mut g = GraphStore::new();
        let bad = vec![NodeTable::new(
            TableRole::Profile,
            Columns::new().col("area", ["wide"]).col("level", [0.0]),
        )];
        let err = g
            .add_node(NodeType::Basin, NodeSpec::new(1, Point::new(0.0, 0.0)), bad)
            .unwrap_err();
        assert!(matches!(err, NetworkError::Schema(_)));
        assert_eq!(g.node_count(), 0);
        assert!(g.node_ids().is_empty());
        assert!(g.container(NodeType::Basin).is_none());

        let err = g
            .add_node(
                NodeType::Pump,
                NodeSpec::new(1, Point::new(0.0, 0.0)),
                vec![NodeTable::new(TableRole::Time, Columns::new())],
            )
            .unwrap_err();
        assert_eq!(
            err,
            NetworkError::UnsupportedTable {
                node_type: NodeType::Pump,
                role: TableRole::Time
            }
        );
        assert!(g.node_ids().is_empty());
    }

    #[test]
    fn duplicate_node_id_is_rejected() {
        let mut g = GraphStore::new();
        g.add_node(NodeType::Terminal, NodeSpec::new(1, Point::new(0.0, 0.0)), vec![])
            .unwrap();
        let err = g
            .add_node(NodeType::Basin, NodeSpec::new(1, Point::new(0.0, 0.0)), basin_tables())
            .unwrap_err();
        assert!(matches!(err, NetworkError::DuplicateIdentifier { id: 1, .. }));
        assert!(g.container(NodeType::Basin).is_none());
    }

    #[test]
    fn unknown_handles_are_refused() {
        let mut g = GraphStore::new();
        let basin = g
            .add_node(NodeType::Basin, NodeSpec::new(1, Point::new(0.0, 0.0)), basin_tables())
            .unwrap();
        let ghost = NodeHandle {
            node_id: NodeId(2),
            node_type: NodeType::Pump,
            geometry: Point::new(1.0, 0.0),
        };
        let err = g.add_edge(basin, ghost, EdgeOptions::new()).unwrap_err();
        assert_eq!(
            err,
            NetworkError::NodeNotFound {
                node_id: NodeId(2),
                node_type: NodeType::Pump
            }
        );
        let mislabelled = NodeHandle {
            node_type: NodeType::LevelBoundary,
            ..basin
        };
        assert!(g.add_edge(mislabelled, ghost, EdgeOptions::new()).is_err());
        assert!(g.edges().is_empty());
    }

    #[test]
    fn replace_table_checks_the_schema() {
        let mut g = GraphStore::new();
        g.add_node(NodeType::Basin, NodeSpec::new(1, Point::new(0.0, 0.0)), basin_tables())
            .unwrap();
        let state = Table::from_columns(
            &hydronet_schema::tables::BASIN_STATE,
            Columns::new().scalar("node_id", 1).scalar("level", 2.0),
        )
        .unwrap();
        let old = g
            .replace_table(NodeType::Basin, TableRole::State, state.clone())
            .unwrap()
            .unwrap();
        assert_eq!(old.rows()[0]["level"], Value::Float(0.5));
        assert!(matches!(
            g.replace_table(NodeType::Basin, TableRole::Profile, state),
            Err(NetworkError::Schema(_))
        ));
    }

    #[test]
    fn clear_resets_allocators() {
        let mut g = GraphStore::new();
        g.add_node(NodeType::Terminal, NodeSpec::new(4, Point::new(0.0, 0.0)), vec![])
            .unwrap();
        g.clear();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.node_ids().new_id().unwrap(), NodeId(1));
    }
}
