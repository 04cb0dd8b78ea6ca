// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node records, handles and per-type containers.
use std::collections::BTreeMap;

use hydronet_schema::{Columns, SchemaError, Table};
use serde::Serialize;

use crate::geometry::Point;
use crate::ident::NodeId;
use crate::node_type::{NodeType, TableRole};

/// Caller-side description of a node to add.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    /// Explicit id; allocated when absent.
    pub node_id: Option<NodeId>,
    /// Location.
    pub geometry: Point,
    /// Free-form label.
    pub name: String,
}

impl NodeSpec {
    /// Node with an explicit id at `geometry`.
    pub fn new(node_id: u32, geometry: Point) -> Self {
        Self {
            node_id: Some(NodeId(node_id)),
            geometry,
            name: String::new(),
        }
    }

    /// Node with an allocated id at `geometry`.
    pub fn at(geometry: Point) -> Self {
        Self {
            node_id: None,
            geometry,
            name: String::new(),
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// One attribute table passed to `add_node`.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTable {
    /// Which sub-table the rows belong to.
    pub role: TableRole,
    /// Column data; `node_id` is stamped on insert.
    pub columns: Columns,
}

impl NodeTable {
    /// Rows for the `role` table.
    pub const fn new(role: TableRole, columns: Columns) -> Self {
        Self { role, columns }
    }
}

/// A committed node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    /// Unique id.
    pub node_id: NodeId,
    /// Immutable type.
    pub node_type: NodeType,
    /// Label.
    pub name: String,
    /// Location.
    pub geometry: Point,
}

impl NodeRecord {
    /// Handle to this node.
    pub const fn handle(&self) -> NodeHandle {
        NodeHandle {
            node_id: self.node_id,
            node_type: self.node_type,
            geometry: self.geometry,
        }
    }
}

/// What edges are built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeHandle {
    /// Node id.
    pub node_id: NodeId,
    /// Node type.
    pub node_type: NodeType,
    /// Location, used for default edge geometry.
    pub geometry: Point,
}

/// Node ids and attribute tables of one node type.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeContainer {
    node_type: NodeType,
    node_ids: Vec<NodeId>,
    tables: BTreeMap<TableRole, Table>,
}

impl NodeContainer {
    /// Empty container for `node_type`.
    pub const fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            node_ids: Vec::new(),
            tables: BTreeMap::new(),
        }
    }

    /// Owning node type.
    pub const fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Ids of nodes of this type, in insertion order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Returns `true` if `id` is a node of this type.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node_ids.contains(&id)
    }

    /// The `role` table, if any rows were ever attached.
    pub fn table(&self, role: TableRole) -> Option<&Table> {
        self.tables.get(&role)
    }

    /// Attached tables in role order.
    pub fn tables(&self) -> impl Iterator<Item = (TableRole, &Table)> + '_ {
        self.tables.iter().map(|(role, table)| (*role, table))
    }

    pub(crate) fn push_node(&mut self, id: NodeId) {
        self.node_ids.push(id);
    }

    pub(crate) fn append(&mut self, role: TableRole, table: Table) -> Result<(), SchemaError> {
        match self.tables.get_mut(&role) {
            Some(existing) => existing.append(table),
            None => {
                self.tables.insert(role, table);
                Ok(())
            }
        }
    }

    pub(crate) fn replace(&mut self, role: TableRole, table: Table) -> Option<Table> {
        self.tables.insert(role, table)
    }
}
