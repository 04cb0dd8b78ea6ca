// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for graph construction, validation and hashing.
use hydronet_schema::SchemaError;
use thiserror::Error;

use crate::edge::EdgeType;
use crate::geometry::GeometryError;
use crate::ident::{IdCategory, NodeId};
use crate::node_type::{NodeType, TableRole};
use crate::rules::Direction;
use crate::validate::ValidationReport;

/// Failure to build, import or encode a network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// `from` may not be upstream of `to`.
    #[error("{from} cannot be upstream of {to}")]
    IncompatibleNodeTypes {
        /// Type of the upstream node.
        from: NodeType,
        /// Type of the downstream node.
        to: NodeType,
    },
    /// An explicitly supplied id is already in use.
    #[error("{category} ids have to be unique, but {id} already exists")]
    DuplicateIdentifier {
        /// Id space.
        category: IdCategory,
        /// Offending id.
        id: u32,
    },
    /// An explicitly supplied id does not fit the persisted `int32` columns.
    #[error("{category} id {id} is out of range")]
    IdentifierOutOfRange {
        /// Id space.
        category: IdCategory,
        /// Offending id.
        id: u32,
    },
    /// No fresh id is left in the category.
    #[error("no {category} ids left to allocate")]
    IdentifierExhausted {
        /// Id space.
        category: IdCategory,
    },
    /// Adding the edge would exceed a maximum degree.
    #[error(
        "{node_type} #{node_id} can have at most {max} {edge_type} {direction}-neighbor(s), got {actual}"
    )]
    DegreeBoundExceeded {
        /// Node whose bound would be exceeded.
        node_id: NodeId,
        /// Its type.
        node_type: NodeType,
        /// Edge type being counted.
        edge_type: EdgeType,
        /// Side of the node.
        direction: Direction,
        /// Declared maximum.
        max: usize,
        /// Degree the edge would produce.
        actual: usize,
    },
    /// An edge between the same endpoints already exists.
    #[error("edges have to be unique, but an edge from node #{from} to node #{to} already exists")]
    DuplicateEdge {
        /// Upstream node.
        from: NodeId,
        /// Downstream node.
        to: NodeId,
    },
    /// A handle that does not resolve to a stored node.
    #[error("{node_type} #{node_id} does not exist in this network")]
    NodeNotFound {
        /// Requested id.
        node_id: NodeId,
        /// Requested type.
        node_type: NodeType,
    },
    /// A table role the node type does not own.
    #[error("{node_type} has no `{role}` table")]
    UnsupportedTable {
        /// Node type.
        node_type: NodeType,
        /// Requested role.
        role: TableRole,
    },
    /// An edge attribute that shadows a declared edge column.
    #[error("edge attribute `{0}` clashes with a reserved edge column")]
    ReservedColumn(String),
    /// An edge attribute whose value cannot be stored as a plain JSON cell.
    #[error("edge attribute `{name}` holds a {kind}, which cannot be stored")]
    UnsupportedAttribute {
        /// Attribute name.
        name: String,
        /// Kind of the offending value.
        kind: &'static str,
    },
    /// Text that names no node type.
    #[error("unknown node type `{0}`")]
    UnknownNodeType(String),
    /// Text that names no edge type.
    #[error("unknown edge type `{0}`")]
    UnknownEdgeType(String),
    /// Invalid geometry.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Attribute table rejected by its schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The committed graph breaks one or more structural rules.
    #[error("network validation failed: {0}")]
    Validation(ValidationReport),
    /// Canonical CBOR encoding failed.
    #[error("canonical encoding failed: {0}")]
    Encode(String),
}
