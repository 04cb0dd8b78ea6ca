// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! hydronet-core: construction and validation of hydrological networks.
//!
//! A [`GraphStore`] holds typed nodes (basins, pumps, resistances, boundaries,
//! controllers) and the flow/control edges between them. Every
//! [`GraphStore::add_edge`] call infers the edge type, checks type
//! compatibility, identifier and endpoint uniqueness and the maximum degree
//! bounds before committing; a rejected call changes nothing.
//! [`GraphStore::validate`] re-checks the finished graph, including the
//! minimum degrees that cannot hold while a network is still being built.
//!
//! ```
//! use hydronet_core::{EdgeOptions, EdgeType, GraphStore, NodeSpec, NodeType, Point};
//!
//! let mut g = GraphStore::new();
//! let pid = g.add_node(NodeType::PidControl, NodeSpec::new(4, Point::new(0.0, 1.0)), vec![])?;
//! let pump = g.add_node(NodeType::Pump, NodeSpec::new(2, Point::new(0.0, 0.0)), vec![])?;
//! let edge = g.add_edge(pid, pump, EdgeOptions::new())?;
//! assert_eq!(edge.edge_type, EdgeType::Control);
//! # Ok::<(), hydronet_core::NetworkError>(())
//! ```

pub mod canonical;
pub mod config;
pub mod edge;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod ident;
pub mod model;
pub mod node;
pub mod node_type;
pub mod rules;
pub mod validate;

pub use canonical::Hash32;
pub use config::{ConfigError, ModelConfig};
pub use edge::{EdgeHandle, EdgeOptions, EdgeRecord, EdgeTable, EdgeType};
pub use error::NetworkError;
pub use geometry::{GeometryError, LineString, Point};
pub use graph::GraphStore;
pub use ident::{EdgeId, IdCategory, NodeId, UsedIds};
pub use model::Model;
pub use node::{NodeContainer, NodeHandle, NodeRecord, NodeSpec, NodeTable};
pub use node_type::{NodeType, TableRole};
pub use rules::{can_connect, Direction, NeighborBounds};
pub use validate::{ValidationReport, Violation};
