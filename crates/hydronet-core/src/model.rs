// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! A network together with its global settings.
use hydronet_schema::{Table, Timestamp};

use crate::config::{ConfigError, ModelConfig};
use crate::edge::{EdgeHandle, EdgeOptions};
use crate::error::NetworkError;
use crate::graph::GraphStore;
use crate::node::{NodeHandle, NodeSpec, NodeTable};
use crate::node_type::{NodeType, TableRole};

/// Settings plus network; the unit that is written and read.
#[derive(Debug, Clone)]
pub struct Model {
    /// Global settings.
    pub config: ModelConfig,
    graph: GraphStore,
}

impl Model {
    /// Empty model simulating `starttime..endtime`.
    pub fn new(starttime: Timestamp, endtime: Timestamp) -> Result<Self, ConfigError> {
        Ok(Self {
            config: ModelConfig::new(starttime, endtime)?,
            graph: GraphStore::new(),
        })
    }

    /// Joins settings and an already built network.
    pub fn from_parts(config: ModelConfig, graph: GraphStore) -> Self {
        Self { config, graph }
    }

    /// The network.
    pub const fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// See [`GraphStore::add_node`].
    pub fn add_node(
        &mut self,
        node_type: NodeType,
        spec: NodeSpec,
        tables: Vec<NodeTable>,
    ) -> Result<NodeHandle, NetworkError> {
        self.graph.add_node(node_type, spec, tables)
    }

    /// See [`GraphStore::add_edge`].
    pub fn add_edge(
        &mut self,
        from: NodeHandle,
        to: NodeHandle,
        options: EdgeOptions,
    ) -> Result<EdgeHandle, NetworkError> {
        self.graph.add_edge(from, to, options)
    }

    /// See [`GraphStore::node`].
    pub fn node(&self, node_type: NodeType, id: u32) -> Option<NodeHandle> {
        self.graph.node(node_type, id)
    }

    /// See [`GraphStore::replace_table`].
    pub fn replace_table(
        &mut self,
        node_type: NodeType,
        role: TableRole,
        table: Table,
    ) -> Result<Option<Table>, NetworkError> {
        self.graph.replace_table(node_type, role, table)
    }

    /// Validates the network.
    pub fn validate(&self) -> Result<(), NetworkError> {
        self.graph.validate()
    }
}
