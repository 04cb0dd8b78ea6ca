// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical encoding and content hash of a network.
use blake3::Hash;
use ciborium::ser::into_writer;
use hydronet_schema::Row;
use serde::Serialize;

use crate::edge::EdgeRecord;
use crate::error::NetworkError;
use crate::graph::GraphStore;
use crate::node::NodeRecord;

/// 32-byte BLAKE3 digest.
pub type Hash32 = [u8; 32];

#[derive(Serialize)]
struct CanonicalTable {
    name: &'static str,
    rows: Vec<Row>,
}

#[derive(Serialize)]
struct CanonicalGraph<'a> {
    nodes: Vec<&'a NodeRecord>,
    edges: Vec<&'a EdgeRecord>,
    tables: Vec<CanonicalTable>,
}

impl GraphStore {
    /// CBOR encoding independent of insertion order.
    ///
    /// Nodes are sorted by id, edges by `(from, to, id)`, and tables by their
    /// persisted sort keys. Empty tables are omitted.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, NetworkError> {
        let mut nodes: Vec<_> = self.nodes().iter().collect();
        nodes.sort_by_key(|n| n.node_id);
        let mut edges: Vec<_> = self.edges().iter().collect();
        edges.sort_by_key(|e| (e.from_node_id, e.to_node_id, e.edge_id));
        let tables = self
            .tables()
            .filter(|(_, _, t)| !t.is_empty())
            .map(|(_, _, t)| CanonicalTable {
                name: t.schema().name,
                rows: t.sorted().into_rows(),
            })
            .collect();
        let g = CanonicalGraph {
            nodes,
            edges,
            tables,
        };
        let mut bytes = Vec::new();
        into_writer(&g, &mut bytes).map_err(|e| NetworkError::Encode(e.to_string()))?;
        Ok(bytes)
    }

    /// BLAKE3 hash of [`to_canonical_bytes`](Self::to_canonical_bytes).
    pub fn content_hash(&self) -> Result<Hash32, NetworkError> {
        let h: Hash = blake3::hash(&self.to_canonical_bytes()?);
        Ok(h.into())
    }
}
