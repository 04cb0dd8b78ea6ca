// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! hydronet-io: persists [`Model`]s as a TOML manifest plus JSON tables.
//!
//! Layout, relative to the manifest's directory:
//!
//! ```text
//! <name>.toml                       settings (written last)
//! <input_dir>/node.json             one row per node
//! <input_dir>/edge.json             one row per edge
//! <input_dir>/<type>_<role>.json    attribute tables, e.g. basin_profile.json
//! ```
//!
//! Geometries are WKT strings. Writing validates the model first and never
//! touches the store for an invalid one. Reading validates every table
//! against its schema and then the rebuilt graph.

pub mod error;
pub mod manifest;
pub mod records;
pub mod store;

use std::path::Path;

use hydronet_core::{GraphStore, Model, NodeType, TableRole};
use hydronet_schema::Table;
use tracing::{debug, info};

pub use error::IoError;
pub use manifest::Manifest;
pub use store::{FsStore, MemoryStore, StoreError, TableStore};

/// Store key of the node table.
pub const NODE_FILE: &str = "node.json";
/// Store key of the edge table.
pub const EDGE_FILE: &str = "edge.json";

/// File name of the `role` table of `node_type`.
pub fn table_file(node_type: NodeType, role: TableRole) -> String {
    format!("{}_{}.json", node_type.snake_name(), role.name())
}

fn key(input_dir: &Path, file: &str) -> String {
    let dir = input_dir.to_string_lossy();
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() || dir == "." {
        file.to_owned()
    } else {
        format!("{dir}/{file}")
    }
}

/// Splits `path` into its directory and manifest file name.
fn split_manifest_path(path: &Path) -> Result<(&Path, String), IoError> {
    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    match (is_toml, name) {
        (true, Some(name)) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            Ok((dir, name))
        }
        _ => Err(IoError::ManifestPath(path.to_path_buf())),
    }
}

/// Validates `model` and writes it to `path` (a `.toml` file).
pub fn write_model(model: &Model, path: &Path) -> Result<(), IoError> {
    let (dir, name) = split_manifest_path(path)?;
    model.config.validate()?;
    model.validate()?;
    let store = FsStore::new(dir)?;
    save_model(&store, &name, model)?;
    info!(path = %path.display(), "wrote model");
    Ok(())
}

/// Reads and validates the model whose manifest is `path`.
pub fn read_model(path: &Path) -> Result<Model, IoError> {
    let (dir, name) = split_manifest_path(path)?;
    let store = FsStore::new(dir)?;
    let model = load_model(&store, &name)?;
    info!(path = %path.display(), "read model");
    Ok(model)
}

/// Writes `model` into `store` with its manifest at `manifest_key`.
///
/// The model is validated before anything is stored. Table files of roles
/// that are now empty are removed, and the manifest is written last.
pub fn save_model<S: TableStore>(
    store: &S,
    manifest_key: &str,
    model: &Model,
) -> Result<(), IoError> {
    model.config.validate()?;
    model.validate()?;
    let graph = model.graph();
    let input_dir = model.config.input_dir.as_path();

    let mut blobs = Vec::new();
    let node_key = key(input_dir, NODE_FILE);
    blobs.push((
        records::encode_rows(&node_key, &records::node_rows(graph.nodes()))?,
        node_key,
    ));
    let edge_key = key(input_dir, EDGE_FILE);
    blobs.push((
        records::encode_rows(&edge_key, &records::edge_rows(graph.edges().records()))?,
        edge_key,
    ));
    for (node_type, role, table) in graph.tables() {
        if table.is_empty() {
            continue;
        }
        let table_key = key(input_dir, &table_file(node_type, role));
        let bytes = records::encode_rows(&table_key, table.sorted().rows())?;
        blobs.push((bytes, table_key));
    }
    let manifest = Manifest::new(model.config.clone()).to_toml()?;

    for node_type in NodeType::ALL {
        for &role in node_type.table_roles() {
            let stale = key(input_dir, &table_file(node_type, role));
            if !blobs.iter().any(|(_, k)| *k == stale) {
                store.remove(&stale)?;
            }
        }
    }
    for (bytes, blob_key) in &blobs {
        store.save_raw(blob_key, bytes)?;
        debug!(key = %blob_key, bytes = bytes.len(), "stored table");
    }
    store.save_raw(manifest_key, manifest.as_bytes())?;
    Ok(())
}

/// Reads the model whose manifest is stored at `manifest_key`.
pub fn load_model<S: TableStore>(store: &S, manifest_key: &str) -> Result<Model, IoError> {
    let text = String::from_utf8(store.load_raw(manifest_key)?)?;
    let manifest = Manifest::from_toml(&text)?;
    let input_dir = manifest.config.input_dir.as_path();

    let node_key = key(input_dir, NODE_FILE);
    let nodes = records::nodes_from_rows(
        &node_key,
        records::decode_rows(&node_key, &store.load_raw(&node_key)?)?,
    )?;
    let edge_key = key(input_dir, EDGE_FILE);
    let edges = records::edges_from_rows(
        &edge_key,
        records::decode_rows(&edge_key, &store.load_raw(&edge_key)?)?,
        &nodes,
    )?;

    let mut tables = Vec::new();
    for node_type in NodeType::ALL {
        for &role in node_type.table_roles() {
            let table_key = key(input_dir, &table_file(node_type, role));
            let bytes = match store.load_raw(&table_key) {
                Ok(bytes) => bytes,
                Err(StoreError::NotFound(_)) => continue,
                Err(err) => return Err(err.into()),
            };
            let Some(schema) = node_type.schema(role) else {
                continue;
            };
            let rows = records::decode_rows(&table_key, &bytes)?;
            tables.push((node_type, role, Table::from_rows(schema, rows)?));
        }
    }

    let graph = GraphStore::from_parts(nodes, edges, tables)?;
    Ok(Model::from_parts(manifest.config, graph))
}
