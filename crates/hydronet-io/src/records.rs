// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Conversion between JSON row arrays, schema rows and graph records.
use std::collections::BTreeMap;

use hydronet_core::{
    EdgeId, EdgeRecord, EdgeType, LineString, NetworkError, NodeId, NodeRecord, NodeType, Point,
};
use hydronet_schema::{tables, Row, Table, Value};
use serde_json::Value as Json;

use crate::error::IoError;

/// Encodes rows as a pretty-printed JSON array of objects.
pub fn encode_rows(key: &str, rows: &[Row]) -> Result<Vec<u8>, IoError> {
    serde_json::to_vec_pretty(rows).map_err(|source| IoError::Json {
        key: key.to_owned(),
        source,
    })
}

/// Decodes a JSON array of objects into untyped rows.
pub fn decode_rows(key: &str, bytes: &[u8]) -> Result<Vec<Row>, IoError> {
    let objects: Vec<serde_json::Map<String, Json>> =
        serde_json::from_slice(bytes).map_err(|source| IoError::Json {
            key: key.to_owned(),
            source,
        })?;
    objects
        .into_iter()
        .map(|object| {
            object
                .into_iter()
                .map(|(column, json)| Ok::<_, IoError>((column, cell(key, json)?)))
                .collect()
        })
        .collect()
}

fn cell(key: &str, json: Json) -> Result<Value, IoError> {
    Ok(match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().ok_or_else(|| invalid(key, "unrepresentable number"))?),
        },
        Json::String(s) => Value::Str(s),
        Json::Array(_) | Json::Object(_) => {
            return Err(invalid(key, "nested values are not supported"))
        }
    })
}

fn invalid(key: &str, message: impl Into<String>) -> IoError {
    IoError::InvalidRecord {
        key: key.to_owned(),
        message: message.into(),
    }
}

/// Node records as `Node` table rows.
pub fn node_rows(nodes: &[NodeRecord]) -> Vec<Row> {
    nodes
        .iter()
        .map(|n| {
            Row::from([
                ("node_id".to_owned(), Value::from(n.node_id.0)),
                ("node_type".to_owned(), Value::from(n.node_type.name())),
                ("name".to_owned(), Value::from(n.name.as_str())),
                ("geometry".to_owned(), Value::from(n.geometry.to_string())),
            ])
        })
        .collect()
}

/// Edge records as `Edge` table rows; attributes become extra columns.
pub fn edge_rows(edges: &[EdgeRecord]) -> Vec<Row> {
    edges
        .iter()
        .map(|e| {
            let mut row = e.attributes.clone();
            row.extend([
                ("edge_id".to_owned(), Value::from(e.edge_id.0)),
                ("name".to_owned(), Value::from(e.name.as_str())),
                ("from_node_id".to_owned(), Value::from(e.from_node_id.0)),
                ("to_node_id".to_owned(), Value::from(e.to_node_id.0)),
                ("edge_type".to_owned(), Value::from(e.edge_type.name())),
                ("subnetwork_id".to_owned(), Value::from(e.subnetwork_id)),
                ("geometry".to_owned(), Value::from(e.geometry.to_string())),
            ]);
            row
        })
        .collect()
}

fn id(key: &str, row: &Row, column: &str) -> Result<u32, IoError> {
    row.get(column)
        .and_then(Value::as_i64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| invalid(key, format!("`{column}` must be a non-negative integer")))
}

fn text<'r>(key: &str, row: &'r Row, column: &str) -> Result<&'r str, IoError> {
    row.get(column)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(key, format!("`{column}` must be a string")))
}

/// Validates `Node` rows and turns them into records.
pub fn nodes_from_rows(key: &str, rows: Vec<Row>) -> Result<Vec<NodeRecord>, IoError> {
    let table = Table::from_rows(&tables::NODE, rows)?;
    table
        .rows()
        .iter()
        .map(|row| {
            Ok::<_, IoError>(NodeRecord {
                node_id: NodeId(id(key, row, "node_id")?),
                node_type: text(key, row, "node_type")?.parse::<NodeType>()?,
                name: text(key, row, "name")?.to_owned(),
                geometry: text(key, row, "geometry")?
                    .parse::<Point>()
                    .map_err(NetworkError::from)?,
            })
        })
        .collect()
}

/// Validates `Edge` rows and turns them into records.
///
/// A null geometry is replaced by the straight segment between the endpoint
/// nodes found in `nodes`.
pub fn edges_from_rows(
    key: &str,
    rows: Vec<Row>,
    nodes: &[NodeRecord],
) -> Result<Vec<EdgeRecord>, IoError> {
    let points: BTreeMap<NodeId, Point> = nodes.iter().map(|n| (n.node_id, n.geometry)).collect();
    let table = Table::from_rows(&tables::EDGE, rows)?;
    table
        .into_rows()
        .into_iter()
        .map(|mut row| {
            let from_node_id = NodeId(id(key, &row, "from_node_id")?);
            let to_node_id = NodeId(id(key, &row, "to_node_id")?);
            let geometry = match row.get("geometry").and_then(Value::as_str) {
                Some(wkt) => wkt.parse::<LineString>().map_err(NetworkError::from)?,
                None => match (points.get(&from_node_id), points.get(&to_node_id)) {
                    (Some(&a), Some(&b)) => LineString::segment(a, b),
                    _ => return Err(invalid(key, "edge without geometry or endpoints")),
                },
            };
            let subnetwork_id = match row.get("subnetwork_id") {
                Some(Value::Null) | None => None,
                Some(_) => Some(id(key, &row, "subnetwork_id")?),
            };
            let record = EdgeRecord {
                edge_id: EdgeId(id(key, &row, "edge_id")?),
                from_node_id,
                to_node_id,
                edge_type: text(key, &row, "edge_type")?.parse::<EdgeType>()?,
                name: text(key, &row, "name")?.to_owned(),
                subnetwork_id,
                geometry,
                attributes: BTreeMap::new(),
            };
            row.retain(|column, _| !tables::EDGE.has_column(column));
            Ok(EdgeRecord {
                attributes: row,
                ..record
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn json_cells_keep_int_float_distinction() {
        let rows = decode_rows("t", br#"[{"a": 1, "b": 1.0, "c": null, "d": "x"}]"#).unwrap();
        assert_eq!(rows[0]["a"], Value::Int(1));
        assert_eq!(rows[0]["b"], Value::Float(1.0));
        assert_eq!(rows[0]["c"], Value::Null);
        assert_eq!(rows[0]["d"], Value::from("x"));
        assert!(decode_rows("t", br#"[{"a": [1]}]"#).is_err());
    }

    #[test]
    fn node_rows_round_trip() {
        let nodes = vec![NodeRecord {
            node_id: NodeId(3),
            node_type: NodeType::Pump,
            name: "p".into(),
            geometry: Point::new(0.25, -1.0),
        }];
        let bytes = encode_rows("node.json", &node_rows(&nodes)).unwrap();
        let back = nodes_from_rows("node.json", decode_rows("node.json", &bytes).unwrap()).unwrap();
        assert_eq!(back, nodes);
    }

    #[test]
    fn missing_edge_geometry_is_synthesized() {
        let nodes = vec![
            NodeRecord {
                node_id: NodeId(1),
                node_type: NodeType::Basin,
                name: String::new(),
                geometry: Point::new(0.0, 0.0),
            },
            NodeRecord {
                node_id: NodeId(2),
                node_type: NodeType::Pump,
                name: String::new(),
                geometry: Point::new(1.0, 1.0),
            },
        ];
        let rows = decode_rows(
            "edge.json",
            br#"[{"edge_id": 1, "from_node_id": 1, "to_node_id": 2, "note": "x"}]"#,
        )
        .unwrap();
        let edges = edges_from_rows("edge.json", rows, &nodes).unwrap();
        assert_eq!(edges[0].edge_type, EdgeType::Flow);
        assert_eq!(
            edges[0].geometry,
            LineString::segment(Point::new(0.0, 0.0), Point::new(1.0, 1.0))
        );
        assert_eq!(edges[0].attributes["note"], Value::from("x"));
        assert_eq!(edges[0].subnetwork_id, None);
    }

    #[test]
    fn malformed_geometry_is_a_geometry_error() {
        let rows = decode_rows(
            "node.json",
            br#"[{"node_id": 1, "node_type": "Basin", "name": "", "geometry": "POINT (1)"}]"#,
        )
        .unwrap();
        let err = nodes_from_rows("node.json", rows).unwrap_err();
        assert!(matches!(err, IoError::Network(NetworkError::Geometry(_))));
    }
}
