// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::panic)]

use hydronet_core::{
    Direction, EdgeId, EdgeOptions, EdgeType, GraphStore, IdCategory, NetworkError, NodeHandle,
    NodeId, NodeSpec, NodeType, Point, Violation,
};
use hydronet_schema::Value;

fn add(g: &mut GraphStore, node_type: NodeType, id: u32) -> NodeHandle {
    let x = f64::from(id);
    g.add_node(node_type, NodeSpec::new(id, Point::new(x, 0.0)), vec![])
        .unwrap()
}

#[test]
fn basin_resistance_boundary_chain_is_flow() {
    let mut g = GraphStore::new();
    let basin = add(&mut g, NodeType::Basin, 1);
    let resistance = add(&mut g, NodeType::LinearResistance, 2);
    let boundary = add(&mut g, NodeType::LevelBoundary, 3);

    let e1 = g.add_edge(basin, resistance, EdgeOptions::new()).unwrap();
    let e2 = g.add_edge(resistance, boundary, EdgeOptions::new()).unwrap();

    assert_eq!((e1.edge_id, e1.edge_type), (EdgeId(1), EdgeType::Flow));
    assert_eq!((e2.edge_id, e2.edge_type), (EdgeId(2), EdgeType::Flow));
    g.validate().unwrap();
}

#[test]
fn controller_edges_are_control() {
    let mut g = GraphStore::new();
    let pump = add(&mut g, NodeType::Pump, 2);
    let pid = add(&mut g, NodeType::PidControl, 4);
    let edge = g.add_edge(pid, pump, EdgeOptions::new()).unwrap();
    assert_eq!(edge.edge_type, EdgeType::Control);
    assert_eq!(
        g.edges().degree(NodeId(2), Direction::In, EdgeType::Control),
        1
    );
    assert_eq!(g.edges().degree(NodeId(2), Direction::In, EdgeType::Flow), 0);
}

#[test]
fn repeated_pair_is_a_duplicate_edge() {
    let mut g = GraphStore::new();
    let basin = add(&mut g, NodeType::Basin, 1);
    let resistance = add(&mut g, NodeType::LinearResistance, 2);
    g.add_edge(basin, resistance, EdgeOptions::new()).unwrap();

    let err = g
        .add_edge(basin, resistance, EdgeOptions::new())
        .unwrap_err();
    assert_eq!(
        err,
        NetworkError::DuplicateEdge {
            from: NodeId(1),
            to: NodeId(2)
        }
    );
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.edges().used_ids().len(), 1);
}

#[test]
fn fractional_flow_has_a_single_outflow() {
    let mut g = GraphStore::new();
    let pump = add(&mut g, NodeType::Pump, 1);
    let fraction = add(&mut g, NodeType::FractionalFlow, 2);
    let terminal = add(&mut g, NodeType::Terminal, 3);
    let basin = add(&mut g, NodeType::Basin, 4);
    g.add_edge(pump, fraction, EdgeOptions::new()).unwrap();
    g.add_edge(fraction, terminal, EdgeOptions::new()).unwrap();

    let err = g.add_edge(fraction, basin, EdgeOptions::new()).unwrap_err();
    assert_eq!(
        err,
        NetworkError::DegreeBoundExceeded {
            node_id: NodeId(2),
            node_type: NodeType::FractionalFlow,
            edge_type: EdgeType::Flow,
            direction: Direction::Out,
            max: 1,
            actual: 2,
        }
    );
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn explicit_edge_id_cannot_be_reused() {
    let mut g = GraphStore::new();
    let basin = add(&mut g, NodeType::Basin, 1);
    let resistance = add(&mut g, NodeType::LinearResistance, 2);
    let boundary = add(&mut g, NodeType::LevelBoundary, 3);
    g.add_edge(basin, resistance, EdgeOptions::new().edge_id(5))
        .unwrap();

    let err = g
        .add_edge(resistance, boundary, EdgeOptions::new().edge_id(5))
        .unwrap_err();
    assert_eq!(
        err,
        NetworkError::DuplicateIdentifier {
            category: IdCategory::Edge,
            id: 5
        }
    );
    let kept = g.edges().get(EdgeId(5)).unwrap();
    assert_eq!((kept.from_node_id, kept.to_node_id), (NodeId(1), NodeId(2)));
    assert_eq!(g.edge_count(), 1);

    let next = g.add_edge(resistance, boundary, EdgeOptions::new()).unwrap();
    assert_eq!(next.edge_id, EdgeId(6));
}

#[test]
fn minimum_degree_is_only_checked_by_the_validator() {
    let mut g = GraphStore::new();
    let resistance = add(&mut g, NodeType::LinearResistance, 2);
    let boundary = add(&mut g, NodeType::LevelBoundary, 3);
    g.add_edge(resistance, boundary, EdgeOptions::new()).unwrap();

    let Err(NetworkError::Validation(report)) = g.validate() else {
        panic!("expected a validation failure");
    };
    assert_eq!(
        report.violations(),
        [Violation::DegreeBelowMinimum {
            node_id: NodeId(2),
            node_type: NodeType::LinearResistance,
            edge_type: EdgeType::Flow,
            direction: Direction::In,
            min: 1,
            actual: 0,
        }]
    );
}

#[test]
fn incompatible_types_are_rejected() {
    let mut g = GraphStore::new();
    let boundary = add(&mut g, NodeType::LevelBoundary, 1);
    let basin = add(&mut g, NodeType::Basin, 2);
    let err = g.add_edge(boundary, basin, EdgeOptions::new()).unwrap_err();
    assert_eq!(
        err,
        NetworkError::IncompatibleNodeTypes {
            from: NodeType::LevelBoundary,
            to: NodeType::Basin
        }
    );
    assert!(g.edges().is_empty());
    assert!(g.edges().used_ids().is_empty());
}

#[test]
fn edge_attributes_and_subnetwork_are_kept() {
    let mut g = GraphStore::new();
    let boundary = add(&mut g, NodeType::FlowBoundary, 1);
    let basin = add(&mut g, NodeType::Basin, 2);
    let h = g
        .add_edge(
            boundary,
            basin,
            EdgeOptions::new()
                .name("inlet")
                .subnetwork_id(2)
                .attribute("source", "river"),
        )
        .unwrap();
    let edge = g.edges().get(h.edge_id).unwrap();
    assert_eq!(edge.name, "inlet");
    assert_eq!(edge.subnetwork_id, Some(2));
    assert_eq!(edge.attributes["source"], Value::from("river"));
    assert_eq!(edge.geometry.points(), [Point::new(1.0, 0.0), Point::new(2.0, 0.0)]);
}
