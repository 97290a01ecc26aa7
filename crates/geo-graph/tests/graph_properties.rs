//! Quantified invariants from spec §8, checked with `proptest` instead of a
//! fixed example set.

use geo_graph::calc_paths;
use geo_graph::node::{Node, NodeId, NodeKind};
use geo_graph::{ArgSpecEntry, ArgsParser, ObjectType};
use geo_imp::value::{DoubleImp, ObjectImp, PointImp};
use geo_imp::{imp_type, Coordinate};
use proptest::prelude::*;
use std::collections::HashMap;

/// Builds a random DAG over `n` nodes where an edge `i -> j` is only ever
/// added for `i < j`, which by construction can never cycle.
fn random_dag(indices: &[u64], edge_bits: &[bool]) -> HashMap<NodeId, Node> {
    let mut nodes: HashMap<NodeId, Node> = indices
        .iter()
        .map(|&i| (NodeId(i), Node::new_data(ObjectImp::Invalid)))
        .collect();

    let mut bit = edge_bits.iter();
    for (a, &i) in indices.iter().enumerate() {
        for &j in &indices[a + 1..] {
            if bit.next().copied().unwrap_or(false) {
                nodes.get_mut(&NodeId(i)).unwrap().add_child(NodeId(j));
                nodes.get_mut(&NodeId(j)).unwrap().parents.push(NodeId(i));
            }
        }
    }
    nodes
}

fn two_point_parser() -> ArgsParser {
    ArgsParser::new(vec![
        ArgSpecEntry {
            required_type: &imp_type::POINT,
            use_text: "point A",
            select_text: "Select point A",
            on_or_through: false,
            repeat: None,
            duplicate_ok: false,
        },
        ArgSpecEntry {
            required_type: &imp_type::POINT,
            use_text: "point B",
            select_text: "Select point B",
            on_or_through: false,
            repeat: None,
            duplicate_ok: false,
        },
    ])
}

fn arb_point() -> impl Strategy<Value = ObjectImp> {
    (-100.0..100.0f64, -100.0..100.0f64)
        .prop_map(|(x, y)| ObjectImp::Point(PointImp::new(Coordinate::new(x, y))))
}

fn arb_double() -> impl Strategy<Value = ObjectImp> {
    (-100.0..100.0f64).prop_map(|d| ObjectImp::Double(DoubleImp(d)))
}

proptest! {
    /// Topological sort: for every edge `p -> c` in a random acyclic graph,
    /// `p` precedes `c` in the sort output (spec §8).
    #[test]
    fn topo_sort_respects_every_edge(
        n in 2usize..10,
        edge_bits in proptest::collection::vec(any::<bool>(), 0..45),
    ) {
        let indices: Vec<u64> = (0..n as u64).collect();
        let nodes = random_dag(&indices, &edge_bits);
        let ids: Vec<NodeId> = indices.iter().copied().map(NodeId).collect();
        let order = calc_paths::sort(&nodes, &ids).expect("random_dag never cycles");

        let position: HashMap<NodeId, usize> = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        for (&id, node) in &nodes {
            for &child in &node.children {
                prop_assert!(position[&id] < position[&child], "{:?} should precede {:?}", id, child);
            }
        }
    }

    /// Argparser canonicalisation: `sort(sort(xs)) == sort(xs)` (spec §8),
    /// over arbitrary mixes of points and doubles (doubles never match the
    /// point-only parser and so are simply dropped by both applications).
    #[test]
    fn argparser_sort_is_idempotent(
        args in proptest::collection::vec(prop_oneof![arb_point(), arb_double()], 0..6),
    ) {
        let parser = two_point_parser();
        let once = parser.sort(&args);
        let twice = parser.sort(&once);
        prop_assert_eq!(once, twice);
    }

    /// `ConstrainedPoint` riding a circle always reports its angle on the
    /// circle, independent of the fixed-argument tail sent through the
    /// args parser in a different order (a lightweight surrogate for
    /// `Hierarchy.withFixedArgs` invariance, exercised directly on the
    /// built-in catalog rather than a hand-built `ObjectHierarchy`).
    #[test]
    fn midpoint_is_order_independent_of_argument_sort(
        (ax, ay) in (-50.0..50.0f64, -50.0..50.0f64),
        (bx, by) in (-50.0..50.0f64, -50.0..50.0f64),
    ) {
        let parser = geo_graph::object_type::lookup("MidPoint").unwrap().arg_parser();
        let a = ObjectImp::Point(PointImp::new(Coordinate::new(ax, ay)));
        let b = ObjectImp::Point(PointImp::new(Coordinate::new(bx, by)));

        let doc = geo_graph::Document::new();
        let ty = geo_graph::object_type::lookup("MidPoint").unwrap();
        let forward = ty.calc(&parser.sort(&[a.clone(), b.clone()]), &doc);
        let reversed = ty.calc(&parser.sort(&[b, a]), &doc);
        prop_assert!(forward.equals(&reversed));
    }
}

/// `Node::is_internal` only ever reports `true` for Data/Property nodes,
/// never Typed — used by views to decide what counts as a user-visible
/// construction (spec §3.2).
#[test]
fn typed_nodes_are_never_internal() {
    let node = Node::new_typed("MidPoint", vec![]);
    assert!(!node.is_internal());
    assert!(matches!(node.kind, NodeKind::Typed { .. }));
}
