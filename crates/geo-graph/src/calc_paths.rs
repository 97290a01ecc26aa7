//! Topological orderings over the dependency DAG (spec §4.F), ported from
//! `pattern-core::graph::algorithms::topological_sort`'s iterative DFS with
//! explicit grey/black marks — generalized from that function's closures
//! over a `GraphQuery` to direct `HashMap<NodeId, Node>` lookups, since the
//! document owns its nodes outright rather than behind a query trait.

use std::collections::{HashMap, HashSet};

use crate::node::{Node, NodeId};

/// `sort(nodes)`: a permutation such that for every parent/child pair both
/// present in `nodes`, the parent precedes the child. Cycles are impossible
/// by construction (the document refuses to wire one), but are still
/// detected here defensively, returning `None` rather than panicking.
pub fn sort(nodes: &HashMap<NodeId, Node>, subset: &[NodeId]) -> Option<Vec<NodeId>> {
    let subset_set: HashSet<NodeId> = subset.iter().copied().collect();
    let mut in_stack: HashSet<NodeId> = HashSet::new();
    let mut done: HashSet<NodeId> = HashSet::new();
    let mut result = Vec::new();

    let forward_neighbors = |id: NodeId| -> Vec<NodeId> {
        nodes
            .get(&id)
            .map(|n| n.children.iter().copied().filter(|c| subset_set.contains(c)).collect())
            .unwrap_or_default()
    };

    for &start in subset {
        if done.contains(&start) {
            continue;
        }

        in_stack.insert(start);
        let mut stack: Vec<(NodeId, Vec<NodeId>, usize)> = vec![(start, forward_neighbors(start), 0)];

        while !stack.is_empty() {
            let cur_idx = stack.last().unwrap().2;
            let neighbors_len = stack.last().unwrap().1.len();

            if cur_idx < neighbors_len {
                let neighbor = stack.last().unwrap().1[cur_idx];
                stack.last_mut().unwrap().2 += 1;

                if in_stack.contains(&neighbor) {
                    return None; // back edge: cycle
                }
                if !done.contains(&neighbor) {
                    in_stack.insert(neighbor);
                    let next = forward_neighbors(neighbor);
                    stack.push((neighbor, next, 0));
                }
            } else {
                let (n, _, _) = stack.pop().unwrap();
                in_stack.remove(&n);
                done.insert(n);
                result.push(n);
            }
        }
    }

    result.reverse();
    Some(result)
}

/// The minimal sorted sequence of nodes reachable from any node in `from`
/// that must be brought up to date to recompute `to`; `from` itself is
/// excluded unless one of its members also lies on the path (spec §4.F).
pub fn descendants_in_order(nodes: &HashMap<NodeId, Node>, from: &[NodeId], to: NodeId) -> Vec<NodeId> {
    let mut reachable: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<NodeId> = from.to_vec();
    while let Some(id) = stack.pop() {
        if let Some(node) = nodes.get(&id) {
            for &child in &node.children {
                if reachable.insert(child) {
                    stack.push(child);
                }
            }
        }
    }
    if !reachable.contains(&to) {
        return Vec::new();
    }

    let mut subset: Vec<NodeId> = reachable.into_iter().collect();
    subset.sort_by_key(|id| id.0); // stable base order before topo sort
    sort(nodes, &subset).unwrap_or_default()
}

/// Every node strictly downstream of any node in `from`, sorted so each
/// precedes its own dependents — the full invalidation set a mutation at
/// `from` must recompute (spec §4.F), unlike `descendants_in_order` which
/// is gated on reaching a particular `to` and so excludes `from` itself
/// whenever `from == to`.
pub fn descendants_of(nodes: &HashMap<NodeId, Node>, from: &[NodeId]) -> Vec<NodeId> {
    let mut reachable: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<NodeId> = from.to_vec();
    while let Some(id) = stack.pop() {
        if let Some(node) = nodes.get(&id) {
            for &child in &node.children {
                if reachable.insert(child) {
                    stack.push(child);
                }
            }
        }
    }

    let mut subset: Vec<NodeId> = reachable.into_iter().collect();
    subset.sort_by_key(|id| id.0);
    sort(nodes, &subset).unwrap_or_default()
}
