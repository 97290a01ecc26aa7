//! The document (spec §3.3, §4.H, §4.I): node storage, selection, object
//! groups and the move/recalc cycle. Mirrors `pattern_graph.rs`'s choice to
//! let one owning struct hold every keyed collection rather than scatter
//! them across reference-counted nodes (Design Notes §9).

use std::collections::HashMap;

use geo_imp::value::ObjectImp;
use log::debug;

use crate::calc_paths;
use crate::error::GraphError;
use crate::node::{Node, NodeId, NodeKind};
use crate::object_type;

/// Per-node presentation state a view cares about but calc never reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Holder {
    pub shown: bool,
    pub selectable: bool,
    pub color: (u8, u8, u8),
}

impl Default for Holder {
    fn default() -> Self {
        Holder { shown: true, selectable: true, color: (0, 0, 255) }
    }
}

/// One reversible step recorded while an object group is open, so
/// `cancel_object_group` can undo exactly what `start_object_group` began
/// (spec §4.H: "no partial construction is ever left wired into the
/// document").
#[derive(Debug, Clone)]
enum EditOp {
    AddedNode(NodeId),
    AddedEdge { parent: NodeId, child: NodeId },
}

#[derive(Debug, Default)]
pub struct Document {
    nodes: HashMap<NodeId, Node>,
    holders: HashMap<NodeId, Holder>,
    next_id: u64,
    selection: Vec<NodeId>,
    journal: Option<Vec<EditOp>>,
}

impl Document {
    pub fn new() -> Self {
        Document {
            nodes: HashMap::new(),
            holders: HashMap::new(),
            next_id: 0,
            selection: Vec::new(),
            journal: None,
        }
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Exposes the raw node map to sibling modules (`hierarchy::Locus`)
    /// that need to run `calc_paths` queries without duplicating storage.
    pub(crate) fn nodes_for_calc_paths(&self) -> &HashMap<NodeId, Node> {
        &self.nodes
    }

    pub fn imp(&self, id: NodeId) -> Option<&ObjectImp> {
        self.nodes.get(&id).map(|n| &n.imp)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn record(&mut self, op: EditOp) {
        if let Some(j) = self.journal.as_mut() {
            j.push(op);
        }
    }

    fn insert_node(&mut self, node: Node) -> NodeId {
        let id = self.fresh_id();
        for &parent in &node.parents {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.add_child(id);
            }
        }
        self.nodes.insert(id, node);
        self.holders.insert(id, Holder::default());
        self.record(EditOp::AddedNode(id));
        id
    }

    /// Adds a free Data node holding `imp` directly (spec §3.2: the only
    /// kind of node with no parents).
    pub fn add_data(&mut self, imp: ObjectImp) -> NodeId {
        self.insert_node(Node::new_data(imp))
    }

    /// Adds a Property node reading `index` off `parent`'s current Imp.
    pub fn add_property(&mut self, parent: NodeId, index: usize) -> Result<NodeId, GraphError> {
        if !self.nodes.contains_key(&parent) {
            return Err(GraphError::NoSuchNode { id: parent.0 });
        }
        let id = self.insert_node(Node::new_property(parent, index));
        self.recalc_from(id);
        Ok(id)
    }

    /// Adds a Typed node computed by `type_name` over `parents`, runs it
    /// once, and returns its id.
    pub fn add_typed(&mut self, type_name: &'static str, parents: Vec<NodeId>) -> Result<NodeId, GraphError> {
        for &p in &parents {
            if !self.nodes.contains_key(&p) {
                return Err(GraphError::NoSuchNode { id: p.0 });
            }
        }
        object_type::lookup(type_name).ok_or_else(|| GraphError::UnknownObjectType { name: type_name.to_string() })?;
        let id = self.insert_node(Node::new_typed(type_name, parents));
        self.recalc_from(id);
        Ok(id)
    }

    /// Wires an extra parent/child edge onto an already-created node
    /// (needed when an `ObjectHierarchy`-backed macro discovers a shared
    /// ancestor after the fact). Refuses if it would close a cycle.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId) -> Result<(), GraphError> {
        if !self.nodes.contains_key(&parent) {
            return Err(GraphError::NoSuchNode { id: parent.0 });
        }
        if !self.nodes.contains_key(&child) {
            return Err(GraphError::NoSuchNode { id: child.0 });
        }
        if calc_paths::descendants_in_order(&self.nodes, &[child], parent).contains(&parent) || child == parent {
            return Err(GraphError::WouldCreateCycle { id: child.0 });
        }
        self.nodes.get_mut(&parent).unwrap().add_child(child);
        self.nodes.get_mut(&child).unwrap().parents.push(parent);
        self.record(EditOp::AddedEdge { parent, child });
        self.recalc_from(child);
        Ok(())
    }

    fn undo(&mut self, op: EditOp) {
        match op {
            EditOp::AddedNode(id) => {
                if let Some(node) = self.nodes.remove(&id) {
                    for parent in node.parents {
                        if let Some(p) = self.nodes.get_mut(&parent) {
                            p.del_child(id);
                        }
                    }
                }
                self.holders.remove(&id);
                self.selection.retain(|s| *s != id);
            }
            EditOp::AddedEdge { parent, child } => {
                if let Some(p) = self.nodes.get_mut(&parent) {
                    p.del_child(child);
                }
                if let Some(c) = self.nodes.get_mut(&child) {
                    c.parents.retain(|p| *p != parent);
                }
            }
        }
    }

    /// Recomputes every Typed/Property node reachable from `from`, in
    /// dependency order, by calling the `ObjectType` it names with its
    /// parents' current Imps (spec §4.F).
    fn recalc_from(&mut self, from: NodeId) {
        let mut order = calc_paths::descendants_of(&self.nodes, &[from]);
        order.insert(0, from);
        for id in order {
            self.recalc_one(id);
        }
    }

    fn recalc_one(&mut self, id: NodeId) {
        let kind = match self.nodes.get(&id) {
            Some(n) => n.kind.clone(),
            None => return,
        };
        let new_imp = match kind {
            NodeKind::Data => return, // Data nodes are only ever set directly.
            NodeKind::Property { index } => {
                let parent = self.nodes[&id].parents[0];
                self.nodes.get(&parent).map(|p| p.imp.property(index)).unwrap_or(ObjectImp::Invalid)
            }
            NodeKind::Typed { type_name } => {
                let parent_imps: Vec<ObjectImp> =
                    self.nodes[&id].parents.iter().map(|p| self.nodes[p].imp.clone()).collect();
                match object_type::lookup(type_name) {
                    Some(ty) => ty.calc(&parent_imps, self),
                    None => ObjectImp::Invalid,
                }
            }
        };
        debug!("recalculated node {:?}", id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.imp = new_imp;
        }
    }

    /// Directly mutates a Data node's scalar Imp by `delta` and propagates
    /// the change, the single entry point every `ObjectType::move_by`
    /// implementation uses (spec §4.E).
    pub fn translate_data(&mut self, id: NodeId, delta: f64) {
        let children = match self.nodes.get_mut(&id) {
            Some(node) if matches!(node.kind, NodeKind::Data) => {
                if let ObjectImp::Double(d) = &mut node.imp {
                    d.0 += delta;
                }
                node.children.clone()
            }
            _ => return,
        };
        for child in children {
            self.recalc_from(child);
        }
    }

    pub fn select(&mut self, id: NodeId) {
        if self.nodes.contains_key(&id) && !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Opens a pending-edit journal; every `add_*`/`add_edge` call until
    /// `finish_object_group`/`cancel_object_group` is recorded (spec §4.H).
    pub fn start_object_group(&mut self) {
        self.journal = Some(Vec::new());
    }

    pub fn finish_object_group(&mut self) {
        self.journal = None;
    }

    /// Unwinds every edit recorded since `start_object_group`, in reverse
    /// order, leaving the document exactly as it was.
    pub fn cancel_object_group(&mut self) {
        if let Some(ops) = self.journal.take() {
            for op in ops.into_iter().rev() {
                self.undo(op);
            }
        }
    }

    /// The topmost selectable, shown node whose `surrounding_rect` contains
    /// `coord`, or whose Imp reports itself at that point, used to decide
    /// what a click landed on (spec §4.H).
    pub fn what_am_i_on(&self, coord: geo_imp::Coordinate, threshold: f64) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for (&id, node) in &self.nodes {
            let Some(holder) = self.holders.get(&id) else { continue };
            if !holder.shown || !holder.selectable {
                continue;
            }
            if !node.imp.valid() {
                continue;
            }
            let Some(rect) = node.imp.surrounding_rect() else { continue };
            let dx = (coord.x - (rect.left + rect.width / 2.0)).max(0.0);
            let dy = (coord.y - (rect.top + rect.height / 2.0)).max(0.0);
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= threshold && best.map(|(_, d)| dist < d).unwrap_or(true) {
                best = Some((id, dist));
            }
        }
        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_imp::value::DoubleImp;

    #[test]
    fn add_typed_computes_immediately() {
        let mut doc = Document::new();
        let x = doc.add_data(ObjectImp::Double(DoubleImp(1.0)));
        let y = doc.add_data(ObjectImp::Double(DoubleImp(2.0)));
        let p = doc.add_typed("FixedPoint", vec![x, y]).unwrap();
        let imp = doc.imp(p).unwrap();
        assert!(matches!(imp, ObjectImp::Point(_)));
    }

    #[test]
    fn translate_data_propagates_to_dependents() {
        let mut doc = Document::new();
        let x = doc.add_data(ObjectImp::Double(DoubleImp(0.0)));
        let y = doc.add_data(ObjectImp::Double(DoubleImp(0.0)));
        let p = doc.add_typed("FixedPoint", vec![x, y]).unwrap();
        doc.translate_data(x, 5.0);
        match doc.imp(p).unwrap() {
            ObjectImp::Point(pt) => assert_eq!(pt.coord.x, 5.0),
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn add_edge_refuses_a_cycle() {
        let mut doc = Document::new();
        let x = doc.add_data(ObjectImp::Double(DoubleImp(0.0)));
        let y = doc.add_data(ObjectImp::Double(DoubleImp(0.0)));
        let p = doc.add_typed("FixedPoint", vec![x, y]).unwrap();
        assert!(doc.add_edge(p, x).is_err());
    }

    #[test]
    fn cancel_object_group_undoes_every_recorded_edit() {
        let mut doc = Document::new();
        let before = doc.len();
        doc.start_object_group();
        let x = doc.add_data(ObjectImp::Double(DoubleImp(0.0)));
        let y = doc.add_data(ObjectImp::Double(DoubleImp(0.0)));
        let _p = doc.add_typed("FixedPoint", vec![x, y]).unwrap();
        doc.cancel_object_group();
        assert_eq!(doc.len(), before);
    }

    #[test]
    fn finish_object_group_keeps_the_edits() {
        let mut doc = Document::new();
        doc.start_object_group();
        let x = doc.add_data(ObjectImp::Double(DoubleImp(0.0)));
        doc.finish_object_group();
        assert!(doc.node(x).is_some());
    }
}
