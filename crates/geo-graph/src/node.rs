//! Graph node storage (spec §3.2, §4.D). Nodes are **not** reference-counted
//! structs wired by pointer — per Design Notes §9, the [`crate::document::Document`]
//! owns every node in a `HashMap<NodeId, Node>` and edges are plain `NodeId`
//! lists, the same keyed-container shape `pattern_graph.rs` uses for its six
//! `HashMap<V::Id, Pattern<V>>` collections.

use geo_imp::value::ObjectImp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// What kind of computation produces this node's Imp.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A leaf free parameter, set directly by the mutator (spec §3.2).
    Data,
    /// A derived single-parent view: `imp = parent.imp.property(index)`.
    Property { index: usize },
    /// An n-ary computation dispatched through the `ObjectType` registry.
    Typed { type_name: &'static str },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Ordered; meaning is type-dependent (spec §3.2).
    pub parents: Vec<NodeId>,
    /// Insertion-unique.
    pub children: Vec<NodeId>,
    pub imp: ObjectImp,
}

impl Node {
    pub fn new_data(imp: ObjectImp) -> Self {
        Node {
            kind: NodeKind::Data,
            parents: Vec::new(),
            children: Vec::new(),
            imp,
        }
    }

    pub fn new_property(parent: NodeId, index: usize) -> Self {
        Node {
            kind: NodeKind::Property { index },
            parents: vec![parent],
            children: Vec::new(),
            imp: ObjectImp::Invalid,
        }
    }

    pub fn new_typed(type_name: &'static str, parents: Vec<NodeId>) -> Self {
        Node {
            kind: NodeKind::Typed { type_name },
            parents,
            children: Vec::new(),
            imp: ObjectImp::Invalid,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.kind, NodeKind::Data | NodeKind::Property { .. })
    }

    pub(crate) fn add_child(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn del_child(&mut self, child: NodeId) {
        self.children.retain(|c| *c != child);
    }
}
