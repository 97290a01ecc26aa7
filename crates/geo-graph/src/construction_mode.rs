//! Construction mode (spec §4.H): the speculative state a view drives while
//! the user is still picking arguments for a new object. Nothing here ever
//! touches the document until `commit` — mirrors `pattern-core::reconcile`'s
//! separation of "propose a merge" from "apply it".

use geo_imp::value::ObjectImp;
use geo_imp::Coordinate;

use crate::args_parser::{ArgsParser, CheckResult};
use crate::document::Document;
use crate::node::NodeId;
use crate::object_type;

/// A speculative extra argument: either a fully resolved existing node, or
/// a hypothetical point hovering at a screen coordinate that isn't bound to
/// anything yet.
#[derive(Debug, Clone)]
pub enum Hypothesis {
    Existing(NodeId, ObjectImp),
    Cursor(Coordinate),
}

impl Hypothesis {
    fn as_imp(&self) -> ObjectImp {
        match self {
            Hypothesis::Existing(_, imp) => imp.clone(),
            Hypothesis::Cursor(c) => ObjectImp::Point(geo_imp::value::PointImp::new(*c)),
        }
    }
}

/// Tracks the in-progress argument list for one `ObjectType` under
/// construction. `parents` are committed selections; `cursor` is the
/// not-yet-selected hypothesis currently hovering under the pointer.
pub struct ConstructionMode {
    type_name: &'static str,
    parser: ArgsParser,
    parents: Vec<(NodeId, ObjectImp)>,
    cursor: Option<Hypothesis>,
}

impl ConstructionMode {
    /// Opens the document's object group journal so every node the cursor
    /// hypothesis materializes can be unwound by `cancel` (spec §4.H).
    pub fn new(type_name: &'static str, doc: &mut Document) -> Option<Self> {
        let ty = object_type::lookup(type_name)?;
        doc.start_object_group();
        Some(ConstructionMode { type_name, parser: ty.arg_parser(), parents: Vec::new(), cursor: None })
    }

    /// Ranks the hypothetical extension of `parents` by `hypothesis`,
    /// without mutating any committed state (spec §4.H: "pendingPoint and
    /// cursorPoint are hypotheses, ranked Complete > Valid > Invalid").
    pub fn check_with(&self, hypothesis: &Hypothesis) -> CheckResult {
        let mut imps: Vec<ObjectImp> = self.parents.iter().map(|(_, imp)| imp.clone()).collect();
        imps.push(hypothesis.as_imp());
        self.parser.check(&imps)
    }

    pub fn set_cursor(&mut self, hypothesis: Hypothesis) {
        self.cursor = Some(hypothesis);
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Commits the cursor hypothesis as a real parent if doing so keeps
    /// the parser at `Valid` or `Complete`; otherwise does nothing (spec
    /// §4.H: a left-release that would make the construction `Invalid` is
    /// a no-op, not a partial commit).
    pub fn accept_cursor(&mut self, doc: &mut Document) -> bool {
        let Some(hyp) = self.cursor.take() else { return false };
        let check = self.check_with(&hyp);
        if check == CheckResult::Invalid {
            self.cursor = Some(hyp);
            return false;
        }
        let (id, imp) = match hyp {
            Hypothesis::Existing(id, imp) => (id, imp),
            Hypothesis::Cursor(c) => {
                let imp = ObjectImp::Point(geo_imp::value::PointImp::new(c));
                let id = doc.add_data(imp.clone());
                (id, imp)
            }
        };
        self.parents.push((id, imp));
        true
    }

    pub fn status(&self) -> CheckResult {
        let imps: Vec<ObjectImp> = self.parents.iter().map(|(_, imp)| imp.clone()).collect();
        self.parser.check(&imps)
    }

    pub fn parent_ids(&self) -> Vec<NodeId> {
        self.parents.iter().map(|(id, _)| *id).collect()
    }

    /// Finalizes the construction as a Typed node, consuming `self`.
    /// Returns `None` if the parser isn't at `Complete` yet; a caller that
    /// wants "commit whatever is there" should check `status()` first.
    pub fn commit(self, doc: &mut Document) -> Option<NodeId> {
        if self.status() != CheckResult::Complete {
            return None;
        }
        let node = doc.add_typed(self.type_name, self.parent_ids()).ok()?;
        doc.finish_object_group();
        Some(node)
    }

    /// Right-click cancel (spec §4.H): unwinds every node `accept_cursor`
    /// speculatively wired into the document since `new` opened the
    /// object group, via the same `cancelObjectGroup` a view would call.
    pub fn cancel(mut self, doc: &mut Document) {
        self.parents.clear();
        self.cursor = None;
        doc.cancel_object_group();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_cursor_refuses_when_it_would_go_invalid() {
        let mut doc = Document::new();
        let mut cm = ConstructionMode::new("FixedPoint", &mut doc).unwrap();
        // FixedPoint wants two Doubles; offering a Point is never assignable.
        let bogus = Hypothesis::Existing(doc.add_data(ObjectImp::Invalid), ObjectImp::Point(geo_imp::value::PointImp::new(Coordinate::new(0.0, 0.0))));
        cm.set_cursor(bogus);
        assert!(!cm.accept_cursor(&mut doc));
    }

    #[test]
    fn commit_produces_a_typed_node_once_complete() {
        let mut doc = Document::new();
        let mut cm = ConstructionMode::new("MidPoint", &mut doc).unwrap();
        let a = doc.add_data(ObjectImp::Point(geo_imp::value::PointImp::new(Coordinate::new(0.0, 0.0))));
        let b = doc.add_data(ObjectImp::Point(geo_imp::value::PointImp::new(Coordinate::new(2.0, 0.0))));
        cm.set_cursor(Hypothesis::Existing(a, doc.imp(a).unwrap().clone()));
        assert!(cm.accept_cursor(&mut doc));
        cm.set_cursor(Hypothesis::Existing(b, doc.imp(b).unwrap().clone()));
        assert!(cm.accept_cursor(&mut doc));
        assert_eq!(cm.status(), CheckResult::Complete);
        let node = cm.commit(&mut doc).unwrap();
        assert!(matches!(doc.imp(node).unwrap(), ObjectImp::Point(_)));
    }

    #[test]
    fn cancel_discards_nodes_the_cursor_already_materialized() {
        let mut doc = Document::new();
        let before = doc.len();
        let mut cm = ConstructionMode::new("MidPoint", &mut doc).unwrap();
        cm.set_cursor(Hypothesis::Cursor(Coordinate::new(1.0, 1.0)));
        cm.accept_cursor(&mut doc);
        // The cursor hypothesis's synthetic Data node was wired in by
        // accept_cursor; cancel must unwind it along with everything else
        // the object group recorded.
        assert!(doc.len() > before);
        cm.cancel(&mut doc);
        assert_eq!(doc.len(), before);
    }

    #[test]
    fn unknown_type_name_refuses_construction() {
        let mut doc = Document::new();
        assert!(ConstructionMode::new("NoSuchType", &mut doc).is_none());
    }
}
