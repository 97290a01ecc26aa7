//! ObjectHierarchy (spec §3.4, §4.G): a serializable, Imp-only recipe used
//! both for user-defined macros and for Locus. Its `Node` list is shaped to
//! mirror the native XML schema one-to-one (`<Given>`, `<Fetch>`, `<Apply>`)
//! the same way `gram-codec::ast` types are shaped to mirror the gram
//! grammar directly, so `geo-codec`'s (de)serializer stays a thin adapter.

use geo_imp::value::ObjectImp;
use geo_imp::ImpType;

use crate::calc_paths;
use crate::document::Document;
use crate::error::GraphError;
use crate::node::NodeId;
use crate::object_type::{self, ParamRange};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum HierarchyNode {
    /// An input slot of declared ImpType.
    Given { required_type: String },
    /// A reference to a fixed, captured Imp.
    Fetch { value: FetchValue },
    /// An `ObjectType` application over previously defined node indices.
    Apply { type_name: String, args: Vec<usize> },
}

/// A serializable stand-in for an arbitrary captured `ObjectImp`. Only the
/// primitive and point cases are representable today; richer captures
/// (e.g. a fetched cubic) are out of scope until `geo-codec` needs them.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum FetchValue {
    Double(f64),
    Point(f64, f64),
}

impl FetchValue {
    fn to_imp(&self) -> ObjectImp {
        match self {
            FetchValue::Double(d) => ObjectImp::Double(geo_imp::value::DoubleImp(*d)),
            FetchValue::Point(x, y) => {
                ObjectImp::Point(geo_imp::value::PointImp::new(geo_imp::Coordinate::new(*x, *y)))
            }
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectHierarchy {
    pub nodes: Vec<HierarchyNode>,
    /// Indices into `nodes` that are this hierarchy's declared outputs.
    pub results: Vec<usize>,
}

impl ObjectHierarchy {
    pub fn new(nodes: Vec<HierarchyNode>, results: Vec<usize>) -> Self {
        ObjectHierarchy { nodes, results }
    }

    pub fn num_inputs(&self) -> usize {
        self.nodes.iter().filter(|n| matches!(n, HierarchyNode::Given { .. })).count()
    }

    pub fn num_results(&self) -> usize {
        self.results.len()
    }

    /// Runs the node list once, binding `Given` nodes to `input_imps` in
    /// order and applying each `Apply` node to the already-computed Imps of
    /// its referenced indices. A missing `ObjectType` machine name makes
    /// calc refuse outright (spec §4.G).
    pub fn calc(&self, input_imps: &[ObjectImp], doc: &Document) -> Result<Vec<ObjectImp>, GraphError> {
        if input_imps.len() != self.num_inputs() {
            return Err(GraphError::ArityMismatch {
                expected: self.num_inputs(),
                actual: input_imps.len(),
            });
        }

        let mut values: Vec<ObjectImp> = Vec::with_capacity(self.nodes.len());
        let mut next_input = input_imps.iter();

        for (index, node) in self.nodes.iter().enumerate() {
            let value = match node {
                HierarchyNode::Given { .. } => next_input.next().cloned().unwrap_or(ObjectImp::Invalid),
                HierarchyNode::Fetch { value } => value.to_imp(),
                HierarchyNode::Apply { type_name, args } => {
                    let ty = object_type::lookup(type_name)
                        .ok_or_else(|| GraphError::UnknownObjectType { name: type_name.clone() })?;
                    let mut arg_imps = Vec::with_capacity(args.len());
                    for &a in args {
                        if a >= index {
                            return Err(GraphError::ForwardReference { index: a });
                        }
                        arg_imps.push(values[a].clone());
                    }
                    ty.calc(&arg_imps, doc)
                }
            };
            values.push(value);
        }

        Ok(self.results.iter().map(|&i| values[i].clone()).collect())
    }

    /// Rewrites the first `prefix.len()` `Given` nodes into `Fetch` nodes
    /// capturing copies of `prefix`, baking them in as constants (used by
    /// macro partial application).
    pub fn with_fixed_args(&self, prefix: &[FetchValue]) -> ObjectHierarchy {
        let mut nodes = self.nodes.clone();
        let mut remaining = prefix.iter();
        for node in nodes.iter_mut() {
            if matches!(node, HierarchyNode::Given { .. }) {
                match remaining.next() {
                    Some(v) => *node = HierarchyNode::Fetch { value: v.clone() },
                    None => break,
                }
            }
        }
        ObjectHierarchy {
            nodes,
            results: self.results.clone(),
        }
    }

    /// Appends one `Apply` node wrapping the unique result in a
    /// transformation-apply, yielding a new hierarchy whose sole result is
    /// the transformed value.
    pub fn transform_final_object(&self, transformation_given_index: usize) -> ObjectHierarchy {
        let mut nodes = self.nodes.clone();
        let result_index = self.results[0];
        let apply_index = nodes.len();
        nodes.push(HierarchyNode::Apply {
            type_name: "ApplyTransformation".to_string(),
            args: vec![result_index, transformation_given_index],
        });
        ObjectHierarchy {
            nodes,
            results: vec![apply_index],
        }
    }

    /// The minimum ImpType each input must inherit from, derived from the
    /// recorded `Given` nodes, used to build an `ArgsParser` so macros get
    /// the same selection UX as built-ins.
    pub fn arg_requirements(&self) -> Vec<&'static ImpType> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                HierarchyNode::Given { required_type } => ImpType::lookup(required_type),
                _ => None,
            })
            .collect()
    }
}

/// A locus: the trace `moving_object` sweeps as `constrained_point`'s
/// driving parameter varies (spec §4.G, supplemented from `kig`'s locus
/// machinery per spec §8 scenario 5). Unlike a macro's `ObjectHierarchy`,
/// sampling replays the real document rather than a captured recipe, since
/// the path between the two points may pass through arbitrary, possibly
/// unexported `ObjectType`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locus {
    parameter_node: NodeId,
    constrained_point: NodeId,
    moving_object: NodeId,
}

impl Locus {
    /// Builds a locus if `moving_object` is actually a descendant of
    /// `constrained_point`'s parameter and `constrained_point` is a
    /// `ConstrainedPoint` node (so it has a driving-parameter ancestor).
    pub fn from_locus(constrained_point: NodeId, moving_object: NodeId, doc: &Document) -> Option<Locus> {
        let cp_node = doc.node(constrained_point)?;
        let parameter_node = *cp_node.parents.first()?;
        if moving_object != constrained_point
            && calc_paths::descendants_in_order(doc_nodes(doc), &[constrained_point], moving_object).is_empty()
        {
            return None;
        }
        Some(Locus { parameter_node, constrained_point, moving_object })
    }

    /// The parameter's domain, taken from the `ConstrainedPoint` type's
    /// `parameter_range` over the curve it rides (Open Question 3).
    pub fn range(&self, doc: &Document) -> ParamRange {
        let curve_id = match doc.node(self.constrained_point).and_then(|n| n.parents.get(1)) {
            Some(&id) => id,
            None => return ParamRange::Unbounded,
        };
        let curve_imp = match doc.imp(curve_id) {
            Some(imp) => imp,
            None => return ParamRange::Unbounded,
        };
        match object_type::lookup("ConstrainedPoint") {
            Some(ty) => ty.parameter_range(curve_imp),
            None => ParamRange::Unbounded,
        }
    }

    /// Evaluates `moving_object`'s Imp with the driving parameter set to
    /// `t`, then restores the document to its prior state. Not
    /// thread-safe against concurrent mutation (spec §5: single-threaded).
    pub fn sample(&self, t: f64, doc: &mut Document) -> ObjectImp {
        let original = match doc.imp(self.parameter_node) {
            Some(ObjectImp::Double(d)) => d.0,
            _ => return ObjectImp::Invalid,
        };
        doc.translate_data(self.parameter_node, t - original);
        let result = doc.imp(self.moving_object).cloned().unwrap_or(ObjectImp::Invalid);
        doc.translate_data(self.parameter_node, original - t);
        result
    }

    /// A fixed-step sampling of the whole domain, defaulting the window to
    /// `[-10.0, 10.0]` when the curve reports `Unbounded` (an
    /// implementation default, not a mandated constant).
    pub fn sample_uniform(&self, doc: &mut Document, steps: usize) -> Vec<ObjectImp> {
        let (lo, hi) = match self.range(doc) {
            ParamRange::Bounded(lo, hi) => (lo, hi),
            ParamRange::Unbounded => (-10.0, 10.0),
        };
        let denom = (steps.max(2) - 1) as f64;
        (0..steps.max(2)).map(|i| self.sample(lo + (hi - lo) * (i as f64) / denom, doc)).collect()
    }
}

/// Exposes the document's node map to `calc_paths` without making it a
/// public field of `Document` itself.
fn doc_nodes(doc: &Document) -> &std::collections::HashMap<NodeId, crate::node::Node> {
    doc.nodes_for_calc_paths()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_imp::value::{DoubleImp, PointImp};
    use geo_imp::Coordinate;

    fn midpoint_hierarchy() -> ObjectHierarchy {
        ObjectHierarchy::new(
            vec![
                HierarchyNode::Given { required_type: "point".into() },
                HierarchyNode::Given { required_type: "point".into() },
                HierarchyNode::Apply { type_name: "MidPoint".into(), args: vec![0, 1] },
            ],
            vec![2],
        )
    }

    #[test]
    fn calc_runs_the_recorded_apply() {
        let h = midpoint_hierarchy();
        let doc = Document::new();
        let a = ObjectImp::Point(PointImp::new(Coordinate::new(0.0, 0.0)));
        let b = ObjectImp::Point(PointImp::new(Coordinate::new(4.0, 2.0)));
        let out = h.calc(&[a, b], &doc).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].equals(&ObjectImp::Point(PointImp::new(Coordinate::new(2.0, 1.0)))));
    }

    #[test]
    fn with_fixed_args_matches_baked_in_calc() {
        let h = midpoint_hierarchy();
        let doc = Document::new();
        let b = ObjectImp::Point(PointImp::new(Coordinate::new(4.0, 2.0)));
        let fixed = h.with_fixed_args(&[FetchValue::Point(0.0, 0.0)]);
        let out_fixed = fixed.calc(&[b.clone()], &doc).unwrap();
        let out_direct = h
            .calc(&[ObjectImp::Point(PointImp::new(Coordinate::new(0.0, 0.0))), b], &doc)
            .unwrap();
        assert!(out_fixed[0].equals(&out_direct[0]));
    }

    #[test]
    fn arity_mismatch_is_reported_not_panicked() {
        let h = midpoint_hierarchy();
        let doc = Document::new();
        let err = h.calc(&[ObjectImp::Double(DoubleImp(1.0))], &doc).unwrap_err();
        assert!(matches!(err, GraphError::ArityMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn unknown_object_type_refuses_to_calc() {
        let h = ObjectHierarchy::new(
            vec![
                HierarchyNode::Given { required_type: "point".into() },
                HierarchyNode::Apply { type_name: "NoSuchType".into(), args: vec![0] },
            ],
            vec![1],
        );
        let doc = Document::new();
        let a = ObjectImp::Point(PointImp::new(Coordinate::new(0.0, 0.0)));
        assert!(h.calc(&[a], &doc).is_err());
    }

    #[test]
    fn locus_samples_a_circling_point() {
        let mut doc = Document::new();
        let t = doc.add_data(ObjectImp::Double(DoubleImp(0.0)));
        let cx = doc.add_data(ObjectImp::Double(DoubleImp(0.0)));
        let cy = doc.add_data(ObjectImp::Double(DoubleImp(0.0)));
        let center = doc.add_typed("FixedPoint", vec![cx, cy]).unwrap();
        let rx = doc.add_data(ObjectImp::Double(DoubleImp(1.0)));
        let ry = doc.add_data(ObjectImp::Double(DoubleImp(0.0)));
        let rim = doc.add_typed("FixedPoint", vec![rx, ry]).unwrap();
        let circle = doc.add_typed("CircleByCenterAndPoint", vec![center, rim]).unwrap();
        let moving = doc.add_typed("ConstrainedPoint", vec![t, circle]).unwrap();

        let locus = Locus::from_locus(moving, moving, &doc).unwrap();
        assert_eq!(locus.range(&doc), ParamRange::Bounded(0.0, 1.0));

        let at_zero = locus.sample(0.0, &mut doc);
        let at_quarter = locus.sample(0.25, &mut doc);
        match (at_zero, at_quarter) {
            (ObjectImp::Point(p0), ObjectImp::Point(p1)) => {
                assert!((p0.coord.x - 1.0).abs() < 1e-9);
                assert!((p1.coord.y - 1.0).abs() < 1e-9);
            }
            other => panic!("expected points, got {other:?}"),
        }
        // sampling must not leave the parameter perturbed
        assert_eq!(doc.imp(t).unwrap(), &ObjectImp::Double(DoubleImp(0.0)));
    }
}
