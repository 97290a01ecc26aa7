//! ObjectType catalog (spec §4.E): named pure functions `(Args, doc) -> Imp`
//! with capability metadata, kept in a process-lifetime registry keyed by
//! machine name — the same `once_cell::sync::Lazy` + `HashMap` shape the
//! Imp lattice (`geo_imp::imp_type`) uses for its own static table, applied
//! here to dynamic dispatch instead of single-inheritance lookup.

use std::collections::HashMap;

use geo_imp::value::{AbstractLineImp, LineKind, ObjectImp, PointImp, VectorImp};
use geo_imp::{imp_type, Coordinate, ImpType, LineData};
use once_cell::sync::Lazy;

use crate::args_parser::{ArgSpecEntry, ArgsParser};
use crate::document::Document;
use crate::node::NodeId;

/// A range the scalar parameter of a constrained curve may sweep, used by
/// [`crate::hierarchy::Locus::sample`] (Open Question 3, `SPEC_FULL.md`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamRange {
    Bounded(f64, f64),
    Unbounded,
}

/// A named, process-wide computation `(Args, doc) -> Imp`, plus the
/// capability flags spec §4.E lists (move, transform, special actions).
pub trait ObjectType: Sync {
    fn machine_name(&self) -> &'static str;
    fn result_type(&self) -> &'static ImpType;
    fn arg_parser(&self) -> ArgsParser;

    /// Total: returns `ObjectImp::Invalid` for semantically impossible
    /// configurations rather than erroring.
    fn calc(&self, args: &[ObjectImp], doc: &Document) -> ObjectImp;

    fn can_move(&self) -> bool {
        false
    }

    /// For movable types, translates whichever Data ancestors are the
    /// actual mutation handles by `(dx, dy)`. `parents` are the Typed
    /// node's current parent ids, in construction order.
    fn move_by(&self, _parents: &[NodeId], _doc: &mut Document, _dx: f64, _dy: f64) {}

    fn is_transform(&self) -> bool {
        false
    }

    fn parameter_range(&self, _imp: &ObjectImp) -> ParamRange {
        ParamRange::Unbounded
    }
}

fn point_entry(use_text: &'static str, select_text: &'static str) -> ArgSpecEntry {
    ArgSpecEntry {
        required_type: &imp_type::POINT,
        use_text,
        select_text,
        on_or_through: false,
        repeat: None,
        duplicate_ok: false,
    }
}

fn double_entry(use_text: &'static str) -> ArgSpecEntry {
    ArgSpecEntry {
        required_type: &imp_type::DOUBLE,
        use_text,
        select_text: use_text,
        on_or_through: false,
        repeat: None,
        duplicate_ok: false,
    }
}

/// `FixedPoint`: the only way a free point enters the graph. Its two
/// coordinate Data ancestors are the move handles (spec §4.E).
pub struct FixedPointType;

impl ObjectType for FixedPointType {
    fn machine_name(&self) -> &'static str {
        "FixedPoint"
    }
    fn result_type(&self) -> &'static ImpType {
        &imp_type::POINT
    }
    fn arg_parser(&self) -> ArgsParser {
        ArgsParser::new(vec![double_entry("x coordinate"), double_entry("y coordinate")])
    }
    fn calc(&self, args: &[ObjectImp], _doc: &Document) -> ObjectImp {
        match args {
            [ObjectImp::Double(x), ObjectImp::Double(y)] => {
                ObjectImp::Point(PointImp::new(Coordinate::new(x.0, y.0)))
            }
            _ => ObjectImp::Invalid,
        }
    }
    fn can_move(&self) -> bool {
        true
    }
    fn move_by(&self, parents: &[NodeId], doc: &mut Document, dx: f64, dy: f64) {
        if let [x_id, y_id] = parents {
            doc.translate_data(*x_id, dx);
            doc.translate_data(*y_id, dy);
        }
    }
}

/// A point constrained to move along a curve (circle or line), by a single
/// scalar parameter Data ancestor. `t` is interpreted per `parameter_range`.
pub struct ConstrainedPointType;

impl ObjectType for ConstrainedPointType {
    fn machine_name(&self) -> &'static str {
        "ConstrainedPoint"
    }
    fn result_type(&self) -> &'static ImpType {
        &imp_type::POINT
    }
    fn arg_parser(&self) -> ArgsParser {
        ArgsParser::new(vec![
            double_entry("parameter"),
            ArgSpecEntry {
                required_type: &imp_type::GEOMETRIC,
                use_text: "curve",
                select_text: "Select a curve",
                on_or_through: false,
                repeat: None,
                duplicate_ok: false,
            },
        ])
    }
    fn calc(&self, args: &[ObjectImp], _doc: &Document) -> ObjectImp {
        match args {
            [ObjectImp::Double(t), ObjectImp::Circle(c)] => {
                let angle = t.0 * geo_imp::coordinate::TAU;
                let (s, cs) = angle.sin_cos();
                ObjectImp::Point(PointImp::new(Coordinate::new(
                    c.center.x + c.radius * cs,
                    c.center.y + c.radius * s,
                )))
            }
            [ObjectImp::Double(t), ObjectImp::Line(l)] => {
                let d = l.data.direction();
                ObjectImp::Point(PointImp::new(l.data.a + d * t.0))
            }
            _ => ObjectImp::Invalid,
        }
    }
    fn can_move(&self) -> bool {
        true
    }
    fn move_by(&self, parents: &[NodeId], doc: &mut Document, dx: f64, _dy: f64) {
        if let [t_id, _curve_id] = parents {
            // Only the scalar parameter is a free handle; dx serves as a
            // generic "how far along the curve" nudge.
            doc.translate_data(*t_id, dx);
        }
    }
    fn parameter_range(&self, imp: &ObjectImp) -> ParamRange {
        match imp {
            ObjectImp::Circle(_) => ParamRange::Bounded(0.0, 1.0),
            _ => ParamRange::Unbounded,
        }
    }
}

pub struct MidPointType;

impl ObjectType for MidPointType {
    fn machine_name(&self) -> &'static str {
        "MidPoint"
    }
    fn result_type(&self) -> &'static ImpType {
        &imp_type::POINT
    }
    fn arg_parser(&self) -> ArgsParser {
        ArgsParser::new(vec![point_entry("point A", "Select point A"), point_entry("point B", "Select point B")])
    }
    fn calc(&self, args: &[ObjectImp], _doc: &Document) -> ObjectImp {
        match args {
            [ObjectImp::Point(a), ObjectImp::Point(b)] => {
                ObjectImp::Point(PointImp::new(Coordinate::midpoint(a.coord, b.coord)))
            }
            _ => ObjectImp::Invalid,
        }
    }
}

pub struct LineThroughTwoPointsType;

impl ObjectType for LineThroughTwoPointsType {
    fn machine_name(&self) -> &'static str {
        "LineThroughTwoPoints"
    }
    fn result_type(&self) -> &'static ImpType {
        &imp_type::LINE
    }
    fn arg_parser(&self) -> ArgsParser {
        ArgsParser::new(vec![point_entry("point A", "Select point A"), point_entry("point B", "Select point B")])
    }
    fn calc(&self, args: &[ObjectImp], _doc: &Document) -> ObjectImp {
        match args {
            [ObjectImp::Point(a), ObjectImp::Point(b)] if a.coord != b.coord => {
                ObjectImp::Line(AbstractLineImp::new(LineData::new(a.coord, b.coord), LineKind::Line))
            }
            _ => ObjectImp::Invalid,
        }
    }
}

/// A segment bounded by two points (`objects/line.h`'s `Segment`, via
/// `filters/kgeo.cc`'s `ID_segment` mapping).
pub struct SegmentType;

impl ObjectType for SegmentType {
    fn machine_name(&self) -> &'static str {
        "Segment"
    }
    fn result_type(&self) -> &'static ImpType {
        &imp_type::SEGMENT
    }
    fn arg_parser(&self) -> ArgsParser {
        ArgsParser::new(vec![point_entry("point A", "Select point A"), point_entry("point B", "Select point B")])
    }
    fn calc(&self, args: &[ObjectImp], _doc: &Document) -> ObjectImp {
        match args {
            [ObjectImp::Point(a), ObjectImp::Point(b)] if a.coord != b.coord => {
                ObjectImp::Line(AbstractLineImp::new(LineData::new(a.coord, b.coord), LineKind::Segment))
            }
            _ => ObjectImp::Invalid,
        }
    }
}

/// A circle through a point, centered on another point (`objects/circle.h`'s
/// `CircleBCP`, via `filters/kgeo.cc`'s `ID_circle` mapping).
pub struct CircleByCenterAndPointType;

impl ObjectType for CircleByCenterAndPointType {
    fn machine_name(&self) -> &'static str {
        "CircleByCenterAndPoint"
    }
    fn result_type(&self) -> &'static ImpType {
        &imp_type::CIRCLE
    }
    fn arg_parser(&self) -> ArgsParser {
        ArgsParser::new(vec![
            point_entry("center", "Select the center"),
            point_entry("point on circle", "Select a point on the circle"),
        ])
    }
    fn calc(&self, args: &[ObjectImp], _doc: &Document) -> ObjectImp {
        match args {
            [ObjectImp::Point(center), ObjectImp::Point(rim)] => {
                let radius = (rim.coord - center.coord).length();
                if radius > 0.0 {
                    ObjectImp::Circle(geo_imp::value::CircleImp::new(center.coord, radius))
                } else {
                    ObjectImp::Invalid
                }
            }
            _ => ObjectImp::Invalid,
        }
    }
}

/// A line perpendicular to a given line, passing through a given point.
pub struct PerpendicularType;

impl ObjectType for PerpendicularType {
    fn machine_name(&self) -> &'static str {
        "Perpendicular"
    }
    fn result_type(&self) -> &'static ImpType {
        &imp_type::LINE
    }
    fn arg_parser(&self) -> ArgsParser {
        ArgsParser::new(vec![
            point_entry("through point", "Select the point the perpendicular passes through"),
            ArgSpecEntry {
                required_type: &imp_type::ABSTRACT_LINE,
                use_text: "line",
                select_text: "Select a line to be perpendicular to",
                on_or_through: false,
                repeat: None,
                duplicate_ok: false,
            },
        ])
    }
    fn calc(&self, args: &[ObjectImp], _doc: &Document) -> ObjectImp {
        match args {
            [ObjectImp::Point(p), ObjectImp::Line(l)] => {
                let d = l.data.direction();
                let perp = Coordinate::new(-d.y, d.x);
                ObjectImp::Line(AbstractLineImp::new(LineData::new(p.coord, p.coord + perp), LineKind::Line))
            }
            _ => ObjectImp::Invalid,
        }
    }
}

/// A vector between two points, needed as its own construction (spec §4.B
/// lists `VectorImp` among the core values, so it must be reachable from a
/// construction, not only from `property()`).
pub struct VectorType;

impl ObjectType for VectorType {
    fn machine_name(&self) -> &'static str {
        "Vector"
    }
    fn result_type(&self) -> &'static ImpType {
        &imp_type::VECTOR
    }
    fn arg_parser(&self) -> ArgsParser {
        ArgsParser::new(vec![point_entry("tail", "Select the vector's tail"), point_entry("tip", "Select the vector's tip")])
    }
    fn calc(&self, args: &[ObjectImp], _doc: &Document) -> ObjectImp {
        match args {
            [ObjectImp::Point(a), ObjectImp::Point(b)] => ObjectImp::Vector(VectorImp::new(b.coord - a.coord)),
            _ => ObjectImp::Invalid,
        }
    }
}

/// Fits a cubic through 2 to 9 given points (spec §8 scenario 4).
pub struct CubicThroughPointsType;

impl ObjectType for CubicThroughPointsType {
    fn machine_name(&self) -> &'static str {
        "CubicThroughPoints"
    }
    fn result_type(&self) -> &'static ImpType {
        &imp_type::CUBIC
    }
    fn arg_parser(&self) -> ArgsParser {
        ArgsParser::new(vec![ArgSpecEntry {
            required_type: &imp_type::POINT,
            use_text: "points",
            select_text: "Select the points the cubic should pass through",
            on_or_through: false,
            repeat: Some((2, 9)),
            duplicate_ok: false,
        }])
    }
    fn calc(&self, args: &[ObjectImp], _doc: &Document) -> ObjectImp {
        let points: Option<Vec<Coordinate>> = args
            .iter()
            .map(|a| match a {
                ObjectImp::Point(p) => Some(p.coord),
                _ => None,
            })
            .collect();
        match points {
            Some(pts) => geo_imp::value::cubic::calc_cubic_through_points(&pts)
                .map(ObjectImp::Cubic)
                .unwrap_or(ObjectImp::Invalid),
            None => ObjectImp::Invalid,
        }
    }
}

/// Applies a transformation to another object (spec §4.G's
/// `transformFinalObject` relies on exactly this type existing by name).
pub struct TransformType;

impl ObjectType for TransformType {
    fn machine_name(&self) -> &'static str {
        "ApplyTransformation"
    }
    fn result_type(&self) -> &'static ImpType {
        &imp_type::ANY
    }
    fn arg_parser(&self) -> ArgsParser {
        ArgsParser::new(vec![
            ArgSpecEntry {
                required_type: &imp_type::GEOMETRIC,
                use_text: "object",
                select_text: "Select the object to transform",
                on_or_through: false,
                repeat: None,
                duplicate_ok: false,
            },
            ArgSpecEntry {
                required_type: &imp_type::TRANSFORMATION,
                use_text: "transformation",
                select_text: "Select a transformation",
                on_or_through: false,
                repeat: None,
                duplicate_ok: false,
            },
        ])
    }
    fn calc(&self, args: &[ObjectImp], _doc: &Document) -> ObjectImp {
        match args {
            [target, ObjectImp::Transformation(t)] => target.transform(&t.transformation),
            _ => ObjectImp::Invalid,
        }
    }
    fn is_transform(&self) -> bool {
        true
    }
}

macro_rules! registry_entries {
    ($($ty:expr),+ $(,)?) => {
        vec![$(Box::leak(Box::new($ty)) as &'static dyn ObjectType),+]
    };
}

/// Process-lifetime catalog, populated once at first use with every
/// built-in `ObjectType`. Macro-defined types (`geo-graph`'s hierarchy
/// module) are looked up by the same interface but live outside this
/// static set.
pub static REGISTRY: Lazy<HashMap<&'static str, &'static dyn ObjectType>> = Lazy::new(|| {
    let entries: Vec<&'static dyn ObjectType> = registry_entries![
        FixedPointType,
        ConstrainedPointType,
        MidPointType,
        LineThroughTwoPointsType,
        SegmentType,
        CircleByCenterAndPointType,
        PerpendicularType,
        VectorType,
        CubicThroughPointsType,
        TransformType,
    ];
    entries.into_iter().map(|t| (t.machine_name(), t)).collect()
});

pub fn lookup(machine_name: &str) -> Option<&'static dyn ObjectType> {
    REGISTRY.get(machine_name).copied()
}
