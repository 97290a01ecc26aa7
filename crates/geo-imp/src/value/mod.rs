//! `ObjectImp`: the closed sum of every concrete Imp value, and the single
//! place that dispatches the common Imp surface (spec §3.1, §4.A/§4.B)
//! across all of them. Individual Imp structs stay free of any knowledge
//! of their siblings; this module is the only one that needs to.

pub mod circle;
pub mod conic;
pub mod cubic;
pub mod line;
pub mod point;
pub mod polygon;
pub mod primitive;
pub mod text;
pub mod transformation;
pub mod vector;

use crate::coordinate::{Coordinate, Transformation};
use crate::imp_type::{self, ImpType};
use crate::property::PropertyList;

pub use circle::CircleImp;
pub use conic::ConicImp;
pub use cubic::CubicImp;
pub use line::{AbstractLineImp, LineKind};
pub use point::PointImp;
pub use polygon::PolygonImp;
pub use primitive::{BoolImp, DoubleImp, IntImp, StringImp};
pub use text::{BoolTextImp, NumericTextImp, Rect, TextImp};
pub use transformation::TransformationImp;
pub use vector::VectorImp;

/// Any one concrete Imp value, or the distinguished "mathematically
/// impossible" result (spec §3.1: `InvalidImp` is not an error, callers
/// represent it explicitly and propagate it like any other value).
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectImp {
    Point(PointImp),
    Line(AbstractLineImp),
    Vector(VectorImp),
    Circle(CircleImp),
    Conic(ConicImp),
    Cubic(CubicImp),
    Polygon(PolygonImp),
    Transformation(TransformationImp),
    Text(TextImp),
    NumericText(NumericTextImp),
    BoolText(BoolTextImp),
    Int(IntImp),
    Double(DoubleImp),
    String(StringImp),
    Bool(BoolImp),
    Invalid,
}

impl ObjectImp {
    pub fn imp_type(&self) -> &'static ImpType {
        match self {
            ObjectImp::Point(v) => v.imp_type(),
            ObjectImp::Line(v) => v.imp_type(),
            ObjectImp::Vector(v) => v.imp_type(),
            ObjectImp::Circle(v) => v.imp_type(),
            ObjectImp::Conic(v) => v.imp_type(),
            ObjectImp::Cubic(v) => v.imp_type(),
            ObjectImp::Polygon(v) => v.imp_type(),
            ObjectImp::Transformation(v) => v.imp_type(),
            ObjectImp::Text(v) => v.imp_type(),
            ObjectImp::NumericText(v) => v.imp_type(),
            ObjectImp::BoolText(v) => v.imp_type(),
            ObjectImp::Int(v) => v.imp_type(),
            ObjectImp::Double(v) => v.imp_type(),
            ObjectImp::String(v) => v.imp_type(),
            ObjectImp::Bool(v) => v.imp_type(),
            ObjectImp::Invalid => &imp_type::INVALID,
        }
    }

    pub fn valid(&self) -> bool {
        match self {
            ObjectImp::Point(v) => v.valid(),
            ObjectImp::Line(v) => v.valid(),
            ObjectImp::Vector(v) => v.valid(),
            ObjectImp::Circle(v) => v.valid(),
            ObjectImp::Conic(v) => v.valid(),
            ObjectImp::Cubic(v) => v.valid(),
            ObjectImp::Polygon(v) => v.valid(),
            ObjectImp::Transformation(v) => v.valid(),
            ObjectImp::Text(v) => v.valid(),
            ObjectImp::NumericText(v) => v.valid(),
            ObjectImp::BoolText(v) => v.valid(),
            ObjectImp::Int(v) => v.valid(),
            ObjectImp::Double(v) => v.valid(),
            ObjectImp::String(v) => v.valid(),
            ObjectImp::Bool(v) => v.valid(),
            ObjectImp::Invalid => false,
        }
    }

    /// A `None` result collapses the whole Imp to `Invalid` at the call
    /// site, matching the "transform can make a value impossible" rule
    /// shared by every concrete Imp's own `transform`.
    pub fn transform(&self, t: &Transformation) -> ObjectImp {
        let transformed = match self {
            ObjectImp::Point(v) => v.transform(t).map(ObjectImp::Point),
            ObjectImp::Line(v) => v.transform(t).map(ObjectImp::Line),
            ObjectImp::Vector(v) => v.transform(t).map(ObjectImp::Vector),
            ObjectImp::Circle(v) => v.transform(t).map(ObjectImp::Circle),
            ObjectImp::Conic(v) => v.transform(t).map(ObjectImp::Conic),
            ObjectImp::Cubic(v) => v.transform(t).map(ObjectImp::Cubic),
            ObjectImp::Polygon(v) => v.transform(t).map(ObjectImp::Polygon),
            ObjectImp::Transformation(v) => v.transform(t).map(ObjectImp::Transformation),
            ObjectImp::Text(v) => v.transform(t).map(ObjectImp::Text),
            ObjectImp::NumericText(v) => v.transform(t).map(ObjectImp::NumericText),
            ObjectImp::BoolText(v) => v.transform(t).map(ObjectImp::BoolText),
            ObjectImp::Int(v) => Some(ObjectImp::Int(*v)),
            ObjectImp::Double(v) => Some(ObjectImp::Double(*v)),
            ObjectImp::String(v) => Some(ObjectImp::String(v.clone())),
            ObjectImp::Bool(v) => Some(ObjectImp::Bool(*v)),
            ObjectImp::Invalid => None,
        };
        transformed.unwrap_or(ObjectImp::Invalid)
    }

    pub fn copy(&self) -> ObjectImp {
        self.clone()
    }

    /// Value equality, per spec §3.1: two Imps are equal when they denote
    /// the same geometric (or primitive) value, regardless of how each was
    /// constructed. Floating comparisons use a fixed tolerance rather than
    /// bit-exactness, matching `Coordinate::approx_eq`'s role throughout
    /// this crate.
    pub fn equals(&self, other: &ObjectImp) -> bool {
        const EPS: f64 = 1e-9;
        match (self, other) {
            (ObjectImp::Point(a), ObjectImp::Point(b)) => a.coord.approx_eq(b.coord, EPS),
            (ObjectImp::Line(a), ObjectImp::Line(b)) => {
                a.kind == b.kind && a.data.a.approx_eq(b.data.a, EPS) && a.data.b.approx_eq(b.data.b, EPS)
            }
            (ObjectImp::Vector(a), ObjectImp::Vector(b)) => a.direction.approx_eq(b.direction, EPS),
            (ObjectImp::Circle(a), ObjectImp::Circle(b)) => {
                a.center.approx_eq(b.center, EPS) && (a.radius - b.radius).abs() <= EPS
            }
            (ObjectImp::Conic(a), ObjectImp::Conic(b)) => coeffs_approx_eq(&a.coeffs, &b.coeffs, EPS),
            (ObjectImp::Cubic(a), ObjectImp::Cubic(b)) => coeffs_approx_eq(&a.coeffs, &b.coeffs, EPS),
            (ObjectImp::Polygon(a), ObjectImp::Polygon(b)) => {
                a.inside == b.inside
                    && a.open == b.open
                    && a.points.len() == b.points.len()
                    && a.points.iter().zip(&b.points).all(|(p, q)| p.approx_eq(*q, EPS))
            }
            (ObjectImp::Transformation(a), ObjectImp::Transformation(b)) => {
                a.transformation.m.iter().flatten().zip(b.transformation.m.iter().flatten()).all(|(x, y)| (x - y).abs() <= EPS)
            }
            (ObjectImp::Text(a), ObjectImp::Text(b)) => a.equals(b),
            (ObjectImp::NumericText(a), ObjectImp::NumericText(b)) => (a.value - b.value).abs() <= EPS,
            (ObjectImp::BoolText(a), ObjectImp::BoolText(b)) => a.value == b.value,
            (ObjectImp::Int(a), ObjectImp::Int(b)) => a.0 == b.0,
            (ObjectImp::Double(a), ObjectImp::Double(b)) => (a.0 - b.0).abs() <= EPS,
            (ObjectImp::String(a), ObjectImp::String(b)) => a.0 == b.0,
            (ObjectImp::Bool(a), ObjectImp::Bool(b)) => a.0 == b.0,
            (ObjectImp::Invalid, ObjectImp::Invalid) => true,
            _ => false,
        }
    }

    pub fn attach_point(&self) -> Option<Coordinate> {
        match self {
            ObjectImp::Point(v) => v.attach_point(),
            ObjectImp::Line(v) => v.attach_point(),
            ObjectImp::Vector(v) => v.attach_point(),
            ObjectImp::Circle(v) => v.attach_point(),
            ObjectImp::Conic(v) => v.attach_point(),
            ObjectImp::Cubic(v) => v.attach_point(),
            ObjectImp::Polygon(v) => v.attach_point(),
            ObjectImp::Transformation(v) => v.attach_point(),
            ObjectImp::Text(v) => v.attach_point(),
            ObjectImp::NumericText(v) => v.text.attach_point(),
            ObjectImp::BoolText(v) => v.text.attach_point(),
            ObjectImp::Int(_) | ObjectImp::Double(_) | ObjectImp::String(_) | ObjectImp::Bool(_) => None,
            ObjectImp::Invalid => None,
        }
    }

    /// The smallest axis-aligned rectangle enclosing the value, used by
    /// the document to decide what's visible in a viewport; `None` for
    /// values (transformations, primitives, invalid) that have no
    /// on-screen extent of their own.
    pub fn surrounding_rect(&self) -> Option<Rect> {
        let pad = |c: Coordinate, r: f64| Rect::new(c.x - r, c.y - r, 2.0 * r, 2.0 * r);
        match self {
            ObjectImp::Point(v) => Some(pad(v.coord, 0.0)),
            ObjectImp::Line(v) => Some(bbox(&[v.data.a, v.data.b])),
            ObjectImp::Vector(v) => Some(bbox(&[Coordinate::new(0.0, 0.0), v.direction])),
            ObjectImp::Circle(v) => Some(pad(v.center, v.radius)),
            ObjectImp::Polygon(v) => Some(bbox(&v.points)),
            ObjectImp::Text(v) => Some(v.frame),
            ObjectImp::NumericText(v) => Some(v.text.frame),
            ObjectImp::BoolText(v) => Some(v.text.frame),
            _ => None,
        }
    }

    pub fn properties(&self) -> PropertyList {
        match self {
            ObjectImp::Point(v) => v.properties(),
            ObjectImp::Line(v) => v.properties(),
            ObjectImp::Vector(v) => v.properties(),
            ObjectImp::Circle(v) => v.properties(),
            ObjectImp::Conic(v) => v.properties(),
            ObjectImp::Cubic(v) => v.properties(),
            ObjectImp::Polygon(v) => v.properties(),
            ObjectImp::Transformation(v) => v.properties(),
            ObjectImp::Text(v) => v.properties(),
            ObjectImp::NumericText(v) => v.text.properties(),
            ObjectImp::BoolText(v) => v.text.properties(),
            ObjectImp::Int(v) => v.properties(),
            ObjectImp::Double(v) => v.properties(),
            ObjectImp::String(v) => v.properties(),
            ObjectImp::Bool(v) => v.properties(),
            ObjectImp::Invalid => PropertyList::new(),
        }
    }

    /// Evaluates the property at `index`, returning `Invalid` for an
    /// out-of-range index rather than panicking: property indices are
    /// validated against `properties().len()` by the caller, but an
    /// `ObjectHierarchy` loaded from an untrusted document can name one
    /// that no longer exists after an edit.
    pub fn property(&self, index: usize) -> ObjectImp {
        match self {
            ObjectImp::Point(v) => {
                match index {
                    0 => ObjectImp::Double(DoubleImp(v.coord.x)),
                    1 => ObjectImp::Double(DoubleImp(v.coord.y)),
                    _ => ObjectImp::Invalid,
                }
            }
            ObjectImp::Line(v) => match (index, v.kind) {
                (0, _) => ObjectImp::Vector(VectorImp::new(v.data.direction())),
                (1, LineKind::Segment) => ObjectImp::Double(DoubleImp(v.length().unwrap_or(f64::NAN))),
                _ => ObjectImp::Invalid,
            },
            ObjectImp::Vector(v) => match index {
                0 => ObjectImp::Double(DoubleImp(v.length())),
                _ => ObjectImp::Invalid,
            },
            ObjectImp::Circle(v) => match index {
                0 => ObjectImp::Point(PointImp::new(v.center)),
                1 => ObjectImp::Double(DoubleImp(v.radius)),
                _ => ObjectImp::Invalid,
            },
            ObjectImp::Polygon(v) => match index {
                0 => ObjectImp::Double(DoubleImp(v.perimeter())),
                1 if !v.open => ObjectImp::Double(DoubleImp(v.signed_area().abs())),
                _ => ObjectImp::Invalid,
            },
            _ => ObjectImp::Invalid,
        }
    }
}

fn coeffs_approx_eq(a: &[f64], b: &[f64], eps: f64) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= eps)
}

fn bbox(points: &[Coordinate]) -> Rect {
    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_then_equals_is_reflexive_across_variants() {
        let values = vec![
            ObjectImp::Point(PointImp::new(Coordinate::new(1.0, 2.0))),
            ObjectImp::Circle(CircleImp::new(Coordinate::new(0.0, 0.0), 3.0)),
            ObjectImp::Double(DoubleImp(4.5)),
            ObjectImp::Invalid,
        ];
        for v in &values {
            assert!(v.copy().equals(v));
        }
    }

    #[test]
    fn identity_transform_preserves_equality() {
        let p = ObjectImp::Point(PointImp::new(Coordinate::new(3.0, -2.0)));
        let moved = p.transform(&Transformation::identity());
        assert!(moved.equals(&p));
    }

    #[test]
    fn transform_to_invalid_collapses_the_whole_value() {
        let line = ObjectImp::Line(AbstractLineImp::new(
            crate::coordinate::LineData::new(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)),
            LineKind::Ray,
        ));
        let projective = Transformation { m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 1.0]] };
        assert_eq!(line.transform(&projective), ObjectImp::Invalid);
    }

    #[test]
    fn out_of_range_property_index_is_invalid_not_a_panic() {
        let p = ObjectImp::Point(PointImp::new(Coordinate::new(0.0, 0.0)));
        assert_eq!(p.property(5), ObjectImp::Invalid);
    }
}
