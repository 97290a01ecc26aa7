//! Line, ray and segment Imps, grounded on `abstractline.h`'s storage of
//! every straight-line-like object as two points, with the subtype
//! distinguishing how far the object extends beyond them.

use crate::coordinate::{Coordinate, LineData, Transformation};
use crate::imp_type::{self, ImpType};
use crate::property::{PropertyDescriptor, PropertyList};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Extends infinitely in both directions through `a` and `b`.
    Line,
    /// Extends infinitely past `b`, starting at `a`.
    Ray,
    /// Bounded by `a` and `b`.
    Segment,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbstractLineImp {
    pub data: LineData,
    pub kind: LineKind,
}

impl AbstractLineImp {
    pub fn new(data: LineData, kind: LineKind) -> Self {
        AbstractLineImp { data, kind }
    }

    pub fn imp_type(&self) -> &'static ImpType {
        match self.kind {
            LineKind::Line => &imp_type::LINE,
            LineKind::Ray => &imp_type::RAY,
            LineKind::Segment => &imp_type::SEGMENT,
        }
    }

    /// Only affine transforms are guaranteed to keep a Ray a Ray (a
    /// projective map can swap which end is "infinite"); segments and
    /// lines tolerate any transform that doesn't send an endpoint to
    /// infinity.
    pub fn transform(&self, t: &Transformation) -> Option<AbstractLineImp> {
        if self.kind == LineKind::Ray && !t.is_affine() {
            return None;
        }
        let a = t.apply(self.data.a)?;
        let b = t.apply(self.data.b)?;
        Some(AbstractLineImp::new(LineData::new(a, b), self.kind))
    }

    pub fn valid(&self) -> bool {
        self.data.a.valid() && self.data.b.valid() && self.data.a != self.data.b
    }

    pub fn length(&self) -> Option<f64> {
        match self.kind {
            LineKind::Segment => Some(self.data.a.distance(self.data.b)),
            _ => None,
        }
    }

    pub fn attach_point(&self) -> Option<Coordinate> {
        match self.kind {
            LineKind::Segment => Some(Coordinate::midpoint(self.data.a, self.data.b)),
            _ => Some(self.data.a),
        }
    }

    pub fn contains(&self, point: Coordinate, width: f64) -> bool {
        let d = self.data.direction();
        let len2 = d.dot(d);
        if len2 < 1e-12 {
            return false;
        }
        let v = point - self.data.a;
        let t = v.dot(d) / len2;
        let proj = self.data.a + d * t;
        let dist = point.distance(proj);
        if dist > width {
            return false;
        }
        match self.kind {
            LineKind::Line => true,
            LineKind::Ray => t >= -1e-9,
            LineKind::Segment => (-1e-9..=1.0 + 1e-9).contains(&t),
        }
    }

    pub fn properties(&self) -> PropertyList {
        let mut list = PropertyList::new().extend([PropertyDescriptor {
            internal_name: "direction-vector",
            display_name: "Direction",
            icon: "",
            required_type: &imp_type::VECTOR,
            defined_on_or_through: false,
        }]);
        if self.kind == LineKind::Segment {
            list = list.extend([PropertyDescriptor {
                internal_name: "length",
                display_name: "Length",
                icon: "",
                required_type: &imp_type::DOUBLE,
                defined_on_or_through: false,
            }]);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_length() {
        let s = AbstractLineImp::new(
            LineData::new(Coordinate::new(0.0, 0.0), Coordinate::new(3.0, 4.0)),
            LineKind::Segment,
        );
        assert_eq!(s.length(), Some(5.0));
        assert!(s.valid());
    }

    #[test]
    fn line_has_no_finite_length() {
        let l = AbstractLineImp::new(
            LineData::new(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)),
            LineKind::Line,
        );
        assert_eq!(l.length(), None);
    }

    #[test]
    fn segment_contains_midpoint_but_not_beyond_endpoint() {
        let s = AbstractLineImp::new(
            LineData::new(Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 0.0)),
            LineKind::Segment,
        );
        assert!(s.contains(Coordinate::new(5.0, 0.0), 0.01));
        assert!(!s.contains(Coordinate::new(15.0, 0.0), 0.01));
    }

    #[test]
    fn ray_rejects_non_affine_transform() {
        let ray = AbstractLineImp::new(
            LineData::new(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)),
            LineKind::Ray,
        );
        let projective = Transformation {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 1.0]],
        };
        assert!(!projective.is_affine());
        assert!(ray.transform(&projective).is_none());
    }
}
