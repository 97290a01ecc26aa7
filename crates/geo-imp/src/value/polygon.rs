//! Polygon Imp, ported from `objects/polygon_imp.cc`: shoelace area, side-
//! length perimeter, steering-direction winding number and gift-wrapping
//! convex hull.

use crate::coordinate::{Coordinate, Transformation};
use crate::imp_type::{self, ImpType};
use crate::property::{PropertyDescriptor, PropertyList};

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonImp {
    pub points: Vec<Coordinate>,
    /// Filled (true) vs boundary-only (false).
    pub inside: bool,
    /// Open polyline (true) vs closed polygon (false).
    pub open: bool,
}

impl PolygonImp {
    /// Returns `None` (-> `InvalidImp`) when `inside && open`, per spec
    /// §4.B's invariant, or when fewer than 3 points are given.
    pub fn new(points: Vec<Coordinate>, inside: bool, open: bool) -> Option<Self> {
        if inside && open {
            return None;
        }
        if points.len() < 3 {
            return None;
        }
        Some(PolygonImp { points, inside, open })
    }

    pub fn imp_type(&self) -> &'static ImpType {
        &imp_type::POLYGON
    }

    pub fn valid(&self) -> bool {
        !(self.inside && self.open) && self.points.len() >= 3 && self.points.iter().all(|p| p.valid())
    }

    pub fn transform(&self, t: &Transformation) -> Option<PolygonImp> {
        // A non-affine transform can send a vertex across the line at
        // infinity; when that happens the whole polygon becomes invalid
        // rather than silently producing a degenerate shape.
        let points: Vec<Coordinate> = self
            .points
            .iter()
            .map(|p| t.apply(*p))
            .collect::<Option<Vec<_>>>()?;
        Some(PolygonImp {
            points,
            inside: self.inside,
            open: self.open,
        })
    }

    fn edges(&self) -> Vec<(Coordinate, Coordinate)> {
        let n = self.points.len();
        if self.open {
            (0..n - 1).map(|i| (self.points[i], self.points[i + 1])).collect()
        } else {
            (0..n).map(|i| (self.points[i], self.points[(i + 1) % n])).collect()
        }
    }

    /// Shoelace sum; undefined (0.0) for open polylines since they don't
    /// enclose an area.
    pub fn signed_area(&self) -> f64 {
        if self.open {
            return 0.0;
        }
        let n = self.points.len();
        let mut sum = 0.0;
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            sum += p.x * q.y - q.x * p.y;
        }
        sum / 2.0
    }

    pub fn perimeter(&self) -> f64 {
        self.edges().iter().map(|(a, b)| a.distance(*b)).sum()
    }

    /// Sum of exterior turning angles along the boundary, divided by 2*pi,
    /// rounded to the nearest integer: the number of full turns the
    /// boundary makes, ported from the steering-direction accounting in
    /// `polygon_imp.cc`.
    pub fn winding_number(&self) -> i64 {
        if self.open || self.points.len() < 3 {
            return 0;
        }
        let n = self.points.len();
        let mut total_turn = 0.0;
        for i in 0..n {
            let prev = self.points[(i + n - 1) % n];
            let cur = self.points[i];
            let next = self.points[(i + 1) % n];
            let in_dir = cur - prev;
            let out_dir = next - cur;
            let cross = in_dir.x * out_dir.y - in_dir.y * out_dir.x;
            let dot = in_dir.dot(out_dir);
            total_turn += cross.atan2(dot);
        }
        (total_turn / crate::coordinate::TAU).round() as i64
    }

    pub fn is_convex(&self) -> bool {
        if self.open || self.points.len() < 3 {
            return false;
        }
        let n = self.points.len();
        let mut sign = 0.0_f64;
        for i in 0..n {
            let prev = self.points[(i + n - 1) % n];
            let cur = self.points[i];
            let next = self.points[(i + 1) % n];
            let cross = (cur - prev).x * (next - cur).y - (cur - prev).y * (next - cur).x;
            if cross.abs() < 1e-12 {
                continue;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        sign != 0.0
    }

    /// Gift-wrapping convex hull, O(n^2), acceptable per spec §4.B.
    pub fn convex_hull(&self) -> Vec<Coordinate> {
        let points = &self.points;
        if points.len() < 3 {
            return points.clone();
        }
        let start = points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.x.partial_cmp(&b.x).unwrap().then(a.y.partial_cmp(&b.y).unwrap()))
            .map(|(i, _)| i)
            .unwrap();

        let mut hull = Vec::new();
        let mut current = start;
        loop {
            hull.push(points[current]);
            let mut candidate = (current + 1) % points.len();
            for i in 0..points.len() {
                if i == current {
                    continue;
                }
                let cross = cross_turn(points[current], points[candidate], points[i]);
                if cross < 0.0
                    || (cross.abs() < 1e-12
                        && points[current].distance(points[i]) > points[current].distance(points[candidate]))
                {
                    candidate = i;
                }
            }
            current = candidate;
            if current == start {
                break;
            }
            if hull.len() > points.len() {
                break; // defensive: malformed input, avoid an infinite loop
            }
        }
        hull
    }

    pub fn contains(&self, point: Coordinate, width: f64) -> bool {
        if self.inside {
            self.point_in_polygon(point) || self.distance_to_boundary(point) <= width
        } else {
            self.distance_to_boundary(point) <= width
        }
    }

    fn distance_to_boundary(&self, point: Coordinate) -> f64 {
        self.edges()
            .iter()
            .map(|(a, b)| distance_to_segment(point, *a, *b))
            .fold(f64::INFINITY, f64::min)
    }

    fn point_in_polygon(&self, point: Coordinate) -> bool {
        if self.open {
            return false;
        }
        let n = self.points.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y > point.y) != (pj.y > point.y) {
                let x_intersect = (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
                if point.x < x_intersect {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    pub fn attach_point(&self) -> Option<Coordinate> {
        self.points.first().copied()
    }

    pub fn properties(&self) -> PropertyList {
        let mut list = PropertyList::new().extend([PropertyDescriptor {
            internal_name: "perimeter",
            display_name: "Perimeter",
            icon: "",
            required_type: &imp_type::DOUBLE,
            defined_on_or_through: false,
        }]);
        if !self.open {
            list = list.extend([PropertyDescriptor {
                internal_name: "surface",
                display_name: "Area",
                icon: "",
                required_type: &imp_type::DOUBLE,
                defined_on_or_through: false,
            }]);
        }
        list
    }
}

fn cross_turn(o: Coordinate, a: Coordinate, b: Coordinate) -> f64 {
    (a - o).x * (b - o).y - (a - o).y * (b - o).x
}

fn distance_to_segment(p: Coordinate, a: Coordinate, b: Coordinate) -> f64 {
    let d = b - a;
    let len2 = d.dot(d);
    if len2 < 1e-12 {
        return p.distance(a);
    }
    let t = ((p - a).dot(d) / len2).clamp(0.0, 1.0);
    p.distance(a + d * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> PolygonImp {
        PolygonImp::new(
            vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 0.0),
                Coordinate::new(1.0, 1.0),
                Coordinate::new(0.0, 1.0),
            ],
            true,
            false,
        )
        .unwrap()
    }

    #[test]
    fn inside_and_open_is_rejected() {
        assert!(PolygonImp::new(vec![Coordinate::new(0.0, 0.0); 3], true, true).is_none());
    }

    #[test]
    fn signed_area_flips_sign_on_reversal() {
        let p = square();
        let mut reversed = p.points.clone();
        reversed.reverse();
        let r = PolygonImp::new(reversed, true, false).unwrap();
        assert!((p.signed_area() + r.signed_area()).abs() < 1e-9);
        assert!((p.signed_area().abs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn square_is_convex_with_unit_winding() {
        let p = square();
        assert!(p.is_convex());
        assert_eq!(p.winding_number().abs(), 1);
    }

    #[test]
    fn square_perimeter_is_four() {
        let p = square();
        assert!((p.perimeter() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn convex_hull_of_square_plus_interior_point_is_the_square() {
        let mut pts = square().points;
        pts.push(Coordinate::new(0.5, 0.5));
        let p = PolygonImp::new(pts, true, false).unwrap();
        let hull = p.convex_hull();
        assert_eq!(hull.len(), 4);
    }

    #[test]
    fn point_in_polygon_matches_filled_flag() {
        let p = square();
        assert!(p.contains(Coordinate::new(0.5, 0.5), 1e-6));
        let boundary_only = PolygonImp::new(p.points.clone(), false, false).unwrap();
        // point_in_polygon is a pure geometric winding test over the
        // vertices; it reports interior points regardless of `inside`,
        // which only gates whether `contains` consults it.
        assert!(boundary_only.point_in_polygon(Coordinate::new(0.5, 0.5)));
        assert!(!boundary_only.contains(Coordinate::new(0.5, 0.5), 1e-6));
        assert!(boundary_only.contains(Coordinate::new(0.0, 0.5), 1e-6));
    }
}
