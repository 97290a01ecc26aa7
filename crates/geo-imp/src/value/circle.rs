use crate::coordinate::{Coordinate, Transformation};
use crate::imp_type::{self, ImpType};
use crate::property::{PropertyDescriptor, PropertyList};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleImp {
    pub center: Coordinate,
    pub radius: f64,
}

impl CircleImp {
    pub fn new(center: Coordinate, radius: f64) -> Self {
        CircleImp { center, radius }
    }

    pub fn imp_type(&self) -> &'static ImpType {
        &imp_type::CIRCLE
    }

    /// A circle stays a circle only under a homothety (translation,
    /// rotation, uniform scaling); any other affine map produces an
    /// ellipse, which this Imp cannot represent, so the transform is
    /// rejected the way the original reports `Invalid` for out-of-range
    /// results rather than silently approximating.
    pub fn transform(&self, t: &Transformation) -> Option<CircleImp> {
        if !t.is_homothetic() {
            return None;
        }
        let center = t.apply(self.center)?;
        let edge = t.apply(self.center + Coordinate::new(self.radius, 0.0))?;
        Some(CircleImp::new(center, center.distance(edge)))
    }

    pub fn valid(&self) -> bool {
        self.center.valid() && self.radius.is_finite() && self.radius > 0.0
    }

    pub fn contains(&self, point: Coordinate, width: f64) -> bool {
        (self.center.distance(point) - self.radius).abs() <= width
    }

    pub fn circumference(&self) -> f64 {
        crate::coordinate::TAU * self.radius
    }

    pub fn attach_point(&self) -> Option<Coordinate> {
        Some(self.center)
    }

    pub fn properties(&self) -> PropertyList {
        PropertyList::new().extend([
            PropertyDescriptor {
                internal_name: "center",
                display_name: "Center",
                icon: "",
                required_type: &imp_type::POINT,
                defined_on_or_through: true,
            },
            PropertyDescriptor {
                internal_name: "radius",
                display_name: "Radius",
                icon: "",
                required_type: &imp_type::DOUBLE,
                defined_on_or_through: false,
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_scaling_keeps_circle_a_circle() {
        let c = CircleImp::new(Coordinate::new(0.0, 0.0), 2.0);
        let t = Transformation::scaling(Coordinate::new(0.0, 0.0), 3.0);
        let scaled = c.transform(&t).unwrap();
        assert!((scaled.radius - 6.0).abs() < 1e-9);
    }

    #[test]
    fn non_uniform_scaling_is_rejected() {
        let c = CircleImp::new(Coordinate::new(0.0, 0.0), 2.0);
        let t = Transformation {
            m: [[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        };
        assert!(c.transform(&t).is_none());
    }

    #[test]
    fn center_property_is_defined_on_or_through() {
        let c = CircleImp::new(Coordinate::new(1.0, 1.0), 1.0);
        let props = c.properties();
        assert!(props.get(0).unwrap().defined_on_or_through);
    }
}
