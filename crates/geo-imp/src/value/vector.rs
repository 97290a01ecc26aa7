use crate::coordinate::{Coordinate, Transformation};
use crate::imp_type::{self, ImpType};
use crate::property::{PropertyDescriptor, PropertyList};

/// A free vector (difference of two points), per `objects/vector_type.cc`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorImp {
    pub direction: Coordinate,
}

impl VectorImp {
    pub fn new(direction: Coordinate) -> Self {
        VectorImp { direction }
    }

    pub fn imp_type(&self) -> &'static ImpType {
        &imp_type::VECTOR
    }

    /// Vectors transform by the transformation's linear part only: a
    /// translation component must not move a free vector.
    pub fn transform(&self, t: &Transformation) -> Option<VectorImp> {
        let origin = t.apply(Coordinate::new(0.0, 0.0))?;
        let tip = t.apply(self.direction)?;
        Some(VectorImp::new(tip - origin))
    }

    pub fn valid(&self) -> bool {
        self.direction.valid()
    }

    pub fn length(&self) -> f64 {
        self.direction.length()
    }

    pub fn attach_point(&self) -> Option<Coordinate> {
        Some(self.direction)
    }

    pub fn properties(&self) -> PropertyList {
        PropertyList::new().extend([PropertyDescriptor {
            internal_name: "length",
            display_name: "Length",
            icon: "",
            required_type: &imp_type::DOUBLE,
            defined_on_or_through: false,
        }])
    }
}
