//! Transformations as first-class Imps: a kig construction can take a
//! transformation object as an argument to another construction ("reflect
//! this point over that transformation"), so the `Transformation` matrix
//! type needs an Imp wrapper with the usual `imp_type`/`transform`/`valid`
//! surface, same as every other geometric value.

use crate::coordinate::{Coordinate, Transformation};
use crate::imp_type::{self, ImpType};
use crate::property::PropertyList;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformationImp {
    pub transformation: Transformation,
}

impl TransformationImp {
    pub fn new(transformation: Transformation) -> Self {
        TransformationImp { transformation }
    }

    pub fn imp_type(&self) -> &'static ImpType {
        &imp_type::TRANSFORMATION
    }

    /// Composing a transformation with the map that carries the document
    /// containing it (e.g. when the whole construction is itself reflected)
    /// is `outer . self`, matching `Transformation::compose`'s convention.
    pub fn transform(&self, t: &Transformation) -> Option<TransformationImp> {
        Some(TransformationImp::new(t.compose(&self.transformation)))
    }

    pub fn valid(&self) -> bool {
        self.transformation.m.iter().flatten().all(|c| c.is_finite())
    }

    pub fn attach_point(&self) -> Option<Coordinate> {
        None
    }

    pub fn properties(&self) -> PropertyList {
        PropertyList::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composing_with_identity_is_a_no_op() {
        let tr = TransformationImp::new(Transformation::translation(Coordinate::new(1.0, 2.0)));
        let composed = tr.transform(&Transformation::identity()).unwrap();
        assert_eq!(composed.transformation, tr.transformation);
    }

    #[test]
    fn invalid_matrix_entries_make_it_invalid() {
        let mut t = Transformation::identity();
        t.m[0][0] = f64::NAN;
        assert!(!TransformationImp::new(t).valid());
    }
}
