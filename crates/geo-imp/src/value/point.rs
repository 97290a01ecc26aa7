use crate::coordinate::{Coordinate, Transformation};
use crate::imp_type::{self, ImpType};
use crate::property::{PropertyDescriptor, PropertyList};

/// A single point in the plane (spec §3.1, §4.B).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointImp {
    pub coord: Coordinate,
}

impl PointImp {
    pub fn new(coord: Coordinate) -> Self {
        PointImp { coord }
    }

    pub fn imp_type(&self) -> &'static ImpType {
        &imp_type::POINT
    }

    pub fn transform(&self, t: &Transformation) -> Option<PointImp> {
        t.apply(self.coord).map(PointImp::new)
    }

    pub fn valid(&self) -> bool {
        self.coord.valid()
    }

    pub fn attach_point(&self) -> Option<Coordinate> {
        Some(self.coord)
    }

    pub fn properties(&self) -> PropertyList {
        PropertyList::new().extend([
            PropertyDescriptor {
                internal_name: "coordinate-x",
                display_name: "X coordinate",
                icon: "", // cosmetic, supplied by the UI layer, out of scope here
                required_type: &imp_type::DOUBLE,
                defined_on_or_through: false,
            },
            PropertyDescriptor {
                internal_name: "coordinate-y",
                display_name: "Y coordinate",
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
    fn transform_by_translation_moves_point() {
        let p = PointImp::new(Coordinate::new(1.0, 1.0));
        let t = Transformation::translation(Coordinate::new(2.0, -1.0));
        let moved = p.transform(&t).unwrap();
        assert_eq!(moved.coord, Coordinate::new(3.0, 0.0));
    }

    #[test]
    fn properties_are_ordered_x_then_y() {
        let p = PointImp::new(Coordinate::new(1.0, 2.0));
        let props = p.properties();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get(0).unwrap().internal_name, "coordinate-x");
        assert_eq!(props.get(1).unwrap().internal_name, "coordinate-y");
    }
}
