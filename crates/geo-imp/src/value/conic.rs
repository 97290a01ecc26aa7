use crate::coordinate::{Coordinate, Transformation};
use crate::imp_type::{self, ImpType};
use crate::property::PropertyList;

/// General conic `a x^2 + b xy + c y^2 + d x + e y + f = 0`, mirroring
/// `CubicCartesianData`'s fixed-coefficient-array convention one degree
/// down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicImp {
    pub coeffs: [f64; 6],
}

impl ConicImp {
    pub fn new(coeffs: [f64; 6]) -> Self {
        ConicImp { coeffs }
    }

    pub fn invalid() -> Self {
        ConicImp { coeffs: [f64::NAN; 6] }
    }

    pub fn imp_type(&self) -> &'static ImpType {
        &imp_type::CONIC
    }

    pub fn valid(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_finite()) && self.coeffs.iter().any(|&c| c != 0.0)
    }

    pub fn eval(&self, p: Coordinate) -> f64 {
        let [a, b, c, d, e, f] = self.coeffs;
        a * p.x * p.x + b * p.x * p.y + c * p.y * p.y + d * p.x + e * p.y + f
    }

    pub fn contains(&self, p: Coordinate, width: f64) -> bool {
        self.eval(p).abs() <= width
    }

    /// Transforms the conic by substituting the inverse map into its
    /// implicit equation. Only affine transforms are supported here; a
    /// projective transform of a conic can still be a conic, but computing
    /// it needs the full homogeneous quadratic form machinery that this
    /// minimal Imp does not carry, so it is reported `Invalid` rather than
    /// silently wrong.
    pub fn transform(&self, t: &Transformation) -> Option<ConicImp> {
        if !t.is_affine() {
            return None;
        }
        let m = t.m;
        let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
        if det.abs() < 1e-12 {
            return None;
        }
        // Invert the 2x2 linear part plus translation.
        let inv00 = m[1][1] / det;
        let inv01 = -m[0][1] / det;
        let inv10 = -m[1][0] / det;
        let inv11 = m[0][0] / det;
        let tx = m[0][2];
        let ty = m[1][2];

        let [a, b, c, d, e, f] = self.coeffs;
        // x' = inv*(x-tx,y-ty); substitute into original coefficients.
        // Compose as a quadratic form; derived by direct substitution.
        let (p00, p01, p10, p11) = (inv00, inv01, inv10, inv11);
        let na = a * p00 * p00 + b * p00 * p10 + c * p10 * p10;
        let nb = 2.0 * a * p00 * p01 + b * (p00 * p11 + p01 * p10) + 2.0 * c * p10 * p11;
        let nc = a * p01 * p01 + b * p01 * p11 + c * p11 * p11;
        let lin_x = -(2.0 * a * p00 * tx + b * (p00 * ty + p10 * tx) + 2.0 * c * p10 * ty) + d * p00 + e * p10;
        let lin_y = -(2.0 * a * p01 * tx + b * (p01 * ty + p11 * tx) + 2.0 * c * p11 * ty) + d * p01 + e * p11;
        let nf = a * tx * tx + b * tx * ty + c * ty * ty - d * tx - e * ty + f;
        Some(ConicImp::new([na, nb, nc, lin_x, lin_y, nf]))
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
    fn unit_circle_as_conic_contains_point_on_boundary() {
        // x^2 + y^2 - 1 = 0
        let c = ConicImp::new([1.0, 0.0, 1.0, 0.0, 0.0, -1.0]);
        assert!(c.contains(Coordinate::new(1.0, 0.0), 1e-9));
        assert!(!c.contains(Coordinate::new(2.0, 0.0), 1e-9));
    }

    #[test]
    fn translated_unit_circle_still_contains_translated_point() {
        let c = ConicImp::new([1.0, 0.0, 1.0, 0.0, 0.0, -1.0]);
        let t = Transformation::translation(Coordinate::new(5.0, 0.0));
        let moved = c.transform(&t).unwrap();
        assert!(moved.contains(Coordinate::new(6.0, 0.0), 1e-6));
    }

    #[test]
    fn invalid_conic_is_not_valid() {
        assert!(!ConicImp::invalid().valid());
    }
}
