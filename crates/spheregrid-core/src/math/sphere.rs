//! Unit sphere S^(N-1) operations
//!
//! Point sets are stored column-wise: an N × B matrix holds B points of R^N.

use nalgebra::DMatrix;

/// Euclidean norm of every column
pub fn column_norms(points: &DMatrix<f64>) -> Vec<f64> {
    points.column_iter().map(|c| c.norm()).collect()
}

/// Project every column radially onto the unit sphere
///
/// Columns with norm below 1e-10 cannot be projected and are left
/// unchanged.
pub fn normalize_columns(points: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = points.clone();
    for mut column in out.column_iter_mut() {
        let norm = column.norm();
        if norm >= 1e-10 {
            column /= norm;
        }
    }
    out
}

/// Check if every column is a unit vector
pub fn all_unit_columns(points: &DMatrix<f64>, tolerance: f64) -> bool {
    column_norms(points)
        .iter()
        .all(|n| (n - 1.0).abs() < tolerance)
}

/// Angle between two unit columns `i` and `j`
///
/// Returns the angle in radians [0, π], or None if either index is out of
/// range
pub fn angle_between_columns(points: &DMatrix<f64>, i: usize, j: usize) -> Option<f64> {
    if i >= points.ncols() || j >= points.ncols() {
        return None;
    }
    let dot = points.column(i).dot(&points.column(j)).clamp(-1.0, 1.0);
    Some(dot.acos())
}
