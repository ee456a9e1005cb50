//! SO(3) rotation utilities
//!
//! Single-matrix helpers and the batch-wise conversion of unit quaternions
//! (scalar-first, `[w, x, y, z]`) into rotation matrices.

use nalgebra::{DMatrix, Matrix3, Vector3};

use crate::error::{Result, SamplerError};
use crate::math::batched::{batched_mat_mul, batched_skew, MatrixBatch};

/// Cross-product matrix `[v]×`, so that `[v]× x = v × x`
///
/// Slice builder for [`batched_skew`].
pub fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    v.cross_matrix()
}

/// Forward and inverse rotation matrices for a batch of quaternions
///
/// Each column of `quaternions` (shape 4 × B) is read as `[w, x, y, z]`
/// with v = (x, y, z). With
/// ```text
/// base  = v vᵀ + w² I + [v]×[v]×
/// delta = 2w [v]×
/// ```
/// the forward matrix is `base + delta` and the inverse is `base - delta`.
///
/// Columns are not normalized. For a column that is not unit-norm the
/// output is not a rotation; callers are responsible for passing unit
/// quaternions.
///
/// # Returns
/// `(forward, inverse)`, each of shape 3 × 3 × B
pub fn rotation_matrices_from_quaternions(
    quaternions: &DMatrix<f64>,
) -> Result<(MatrixBatch, MatrixBatch)> {
    if quaternions.nrows() != 4 {
        return Err(SamplerError::NotQuaternion {
            n_dims: quaternions.nrows(),
        });
    }
    let batch = quaternions.ncols();

    let w: Vec<f64> = quaternions.row(0).iter().copied().collect();
    let w_sq: Vec<f64> = w.iter().map(|w| w * w).collect();
    let two_w: Vec<f64> = w.iter().map(|w| 2.0 * w).collect();
    let v = quaternions.rows(1, 3).into_owned();

    let v_col = MatrixBatch::from_columns(&v);
    let outer = batched_mat_mul(&v_col, &v_col.transpose_each())?;
    let k = batched_skew(&v)?;
    let k_sq = batched_mat_mul(&k, &k)?;

    let base = outer
        .checked_add(&MatrixBatch::identity(3, batch).scale_each(&w_sq)?)?
        .checked_add(&k_sq)?;
    let delta = k.scale_each(&two_w)?;

    Ok((base.checked_add(&delta)?, base.checked_sub(&delta)?))
}

/// View a 3 × 3 slice as a fixed-size matrix
pub fn to_matrix3(m: &DMatrix<f64>) -> Option<Matrix3<f64>> {
    if m.shape() != (3, 3) {
        return None;
    }
    Some(m.fixed_view::<3, 3>(0, 0).into_owned())
}

/// Check `R Rᵀ = I` and `det R = 1` within `tolerance`
pub fn is_rotation_matrix(r: &Matrix3<f64>, tolerance: f64) -> bool {
    let orthogonal = (r * r.transpose() - Matrix3::identity()).abs().max() < tolerance;
    orthogonal && (r.determinant() - 1.0).abs() < tolerance
}
