//! Differential transformation sequences
//!
//! Given rotations F[idx[0]], F[idx[1]], ... the sequence holds operators
//!
//! ```text
//! D[0] = F[idx[0]]
//! D[k] = F[idx[k]] · F[idx[k-1]]⁻¹      k = 1..M-1
//! ```
//!
//! so that D[k] · F[idx[k-1]] = F[idx[k]]. Applying D[0], D[1], ... in turn
//! to a dataset moves it through every selected orientation without
//! undoing the previous transform.

use nalgebra::{DMatrix, Matrix3};
use tracing::debug;

use crate::error::{Result, SamplerError};
use crate::math::batched::{batched_mat_mul, MatrixBatch};
use crate::math::rotation::to_matrix3;
use crate::sampling::sampler::RotationPair;

/// Frame-to-frame rotation operators and the sample indices they link
#[derive(Debug, Clone, PartialEq)]
pub struct TransformationSequence {
    operators: MatrixBatch,
    indices: Vec<usize>,
}

impl TransformationSequence {
    /// Derive the sequence for indices `start, start + stride, ...` below B
    ///
    /// # Errors
    /// [`SamplerError::InvalidStride`] for `stride == 0` and
    /// [`SamplerError::StartOutOfRange`] when `start >= B`.
    pub fn from_rotations(rotations: &RotationPair, start: usize, stride: usize) -> Result<Self> {
        if stride == 0 {
            return Err(SamplerError::InvalidStride);
        }
        let len = rotations.len();
        if start >= len {
            return Err(SamplerError::StartOutOfRange { start, len });
        }

        let indices: Vec<usize> = (start..len).step_by(stride).collect();
        let forward = rotations.forward().as_slice();
        let inverse = rotations.inverse().as_slice();

        let next = MatrixBatch::from_slices(
            3,
            3,
            indices[1..].iter().map(|&i| forward[i].clone()).collect(),
        )?;
        let prev_inv = MatrixBatch::from_slices(
            3,
            3,
            indices[..indices.len() - 1]
                .iter()
                .map(|&i| inverse[i].clone())
                .collect(),
        )?;
        let steps = batched_mat_mul(&next, &prev_inv)?;

        let mut slices = Vec::with_capacity(indices.len());
        slices.push(forward[indices[0]].clone());
        slices.extend(steps.into_slices());
        let operators = MatrixBatch::from_slices(3, 3, slices)?;

        debug!(start, stride, operators = indices.len(), "derived transformation sequence");
        Ok(Self { operators, indices })
    }

    /// Number of operators M
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Sample indices linked by the operators
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Operators as a 3 × 3 × M batch
    pub fn operators(&self) -> &MatrixBatch {
        &self.operators
    }

    pub fn operator(&self, k: usize) -> Option<Matrix3<f64>> {
        self.operators.get(k).and_then(to_matrix3)
    }

    /// Accumulated rotation D[k] · ... · D[0]
    ///
    /// For orthogonal inputs this reproduces F[idx[k]].
    pub fn compose(&self, k: usize) -> Option<Matrix3<f64>> {
        if k >= self.len() {
            return None;
        }
        (0..=k).try_fold(Matrix3::identity(), |acc, i| Some(self.operator(i)? * acc))
    }

    /// Rotate a 3 × P dataset through every step of the sequence
    ///
    /// Element k of the result is D[k] applied to element k - 1 (element 0
    /// is D[0] applied to `data`).
    pub fn transform_all(&self, data: &DMatrix<f64>) -> Result<Vec<DMatrix<f64>>> {
        if data.nrows() != 3 {
            return Err(SamplerError::shape(
                "TransformationSequence::transform_all",
                "3 rows",
                data.nrows().to_string(),
            ));
        }

        let mut current = data.clone();
        let mut out = Vec::with_capacity(self.len());
        for d in self.operators.iter() {
            current = d * &current;
            out.push(current.clone());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{UnitQuaternion, Vector3};

    fn rotations_about_z(angles: &[f64]) -> RotationPair {
        let forward: Vec<DMatrix<f64>> = angles
            .iter()
            .map(|&a| {
                let r = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), a);
                DMatrix::from_iterator(3, 3, r.to_rotation_matrix().matrix().iter().copied())
            })
            .collect();
        let inverse = forward.iter().map(|m| m.transpose()).collect();
        RotationPair::new(
            MatrixBatch::from_slices(3, 3, forward).unwrap(),
            MatrixBatch::from_slices(3, 3, inverse).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_indices_progression() {
        let pair = rotations_about_z(&[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);

        let seq = TransformationSequence::from_rotations(&pair, 1, 2).unwrap();

        assert_eq!(seq.indices(), &[1, 3, 5]);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.operators().shape(), (3, 3, 3));
    }

    #[test]
    fn test_first_operator_is_forward() {
        let pair = rotations_about_z(&[0.3, 0.7, 1.1]);

        let seq = TransformationSequence::from_rotations(&pair, 1, 1).unwrap();

        assert_eq!(seq.operators().get(0), pair.forward().get(1));
    }

    #[test]
    fn test_steps_about_common_axis() {
        // Consecutive z rotations differ by a rotation of the angle gap
        let pair = rotations_about_z(&[0.2, 0.5, 1.0]);

        let seq = TransformationSequence::from_rotations(&pair, 0, 1).unwrap();

        let expected = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.5);
        assert_relative_eq!(
            seq.operator(2).unwrap(),
            *expected.to_rotation_matrix().matrix(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_single_operator() {
        let pair = rotations_about_z(&[0.1, 0.2, 0.3]);

        let seq = TransformationSequence::from_rotations(&pair, 2, 5).unwrap();

        assert_eq!(seq.indices(), &[2]);
        assert_eq!(seq.operator(0), pair.forward_matrix(2));
        assert!(seq.operator(1).is_none());
    }

    #[test]
    fn test_invalid_arguments() {
        let pair = rotations_about_z(&[0.1, 0.2]);

        assert_eq!(
            TransformationSequence::from_rotations(&pair, 0, 0).unwrap_err(),
            SamplerError::InvalidStride
        );
        assert_eq!(
            TransformationSequence::from_rotations(&pair, 2, 1).unwrap_err(),
            SamplerError::StartOutOfRange { start: 2, len: 2 }
        );
    }

    #[test]
    fn test_compose_reproduces_forward() {
        let pair = rotations_about_z(&[0.4, -0.2, 1.3, 2.9]);

        let seq = TransformationSequence::from_rotations(&pair, 0, 1).unwrap();

        for k in 0..seq.len() {
            assert_relative_eq!(
                seq.compose(k).unwrap(),
                pair.forward_matrix(k).unwrap(),
                epsilon = 1e-12
            );
        }
        assert!(seq.compose(4).is_none());
    }

    #[test]
    fn test_transform_all() {
        let pair = rotations_about_z(&[0.0, std::f64::consts::FRAC_PI_2]);
        let seq = TransformationSequence::from_rotations(&pair, 0, 1).unwrap();
        let data = DMatrix::from_column_slice(3, 1, &[1.0, 0.0, 0.0]);

        let steps = seq.transform_all(&data).unwrap();

        assert_eq!(steps.len(), 2);
        assert_relative_eq!(steps[0], data, epsilon = 1e-12);
        assert_relative_eq!(steps[1][(1, 0)], 1.0, epsilon = 1e-12);
        assert!(seq.transform_all(&DMatrix::zeros(2, 1)).is_err());
    }
}
