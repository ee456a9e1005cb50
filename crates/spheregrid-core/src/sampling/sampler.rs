//! Deterministic sphere sampler
//!
//! Holds the sample point set and, for quaternion samplers, the derived
//! rotation matrices. Operations follow a linear state machine:
//!
//! ```text
//! Constructed → (Filtered) → Converted → transformation sequence
//! ```
//!
//! Mutating the sample set discards previously computed rotation matrices,
//! so a transformation sequence can never be derived from stale data.
//! A sampler is meant to be owned by a single pipeline; sharing one across
//! threads requires external synchronization.

use nalgebra::{DMatrix, DVector, Matrix3, Quaternion, UnitQuaternion};
use tracing::{debug, warn};

use crate::error::{Result, SamplerError};
use crate::math::batched::MatrixBatch;
use crate::math::rotation::{rotation_matrices_from_quaternions, to_matrix3};
use crate::math::sphere::normalize_columns;
use crate::sampling::config::SamplerConfig;
use crate::sampling::grid::cube_surface_points;
use crate::sampling::sequence::TransformationSequence;

/// Lifecycle of a sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// Sample set built, no rotation matrices
    Constructed,
    /// Antipodal duplicates removed, no rotation matrices
    Filtered,
    /// Rotation matrices computed from the current sample set
    Converted,
}

/// Forward and inverse rotation matrices, batch-aligned with the samples
#[derive(Debug, Clone, PartialEq)]
pub struct RotationPair {
    forward: MatrixBatch,
    inverse: MatrixBatch,
}

impl RotationPair {
    /// Pair two 3 × 3 × B batches
    ///
    /// Fails if either batch is not 3 × 3 or the batch sizes differ. The
    /// slices are not checked for orthogonality.
    pub fn new(forward: MatrixBatch, inverse: MatrixBatch) -> Result<Self> {
        for batch in [&forward, &inverse] {
            let (rows, cols, _) = batch.shape();
            if (rows, cols) != (3, 3) {
                return Err(SamplerError::shape(
                    "RotationPair::new",
                    "3x3",
                    format!("{}x{}", rows, cols),
                ));
            }
        }
        if forward.batch_len() != inverse.batch_len() {
            return Err(SamplerError::BatchMismatch {
                left: forward.batch_len(),
                right: inverse.batch_len(),
            });
        }
        Ok(Self { forward, inverse })
    }

    pub fn forward(&self) -> &MatrixBatch {
        &self.forward
    }

    pub fn inverse(&self) -> &MatrixBatch {
        &self.inverse
    }

    pub fn len(&self) -> usize {
        self.forward.batch_len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn forward_matrix(&self, index: usize) -> Option<Matrix3<f64>> {
        self.forward.get(index).and_then(to_matrix3)
    }

    pub fn inverse_matrix(&self, index: usize) -> Option<Matrix3<f64>> {
        self.inverse.get(index).and_then(to_matrix3)
    }
}

/// Near-uniform deterministic sampler of S^(N-1)
#[derive(Debug, Clone)]
pub struct SphereSampler {
    points: DMatrix<f64>,
    state: SamplerState,
    rotations: Option<RotationPair>,
}

impl SphereSampler {
    /// Sample S^(n_dims - 1) from a cube grid with `n_samples` points per axis
    ///
    /// # Arguments
    /// * `n_dims` - Ambient dimension N (at least 2)
    /// * `n_samples` - Grid points per axis on each cube face (at least 1)
    pub fn new(n_dims: usize, n_samples: usize) -> Result<Self> {
        Self::from_config(&SamplerConfig::new(n_dims, n_samples))
    }

    pub fn from_config(config: &SamplerConfig) -> Result<Self> {
        let surface = cube_surface_points(config.n_dims, config.n_samples)?;
        let points = normalize_columns(&surface);
        debug!(
            n_dims = config.n_dims,
            n_samples = config.n_samples,
            points = points.ncols(),
            "constructed sphere sample set"
        );

        Ok(Self {
            points,
            state: SamplerState::Constructed,
            rotations: None,
        })
    }

    /// Wrap an existing N × B point set
    ///
    /// Columns are used as given. If they are not unit-norm, rotation
    /// matrices derived from them are not rotations.
    pub fn from_points(points: DMatrix<f64>) -> Result<Self> {
        if points.nrows() < 2 {
            return Err(SamplerError::InvalidConfig(format!(
                "points must have at least 2 coordinates, got {}",
                points.nrows()
            )));
        }
        Ok(Self {
            points,
            state: SamplerState::Constructed,
            rotations: None,
        })
    }

    pub fn n_dims(&self) -> usize {
        self.points.nrows()
    }

    /// Number of sample points B
    pub fn len(&self) -> usize {
        self.points.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.points.ncols() == 0
    }

    /// Sample points, one unit vector per column
    pub fn sample_points(&self) -> &DMatrix<f64> {
        &self.points
    }

    pub fn point(&self, index: usize) -> Option<DVector<f64>> {
        (index < self.len()).then(|| self.points.column(index).into_owned())
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    /// Rotation matrices, if computed since the last change to the samples
    pub fn rotations(&self) -> Option<&RotationPair> {
        self.rotations.as_ref()
    }

    /// Sample `index` as a unit quaternion (4-D samplers only)
    ///
    /// The column is renormalized by nalgebra.
    pub fn quaternion(&self, index: usize) -> Option<UnitQuaternion<f64>> {
        if self.n_dims() != 4 || index >= self.len() {
            return None;
        }
        let c = self.points.column(index);
        Some(UnitQuaternion::from_quaternion(Quaternion::new(
            c[0], c[1], c[2], c[3],
        )))
    }

    /// Keep only samples with strictly positive first coordinate
    ///
    /// For quaternions this keeps one of each {q, -q} pair, i.e. one sample
    /// per physical rotation. Survivors keep their relative order. Any
    /// computed rotation matrices are discarded.
    ///
    /// Intended for 4-D samplers; other dimensions are filtered the same
    /// way with a warning.
    ///
    /// # Returns
    /// Number of samples removed
    pub fn remove_redundant_rotations(&mut self) -> usize {
        if self.n_dims() != 4 {
            warn!(
                n_dims = self.n_dims(),
                "removing redundant rotations from a non-quaternion sample set"
            );
        }

        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| self.points[(0, i)] > 0.0)
            .collect();
        let removed = self.len() - keep.len();

        self.points = self.points.select_columns(keep.iter());
        self.rotations = None;
        self.state = SamplerState::Filtered;

        debug!(kept = keep.len(), removed, "removed redundant rotations");
        removed
    }

    /// Convert every sample (scalar-first unit quaternion) to rotation matrices
    ///
    /// Overwrites matrices from a previous call. Samples are expected to be
    /// unit-norm; this is not checked.
    pub fn compute_rotation_matrices(&mut self) -> Result<&RotationPair> {
        let (forward, inverse) = rotation_matrices_from_quaternions(&self.points)?;
        debug!(batch = forward.batch_len(), "computed rotation matrices");

        self.state = SamplerState::Converted;
        Ok(&*self.rotations.insert(RotationPair { forward, inverse }))
    }

    /// Differential rotations between samples `start, start + stride, ...`
    ///
    /// # Errors
    /// [`SamplerError::RotationsNotComputed`] if
    /// [`compute_rotation_matrices`](Self::compute_rotation_matrices) has
    /// not run since the sample set last changed.
    pub fn transformation_sequence(&self, start: usize, stride: usize) -> Result<TransformationSequence> {
        let rotations = self
            .rotations
            .as_ref()
            .ok_or(SamplerError::RotationsNotComputed)?;
        TransformationSequence::from_rotations(rotations, start, stride)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::math::sphere::all_unit_columns;

    #[test]
    fn test_new_default_sphere() {
        let sampler = SphereSampler::from_config(&SamplerConfig::default()).unwrap();

        assert_eq!(sampler.n_dims(), 3);
        assert_eq!(sampler.len(), 98);
        assert_eq!(sampler.state(), SamplerState::Constructed);
        assert!(sampler.rotations().is_none());
        assert!(all_unit_columns(sampler.sample_points(), 1e-10));
    }

    #[test]
    fn test_new_rejects_invalid() {
        assert!(SphereSampler::new(1, 5).is_err());
        assert!(SphereSampler::new(3, 0).is_err());
    }

    #[test]
    fn test_from_points_rejects_single_row() {
        assert!(SphereSampler::from_points(DMatrix::zeros(1, 3)).is_err());
    }

    #[test]
    fn test_remove_redundant_keeps_positive_scalar() {
        let mut sampler = SphereSampler::new(4, 3).unwrap();
        let before = sampler.len();

        let removed = sampler.remove_redundant_rotations();

        assert_eq!(before, 80);
        assert_eq!(sampler.len(), 27);
        assert_eq!(removed, 53);
        assert_eq!(sampler.state(), SamplerState::Filtered);
        for i in 0..sampler.len() {
            assert!(sampler.sample_points()[(0, i)] > 0.0);
        }
    }

    #[test]
    fn test_remove_redundant_preserves_order() {
        let points = DMatrix::from_column_slice(
            4,
            4,
            &[
                0.5, 0.5, 0.5, 0.5,
                -1.0, 0.0, 0.0, 0.0,
                1.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
            ],
        );
        let mut sampler = SphereSampler::from_points(points.clone()).unwrap();

        sampler.remove_redundant_rotations();

        assert_eq!(sampler.len(), 2);
        assert_eq!(sampler.point(0).unwrap(), points.column(0).into_owned());
        assert_eq!(sampler.point(1).unwrap(), points.column(2).into_owned());
        assert!(sampler.point(2).is_none());
    }

    #[test]
    fn test_filter_discards_rotations() {
        let mut sampler = SphereSampler::new(4, 3).unwrap();
        sampler.compute_rotation_matrices().unwrap();
        assert_eq!(sampler.state(), SamplerState::Converted);

        sampler.remove_redundant_rotations();

        assert!(sampler.rotations().is_none());
        assert_eq!(
            sampler.transformation_sequence(0, 1).unwrap_err(),
            SamplerError::RotationsNotComputed
        );
    }

    #[test]
    fn test_compute_rotations_batch_aligned() {
        let mut sampler = SphereSampler::new(4, 3).unwrap();
        sampler.remove_redundant_rotations();

        let n = sampler.len();
        let rotations = sampler.compute_rotation_matrices().unwrap();

        assert_eq!(rotations.len(), n);
        assert_eq!(rotations.forward().shape(), (3, 3, n));
        assert_eq!(rotations.inverse().shape(), (3, 3, n));
    }

    #[test]
    fn test_compute_rotations_rejects_sphere() {
        let mut sampler = SphereSampler::new(3, 5).unwrap();

        let err = sampler.compute_rotation_matrices().unwrap_err();

        assert_eq!(err, SamplerError::NotQuaternion { n_dims: 3 });
        assert_eq!(sampler.state(), SamplerState::Constructed);
    }

    #[test]
    fn test_quaternion_accessor_matches_forward() {
        let mut sampler = SphereSampler::new(4, 3).unwrap();
        sampler.compute_rotation_matrices().unwrap();
        let rotations = sampler.rotations().unwrap();

        for i in [0, 17, 79] {
            let q = sampler.quaternion(i).unwrap();
            let r = rotations.forward_matrix(i).unwrap();
            assert_relative_eq!(r, *q.to_rotation_matrix().matrix(), epsilon = 1e-10);
        }
        assert!(sampler.quaternion(80).is_none());
    }

    #[test]
    fn test_quaternion_accessor_requires_4d() {
        let sampler = SphereSampler::new(3, 3).unwrap();
        assert!(sampler.quaternion(0).is_none());
    }

    #[test]
    fn test_recompute_overwrites() {
        let mut sampler = SphereSampler::new(4, 2).unwrap();
        let first = sampler.compute_rotation_matrices().unwrap().clone();
        let second = sampler.compute_rotation_matrices().unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(sampler.state(), SamplerState::Converted);
    }

    #[test]
    fn test_rotation_pair_validation() {
        let ok = RotationPair::new(MatrixBatch::identity(3, 2), MatrixBatch::identity(3, 2));
        assert!(ok.is_ok());

        let wrong_shape = RotationPair::new(MatrixBatch::identity(2, 2), MatrixBatch::identity(3, 2));
        assert!(matches!(wrong_shape, Err(SamplerError::ShapeMismatch { .. })));

        let wrong_batch = RotationPair::new(MatrixBatch::identity(3, 2), MatrixBatch::identity(3, 1));
        assert_eq!(wrong_batch, Err(SamplerError::BatchMismatch { left: 2, right: 1 }));
    }
}
