//! Batched matrix algebra
//!
//! A [`MatrixBatch`] is a homogeneous collection of equally-shaped matrices
//! indexed by a batch index `0..B`. The operations here act slice by slice:
//! slice `i` of the output depends only on slice `i` of the inputs.
//!
//! Batched 3-vectors are stored as a `3 × B` [`DMatrix`], one vector per
//! column, matching the layout of the sample point set.

use nalgebra::{DMatrix, Vector3};

use crate::error::{Result, SamplerError};
use crate::math::rotation::skew;

/// Batch-indexed collection of `rows × cols` matrices
///
/// The per-item shape is stored separately so that an empty batch still
/// knows its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBatch {
    rows: usize,
    cols: usize,
    slices: Vec<DMatrix<f64>>,
}

impl MatrixBatch {
    /// Build a batch from slices, checking every slice has shape `rows × cols`
    pub fn from_slices(rows: usize, cols: usize, slices: Vec<DMatrix<f64>>) -> Result<Self> {
        if let Some(bad) = slices.iter().find(|m| m.shape() != (rows, cols)) {
            return Err(SamplerError::shape(
                "MatrixBatch::from_slices",
                format!("{}x{}", rows, cols),
                format!("{}x{}", bad.nrows(), bad.ncols()),
            ));
        }
        Ok(Self { rows, cols, slices })
    }

    /// Batch of `batch` copies of a `rows × cols` matrix filled with `value`
    pub fn from_element(rows: usize, cols: usize, batch: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            slices: vec![DMatrix::from_element(rows, cols, value); batch],
        }
    }

    pub fn zeros(rows: usize, cols: usize, batch: usize) -> Self {
        Self::from_element(rows, cols, batch, 0.0)
    }

    /// Batch of `batch` identity matrices of size `n × n`
    pub fn identity(n: usize, batch: usize) -> Self {
        Self {
            rows: n,
            cols: n,
            slices: vec![DMatrix::identity(n, n); batch],
        }
    }

    /// Split a `rows × B` matrix into a batch of `rows × 1` column vectors
    pub fn from_columns(columns: &DMatrix<f64>) -> Self {
        Self {
            rows: columns.nrows(),
            cols: 1,
            slices: columns
                .column_iter()
                .map(|c| DMatrix::from_iterator(columns.nrows(), 1, c.iter().copied()))
                .collect(),
        }
    }

    /// Shape as `(rows, cols, batch)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.slices.len())
    }

    pub fn batch_len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DMatrix<f64>> {
        self.slices.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DMatrix<f64>> {
        self.slices.iter()
    }

    pub fn as_slice(&self) -> &[DMatrix<f64>] {
        &self.slices
    }

    pub fn into_slices(self) -> Vec<DMatrix<f64>> {
        self.slices
    }

    /// Transpose every slice
    pub fn transpose_each(&self) -> Self {
        Self {
            rows: self.cols,
            cols: self.rows,
            slices: self.slices.iter().map(|m| m.transpose()).collect(),
        }
    }

    /// Element-wise sum of two batches of identical shape
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "MatrixBatch::checked_add")?;
        Ok(self.zip_map(other, |a, b| a + b))
    }

    /// Element-wise difference of two batches of identical shape
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.check_same_shape(other, "MatrixBatch::checked_sub")?;
        Ok(self.zip_map(other, |a, b| a - b))
    }

    /// Multiply slice `i` by `factors[i]`
    pub fn scale_each(&self, factors: &[f64]) -> Result<Self> {
        if factors.len() != self.slices.len() {
            return Err(SamplerError::BatchMismatch {
                left: self.slices.len(),
                right: factors.len(),
            });
        }
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            slices: self
                .slices
                .iter()
                .zip(factors)
                .map(|(m, &s)| m * s)
                .collect(),
        })
    }

    fn check_same_shape(&self, other: &Self, operation: &'static str) -> Result<()> {
        if self.slices.len() != other.slices.len() {
            return Err(SamplerError::BatchMismatch {
                left: self.slices.len(),
                right: other.slices.len(),
            });
        }
        if (self.rows, self.cols) != (other.rows, other.cols) {
            return Err(SamplerError::shape(
                operation,
                format!("{}x{}", self.rows, self.cols),
                format!("{}x{}", other.rows, other.cols),
            ));
        }
        Ok(())
    }

    fn zip_map(&self, other: &Self, f: impl Fn(&DMatrix<f64>, &DMatrix<f64>) -> DMatrix<f64>) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            slices: self
                .slices
                .iter()
                .zip(&other.slices)
                .map(|(a, b)| f(a, b))
                .collect(),
        }
    }
}

/// Batched matrix product
///
/// For `a` of shape (D1, M, B) and `b` of shape (M, D2, B), returns the
/// (D1, D2, B) batch whose slice `i` is `a[i] * b[i]`. Each slice is an
/// ordinary dense product, so the result is identical to multiplying the
/// slices one at a time.
///
/// # Errors
/// [`SamplerError::BatchMismatch`] if the batch sizes differ and
/// [`SamplerError::ShapeMismatch`] if the inner dimensions differ.
pub fn batched_mat_mul(a: &MatrixBatch, b: &MatrixBatch) -> Result<MatrixBatch> {
    let (d1, m_a, batch_a) = a.shape();
    let (m_b, d2, batch_b) = b.shape();

    if batch_a != batch_b {
        return Err(SamplerError::BatchMismatch {
            left: batch_a,
            right: batch_b,
        });
    }
    if m_a != m_b {
        return Err(SamplerError::shape(
            "batched_mat_mul",
            format!("inner dimension {}", m_a),
            m_b.to_string(),
        ));
    }

    Ok(MatrixBatch {
        rows: d1,
        cols: d2,
        slices: a.iter().zip(b.iter()).map(|(x, y)| x * y).collect(),
    })
}

/// Batched skew-symmetric (cross-product) matrices
///
/// For `v` of shape (3, B), slice `i` of the result is `K` with
/// `K x = v_i × x`:
/// ```text
/// K = [ 0   -vz   vy]
///     [ vz   0   -vx]
///     [-vy   vx   0 ]
/// ```
pub fn batched_skew(v: &DMatrix<f64>) -> Result<MatrixBatch> {
    if v.nrows() != 3 {
        return Err(SamplerError::shape(
            "batched_skew",
            "3 rows",
            v.nrows().to_string(),
        ));
    }

    let slices = v
        .column_iter()
        .map(|c| {
            let k = skew(&Vector3::new(c[0], c[1], c[2]));
            DMatrix::from_iterator(3, 3, k.iter().copied())
        })
        .collect();

    Ok(MatrixBatch {
        rows: 3,
        cols: 3,
        slices,
    })
}
