//! Discretized hypercube surface
//!
//! The boundary of [-1, 1]^N is the union of 2N faces. One opposing pair of
//! faces (last coordinate fixed at ±1) is gridded; the remaining pairs are
//! obtained by cyclically rolling the coordinates. Points on shared edges
//! and corners appear several times and are removed by deduplication.

use std::cmp::Ordering;

use nalgebra::DMatrix;
use tracing::debug;

use crate::error::Result;
use crate::sampling::config::SamplerConfig;

/// `n` values evenly spaced over [-1, 1], endpoints included
///
/// Endpoints are exactly -1 and 1, so points on shared cube edges compare
/// equal. For `n = 1` the single value is -1.
pub fn linspace(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![-1.0],
        _ => {
            let step = 2.0 / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| -1.0 + i as f64 * step).collect();
            values[n - 1] = 1.0;
            values
        }
    }
}

/// Cartesian product grid over `n_axes` axes, one point per column
///
/// # Returns
/// Matrix of shape `n_axes × n_samples^n_axes`
pub fn face_grid(n_axes: usize, n_samples: usize) -> DMatrix<f64> {
    let values = linspace(n_samples);
    let count = (0..n_axes).fold(1usize, |acc, _| acc * n_samples);

    let mut grid = DMatrix::<f64>::zeros(n_axes, count);
    let mut digits = vec![0usize; n_axes];
    for col in 0..count {
        for (axis, &d) in digits.iter().enumerate() {
            grid[(axis, col)] = values[d];
        }
        // Odometer increment, first axis fastest
        for d in digits.iter_mut() {
            *d += 1;
            if *d < n_samples {
                break;
            }
            *d = 0;
        }
    }
    grid
}

/// Cyclically roll the rows of `points` by `shift`
///
/// Row `i` of the result is row `(i - shift) mod N` of the input.
pub fn roll_rows(points: &DMatrix<f64>, shift: usize) -> DMatrix<f64> {
    let n = points.nrows();
    DMatrix::from_fn(n, points.ncols(), |i, j| points[((i + n - shift % n) % n, j)])
}

/// Unique columns of `points`, sorted lexicographically
///
/// Two columns are equal iff all coordinates are equal.
pub fn unique_columns(points: &DMatrix<f64>) -> DMatrix<f64> {
    let mut columns: Vec<Vec<f64>> = points
        .column_iter()
        .map(|c| c.iter().copied().collect())
        .collect();

    columns.sort_by(|a, b| lexicographic(a, b));
    columns.dedup();

    DMatrix::from_iterator(points.nrows(), columns.len(), columns.into_iter().flatten())
}

fn lexicographic(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Grid points on the surface of [-1, 1]^N, one point per column
///
/// Deterministic for given `(n_dims, n_samples)`; columns are sorted
/// lexicographically.
///
/// # Errors
/// [`SamplerError::InvalidConfig`](crate::SamplerError::InvalidConfig) unless
/// `n_dims >= 2` and `n_samples >= 1`, or when the grid overflows.
pub fn cube_surface_points(n_dims: usize, n_samples: usize) -> Result<DMatrix<f64>> {
    SamplerConfig::new(n_dims, n_samples).validate()?;

    let grid = face_grid(n_dims - 1, n_samples);
    let g = grid.ncols();

    // Opposing faces x_N = -1 and x_N = +1
    let mut faces = DMatrix::<f64>::zeros(n_dims, 2 * g);
    for (f, scl) in [-1.0, 1.0].into_iter().enumerate() {
        let mut block = faces.columns_mut(f * g, g);
        block.rows_mut(0, n_dims - 1).copy_from(&grid);
        block.row_mut(n_dims - 1).fill(scl);
    }

    let mut all = DMatrix::<f64>::zeros(n_dims, 2 * g * n_dims);
    for shift in 0..n_dims {
        all.columns_mut(shift * 2 * g, 2 * g)
            .copy_from(&roll_rows(&faces, shift));
    }

    let unique = unique_columns(&all);
    debug!(
        n_dims,
        n_samples,
        face_points = g,
        raw_points = all.ncols(),
        unique_points = unique.ncols(),
        "discretized hypercube surface"
    );
    Ok(unique)
}

/// Number of distinct grid points on the surface of the discretized cube
///
/// n^N - (n - 2)^N: the full grid minus its interior. Only meaningful for
/// `n_samples >= 2`; returns None otherwise or on overflow.
pub fn cube_surface_count(n_dims: usize, n_samples: usize) -> Option<usize> {
    if n_samples < 2 {
        return None;
    }
    let exponent = u32::try_from(n_dims).ok()?;
    let full = n_samples.checked_pow(exponent)?;
    let interior = (n_samples - 2).checked_pow(exponent)?;
    Some(full - interior)
}
