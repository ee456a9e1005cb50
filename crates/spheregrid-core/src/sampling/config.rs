//! Sampler configuration
//!
//! Parameters for the cube-to-sphere construction.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SamplerError};

/// Sphere sampler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Ambient dimension N; points lie on S^(N-1)
    pub n_dims: usize,
    /// Grid points per axis on each cube face
    pub n_samples: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            n_dims: 3,    // Ordinary sphere S²
            n_samples: 5,
        }
    }
}

impl SamplerConfig {
    pub fn new(n_dims: usize, n_samples: usize) -> Self {
        Self { n_dims, n_samples }
    }

    /// Configuration sampling unit quaternions (S³, the double cover of SO(3))
    pub fn quaternion(n_samples: usize) -> Self {
        Self { n_dims: 4, n_samples }
    }

    /// Number of points on one cube face: n_samples^(n_dims - 1)
    ///
    /// Returns None when the count overflows `usize` or `n_dims` is zero.
    pub fn face_grid_size(&self) -> Option<usize> {
        let exponent = u32::try_from(self.n_dims.checked_sub(1)?).ok()?;
        self.n_samples.checked_pow(exponent)
    }

    /// Check the parameters describe a constructible point set
    ///
    /// `n_samples = 1` is accepted: every axis degenerates to the single
    /// grid value -1.
    pub fn validate(&self) -> Result<()> {
        if self.n_dims < 2 {
            return Err(SamplerError::InvalidConfig(format!(
                "n_dims must be at least 2, got {}",
                self.n_dims
            )));
        }
        if self.n_samples < 1 {
            return Err(SamplerError::InvalidConfig(
                "n_samples must be at least 1".to_string(),
            ));
        }
        // 2 faces per axis, N rolled copies before deduplication
        let raw = self
            .face_grid_size()
            .and_then(|g| g.checked_mul(2 * self.n_dims));
        if raw.is_none() {
            return Err(SamplerError::InvalidConfig(format!(
                "grid of {}^{} points per face is too large",
                self.n_samples,
                self.n_dims - 1
            )));
        }
        Ok(())
    }
}
