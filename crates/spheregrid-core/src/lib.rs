//! # spheregrid-core
//!
//! Deterministic sampling of the unit sphere S^(N-1) and of SO(3)
//!
//! Points are generated by discretizing the surface of the hypercube
//! [-1, 1]^N on a regular grid and projecting radially onto the sphere
//! (Yershova & LaValle, "Deterministic sampling methods for spheres and
//! SO(3)", ICRA 2004). For N = 4 the points are unit quaternions, which are
//! converted into batched rotation matrices and chained into a sequence of
//! frame-to-frame rotation operators.
//!
//! ## Modules
//!
//! - [`math`]: Batched matrix algebra, SO(3) and unit-sphere utilities
//! - [`sampling`]: Sampler configuration, cube-surface grid, sampler and
//!   transformation sequences
//! - [`error`]: Error type shared by all operations
//!
//! ## Example
//!
//! ```
//! use spheregrid_core::SphereSampler;
//!
//! let mut sampler = SphereSampler::new(4, 3)?;
//! sampler.remove_redundant_rotations();
//! sampler.compute_rotation_matrices()?;
//!
//! let sequence = sampler.transformation_sequence(0, 1)?;
//! assert_eq!(sequence.len(), sampler.len());
//! # Ok::<(), spheregrid_core::SamplerError>(())
//! ```

pub mod error;
pub mod math;
pub mod sampling;

pub use error::{Result, SamplerError};
pub use math::MatrixBatch;
pub use sampling::{RotationPair, SamplerConfig, SamplerState, SphereSampler, TransformationSequence};

/// Default tolerance for unit-norm and orthogonality checks
pub const DEFAULT_TOLERANCE: f64 = 1e-10;
