//! Deterministic sampling of spheres and SO(3)
//!
//! - [`config`]: Sampler parameters
//! - [`grid`]: Discretized hypercube surface
//! - [`sampler`]: Sphere sampler and rotation matrices
//! - [`sequence`]: Frame-to-frame transformation sequences

pub mod config;
pub mod grid;
pub mod sampler;
pub mod sequence;

pub use config::SamplerConfig;
pub use grid::{cube_surface_count, cube_surface_points};
pub use sampler::{RotationPair, SamplerState, SphereSampler};
pub use sequence::TransformationSequence;
