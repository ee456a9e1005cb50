//! Mathematical utilities
//!
//! Implements batched matrix algebra, SO(3) rotation utilities
//! and unit sphere operations.

pub mod batched;
pub mod rotation;
pub mod sphere;

pub use batched::*;
pub use rotation::*;
pub use sphere::*;
