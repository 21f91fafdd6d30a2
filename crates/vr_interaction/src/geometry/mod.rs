//! Geometry for ray targeting
//!
//! # Module Organization
//!
//! - [`primitives`] - Rays and basic shapes with intersection tests
//! - [`shape`] - Model-space [`Geometry`] carried by renderable scene nodes

pub mod primitives;
pub mod shape;

// Re-export commonly used types
pub use primitives::{Ray, BoundingSphere, Triangle, AABB};
pub use shape::Geometry;
