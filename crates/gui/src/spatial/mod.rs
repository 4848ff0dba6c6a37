//! Spatial acceleration for snapping queries

pub mod bvh;
pub mod cache;

pub use bvh::{Bvh, BvhTriangle, RayHit};
pub use cache::{SpatialIndexCache, SpatialIndexEntry};
