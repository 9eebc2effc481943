// src/data/mod.rs
//! Data handling modules for the globe viewer.
//!
//! This module provides functionality for:
//! - Building the globe point cloud, wireframe and starfield on the CPU.
//! - Defining the data structures for GPU buffers.

pub mod globe;
pub mod starfield;
pub mod types;

// Re-export commonly used types for convenience.
pub use self::types::{
    FrameUniforms, GlobeUniform, LineVertex, PointInstance, StarInstance, StarUniform,
    WireUniform,
};
