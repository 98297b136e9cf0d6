//! # Config Crate
//!
//! Centralized configuration constants for the road geometry pipeline.
//! Tolerances and offset limits are defined here once so the offsetter,
//! the junction resolver and the mesh builder agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{EPSILON_TOLERANCE, POINT_MERGE_EPSILON_SQ};
//!
//! // Determinants below EPSILON_TOLERANCE are treated as parallel lines
//! let determinant: f64 = 1e-12;
//! assert!(determinant.abs() <= EPSILON_TOLERANCE);
//!
//! // Junction points closer than the merge epsilon collapse into one
//! let dist_sq = 1e-8;
//! assert!(dist_sq < POINT_MERGE_EPSILON_SQ);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **No Dependencies**: Plain `f64` values, no math library types
//! - **Validated Overrides**: `GlobalConfig::new` rejects unusable values

pub mod constants;
