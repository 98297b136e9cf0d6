//! Core planar geometry shared by the offsetter, resolver and mesh builder.
//!
//! Includes finite bounds with the line intersection solver, and the
//! clockwise comparator used to order junction points.

pub mod clockwise;
pub mod line;
