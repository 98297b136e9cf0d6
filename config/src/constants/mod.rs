//! # Configuration Constants
//!
//! Shared tolerances for road boundary geometry. Each public item documents
//! its purpose and gives a minimal example so downstream crates can stay
//! declarative and avoid scattering literals.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Offsetting**: Miter limits for boundary offsets
//! - **Mesh**: Defaults used when emitting UVs

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Numerical tolerance used by the line intersection solver and length checks.
///
/// A 2×2 determinant whose magnitude is at or below this value is treated as
/// parallel lines.
///
/// # Examples
/// ```
/// use config::constants::EPSILON_TOLERANCE;
/// assert!(EPSILON_TOLERANCE < 1.0e-6);
/// ```
pub const EPSILON_TOLERANCE: f64 = 1.0e-9;

/// Squared distance under which two junction polygon points are merged.
///
/// # Examples
/// ```
/// use config::constants::POINT_MERGE_EPSILON_SQ;
///
/// fn coincide(a: [f64; 2], b: [f64; 2]) -> bool {
///     let dx = a[0] - b[0];
///     let dz = a[1] - b[1];
///     dx * dx + dz * dz < POINT_MERGE_EPSILON_SQ
/// }
///
/// assert!(coincide([1.0, 1.0], [1.0, 1.0 + 1e-5]));
/// ```
pub const POINT_MERGE_EPSILON_SQ: f64 = 1.0e-6;

// =============================================================================
// OFFSET CONSTANTS
// =============================================================================

/// Smallest miter cosine accepted before a node falls back to a square cut.
///
/// The miter offset is scaled by `1 / cos`, so a sharp reversal would push
/// the boundary arbitrarily far away. 0.1 caps the scale at 10× half-width,
/// which corresponds to a bend of roughly 168°.
///
/// # Examples
/// ```
/// use config::constants::MIN_MITER_COS;
/// let max_scale = 1.0 / MIN_MITER_COS;
/// assert!(max_scale <= 10.0 + 1e-12);
/// ```
pub const MIN_MITER_COS: f64 = 0.1;

// =============================================================================
// MESH CONSTANTS
// =============================================================================

/// UV coordinate used along an axis whose bounding-box extent is zero.
///
/// # Examples
/// ```
/// use config::constants::DEGENERATE_UV;
/// assert_eq!(DEGENERATE_UV, 0.5);
/// ```
pub const DEGENERATE_UV: f64 = 0.5;

// =============================================================================
// GLOBAL CONFIG
// =============================================================================

/// Immutable snapshot of the tolerances shared between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Numeric tolerance for determinants and segment lengths.
    pub tolerance: f64,
    /// Squared distance under which junction points are merged.
    pub merge_epsilon_sq: f64,
    /// Minimum miter cosine before falling back to a square cut.
    pub min_miter_cos: f64,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of every value.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-6, 1.0e-4, 0.2).expect("valid config");
    /// assert_eq!(cfg.min_miter_cos, 0.2);
    /// ```
    pub fn new(tolerance: f64, merge_epsilon_sq: f64, min_miter_cos: f64) -> Result<Self, ConfigError> {
        if !(tolerance > 0.0) || !tolerance.is_finite() {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        if !(merge_epsilon_sq >= 0.0) || !merge_epsilon_sq.is_finite() {
            return Err(ConfigError::InvalidMergeEpsilon(merge_epsilon_sq));
        }
        if !(min_miter_cos > 0.0 && min_miter_cos <= 1.0) {
            return Err(ConfigError::InvalidMiterCos(min_miter_cos));
        }
        Ok(Self {
            tolerance,
            merge_epsilon_sq,
            min_miter_cos,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            tolerance: EPSILON_TOLERANCE,
            merge_epsilon_sq: POINT_MERGE_EPSILON_SQ,
            min_miter_cos: MIN_MITER_COS,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Raised when tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the merge epsilon is negative or not finite.
    InvalidMergeEpsilon(f64),
    /// Raised when the miter cosine limit is outside `(0, 1]`.
    InvalidMiterCos(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "tolerance must be positive: {value}")
            }
            ConfigError::InvalidMergeEpsilon(value) => {
                write!(f, "merge_epsilon_sq must be >= 0: {value}")
            }
            ConfigError::InvalidMiterCos(value) => {
                write!(f, "min_miter_cos must be in (0, 1]: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if a f64 value is approximately zero within `EPSILON_TOLERANCE`.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() <= EPSILON_TOLERANCE
}
