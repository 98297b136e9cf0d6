//! Geometry configuration building on the shared `config` crate.
//!
//! The ground plane and up axis are explicit values passed into every
//! geometry routine, so tests can run the whole pipeline on synthetic axes.

use config::constants::{ConfigError, GlobalConfig, EPSILON_TOLERANCE, MIN_MITER_COS, POINT_MERGE_EPSILON_SQ};
use glam::{DVec2, DVec3};

// =============================================================================
// GROUND PLANE
// =============================================================================

/// Horizontal projection plane with a fixed up axis.
///
/// `right = up × forward`, so `forward × right = up`. Planar coordinates
/// are `(p · right, p · forward)`; with the default axes that is `(x, z)`.
///
/// # Examples
/// ```
/// use road_geometry::config::GroundPlane;
/// use glam::{DVec2, DVec3};
///
/// let plane = GroundPlane::default();
/// assert_eq!(plane.project(DVec3::new(1.0, 5.0, 2.0)), DVec2::new(1.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    up: DVec3,
    right: DVec3,
    forward: DVec3,
}

impl GroundPlane {
    /// Builds a plane from an up axis and a forward hint.
    ///
    /// `forward` is orthogonalized against `up`; both are normalized.
    pub fn new(up: DVec3, forward: DVec3) -> Result<Self, RoadConfigError> {
        let up = up.try_normalize().ok_or(RoadConfigError::DegenerateAxis("up"))?;
        let forward = (forward - up * forward.dot(up))
            .try_normalize()
            .ok_or(RoadConfigError::DegenerateAxis("forward"))?;
        Ok(Self {
            up,
            right: up.cross(forward),
            forward,
        })
    }

    /// Unit up axis. Never an offset direction.
    #[inline]
    pub fn up(&self) -> DVec3 {
        self.up
    }

    /// Unit axis mapped to the planar `x` coordinate.
    #[inline]
    pub fn right(&self) -> DVec3 {
        self.right
    }

    /// Unit axis mapped to the planar `y` coordinate.
    #[inline]
    pub fn forward(&self) -> DVec3 {
        self.forward
    }

    /// Projects a point onto planar coordinates.
    #[inline]
    pub fn project(&self, p: DVec3) -> DVec2 {
        DVec2::new(p.dot(self.right), p.dot(self.forward))
    }

    /// Height of a point along the up axis.
    #[inline]
    pub fn height(&self, p: DVec3) -> f64 {
        p.dot(self.up)
    }

    /// Inverse of [`project`](Self::project) at the given height.
    #[inline]
    pub fn lift(&self, planar: DVec2, height: f64) -> DVec3 {
        self.right * planar.x + self.forward * planar.y + self.up * height
    }

    /// Removes the up component of a vector.
    #[inline]
    pub fn flatten(&self, v: DVec3) -> DVec3 {
        v - self.up * v.dot(self.up)
    }
}

impl Default for GroundPlane {
    /// Y-up, X-right, Z-forward.
    fn default() -> Self {
        Self {
            up: DVec3::Y,
            right: DVec3::X,
            forward: DVec3::Z,
        }
    }
}

// =============================================================================
// ROAD CONFIG
// =============================================================================

/// Configuration for one rebuild pass.
///
/// # Examples
/// ```
/// use road_geometry::config::RoadConfig;
/// let cfg = RoadConfig::default();
/// assert!(cfg.tolerance > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadConfig {
    /// Determinant and length tolerance.
    pub tolerance: f64,
    /// Squared distance under which junction points merge.
    pub merge_epsilon_sq: f64,
    /// Miter cosine below which a node is square cut.
    pub min_miter_cos: f64,
    /// Projection plane and up axis.
    pub plane: GroundPlane,
}

impl RoadConfig {
    /// Creates a configuration from explicit values.
    ///
    /// # Examples
    /// ```
    /// use road_geometry::config::{GroundPlane, RoadConfig};
    /// let cfg = RoadConfig::new(1.0e-8, 1.0e-6, 0.2, GroundPlane::default()).unwrap();
    /// assert_eq!(cfg.min_miter_cos, 0.2);
    /// ```
    pub fn new(
        tolerance: f64,
        merge_epsilon_sq: f64,
        min_miter_cos: f64,
        plane: GroundPlane,
    ) -> Result<Self, RoadConfigError> {
        GlobalConfig::new(tolerance, merge_epsilon_sq, min_miter_cos)
            .map(|cfg| Self::from_global(cfg, plane))
            .map_err(RoadConfigError::Global)
    }

    /// Wraps an already validated global configuration.
    pub fn from_global(cfg: GlobalConfig, plane: GroundPlane) -> Self {
        Self {
            tolerance: cfg.tolerance,
            merge_epsilon_sq: cfg.merge_epsilon_sq,
            min_miter_cos: cfg.min_miter_cos,
            plane,
        }
    }

    /// Same tolerances on a different plane.
    #[must_use]
    pub fn with_plane(mut self, plane: GroundPlane) -> Self {
        self.plane = plane;
        self
    }
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            tolerance: EPSILON_TOLERANCE,
            merge_epsilon_sq: POINT_MERGE_EPSILON_SQ,
            min_miter_cos: MIN_MITER_COS,
            plane: GroundPlane::default(),
        }
    }
}

/// Error for invalid road configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum RoadConfigError {
    /// Rejected by the shared `config` crate.
    Global(ConfigError),
    /// Axis vector is zero or parallel to the up axis.
    DegenerateAxis(&'static str),
}

impl std::fmt::Display for RoadConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoadConfigError::Global(err) => err.fmt(f),
            RoadConfigError::DegenerateAxis(axis) => write!(f, "{axis} axis is degenerate"),
        }
    }
}

impl std::error::Error for RoadConfigError {}
