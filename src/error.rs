//! Error types for dualmesh.
//!
//! All fallible operations return [`MeshError`]. Variants fall into three
//! kinds, reported by [`MeshError::kind`]:
//!
//! - [`ErrorKind::Config`]: the caller asked for something invalid (bad
//!   generation options, an index width too narrow for the mesh).
//! - [`ErrorKind::MalformedMesh`]: triangulation input violates the
//!   mesh invariants.
//! - [`ErrorKind::Index`]: a query received an id outside the mesh.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Coarse classification of a [`MeshError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid generation parameters or index width.
    Config,
    /// Triangulation data that does not form a valid mesh.
    MalformedMesh,
    /// Query id out of range.
    Index,
}

/// Errors that can occur while generating or querying a dual mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },

    /// An element count does not fit the chosen index type.
    #[error("{count} {element}s do not fit an index type holding at most {max}")]
    IndexOverflow {
        /// Element kind ("region", "side", ...).
        element: &'static str,
        /// Number of elements required.
        count: usize,
        /// Largest element count the index type can address.
        max: usize,
    },

    /// The triangulation has no triangles.
    #[error("mesh has no triangles")]
    EmptyMesh,

    /// A triangle references a region id outside `[0, num_regions)`.
    #[error("triangle {triangle} references region {region}, but there are only {num_regions} regions")]
    InvalidRegionIndex {
        /// The triangle index.
        triangle: usize,
        /// The invalid region index.
        region: usize,
        /// Number of regions in the input.
        num_regions: usize,
    },

    /// A triangle uses the same region twice.
    #[error("triangle {triangle} is degenerate (repeats a region)")]
    DegenerateTriangle {
        /// The triangle index.
        triangle: usize,
    },

    /// An undirected edge is used by more than two sides.
    #[error("edge ({r0}, {r1}) has more than two incident sides")]
    NonManifoldEdge {
        /// First region of the edge.
        r0: usize,
        /// Second region of the edge.
        r1: usize,
    },

    /// Both sides of an edge run in the same direction.
    #[error("edge ({r0}, {r1}) appears twice with the same direction")]
    InconsistentOrientation {
        /// Begin region of the duplicated side.
        r0: usize,
        /// End region of the duplicated side.
        r1: usize,
    },

    /// The mesh has non-manifold topology.
    #[error("mesh has non-manifold topology: {details}")]
    NonManifold {
        /// Description of the non-manifold condition.
        details: String,
    },

    /// A query id is outside the mesh.
    #[error("{element} id {index} out of range (0..{len})")]
    IndexOutOfRange {
        /// Element kind ("region", "side", ...).
        element: &'static str,
        /// The offending index.
        index: usize,
        /// Number of elements of that kind.
        len: usize,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Which kind of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeshError::InvalidParameter { .. } | MeshError::IndexOverflow { .. } => {
                ErrorKind::Config
            }
            MeshError::EmptyMesh
            | MeshError::InvalidRegionIndex { .. }
            | MeshError::DegenerateTriangle { .. }
            | MeshError::NonManifoldEdge { .. }
            | MeshError::InconsistentOrientation { .. }
            | MeshError::NonManifold { .. } => ErrorKind::MalformedMesh,
            MeshError::IndexOutOfRange { .. } => ErrorKind::Index,
        }
    }

    /// True for configuration errors.
    pub fn is_config(&self) -> bool {
        self.kind() == ErrorKind::Config
    }

    /// True for malformed-mesh errors.
    pub fn is_malformed(&self) -> bool {
        self.kind() == ErrorKind::MalformedMesh
    }
}
