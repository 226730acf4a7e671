//! Construction errors.
//!
//! Every builder in the crate returns `Result<T, GeometryError>`. These are
//! programming or configuration defects: a single geometry build aborts on
//! the first one.

use thiserror::Error;

use crate::surface::SurfaceId;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("`{name}`: {surfaces} ordering surfaces need {expected} fills, got {got}")]
    FillCountMismatch {
        name: String,
        surfaces: usize,
        expected: usize,
        got: usize,
    },

    #[error("lattice `{lattice}` has no element ({ix}, {iy}); shape is {nx}x{ny}")]
    LatticeIndexOutOfBounds {
        lattice: String,
        ix: usize,
        iy: usize,
        nx: usize,
        ny: usize,
    },

    #[error("ordering surface {position} at {next} does not lie above its predecessor at {previous}")]
    NotAscending {
        position: usize,
        previous: f64,
        next: f64,
    },

    #[error("surface {0:?} does not order space along a single axis")]
    NotOrderable(SurfaceId),

    #[error("surfaces {first:?} and {other:?} belong to different ordering families")]
    MixedOrderingFamilies { first: SurfaceId, other: SurfaceId },

    #[error("no catalog entry for template slot `{0}`")]
    MissingCatalogEntry(String),

    #[error("rotation of {0} degrees is not a multiple of 90")]
    NonRightAngle(f64),

    #[error("invalid lattice `{name}`: {reason}")]
    InvalidLattice { name: String, reason: String },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

pub type Result<T> = std::result::Result<T, GeometryError>;
