//! Constructive solid geometry composition for reactor core models.
//!
//! Geometry is built bottom-up in a [`geometry::Geometry`] arena: surfaces
//! bound half-spaces, regions combine half-spaces, cells fill regions, and
//! universes group cells. Pins, axial stacks, lattices and rotated copies
//! are all universes, so a full core is a tree of them. The finished tree is
//! exported as a [`export::ModelDocument`] for a transport solver, and
//! [`evaluate`] plus [`search`] wrap build and solve in an optimization loop.

pub mod config;
pub mod error;
pub mod evaluate;
pub mod export;
pub mod geometry;
pub mod lattice;
pub mod material;
pub mod math;
pub mod models;
pub mod pin;
pub mod region;
pub mod search;
pub mod smr;
pub mod stack;
pub mod subdivide;
pub mod surface;
pub mod template;
pub mod transform;
pub mod types;

pub use error::{GeometryError, Result};
pub use geometry::{Cell, Fill, Geometry, LatticeId, Trace, Universe, UniverseId};
pub use lattice::{Lattice, LatticeIndex, LatticeTiler, TiledLattice};
pub use material::{Material, MaterialId};
pub use pin::{make_pin, GridSpacer};
pub use region::{Region, Side};
pub use stack::{make_pin_stack, make_stack};
pub use subdivide::subdivide;
pub use surface::{BoundaryCondition, Surface, SurfaceId, SurfaceKind};
pub use transform::{rotate_universe, RigidTransform};
