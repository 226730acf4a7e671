//! Reference small modular reactor core.
//!
//! A 9x9 map of 17x17 assemblies at three enrichments, with four
//! regulating control rod banks, surrounded by a drilled steel reflector,
//! the core barrel and the pressure vessel. [`core::SmrModelBuilder`]
//! rebuilds the whole core for every bank insertion vector the search asks
//! for.

pub mod assemblies;
pub mod core;
pub mod dimensions;
pub mod materials;
pub mod pins;
pub mod reflector;
pub mod surfaces;

pub use self::core::{core_geometry, source_box, SmrModelBuilder};
pub use self::surfaces::{RodBank, RodInsertion};
