//! Small single-level models used to exercise the evaluation loop.

pub mod masked_assembly;
pub mod pin_cell;

pub use self::masked_assembly::MaskedAssemblyModel;
pub use self::pin_cell::PinCellModel;
