//! Linear algebra type aliases and geometric tolerances.

pub type Point3 = nalgebra::Point3<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;
pub type Vector2 = nalgebra::Vector2<f64>;
pub type Matrix3 = nalgebra::Matrix3<f64>;

/// Geometric tolerance for coincidence tests (distance in centimetres).
pub const TOLERANCE: f64 = 1e-9;

/// Angular tolerance (degrees) when snapping rotations to quarter turns.
pub const ANGLE_TOL: f64 = 1e-6;
