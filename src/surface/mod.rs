//! Primitive surfaces.
//!
//! A surface is an infinite divider of space described by a signed implicit
//! function `f(p)`. Every surface lives in the `Geometry` arena and is
//! referenced by `SurfaceId`; two surfaces with identical parameters are
//! still distinct entities, so each may carry its own boundary condition.

use serde::{Deserialize, Serialize};

use crate::math::{Point3, TOLERANCE};
use crate::region::{Region, Side};

/// Arena handle of a registered surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub usize);

impl SurfaceId {
    /// The half-space where `f(p) < 0`.
    pub fn negative(self) -> Region {
        Region::half_space(self, Side::Negative)
    }

    /// The half-space where `f(p) >= 0`.
    pub fn positive(self) -> Region {
        Region::half_space(self, Side::Positive)
    }
}

impl std::ops::Neg for SurfaceId {
    type Output = Region;

    fn neg(self) -> Region {
        self.negative()
    }
}

/// What a particle transport code does when it reaches the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryCondition {
    /// Interior surface; particles cross it.
    #[default]
    Transmission,
    Reflective,
    Vacuum,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Geometric kind and defining scalars of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SurfaceKind {
    /// `x - x0 = 0`
    XPlane { x0: f64 },
    /// `y - y0 = 0`
    YPlane { y0: f64 },
    /// `z - z0 = 0`
    ZPlane { z0: f64 },
    /// `ax + by + cz - d = 0`
    Plane { a: f64, b: f64, c: f64, d: f64 },
    /// Infinite cylinder parallel to the x axis.
    XCylinder { y0: f64, z0: f64, r: f64 },
    /// Infinite cylinder parallel to the y axis.
    YCylinder { x0: f64, z0: f64, r: f64 },
    /// Infinite cylinder parallel to the z axis.
    ZCylinder { x0: f64, y0: f64, r: f64 },
}

/// Surfaces that can be sorted against each other by a single scalar.
///
/// Parallel planes along one axis are ordered by offset; coaxial cylinders
/// are ordered by radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OrderingFamily {
    Planes(Axis),
    Cylinders { axis: Axis, center: [f64; 2] },
}

impl OrderingFamily {
    pub fn matches(&self, other: &OrderingFamily) -> bool {
        match (self, other) {
            (OrderingFamily::Planes(a), OrderingFamily::Planes(b)) => a == b,
            (
                OrderingFamily::Cylinders { axis: a, center: ca },
                OrderingFamily::Cylinders { axis: b, center: cb },
            ) => {
                a == b
                    && (ca[0] - cb[0]).abs() <= TOLERANCE
                    && (ca[1] - cb[1]).abs() <= TOLERANCE
            }
            _ => false,
        }
    }
}

impl SurfaceKind {
    /// Signed implicit function. Negative inside a cylinder and below a plane.
    pub fn evaluate(&self, p: &Point3) -> f64 {
        match *self {
            SurfaceKind::XPlane { x0 } => p.x - x0,
            SurfaceKind::YPlane { y0 } => p.y - y0,
            SurfaceKind::ZPlane { z0 } => p.z - z0,
            SurfaceKind::Plane { a, b, c, d } => a * p.x + b * p.y + c * p.z - d,
            SurfaceKind::XCylinder { y0, z0, r } => {
                (p.y - y0).powi(2) + (p.z - z0).powi(2) - r * r
            }
            SurfaceKind::YCylinder { x0, z0, r } => {
                (p.x - x0).powi(2) + (p.z - z0).powi(2) - r * r
            }
            SurfaceKind::ZCylinder { x0, y0, r } => {
                (p.x - x0).powi(2) + (p.y - y0).powi(2) - r * r
            }
        }
    }

    /// Ordering family and sort key, or `None` for general planes.
    pub fn ordering_key(&self) -> Option<(OrderingFamily, f64)> {
        match *self {
            SurfaceKind::XPlane { x0 } => Some((OrderingFamily::Planes(Axis::X), x0)),
            SurfaceKind::YPlane { y0 } => Some((OrderingFamily::Planes(Axis::Y), y0)),
            SurfaceKind::ZPlane { z0 } => Some((OrderingFamily::Planes(Axis::Z), z0)),
            SurfaceKind::Plane { .. } => None,
            SurfaceKind::XCylinder { y0, z0, r } => Some((
                OrderingFamily::Cylinders { axis: Axis::X, center: [y0, z0] },
                r,
            )),
            SurfaceKind::YCylinder { x0, z0, r } => Some((
                OrderingFamily::Cylinders { axis: Axis::Y, center: [x0, z0] },
                r,
            )),
            SurfaceKind::ZCylinder { x0, y0, r } => Some((
                OrderingFamily::Cylinders { axis: Axis::Z, center: [x0, y0] },
                r,
            )),
        }
    }
}

/// A registered surface: kind, boundary condition and an optional label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub kind: SurfaceKind,
    #[serde(default)]
    pub boundary: BoundaryCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Surface {
    pub fn new(kind: SurfaceKind) -> Self {
        Self { kind, boundary: BoundaryCondition::Transmission, name: None }
    }

    pub fn x_plane(x0: f64) -> Self {
        Self::new(SurfaceKind::XPlane { x0 })
    }

    pub fn y_plane(y0: f64) -> Self {
        Self::new(SurfaceKind::YPlane { y0 })
    }

    pub fn z_plane(z0: f64) -> Self {
        Self::new(SurfaceKind::ZPlane { z0 })
    }

    pub fn plane(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::new(SurfaceKind::Plane { a, b, c, d })
    }

    /// Cylinder about the z axis through `(x0, y0)`.
    pub fn z_cylinder(x0: f64, y0: f64, r: f64) -> Self {
        Self::new(SurfaceKind::ZCylinder { x0, y0, r })
    }

    pub fn x_cylinder(y0: f64, z0: f64, r: f64) -> Self {
        Self::new(SurfaceKind::XCylinder { y0, z0, r })
    }

    pub fn y_cylinder(x0: f64, z0: f64, r: f64) -> Self {
        Self::new(SurfaceKind::YCylinder { x0, z0, r })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the boundary condition. Only meaningful before registration:
    /// a registered surface is immutable.
    pub fn with_boundary(mut self, boundary: BoundaryCondition) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn evaluate(&self, p: &Point3) -> f64 {
        self.kind.evaluate(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_is_negative_inside() {
        let s = Surface::z_cylinder(1.0, 0.0, 0.5);
        assert!(s.evaluate(&Point3::new(1.0, 0.0, 7.0)) < 0.0);
        assert!(s.evaluate(&Point3::new(2.0, 0.0, 7.0)) > 0.0);
    }

    #[test]
    fn general_plane_is_not_orderable() {
        assert!(SurfaceKind::Plane { a: 1.0, b: 1.0, c: 0.0, d: 0.0 }.ordering_key().is_none());
    }

    #[test]
    fn offset_cylinders_are_different_families() {
        let (a, _) = Surface::z_cylinder(0.0, 0.0, 1.0).kind.ordering_key().unwrap();
        let (b, _) = Surface::z_cylinder(0.5, 0.0, 2.0).kind.ordering_key().unwrap();
        assert!(!a.matches(&b));
    }
}
