//! Rigid transforms in quarter turns, and universe reuse through them.
//!
//! A `RigidTransform` is a signed permutation matrix: any composition of
//! 90-degree rotations about the coordinate axes and axis reflections. The
//! matrix maps a point of the fill's frame to the parent frame; point lookup
//! applies the inverse (the transpose).

use log::debug;
use nalgebra::Rotation3;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::geometry::{Cell, Geometry, Universe, UniverseId};
use crate::math::{Matrix3, Point3, Vector3, ANGLE_TOL};
use crate::region::Region;
use crate::surface::Axis;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    matrix: Matrix3,
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self { matrix: Matrix3::identity() }
    }

    /// Counter-clockwise rotation about `axis` by `quarter_turns * 90` degrees.
    pub fn quarter_turns(axis: Axis, quarter_turns: i32) -> Self {
        let turns = quarter_turns.rem_euclid(4);
        let unit = match axis {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        };
        let rotation = Rotation3::from_axis_angle(&unit, f64::from(turns) * std::f64::consts::FRAC_PI_2);
        Self { matrix: snap(rotation.into_inner()) }
    }

    /// Rotation about the vertical axis.
    pub fn rotation_z(quarter_turns: i32) -> Self {
        Self::quarter_turns(Axis::Z, quarter_turns)
    }

    /// Rotation from `[x, y, z]` angles in degrees, applied about z first,
    /// then y, then x. Each angle must be a multiple of 90.
    pub fn from_euler_degrees(angles: [f64; 3]) -> Result<Self> {
        let [x, y, z] = angles;
        let rx = Self::quarter_turns(Axis::X, quarter_turn_count(x)?);
        let ry = Self::quarter_turns(Axis::Y, quarter_turn_count(y)?);
        let rz = Self::quarter_turns(Axis::Z, quarter_turn_count(z)?);
        Ok(rz.then(&ry).then(&rx))
    }

    /// Reflection across the plane normal to `axis`.
    pub fn flip(axis: Axis) -> Self {
        let mut matrix = Matrix3::identity();
        matrix[(axis.index(), axis.index())] = -1.0;
        Self { matrix }
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &RigidTransform) -> Self {
        Self { matrix: next.matrix * self.matrix }
    }

    pub fn inverse(&self) -> Self {
        Self { matrix: self.matrix.transpose() }
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity()
    }

    pub fn matrix(&self) -> &Matrix3 {
        &self.matrix
    }

    /// Fill frame to parent frame.
    pub fn apply(&self, p: &Point3) -> Point3 {
        Point3::from(self.matrix * p.coords)
    }

    /// Parent frame to fill frame.
    pub fn to_local(&self, p: &Point3) -> Point3 {
        Point3::from(self.matrix.transpose() * p.coords)
    }
}

fn quarter_turn_count(degrees: f64) -> Result<i32> {
    let turns = degrees / 90.0;
    let rounded = turns.round();
    if !degrees.is_finite() || (turns - rounded).abs() * 90.0 > ANGLE_TOL {
        return Err(GeometryError::NonRightAngle(degrees));
    }
    Ok((rounded as i64).rem_euclid(4) as i32)
}

// Entries of a quarter-turn rotation are exactly -1, 0 or 1.
fn snap(m: Matrix3) -> Matrix3 {
    m.map(|v| v.round() + 0.0)
}

/// Derive a rotated or reflected copy of `source` without rebuilding it.
///
/// The new universe holds one unbounded cell filled with `source` and
/// carrying `transform`. The source envelope is expected to be symmetric
/// about its local origin.
pub fn rotate_universe(
    geometry: &mut Geometry,
    source: UniverseId,
    transform: RigidTransform,
    name: &str,
) -> UniverseId {
    let cell = Cell::new(name, Region::everywhere(), source).with_transform(transform);
    debug!("universe `{}` reuses {:?} through {:?}", name, source, transform.matrix());
    geometry.add_universe(Universe::with_cells(name, vec![cell]))
}
