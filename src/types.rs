use serde::{Deserialize, Serialize};

use crate::math::Point3;

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox3 {
    pub min: Point3,
    pub max: Point3,
}

impl BBox3 {
    pub fn new(min: Point3, max: Point3) -> Self { Self { min, max } }
    pub fn center(&self) -> Point3 { nalgebra::center(&self.min, &self.max) }
    pub fn size(&self) -> crate::math::Vector3 { self.max - self.min }
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}
