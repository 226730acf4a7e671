//! Boolean region algebra over surface half-spaces.
//!
//! Regions are kept in negation normal form: a complement is pushed down to
//! the half-space leaves with De Morgan's laws, so the tree only ever holds
//! half-spaces, intersections and unions. Nested operations of the same kind
//! are flattened on construction.

use std::collections::BTreeSet;
use std::ops::{BitAnd, BitOr, Not};

use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;
use crate::math::Point3;
use crate::surface::SurfaceId;

/// Which side of a surface a half-space selects.
///
/// A point lying exactly on the surface (`f(p) == 0`) belongs to the
/// positive side. In an ordered subdivision this means a boundary plane is
/// owned by the interval above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Negative,
    Positive,
}

impl Side {
    pub fn flip(self) -> Side {
        match self {
            Side::Negative => Side::Positive,
            Side::Positive => Side::Negative,
        }
    }

    /// Whether a surface function value lies on this side.
    pub fn admits(self, value: f64) -> bool {
        match self {
            Side::Negative => value < 0.0,
            Side::Positive => value >= 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    HalfSpace { surface: SurfaceId, side: Side },
    /// All operands hold. The empty intersection is all of space.
    Intersection(Vec<Region>),
    /// Any operand holds. The empty union is the empty set.
    Union(Vec<Region>),
}

impl Region {
    pub fn half_space(surface: SurfaceId, side: Side) -> Region {
        Region::HalfSpace { surface, side }
    }

    /// All of space.
    pub fn everywhere() -> Region {
        Region::Intersection(Vec::new())
    }

    /// The empty set.
    pub fn nowhere() -> Region {
        Region::Union(Vec::new())
    }

    pub fn intersect(self, other: Region) -> Region {
        let mut operands = self.into_intersection_operands();
        operands.extend(other.into_intersection_operands());
        collapse(operands, Region::Intersection)
    }

    pub fn union(self, other: Region) -> Region {
        let mut operands = self.into_union_operands();
        operands.extend(other.into_union_operands());
        collapse(operands, Region::Union)
    }

    /// Intersection of every region in `regions`; `everywhere` when empty.
    pub fn intersection_of(regions: impl IntoIterator<Item = Region>) -> Region {
        regions.into_iter().fold(Region::everywhere(), Region::intersect)
    }

    /// Union of every region in `regions`; `nowhere` when empty.
    pub fn union_of(regions: impl IntoIterator<Item = Region>) -> Region {
        regions.into_iter().fold(Region::nowhere(), Region::union)
    }

    /// Complement in negation normal form: half-space sides flip and
    /// intersections and unions swap. `Region` has no complement node, so
    /// `!(a & b)` is stored, and exported, as `!a | !b`.
    pub fn complement(&self) -> Region {
        match self {
            Region::HalfSpace { surface, side } => Region::half_space(*surface, side.flip()),
            Region::Intersection(ops) => Region::Union(ops.iter().map(Region::complement).collect()),
            Region::Union(ops) => Region::Intersection(ops.iter().map(Region::complement).collect()),
        }
    }

    pub fn is_everywhere(&self) -> bool {
        matches!(self, Region::Intersection(ops) if ops.is_empty())
    }

    /// Point membership, evaluating surfaces through the owning arena.
    pub fn contains(&self, geometry: &Geometry, p: &Point3) -> bool {
        match self {
            Region::HalfSpace { surface, side } => {
                side.admits(geometry.surface(*surface).evaluate(p))
            }
            Region::Intersection(ops) => ops.iter().all(|r| r.contains(geometry, p)),
            Region::Union(ops) => ops.iter().any(|r| r.contains(geometry, p)),
        }
    }

    /// Every surface referenced by the region.
    pub fn surfaces(&self) -> BTreeSet<SurfaceId> {
        let mut out = BTreeSet::new();
        self.collect_surfaces(&mut out);
        out
    }

    pub fn collect_surfaces(&self, out: &mut BTreeSet<SurfaceId>) {
        match self {
            Region::HalfSpace { surface, .. } => {
                out.insert(*surface);
            }
            Region::Intersection(ops) | Region::Union(ops) => {
                for op in ops {
                    op.collect_surfaces(out);
                }
            }
        }
    }

    fn into_intersection_operands(self) -> Vec<Region> {
        match self {
            Region::Intersection(ops) => ops,
            other => vec![other],
        }
    }

    fn into_union_operands(self) -> Vec<Region> {
        match self {
            Region::Union(ops) => ops,
            other => vec![other],
        }
    }
}

fn collapse(mut operands: Vec<Region>, wrap: fn(Vec<Region>) -> Region) -> Region {
    if operands.len() == 1 {
        if let Some(only) = operands.pop() {
            return only;
        }
    }
    wrap(operands)
}

impl BitAnd for Region {
    type Output = Region;

    fn bitand(self, rhs: Region) -> Region {
        self.intersect(rhs)
    }
}

impl BitOr for Region {
    type Output = Region;

    fn bitor(self, rhs: Region) -> Region {
        self.union(rhs)
    }
}

impl Not for Region {
    type Output = Region;

    fn not(self) -> Region {
        self.complement()
    }
}

impl Not for &Region {
    type Output = Region;

    fn not(self) -> Region {
        self.complement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_intersections_flatten() {
        let r = (SurfaceId(0).negative() & SurfaceId(1).positive()) & SurfaceId(2).negative();
        match r {
            Region::Intersection(ops) => assert_eq!(ops.len(), 3),
            other => panic!("expected intersection, got {other:?}"),
        }
    }

    #[test]
    fn complement_is_an_involution() {
        let r = (SurfaceId(0).negative() | SurfaceId(1).positive()) & SurfaceId(2).negative();
        assert_eq!(r.complement().complement(), r);
    }

    #[test]
    fn everywhere_is_identity_for_intersection() {
        let r = SurfaceId(4).positive();
        assert_eq!(Region::everywhere() & r.clone(), r);
        assert!(Region::everywhere().complement() == Region::nowhere());
    }
}
