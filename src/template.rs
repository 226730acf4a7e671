//! Pattern templates: fixed special positions with swappable contents.
//!
//! A template names a set of lattice positions once. A variant is a mask
//! (one slot value per position) resolved through a catalog of universes,
//! so every variant of an assembly family reuses the same coordinates and
//! differs only in data.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::{GeometryError, Result};
use crate::geometry::UniverseId;
use crate::lattice::LatticeIndex;

#[derive(Clone, Debug, PartialEq)]
pub struct PatternTemplate {
    shape: [usize; 2],
    positions: Vec<LatticeIndex>,
}

impl PatternTemplate {
    pub fn new(shape: [usize; 2], positions: Vec<LatticeIndex>) -> Result<Self> {
        if let Some(bad) = positions.iter().find(|p| p.ix >= shape[0] || p.iy >= shape[1]) {
            return Err(GeometryError::LatticeIndexOutOfBounds {
                lattice: "pattern template".to_string(),
                ix: bad.ix,
                iy: bad.iy,
                nx: shape[0],
                ny: shape[1],
            });
        }
        Ok(Self { shape, positions })
    }

    /// Template from printed `(row, col)` positions, row 0 at the top.
    pub fn from_row_cols(shape: [usize; 2], row_cols: &[(usize, usize)]) -> Result<Self> {
        let positions = row_cols
            .iter()
            .map(|&(row, col)| {
                LatticeIndex::from_row_col(row, col, shape[1]).ok_or(
                    GeometryError::LatticeIndexOutOfBounds {
                        lattice: "pattern template".to_string(),
                        ix: col,
                        iy: row,
                        nx: shape[0],
                        ny: shape[1],
                    },
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(shape, positions)
    }

    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    pub fn positions(&self) -> &[LatticeIndex] {
        &self.positions
    }

    /// Resolve `mask` against `catalog` into lattice overrides, in
    /// template order.
    pub fn substitute<K>(
        &self,
        mask: &[K],
        catalog: &HashMap<K, UniverseId>,
    ) -> Result<Vec<(LatticeIndex, UniverseId)>>
    where
        K: Eq + Hash + Display,
    {
        if mask.len() != self.positions.len() {
            return Err(GeometryError::InvalidParameters(format!(
                "mask has {} entries for {} template positions",
                mask.len(),
                self.positions.len()
            )));
        }

        self.positions
            .iter()
            .zip(mask)
            .map(|(&index, slot)| {
                catalog
                    .get(slot)
                    .map(|&universe| (index, universe))
                    .ok_or_else(|| GeometryError::MissingCatalogEntry(slot.to_string()))
            })
            .collect()
    }
}
