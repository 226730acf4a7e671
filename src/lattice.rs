//! Rectangular lattices and the lattice tiler.
//!
//! Element `(ix, iy)` spans `lower_left + [ix, ix + 1) * pitch.x` by
//! `lower_left + [iy, iy + 1) * pitch.y`; `iy = 0` is the bottom row.
//! Layouts printed top row first are converted with
//! [`LatticeIndex::from_row_col`].

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::geometry::{Cell, Geometry, LatticeId, UniverseId};
use crate::math::{Point3, Vector2};
use crate::surface::BoundaryCondition;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticeIndex {
    pub ix: usize,
    pub iy: usize,
}

impl LatticeIndex {
    pub fn new(ix: usize, iy: usize) -> Self {
        Self { ix, iy }
    }

    /// Convert a printed `(row, col)` position, row 0 at the top of an
    /// `ny`-row layout. `None` when `row >= ny`.
    pub fn from_row_col(row: usize, col: usize, ny: usize) -> Option<Self> {
        let iy = ny.checked_sub(row + 1)?;
        Some(Self { ix: col, iy })
    }
}

/// A regular 2-D array of universes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    pub name: String,
    pub pitch: Vector2,
    pub lower_left: Vector2,
    /// `[nx, ny]`
    pub shape: [usize; 2],
    /// Row-major, bottom row first.
    universes: Vec<UniverseId>,
    /// Universe for points outside the array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer: Option<UniverseId>,
}

impl Lattice {
    pub fn nx(&self) -> usize {
        self.shape[0]
    }

    pub fn ny(&self) -> usize {
        self.shape[1]
    }

    pub fn universes(&self) -> &[UniverseId] {
        &self.universes
    }

    pub fn contains_index(&self, index: LatticeIndex) -> bool {
        index.ix < self.nx() && index.iy < self.ny()
    }

    pub fn get(&self, index: LatticeIndex) -> Option<UniverseId> {
        if !self.contains_index(index) {
            return None;
        }
        self.universes.get(index.iy * self.nx() + index.ix).copied()
    }

    /// Unbounded element coordinates `floor((p - lower_left) / pitch)`.
    pub fn index_of(&self, x: f64, y: f64) -> (i64, i64) {
        let ix = ((x - self.lower_left.x) / self.pitch.x).floor() as i64;
        let iy = ((y - self.lower_left.y) / self.pitch.y).floor() as i64;
        (ix, iy)
    }

    /// Element containing `(x, y)`, if inside the array.
    pub fn element_at(&self, x: f64, y: f64) -> Option<LatticeIndex> {
        let (ix, iy) = self.index_of(x, y);
        if ix < 0 || iy < 0 {
            return None;
        }
        let index = LatticeIndex::new(ix as usize, iy as usize);
        self.contains_index(index).then_some(index)
    }

    /// Physical centre of an element.
    pub fn center(&self, index: LatticeIndex) -> Vector2 {
        Vector2::new(
            self.lower_left.x + (index.ix as f64 + 0.5) * self.pitch.x,
            self.lower_left.y + (index.iy as f64 + 0.5) * self.pitch.y,
        )
    }

    /// `p` relative to the centre of `index`.
    pub fn to_local(&self, index: LatticeIndex, p: &Point3) -> Point3 {
        let c = self.center(index);
        Point3::new(p.x - c.x, p.y - c.y, p.z)
    }

    pub fn upper_right(&self) -> Vector2 {
        Vector2::new(
            self.lower_left.x + self.nx() as f64 * self.pitch.x,
            self.lower_left.y + self.ny() as f64 * self.pitch.y,
        )
    }
}

/// Output of [`LatticeTiler::build`].
#[derive(Clone, Debug, PartialEq)]
pub struct TiledLattice {
    pub lattice: LatticeId,
    /// Cell filled by the lattice whose region is the lattice envelope.
    pub bounding_cell: Cell,
}

/// Builds a lattice from a default fill plus per-element overrides.
#[derive(Clone, Debug)]
pub struct LatticeTiler {
    name: String,
    pitch: Vector2,
    lower_left: Vector2,
    shape: [usize; 2],
    universes: Vec<UniverseId>,
    outer: Option<UniverseId>,
    boundary: BoundaryCondition,
}

impl LatticeTiler {
    /// Every element filled with `default`.
    pub fn uniform(
        name: impl Into<String>,
        pitch: Vector2,
        lower_left: Vector2,
        shape: [usize; 2],
        default: UniverseId,
    ) -> Self {
        Self {
            name: name.into(),
            pitch,
            lower_left,
            shape,
            universes: vec![default; shape[0] * shape[1]],
            outer: None,
            boundary: BoundaryCondition::Transmission,
        }
    }

    /// Defaults given as printed rows, top row first.
    pub fn from_rows(
        name: impl Into<String>,
        pitch: Vector2,
        lower_left: Vector2,
        rows: &[Vec<UniverseId>],
    ) -> Result<Self> {
        let name = name.into();
        let ny = rows.len();
        let nx = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != nx) {
            return Err(GeometryError::InvalidLattice {
                name,
                reason: "rows have different lengths".to_string(),
            });
        }

        let universes = rows.iter().rev().flat_map(|row| row.iter().copied()).collect();
        Ok(Self {
            name,
            pitch,
            lower_left,
            shape: [nx, ny],
            universes,
            outer: None,
            boundary: BoundaryCondition::Transmission,
        })
    }

    pub fn with_outer(mut self, outer: UniverseId) -> Self {
        self.outer = Some(outer);
        self
    }

    /// Boundary condition of the envelope planes.
    pub fn with_boundary(mut self, boundary: BoundaryCondition) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    /// Replace the element at `index`. Later overrides win.
    pub fn override_at(&mut self, index: LatticeIndex, universe: UniverseId) -> Result<&mut Self> {
        let [nx, ny] = self.shape;
        if index.ix >= nx || index.iy >= ny {
            return Err(GeometryError::LatticeIndexOutOfBounds {
                lattice: self.name.clone(),
                ix: index.ix,
                iy: index.iy,
                nx,
                ny,
            });
        }
        self.universes[index.iy * nx + index.ix] = universe;
        Ok(self)
    }

    /// Replace the element at a printed `(row, col)` position.
    pub fn override_row_col(&mut self, row: usize, col: usize, universe: UniverseId) -> Result<&mut Self> {
        let [nx, ny] = self.shape;
        let index = LatticeIndex::from_row_col(row, col, ny).ok_or_else(|| {
            GeometryError::LatticeIndexOutOfBounds {
                lattice: self.name.clone(),
                ix: col,
                iy: row,
                nx,
                ny,
            }
        })?;
        self.override_at(index, universe)
    }

    /// Apply a batch of overrides in order.
    pub fn override_all(
        &mut self,
        overrides: impl IntoIterator<Item = (LatticeIndex, UniverseId)>,
    ) -> Result<&mut Self> {
        for (index, universe) in overrides {
            self.override_at(index, universe)?;
        }
        Ok(self)
    }

    /// Register the lattice and the envelope planes.
    pub fn build(&self, geometry: &mut Geometry) -> Result<TiledLattice> {
        let [nx, ny] = self.shape;
        if nx == 0 || ny == 0 {
            return Err(self.invalid("lattice has no elements"));
        }
        if !(self.pitch.x > 0.0 && self.pitch.y > 0.0) {
            return Err(self.invalid("pitch must be positive"));
        }

        let lattice = Lattice {
            name: self.name.clone(),
            pitch: self.pitch,
            lower_left: self.lower_left,
            shape: self.shape,
            universes: self.universes.clone(),
            outer: self.outer,
        };
        let upper_right = lattice.upper_right();
        let id = geometry.add_lattice(lattice);
        let envelope = geometry.rectangle(self.lower_left, upper_right, self.boundary);

        debug!("lattice `{}`: {}x{}", self.name, nx, ny);
        Ok(TiledLattice {
            lattice: id,
            bounding_cell: Cell::new(self.name.clone(), envelope, id),
        })
    }

    fn invalid(&self, reason: &str) -> GeometryError {
        GeometryError::InvalidLattice { name: self.name.clone(), reason: reason.to_string() }
    }
}
