//! Arena-based geometry store.
//!
//! All surfaces, materials, universes and lattices of one model live in a
//! `Geometry`. Entities reference each other through typed indices, so a
//! universe placed at many lattice positions is stored once and shared by
//! handle. A universe is registered only after all of its cells are built,
//! which keeps the composition graph acyclic.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::lattice::{Lattice, LatticeIndex};
use crate::material::{Material, MaterialId};
use crate::math::{Point3, Vector2};
use crate::region::Region;
use crate::surface::{BoundaryCondition, Surface, SurfaceId};
use crate::transform::RigidTransform;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniverseId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LatticeId(pub usize);

/// Content of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    /// Transparent, no physical content.
    Void,
    Material(MaterialId),
    Universe(UniverseId),
    Lattice(LatticeId),
}

impl From<MaterialId> for Fill {
    fn from(id: MaterialId) -> Self {
        Fill::Material(id)
    }
}

impl From<UniverseId> for Fill {
    fn from(id: UniverseId) -> Self {
        Fill::Universe(id)
    }
}

impl From<LatticeId> for Fill {
    fn from(id: LatticeId) -> Self {
        Fill::Lattice(id)
    }
}

/// A region paired with exactly one fill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub name: String,
    pub region: Region,
    pub fill: Fill,
    /// Rigid transform of the fill's frame relative to the cell's frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<RigidTransform>,
}

impl Cell {
    pub fn new(name: impl Into<String>, region: Region, fill: impl Into<Fill>) -> Self {
        Self { name: name.into(), region, fill: fill.into(), transform: None }
    }

    pub fn with_transform(mut self, transform: RigidTransform) -> Self {
        self.transform = Some(transform);
        self
    }
}

/// Ordered cells. The first cell whose region contains a point owns it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Universe {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), cells: Vec::new() }
    }

    pub fn with_cells(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self { name: name.into(), cells }
    }

    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// First cell containing `p`, with its position in the cell list.
    pub fn find_cell(&self, geometry: &Geometry, p: &Point3) -> Option<(usize, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .find(|(_, cell)| cell.region.contains(geometry, p))
    }
}

/// One level of a point lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocateStep {
    pub universe: UniverseId,
    pub cell: usize,
    /// Lattice element entered through this cell, if it is lattice-filled.
    pub lattice_index: Option<LatticeIndex>,
}

/// Result of resolving a point down to a leaf fill.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub steps: Vec<LocateStep>,
    /// `Fill::Void` or `Fill::Material`.
    pub fill: Fill,
    /// The point in the frame of the innermost universe.
    pub local: Point3,
}

impl Trace {
    pub fn material(&self) -> Option<MaterialId> {
        match self.fill {
            Fill::Material(id) => Some(id),
            _ => None,
        }
    }

    /// Innermost universe visited.
    pub fn leaf_universe(&self) -> Option<UniverseId> {
        self.steps.last().map(|s| s.universe)
    }

    pub fn visited(&self, universe: UniverseId) -> bool {
        self.steps.iter().any(|s| s.universe == universe)
    }
}

/// Arena owning every entity of one geometry model.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    surfaces: Vec<Surface>,
    materials: Vec<Material>,
    universes: Vec<Universe>,
    lattices: Vec<Lattice>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Add entities ---

    pub fn add_surface(&mut self, surface: Surface) -> SurfaceId {
        let id = SurfaceId(self.surfaces.len());
        self.surfaces.push(surface);
        id
    }

    /// Register an independent copy of `id` carrying `boundary`.
    pub fn clone_surface_with_boundary(
        &mut self,
        id: SurfaceId,
        boundary: BoundaryCondition,
    ) -> SurfaceId {
        let copy = self.surface(id).clone().with_boundary(boundary);
        self.add_surface(copy)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len());
        self.materials.push(material);
        id
    }

    pub fn add_universe(&mut self, universe: Universe) -> UniverseId {
        let id = UniverseId(self.universes.len());
        trace!("universe {:?} `{}` with {} cells", id, universe.name, universe.cells.len());
        self.universes.push(universe);
        id
    }

    pub fn add_lattice(&mut self, lattice: Lattice) -> LatticeId {
        let id = LatticeId(self.lattices.len());
        self.lattices.push(lattice);
        id
    }

    /// Register the four planes bounding an axis-aligned rectangle centred
    /// on `center` and return the region inside them.
    pub fn rectangular_prism(
        &mut self,
        width: f64,
        height: f64,
        center: Vector2,
        boundary: BoundaryCondition,
    ) -> Region {
        let half = Vector2::new(width / 2.0, height / 2.0);
        self.rectangle(center - half, center + half, boundary)
    }

    /// Register the four planes of the rectangle `[min, max]` and return the
    /// region inside them.
    pub fn rectangle(&mut self, min: Vector2, max: Vector2, boundary: BoundaryCondition) -> Region {
        let xmin = self.add_surface(Surface::x_plane(min.x).with_boundary(boundary));
        let xmax = self.add_surface(Surface::x_plane(max.x).with_boundary(boundary));
        let ymin = self.add_surface(Surface::y_plane(min.y).with_boundary(boundary));
        let ymax = self.add_surface(Surface::y_plane(max.y).with_boundary(boundary));
        xmin.positive() & xmax.negative() & ymin.positive() & ymax.negative()
    }

    // --- Get entities ---

    pub fn surface(&self, id: SurfaceId) -> &Surface {
        &self.surfaces[id.0]
    }

    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn universe(&self, id: UniverseId) -> &Universe {
        &self.universes[id.0]
    }

    pub fn lattice(&self, id: LatticeId) -> &Lattice {
        &self.lattices[id.0]
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn universe_count(&self) -> usize {
        self.universes.len()
    }

    pub fn lattice_count(&self) -> usize {
        self.lattices.len()
    }

    // --- Queries ---

    /// Resolve `point` from `root` down to a material or void cell.
    ///
    /// Cell transforms map the parent point into the fill's frame with the
    /// inverse transform; lattice elements are entered in a frame centred on
    /// the element. Returns `None` when some universe on the way has no cell
    /// containing the point, or a lattice without an outer universe is left.
    pub fn locate(&self, root: UniverseId, point: Point3) -> Option<Trace> {
        let mut steps = Vec::new();
        let mut universe = root;
        let mut local = point;

        loop {
            let (index, cell) = self.universe(universe).find_cell(self, &local)?;
            steps.push(LocateStep { universe, cell: index, lattice_index: None });
            if let Some(transform) = &cell.transform {
                local = transform.to_local(&local);
            }

            match cell.fill {
                Fill::Universe(next) => universe = next,
                Fill::Lattice(id) => {
                    let lattice = self.lattice(id);
                    match lattice.element_at(local.x, local.y) {
                        Some(element) => {
                            if let Some(step) = steps.last_mut() {
                                step.lattice_index = Some(element);
                            }
                            local = lattice.to_local(element, &local);
                            universe = lattice.get(element)?;
                        }
                        None => universe = lattice.outer?,
                    }
                }
                leaf => return Some(Trace { steps, fill: leaf, local }),
            }
        }
    }
}
