//! Model hand-off document.
//!
//! A `ModelDocument` is the self-contained description a transport solver
//! consumes: the root universe and every surface, material, universe and
//! lattice reachable from it, keyed by arena handle, plus the initial
//! source box and run settings. Cell order, region structure, boundary
//! conditions, lattice contents and cell transforms are carried verbatim.
//! Complemented regions arrive already rewritten with flipped half-spaces
//! (see [`Region::complement`](crate::region::Region::complement)), so the
//! document has no complement operator.

use std::collections::BTreeSet;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::config::RunSettings;
use crate::geometry::{Fill, Geometry, LatticeId, Universe, UniverseId};
use crate::lattice::Lattice;
use crate::material::{Material, MaterialId};
use crate::surface::{Surface, SurfaceId};
use crate::types::BBox3;

/// Region used to seed the starting particle distribution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceBox {
    pub bounds: BBox3,
    /// Reject source sites outside fissionable material.
    pub only_fissionable: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub root: UniverseId,
    pub surfaces: Vec<(SurfaceId, Surface)>,
    pub materials: Vec<(MaterialId, Material)>,
    pub universes: Vec<(UniverseId, Universe)>,
    pub lattices: Vec<(LatticeId, Lattice)>,
    pub source: SourceBox,
    pub settings: RunSettings,
}

impl ModelDocument {
    /// Collect everything reachable from `root`.
    pub fn from_geometry(
        geometry: &Geometry,
        root: UniverseId,
        source: SourceBox,
        settings: RunSettings,
    ) -> Self {
        let mut universes = BTreeSet::new();
        let mut lattices = BTreeSet::new();
        let mut surfaces = BTreeSet::new();
        let mut materials = BTreeSet::new();

        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if !universes.insert(id) {
                continue;
            }
            for cell in &geometry.universe(id).cells {
                cell.region.collect_surfaces(&mut surfaces);
                match cell.fill {
                    Fill::Void => {}
                    Fill::Material(m) => {
                        materials.insert(m);
                    }
                    Fill::Universe(u) => pending.push(u),
                    Fill::Lattice(l) => {
                        if lattices.insert(l) {
                            let lattice = geometry.lattice(l);
                            pending.extend(lattice.universes().iter().copied());
                            pending.extend(lattice.outer);
                        }
                    }
                }
            }
        }

        Self {
            root,
            surfaces: surfaces.into_iter().map(|id| (id, geometry.surface(id).clone())).collect(),
            materials: materials.into_iter().map(|id| (id, geometry.material(id).clone())).collect(),
            universes: universes.into_iter().map(|id| (id, geometry.universe(id).clone())).collect(),
            lattices: lattices.into_iter().map(|id| (id, geometry.lattice(id).clone())).collect(),
            source,
            settings,
        }
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        lookup(&self.surfaces, id)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        lookup(&self.materials, id)
    }

    pub fn universe(&self, id: UniverseId) -> Option<&Universe> {
        lookup(&self.universes, id)
    }

    pub fn lattice(&self, id: LatticeId) -> Option<&Lattice> {
        lookup(&self.lattices, id)
    }

    pub fn cell_count(&self) -> usize {
        self.universes.iter().map(|(_, u)| u.cells.len()).sum()
    }
}

// Entries are sorted by handle.
fn lookup<K: Ord, V>(entries: &[(K, V)], key: K) -> Option<&V> {
    entries
        .binary_search_by(|(k, _)| k.cmp(&key))
        .ok()
        .map(|i| &entries[i].1)
}

/// Write `document` as pretty-printed JSON.
pub fn write_model<W: Write>(document: &ModelDocument, writer: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, document)
}

pub fn read_model<R: Read>(reader: R) -> serde_json::Result<ModelDocument> {
    serde_json::from_reader(reader)
}
