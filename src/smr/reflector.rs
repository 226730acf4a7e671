//! Heavy stainless steel reflector between the fuel and the core barrel.
//!
//! Six distinct blocks are drilled with cooling holes; the remaining
//! positions reuse them through quarter-turn rotations and reflections.

use std::collections::BTreeMap;

use log::debug;

use crate::error::{GeometryError, Result};
use crate::geometry::{Cell, Geometry, Universe, UniverseId};
use crate::region::Region;
use crate::surface::Surface;
use crate::transform::{rotate_universe, RigidTransform};

use super::dimensions::LATTICE_PITCH;
use super::materials::MaterialSet;

/// Cooling hole centred at `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Hole {
    x: f64,
    y: f64,
    r: f64,
}

/// Derived blocks: name, source block and Euler angles in degrees.
const DERIVED: [(&str, &str, [f64; 3]); 22] = [
    ("NE", "NW", [0.0, 0.0, -90.0]),
    ("SW", "NW", [0.0, 0.0, 90.0]),
    ("SE", "NW", [0.0, 0.0, 180.0]),
    ("0,2", "2,0", [0.0, 180.0, -90.0]),
    ("0,3", "5,0", [0.0, 0.0, -90.0]),
    ("0,4", "4,0", [0.0, 0.0, -90.0]),
    ("0,5", "3,0", [0.0, 0.0, -90.0]),
    ("0,6", "2,0", [0.0, 0.0, -90.0]),
    ("1,7", "1,1", [0.0, 0.0, -90.0]),
    ("2,8", "2,0", [0.0, 180.0, 0.0]),
    ("3,8", "3,0", [0.0, 180.0, 0.0]),
    ("4,8", "4,0", [0.0, 180.0, 0.0]),
    ("5,8", "3,0", [0.0, 0.0, 180.0]),
    ("6,0", "2,0", [180.0, 0.0, 0.0]),
    ("6,8", "2,0", [0.0, 0.0, 180.0]),
    ("7,1", "1,1", [180.0, 0.0, 0.0]),
    ("7,7", "1,1", [0.0, 0.0, 180.0]),
    ("8,2", "2,0", [0.0, 0.0, 90.0]),
    ("8,3", "3,0", [0.0, 0.0, 90.0]),
    ("8,4", "4,0", [0.0, 0.0, 90.0]),
    ("8,5", "5,0", [0.0, 0.0, 90.0]),
    ("8,6", "2,0", [0.0, 0.0, 180.0]),
];

/// Reflector block universes by name, plus the solid filler block.
#[derive(Clone, Debug)]
pub struct Reflector {
    blocks: BTreeMap<String, UniverseId>,
    pub solid: UniverseId,
}

impl Reflector {
    pub fn build(geometry: &mut Geometry, materials: &MaterialSet) -> Result<Self> {
        let mut blocks = BTreeMap::new();
        for (name, holes) in drilled_blocks() {
            let id = drilled_block(geometry, materials, name, &holes);
            blocks.insert(name.to_string(), id);
        }

        for (name, source, euler) in DERIVED {
            let source = lookup(&blocks, source)?;
            let transform = RigidTransform::from_euler_degrees(euler)?;
            let id = rotate_universe(geometry, source, transform, &format!("reflector {name}"));
            blocks.insert(name.to_string(), id);
        }

        let solid = geometry.add_universe(Universe::with_cells(
            "solid",
            vec![Cell::new("heavy reflector", Region::everywhere(), materials.ss304)],
        ));

        debug!("reflector: {} blocks", blocks.len());
        Ok(Self { blocks, solid })
    }

    pub fn get(&self, name: &str) -> Result<UniverseId> {
        lookup(&self.blocks, name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

fn lookup(blocks: &BTreeMap<String, UniverseId>, name: &str) -> Result<UniverseId> {
    blocks
        .get(name)
        .copied()
        .ok_or_else(|| GeometryError::MissingCatalogEntry(format!("reflector {name}")))
}

fn drilled_block(geometry: &mut Geometry, materials: &MaterialSet, name: &str, holes: &[Hole]) -> UniverseId {
    let block = format!("reflector {name}");
    let mut universe = Universe::new(block.clone());
    let mut steel = Vec::with_capacity(holes.len());
    for (i, hole) in holes.iter().enumerate() {
        let cyl = geometry.add_surface(Surface::z_cylinder(hole.x, hole.y, hole.r));
        universe.add_cell(Cell::new(format!("{block} hole {i}"), cyl.negative(), materials.water));
        steel.push(cyl.positive());
    }
    universe.add_cell(Cell::new(format!("{block} SS"), Region::intersection_of(steel), materials.ss304));
    geometry.add_universe(universe)
}

/// Hole layout of the six drilled blocks, in block-local coordinates.
fn drilled_blocks() -> Vec<(&'static str, Vec<Hole>)> {
    let h = LATTICE_PITCH / 2.0;
    let s = LATTICE_PITCH / 276.0;
    let r1 = 6.5 * s;
    let r2 = 15.0 * s;
    let hole = |x: f64, y: f64, r: f64| Hole { x, y, r };
    let from_edge = |n: f64| -h + n * s;

    let nw = {
        let x = [12.0, 80.0, 150.0, 217.0, 171.0, 112.0, 154.0, 54.0, 138.0].map(from_edge);
        let y = [59.0, 126.0, 196.0, 264.0, 105.0, 122.0, 164.0, 138.0, 222.0, 247.0].map(from_edge);
        vec![
            hole(x[0], y[0], r1),
            hole(x[1], y[0], r1),
            hole(x[2], y[0], r1),
            hole(x[3], y[0], r2),
            hole(x[3], y[1], r1),
            hole(x[3], y[2], r1),
            hole(x[3], y[3], r1),
            hole(x[4], y[4], r1),
            hole(x[5], y[5], r1),
            hole(x[6], y[6], r1),
            hole(x[7], y[7], r1),
            hole(x[8], y[8], r1),
            hole(x[0], y[9], r1),
        ]
    };

    let corner = vec![
        hole(from_edge(217.0), from_edge(59.0), r1),
        hole(h - 103.0 * s, from_edge(156.0), r1),
        hole(h - 158.0 * s, from_edge(103.0), r1),
    ];

    let x1 = from_edge(218.0);
    let x2 = from_edge(158.0);
    let x3 = from_edge(103.0);
    let dy = 67.0 * s;

    let mut middle = vec![hole(x1, 0.0, r1)];
    for y in [dy, 2.0 * dy] {
        middle.push(hole(x1, y, r1));
        middle.push(hole(x1, -y, r1));
    }
    for y in [dy / 2.0, 1.5 * dy] {
        middle.push(hole(x2, y, r1));
        middle.push(hole(x2, -y, r1));
    }
    middle.push(hole(x3, 76.0 * s, r1));
    middle.push(hole(x3, -76.0 * s, r1));

    let mut upper: Vec<Hole> = (2..7).map(|i| hole(x1, i as f64 * dy - LATTICE_PITCH, r1)).collect();
    for i in [5.0, 7.0, 11.0] {
        upper.push(hole(x2, i * dy / 2.0 - LATTICE_PITCH, r1));
    }
    upper.push(hole(from_edge(136.0), from_edge(159.0), r1));
    upper.push(hole(from_edge(93.0), from_edge(47.0), r1));

    let lower = upper.iter().map(|c| hole(c.x, -c.y, c.r)).collect();

    let edge = vec![hole(from_edge(198.0), from_edge(98.0), r1)];

    vec![
        ("NW", nw),
        ("1,1", corner),
        ("4,0", middle),
        ("3,0", upper),
        ("5,0", lower),
        ("2,0", edge),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;

    #[test]
    fn holes_cut_into_block() {
        let h = LATTICE_PITCH / 2.0;
        for (name, holes) in drilled_blocks() {
            for c in holes {
                assert!(c.x.abs() - c.r < h && c.y.abs() - c.r < h, "{name}: {c:?}");
            }
        }
    }

    #[test]
    fn every_named_block_resolves() {
        let mut geom = Geometry::new();
        let mats = MaterialSet::new(&mut geom, false);
        let reflector = Reflector::build(&mut geom, &mats).unwrap();
        assert_eq!(reflector.len(), 28);
        for (name, _, _) in DERIVED {
            reflector.get(name).unwrap();
        }
        assert!(reflector.get("9,9").is_err());
    }

    #[test]
    fn rotated_block_moves_holes() {
        let mut geom = Geometry::new();
        let mats = MaterialSet::new(&mut geom, false);
        let reflector = Reflector::build(&mut geom, &mats).unwrap();

        let h = LATTICE_PITCH / 2.0;
        let s = LATTICE_PITCH / 276.0;
        // Centre of the first NW hole.
        let (x, y) = (-h + 12.0 * s, -h + 59.0 * s);
        let nw = reflector.get("NW").unwrap();
        let trace = geom.locate(nw, Point3::new(x, y, 0.0)).unwrap();
        assert_eq!(trace.material(), Some(mats.water));

        // The same spot in the SE copy is rotated half a turn away.
        let se = reflector.get("SE").unwrap();
        let trace = geom.locate(se, Point3::new(x, y, 0.0)).unwrap();
        assert_eq!(trace.material(), Some(mats.ss304));
        let trace = geom.locate(se, Point3::new(-x, -y, 0.0)).unwrap();
        assert_eq!(trace.material(), Some(mats.water));
    }
}
