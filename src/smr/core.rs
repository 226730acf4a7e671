//! Full SMR core: 9x9 assembly lattice inside the barrel and vessel.

use log::info;

use crate::config::{CoreConfig, ModelConfig};
use crate::error::Result;
use crate::evaluate::{BuiltModel, ModelBuilder, Objective};
use crate::export::{ModelDocument, SourceBox};
use crate::geometry::{Cell, Geometry, Universe, UniverseId};
use crate::lattice::LatticeTiler;
use crate::math::{Point3, Vector2};
use crate::search::{ParamBound, ParameterSpace, ParameterVector};
use crate::types::BBox3;

use super::assemblies::{AbsorberPattern, AssemblyBuilder, AssemblyVariant, Insert};
use super::dimensions::{
    BOTTOM_FUEL_STACK, CORE_SIZE, LATTICE_PITCH, MAX_ROD_INSERTION, TOP_ACTIVE_CORE,
};
use super::materials::{Enrichment, MaterialSet};
use super::pins::PinUniverses;
use super::reflector::Reflector;
use super::surfaces::{CoreSurfaces, RodBank, RodInsertion};

/// Content of one core lattice position.
#[derive(Clone, Copy, Debug, PartialEq)]
enum CoreSlot {
    Solid,
    Reflector(&'static str),
    Assembly(AssemblyVariant),
}

use CoreSlot::{Reflector as R, Solid as S};

const fn rods(bank: RodBank) -> CoreSlot {
    CoreSlot::Assembly(AssemblyVariant::new(Enrichment::Percent24, Insert::ControlRods(bank), false))
}

const A31: CoreSlot = CoreSlot::Assembly(AssemblyVariant::new(Enrichment::Percent31, Insert::GuideTubes, true));
const A16: CoreSlot = CoreSlot::Assembly(AssemblyVariant::new(Enrichment::Percent16, Insert::GuideTubes, true));
const BA: CoreSlot =
    CoreSlot::Assembly(AssemblyVariant::new(Enrichment::Percent31, Insert::Absorbers(AbsorberPattern::Ba16), false));
const CA: CoreSlot = rods(RodBank::A);
const CB: CoreSlot = rods(RodBank::B);
const CC: CoreSlot = rods(RodBank::C);
const CD: CoreSlot = rods(RodBank::D);

/// Loading map, top row first.
const CORE_MAP: [[CoreSlot; CORE_SIZE]; CORE_SIZE] = [
    [S, S, R("0,2"), R("0,3"), R("0,4"), R("0,5"), R("0,6"), S, S],
    [S, R("1,1"), R("NW"), A31, CB, A31, R("NE"), R("1,7"), S],
    [R("2,0"), R("NW"), A31, CD, BA, CC, A31, R("NE"), R("2,8")],
    [R("3,0"), A31, CC, BA, CA, BA, CD, A31, R("3,8")],
    [R("4,0"), CB, BA, CA, A16, CA, BA, CB, R("4,8")],
    [R("5,0"), A31, CD, BA, CA, BA, CC, A31, R("5,8")],
    [R("6,0"), R("SW"), A31, CC, BA, CD, A31, R("SE"), R("6,8")],
    [S, R("7,1"), R("SW"), A31, CB, A31, R("SE"), R("7,7"), S],
    [S, S, R("8,2"), R("8,3"), R("8,4"), R("8,5"), R("8,6"), S, S],
];

/// Register the core and return the root universe.
pub fn core_geometry(geometry: &mut Geometry, config: &CoreConfig, insertion: &RodInsertion) -> Result<UniverseId> {
    let surfaces = CoreSurfaces::new(geometry, insertion)?;
    let materials = MaterialSet::new(geometry, config.depleted);
    let pins = PinUniverses::build(geometry, &surfaces, &materials, config)?;
    let reflector = Reflector::build(geometry, &materials)?;
    let mut assemblies = AssemblyBuilder::new(&surfaces, &materials, &pins)?;

    let mut rows = Vec::with_capacity(CORE_SIZE);
    for slots in &CORE_MAP {
        let mut row = Vec::with_capacity(CORE_SIZE);
        for slot in slots {
            row.push(match *slot {
                CoreSlot::Solid => reflector.solid,
                CoreSlot::Reflector(name) => reflector.get(name)?,
                CoreSlot::Assembly(variant) => assemblies.get(geometry, variant)?,
            });
        }
        rows.push(row);
    }

    let half = CORE_SIZE as f64 * LATTICE_PITCH / 2.0;
    let main_core = LatticeTiler::from_rows(
        "Main core",
        Vector2::new(LATTICE_PITCH, LATTICE_PITCH),
        Vector2::new(-half, -half),
        &rows,
    )?
    .build(geometry)?
    .bounding_cell;

    // The lattice envelope is wider than the barrel, which clips it.
    let axial = surfaces.lower_bound.positive() & surfaces.upper_bound.negative();
    let cells = vec![
        Cell {
            region: main_core.region & surfaces.core_barrel_ir.negative() & axial.clone(),
            ..main_core
        },
        Cell::new(
            "core barrel",
            surfaces.core_barrel_ir.positive() & surfaces.core_barrel_or.negative() & axial.clone(),
            materials.ss304,
        ),
        Cell::new(
            "downcomer",
            surfaces.core_barrel_or.positive() & surfaces.rpv_ir.negative() & axial.clone(),
            materials.water,
        ),
        Cell::new(
            "reactor pressure vessel",
            surfaces.rpv_ir.positive() & surfaces.rpv_or.negative() & axial,
            materials.carbon_steel,
        ),
    ];
    let root = geometry.add_universe(Universe::with_cells("root universe", cells));

    info!(
        "core built: {} assembly types, {} universes, {} surfaces",
        assemblies.built_count(),
        geometry.universe_count(),
        geometry.surface_count()
    );
    Ok(root)
}

/// Fission source box over the inner 7x7 assemblies and the active fuel.
pub fn source_box() -> SourceBox {
    let half = 7.0 * LATTICE_PITCH / 2.0;
    SourceBox {
        bounds: BBox3::new(
            Point3::new(-half, -half, BOTTOM_FUEL_STACK),
            Point3::new(half, half, TOP_ACTIVE_CORE),
        ),
        only_fissionable: true,
    }
}

/// Rebuilds the core for each insertion vector of the four regulating banks.
#[derive(Clone, Debug, Default)]
pub struct SmrModelBuilder {
    pub config: ModelConfig,
}

impl SmrModelBuilder {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn parameter_space() -> Result<ParameterSpace> {
        ParameterSpace::uniform(RodBank::REGULATING.len(), ParamBound::Float { lo: 0.0, hi: MAX_ROD_INSERTION })
    }

    pub fn objective() -> Objective {
        Objective::TargetKeff { target: 1.0 }
    }
}

impl ModelBuilder for SmrModelBuilder {
    fn build(&self, params: &ParameterVector) -> Result<BuiltModel> {
        let insertion = RodInsertion::from_slice(params.values())?;
        let mut geometry = Geometry::new();
        let root = core_geometry(&mut geometry, &self.config.core, &insertion)?;
        let document = ModelDocument::from_geometry(&geometry, root, source_box(), self.config.settings.clone());
        Ok(BuiltModel { document, constrained_count: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_is_symmetric_in_assembly_kinds() {
        for (r, row) in CORE_MAP.iter().enumerate() {
            for (c, slot) in row.iter().enumerate() {
                let mirror = CORE_MAP[CORE_SIZE - 1 - r][CORE_SIZE - 1 - c];
                let kind = |s: &CoreSlot| std::mem::discriminant(s);
                assert_eq!(kind(slot), kind(&mirror), "({r}, {c})");
            }
        }
    }

    #[test]
    fn source_box_covers_active_fuel() {
        let b = source_box();
        assert!(b.bounds.is_valid());
        assert!((b.bounds.min.z - 36.6205).abs() < 1e-3);
        assert!((b.bounds.max.z - 236.6201).abs() < 1e-3);
    }

    #[test]
    fn parameter_space_spans_rod_travel() {
        let space = SmrModelBuilder::parameter_space().unwrap();
        assert_eq!(space.dimension(), 4);
        assert!(space.contains(&ParameterVector(vec![0.0, 100.0, 200.0, MAX_ROD_INSERTION])));
        assert!(!space.contains(&ParameterVector(vec![0.0, -1.0, 0.0, 0.0])));
    }
}
