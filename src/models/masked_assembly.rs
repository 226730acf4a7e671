//! 11x11 assembly whose pins are switched between fuel and void.
//!
//! Each of the 121 parameters is a bit: 1 keeps a fuel pin at that
//! position, 0 empties it. Positions run row by row from the top-left
//! corner. Fuel above `FUEL_LIMIT` pins is penalised, so the search looks
//! for the most reactive arrangement of a bounded amount of fuel.

use log::debug;

use crate::config::RunSettings;
use crate::error::{GeometryError, Result};
use crate::evaluate::{BuiltModel, ModelBuilder, Objective, Penalty};
use crate::export::{ModelDocument, SourceBox};
use crate::geometry::{Cell, Fill, Geometry, Universe, UniverseId};
use crate::lattice::LatticeTiler;
use crate::material::{FractionBasis, Material};
use crate::math::{Point3, Vector2};
use crate::pin::make_pin;
use crate::search::{ParamBound, ParameterSpace, ParameterVector};
use crate::surface::{BoundaryCondition, Surface};
use crate::types::BBox3;

use super::pin_cell::{hot_borated_water, zircaloy_cladding};

pub const PINS_PER_SIDE: usize = 11;
pub const ASSEMBLY_WIDTH: f64 = 22.0;
pub const FUEL_OR: f64 = 0.75;
pub const CLAD_OR: f64 = 0.85;
pub const FUEL_LIMIT: usize = 61;
pub const PENALTY_WEIGHT: f64 = 1.0e5;

#[derive(Clone, Debug)]
pub struct MaskedAssemblyModel {
    pub settings: RunSettings,
}

impl Default for MaskedAssemblyModel {
    fn default() -> Self {
        Self { settings: RunSettings { batches: 100, ..RunSettings::default() } }
    }
}

impl MaskedAssemblyModel {
    pub fn new(settings: RunSettings) -> Self {
        Self { settings }
    }

    pub fn parameter_space() -> Result<ParameterSpace> {
        ParameterSpace::uniform(PINS_PER_SIDE * PINS_PER_SIDE, ParamBound::Int { lo: 0, hi: 1 })
    }

    pub fn objective() -> Objective {
        Objective::MaximizeKeff
    }

    pub fn penalty() -> Penalty {
        Penalty { limit: FUEL_LIMIT, weight: PENALTY_WEIGHT }
    }

    /// Register the assembly for `mask` and return the geometry, its root
    /// and the number of fuel pins placed.
    pub fn geometry(mask: &[f64]) -> Result<(Geometry, UniverseId, usize)> {
        let n = PINS_PER_SIDE * PINS_PER_SIDE;
        if mask.len() != n {
            return Err(GeometryError::InvalidParameters(format!(
                "mask has {} entries, expected {n}",
                mask.len()
            )));
        }

        let mut geometry = Geometry::new();
        let fuel = geometry.add_material(
            Material::new("Fuel", 10.29769)
                .nuclide("U234", 4.4843e-6, FractionBasis::Atom)
                .nuclide("U235", 5.5815e-4, FractionBasis::Atom)
                .nuclide("U238", 2.2408e-2, FractionBasis::Atom)
                .nuclide("O16", 4.5829e-2, FractionBasis::Atom),
        );
        let clad = geometry.add_material(zircaloy_cladding("Cladding"));
        let water = geometry.add_material(hot_borated_water());

        let fuel_or = geometry.add_surface(Surface::z_cylinder(0.0, 0.0, FUEL_OR).named("Fuel OR"));
        let clad_or = geometry.add_surface(Surface::z_cylinder(0.0, 0.0, CLAD_OR).named("Clad OR"));
        let fuel_pin = make_pin(
            &mut geometry,
            "Fuel Pin",
            &[fuel_or, clad_or],
            &[Fill::Material(fuel), Fill::Material(clad), Fill::Material(water)],
            None,
        )?;
        let void_pin = make_pin(&mut geometry, "void pin", &[], &[Fill::Void], None)?;

        let pitch = ASSEMBLY_WIDTH / PINS_PER_SIDE as f64;
        let half = ASSEMBLY_WIDTH / 2.0;
        let mut tiler = LatticeTiler::uniform(
            "Fuel Assembly",
            Vector2::new(pitch, pitch),
            Vector2::new(-half, -half),
            [PINS_PER_SIDE, PINS_PER_SIDE],
            fuel_pin,
        )
        .with_boundary(BoundaryCondition::Vacuum);

        let mut fuel_pins = n;
        for (idx, &bit) in mask.iter().enumerate() {
            if bit.round() == 0.0 {
                tiler.override_row_col(idx / PINS_PER_SIDE, idx % PINS_PER_SIDE, void_pin)?;
                fuel_pins -= 1;
            }
        }

        let tiled = tiler.build(&mut geometry)?;
        let root = geometry.add_universe(Universe::with_cells(
            "root universe",
            vec![Cell { name: "root cell".to_string(), ..tiled.bounding_cell }],
        ));
        debug!("masked assembly: {} of {} fuel pins", fuel_pins, n);
        Ok((geometry, root, fuel_pins))
    }

    pub fn source_box() -> SourceBox {
        let h = ASSEMBLY_WIDTH / 2.0;
        SourceBox {
            bounds: BBox3::new(Point3::new(-h, -h, -1.0), Point3::new(h, h, 1.0)),
            only_fissionable: true,
        }
    }
}

impl ModelBuilder for MaskedAssemblyModel {
    fn build(&self, params: &ParameterVector) -> Result<BuiltModel> {
        let (geometry, root, fuel_pins) = Self::geometry(params.values())?;
        let document = ModelDocument::from_geometry(&geometry, root, Self::source_box(), self.settings.clone());
        Ok(BuiltModel { document, constrained_count: fuel_pins })
    }
}
