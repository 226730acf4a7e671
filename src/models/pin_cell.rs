//! Reflected PWR pin cell with the fuel enrichment as the only parameter.

use crate::config::RunSettings;
use crate::error::{GeometryError, Result};
use crate::evaluate::{BuiltModel, ModelBuilder, Objective};
use crate::export::{ModelDocument, SourceBox};
use crate::geometry::{Cell, Fill, Geometry, Universe, UniverseId};
use crate::material::{FractionBasis, Material};
use crate::math::{Point3, Vector2};
use crate::pin::make_pin;
use crate::search::{ParamBound, ParameterSpace, ParameterVector};
use crate::surface::{BoundaryCondition, Surface};
use crate::types::BBox3;

pub const PITCH: f64 = 1.26;
pub const FUEL_OR: f64 = 0.39218;
pub const CLAD_OR: f64 = 0.45720;
pub const TARGET_KEFF: f64 = 1.10;
/// Upper bound of the enrichment search, in percent.
pub const MAX_ENRICHMENT: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct PinCellModel {
    pub settings: RunSettings,
}

impl PinCellModel {
    pub fn new(settings: RunSettings) -> Self {
        Self { settings }
    }

    pub fn parameter_space() -> Result<ParameterSpace> {
        ParameterSpace::uniform(1, ParamBound::Float { lo: 0.0, hi: MAX_ENRICHMENT })
    }

    pub fn objective() -> Objective {
        Objective::TargetKeff { target: TARGET_KEFF }
    }

    /// Register the pin cell and return the geometry with its root.
    pub fn geometry(enrichment: f64) -> Result<(Geometry, UniverseId)> {
        if !(0.0..=100.0).contains(&enrichment) {
            return Err(GeometryError::InvalidParameters(format!(
                "enrichment {enrichment} is not a percentage"
            )));
        }

        let mut geometry = Geometry::new();
        let fuel = geometry.add_material(
            Material::new("UO2", 10.29769)
                .enriched_element("U", 1.0, enrichment)
                .element("O", 2.0, FractionBasis::Atom),
        );
        let clad = geometry.add_material(zircaloy_cladding("Zircaloy"));
        let water = geometry.add_material(hot_borated_water());

        let fuel_or = geometry.add_surface(Surface::z_cylinder(0.0, 0.0, FUEL_OR).named("Fuel OR"));
        let clad_or = geometry.add_surface(Surface::z_cylinder(0.0, 0.0, CLAD_OR).named("Clad OR"));
        let pin = make_pin(
            &mut geometry,
            "Fuel pin",
            &[fuel_or, clad_or],
            &[Fill::Material(fuel), Fill::Material(clad), Fill::Material(water)],
            None,
        )?;

        let cell = geometry.rectangular_prism(PITCH, PITCH, Vector2::zeros(), BoundaryCondition::Reflective);
        let root = geometry.add_universe(Universe::with_cells(
            "root universe",
            vec![Cell::new("pin cell", cell, pin)],
        ));
        Ok((geometry, root))
    }

    pub fn source_box() -> SourceBox {
        let h = PITCH / 2.0;
        SourceBox {
            bounds: BBox3::new(Point3::new(-h, -h, -1.0), Point3::new(h, h, 1.0)),
            only_fissionable: true,
        }
    }
}

/// Borated water by atom density, shared with the masked assembly.
pub(crate) fn hot_borated_water() -> Material {
    Material::new("Hot borated water", 0.740582)
        .nuclide("H1", 4.9457e-2, FractionBasis::Atom)
        .nuclide("O16", 2.4672e-2, FractionBasis::Atom)
        .nuclide("B10", 8.0042e-6, FractionBasis::Atom)
        .nuclide("B11", 3.2218e-5, FractionBasis::Atom)
        .with_thermal_scattering("c_H_in_H2O")
}

/// Zircaloy cladding by atom density, shared with the masked assembly.
pub(crate) fn zircaloy_cladding(name: &str) -> Material {
    Material::new(name, 6.55)
        .nuclide("Zr90", 2.1827e-2, FractionBasis::Atom)
        .nuclide("Zr91", 4.7600e-3, FractionBasis::Atom)
        .nuclide("Zr92", 7.2758e-3, FractionBasis::Atom)
        .nuclide("Zr94", 7.3734e-3, FractionBasis::Atom)
        .nuclide("Zr96", 1.1879e-3, FractionBasis::Atom)
}

impl ModelBuilder for PinCellModel {
    fn build(&self, params: &ParameterVector) -> Result<BuiltModel> {
        let [enrichment] = params.values() else {
            return Err(GeometryError::InvalidParameters(format!(
                "pin cell takes one enrichment, got {} values",
                params.len()
            )));
        };
        let (geometry, root) = Self::geometry(*enrichment)?;
        let document = ModelDocument::from_geometry(&geometry, root, Self::source_box(), self.settings.clone());
        Ok(BuiltModel { document, constrained_count: 0 })
    }
}
