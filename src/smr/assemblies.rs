//! 17x17 fuel assemblies built from one pattern template.
//!
//! All assemblies share 25 non-fuel positions. A variant decides what goes
//! into them: empty guide tubes, control rods of one bank, or one of the
//! burnable absorber patterns; the centre always holds either an empty
//! guide tube or the instrument tube.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{Cell, Fill, Geometry, Universe, UniverseId};
use crate::lattice::LatticeTiler;
use crate::math::Vector2;
use crate::subdivide::subdivide;
use crate::template::PatternTemplate;

use super::dimensions::{PINS_PER_SIDE, PIN_PITCH};
use super::materials::{Enrichment, MaterialSet};
use super::pins::PinUniverses;
use super::surfaces::{CoreSurfaces, RodBank};

/// Printed `(row, col)` of the guide tube positions, row 0 at the top.
pub const NONFUEL_POSITIONS: [(usize, usize); 25] = [
    (2, 5), (2, 8), (2, 11),
    (3, 3), (3, 13),
    (5, 2), (5, 5), (5, 8), (5, 11), (5, 14),
    (8, 2), (8, 5), (8, 8), (8, 11), (8, 14),
    (11, 2), (11, 5), (11, 8), (11, 11), (11, 14),
    (13, 3), (13, 13),
    (14, 5), (14, 8), (14, 11),
];

/// Index of the centre position in `NONFUEL_POSITIONS`.
pub const CENTER: usize = 12;

/// What a non-fuel position holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PinSlot {
    GuideTube,
    Absorber,
    ControlRod,
    Center,
}

impl fmt::Display for PinSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PinSlot::GuideTube => "guide tube",
            PinSlot::Absorber => "burnable absorber",
            PinSlot::ControlRod => "control rod",
            PinSlot::Center => "centre",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbsorberPattern {
    Ba12,
    Ba16,
    Ba20,
    Ba15NW,
    Ba15NE,
    Ba15SW,
    Ba15SE,
    Ba6N,
    Ba6S,
    Ba6W,
    Ba6E,
}

impl AbsorberPattern {
    pub fn label(self) -> &'static str {
        match self {
            AbsorberPattern::Ba12 => "12BA",
            AbsorberPattern::Ba16 => "16BA",
            AbsorberPattern::Ba20 => "20BA",
            AbsorberPattern::Ba15NW => "15BANW",
            AbsorberPattern::Ba15NE => "15BANE",
            AbsorberPattern::Ba15SW => "15BASW",
            AbsorberPattern::Ba15SE => "15BASE",
            AbsorberPattern::Ba6N => "6BAN",
            AbsorberPattern::Ba6S => "6BAS",
            AbsorberPattern::Ba6W => "6BAW",
            AbsorberPattern::Ba6E => "6BAE",
        }
    }

    /// Slot per position of `NONFUEL_POSITIONS`.
    pub fn mask(self) -> [PinSlot; 25] {
        use PinSlot::{Absorber as B, Center as C, GuideTube as G};
        match self {
            AbsorberPattern::Ba12 => [
                B, G, B, B, B, B, G, G, G, B, G, G, C, G, G, B, G, G, G, B, B, B, B, G, B,
            ],
            AbsorberPattern::Ba16 => [
                B, B, B, B, B, B, G, G, G, B, B, G, C, G, B, B, G, G, G, B, B, B, B, B, B,
            ],
            AbsorberPattern::Ba20 => [
                B, B, B, B, B, B, B, G, B, B, B, G, C, G, B, B, B, G, B, B, B, B, B, B, B,
            ],
            AbsorberPattern::Ba15NW => [
                G, G, G, G, G, G, B, B, B, B, G, B, C, B, B, G, B, B, B, B, G, B, B, B, B,
            ],
            AbsorberPattern::Ba15NE => [
                G, G, G, G, G, B, B, B, B, G, B, B, C, B, G, B, B, B, B, G, B, G, B, B, B,
            ],
            AbsorberPattern::Ba15SW => [
                B, B, B, G, B, G, B, B, B, B, G, B, C, B, B, G, B, B, B, B, G, G, G, G, G,
            ],
            AbsorberPattern::Ba15SE => [
                B, B, B, B, G, B, B, B, B, G, B, B, C, B, G, B, B, B, B, G, G, G, G, G, G,
            ],
            AbsorberPattern::Ba6N => [
                G, G, G, G, G, G, G, G, G, G, G, G, C, G, G, B, G, G, G, B, B, B, B, G, B,
            ],
            AbsorberPattern::Ba6S => [
                B, G, B, B, B, B, G, G, G, B, G, G, C, G, G, G, G, G, G, G, G, G, G, G, G,
            ],
            AbsorberPattern::Ba6W => [
                G, G, B, G, B, G, G, G, G, B, G, G, C, G, G, G, G, G, G, B, G, B, G, G, B,
            ],
            AbsorberPattern::Ba6E => [
                B, G, G, B, G, B, G, G, G, G, G, G, C, G, G, B, G, G, G, G, B, G, B, G, G,
            ],
        }
    }
}

/// Contents of the non-fuel positions other than the centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Insert {
    GuideTubes,
    Absorbers(AbsorberPattern),
    ControlRods(RodBank),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssemblyVariant {
    pub enrichment: Enrichment,
    pub insert: Insert,
    /// Instrument tube in the centre instead of an empty guide tube.
    pub instrumented: bool,
}

impl AssemblyVariant {
    pub const fn new(enrichment: Enrichment, insert: Insert, instrumented: bool) -> Self {
        Self { enrichment, insert, instrumented }
    }

    pub fn name(&self) -> String {
        let insert = match self.insert {
            Insert::GuideTubes => String::new(),
            Insert::Absorbers(pattern) => format!(" {}", pattern.label()),
            Insert::ControlRods(bank) => format!(" CR {}", bank.label()),
        };
        let instr = if self.instrumented { " instr" } else { "" };
        format!("Assembly ({}){}{}", self.enrichment.label(), insert, instr)
    }

    pub fn mask(&self) -> [PinSlot; 25] {
        let mut mask = match self.insert {
            Insert::GuideTubes => [PinSlot::GuideTube; 25],
            Insert::ControlRods(_) => [PinSlot::ControlRod; 25],
            Insert::Absorbers(pattern) => pattern.mask(),
        };
        mask[CENTER] = PinSlot::Center;
        mask
    }

    /// Every assembly type of the reference fuel cycle.
    pub fn catalog() -> Vec<AssemblyVariant> {
        use AbsorberPattern::*;
        use Enrichment::*;

        let mut inserts: Vec<(Enrichment, Insert)> = vec![(Percent16, Insert::GuideTubes)];
        for bank in [RodBank::A, RodBank::B, RodBank::C, RodBank::D, RodBank::SB, RodBank::SC, RodBank::SD, RodBank::SE] {
            inserts.push((Percent16, Insert::ControlRods(bank)));
        }
        inserts.push((Percent24, Insert::GuideTubes));
        for bank in [RodBank::D, RodBank::C, RodBank::B, RodBank::A] {
            inserts.push((Percent24, Insert::ControlRods(bank)));
        }
        inserts.extend([(Percent24, Insert::Absorbers(Ba12)), (Percent24, Insert::Absorbers(Ba16))]);
        inserts.push((Percent31, Insert::GuideTubes));
        inserts.push((Percent31, Insert::ControlRods(RodBank::SA)));
        for pattern in [Ba20, Ba16, Ba15NW, Ba15NE, Ba15SW, Ba15SE, Ba6N, Ba6S, Ba6W, Ba6E] {
            inserts.push((Percent31, Insert::Absorbers(pattern)));
        }

        inserts
            .into_iter()
            .flat_map(|(e, insert)| [false, true].map(|instr| AssemblyVariant::new(e, insert, instr)))
            .collect()
    }
}

/// Builds assembly universes on demand, each variant at most once.
pub struct AssemblyBuilder<'a> {
    surfaces: &'a CoreSurfaces,
    materials: &'a MaterialSet,
    pins: &'a PinUniverses,
    template: PatternTemplate,
    built: HashMap<AssemblyVariant, UniverseId>,
}

impl<'a> AssemblyBuilder<'a> {
    pub fn new(surfaces: &'a CoreSurfaces, materials: &'a MaterialSet, pins: &'a PinUniverses) -> Result<Self> {
        let template = PatternTemplate::from_row_cols([PINS_PER_SIDE, PINS_PER_SIDE], &NONFUEL_POSITIONS)?;
        Ok(Self { surfaces, materials, pins, template, built: HashMap::new() })
    }

    pub fn template(&self) -> &PatternTemplate {
        &self.template
    }

    /// Number of distinct variants built so far.
    pub fn built_count(&self) -> usize {
        self.built.len()
    }

    pub fn get(&mut self, geometry: &mut Geometry, variant: AssemblyVariant) -> Result<UniverseId> {
        if let Some(&id) = self.built.get(&variant) {
            return Ok(id);
        }
        let id = self.build(geometry, &variant)?;
        self.built.insert(variant, id);
        Ok(id)
    }

    fn catalog(&self, variant: &AssemblyVariant) -> HashMap<PinSlot, UniverseId> {
        let mut catalog = HashMap::from([
            (PinSlot::GuideTube, self.pins.guide_tube),
            (PinSlot::Absorber, self.pins.burnable_absorber),
            (
                PinSlot::Center,
                if variant.instrumented { self.pins.instrument_tube } else { self.pins.guide_tube_instr },
            ),
        ]);
        if let Insert::ControlRods(bank) = variant.insert {
            catalog.insert(PinSlot::ControlRod, self.pins.control_rod(bank));
        }
        catalog
    }

    fn build(&self, geometry: &mut Geometry, variant: &AssemblyVariant) -> Result<UniverseId> {
        let name = variant.name();
        let half = PINS_PER_SIDE as f64 * PIN_PITCH / 2.0;

        let mut tiler = LatticeTiler::uniform(
            name.clone(),
            Vector2::new(PIN_PITCH, PIN_PITCH),
            Vector2::new(-half, -half),
            [PINS_PER_SIDE, PINS_PER_SIDE],
            self.pins.fuel(variant.enrichment),
        );
        tiler.override_all(self.template.substitute(&variant.mask(), &self.catalog(variant))?)?;
        let tiled = tiler.build(geometry)?;

        let univ_name = format!("{name} lattice");
        let inner = tiled.bounding_cell.region.clone();
        let outer = &self.surfaces.lattice_box_outer;
        let sleeve = outer.clone() & !&inner;

        let mut universe = Universe::new(univ_name.clone());
        universe.add_cell(Cell::new(univ_name.clone(), inner, tiled.lattice));
        universe.add_cell(Cell::new(format!("{univ_name} outer water"), !outer, self.materials.water));

        // Sleeve alternates water and grid strap material, bottom grid in Inconel.
        let strap = |i: usize| match i {
            1 => Fill::Material(self.materials.inconel),
            i if i % 2 == 1 => Fill::Material(self.materials.zircaloy),
            _ => Fill::Material(self.materials.water),
        };
        let axial = subdivide(geometry, &self.surfaces.grid_sleeve_planes())?;
        for (i, region) in axial.into_iter().enumerate() {
            universe.add_cell(Cell::new(format!("{univ_name} axial ({i})"), sleeve.clone() & region, strap(i)));
        }

        debug!("assembly `{}`", name);
        Ok(geometry.add_universe(universe))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_every_variant_once() {
        let all = AssemblyVariant::catalog();
        assert_eq!(all.len(), 56);
        let distinct: HashSet<_> = all.iter().collect();
        assert_eq!(distinct.len(), all.len());
        let names: HashSet<_> = all.iter().map(AssemblyVariant::name).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn names() {
        let cr = AssemblyVariant::new(Enrichment::Percent24, Insert::ControlRods(RodBank::D), false);
        assert_eq!(cr.name(), "Assembly (2.4%) CR D");
        let instr = AssemblyVariant::new(Enrichment::Percent31, Insert::GuideTubes, true);
        assert_eq!(instr.name(), "Assembly (3.1%) instr");
        let ba = AssemblyVariant::new(Enrichment::Percent31, Insert::Absorbers(AbsorberPattern::Ba16), false);
        assert_eq!(ba.name(), "Assembly (3.1%) 16BA");
    }

    #[test]
    fn absorber_counts_match_labels() {
        let count = |p: AbsorberPattern| p.mask().iter().filter(|&&s| s == PinSlot::Absorber).count();
        assert_eq!(count(AbsorberPattern::Ba12), 12);
        assert_eq!(count(AbsorberPattern::Ba16), 16);
        assert_eq!(count(AbsorberPattern::Ba20), 20);
        for p in [AbsorberPattern::Ba15NW, AbsorberPattern::Ba15NE, AbsorberPattern::Ba15SW, AbsorberPattern::Ba15SE] {
            assert_eq!(count(p), 15, "{}", p.label());
        }
        for p in [AbsorberPattern::Ba6N, AbsorberPattern::Ba6S, AbsorberPattern::Ba6W, AbsorberPattern::Ba6E] {
            assert_eq!(count(p), 6, "{}", p.label());
        }
    }

    #[test]
    fn centre_is_always_centre() {
        for variant in AssemblyVariant::catalog() {
            let mask = variant.mask();
            assert_eq!(mask[CENTER], PinSlot::Center);
            assert_eq!(mask.iter().filter(|&&s| s == PinSlot::Center).count(), 1);
        }
        assert_eq!(NONFUEL_POSITIONS[CENTER], (8, 8));
    }
}
