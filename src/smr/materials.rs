//! Material catalog of the SMR core.

use serde::{Deserialize, Serialize};

use crate::geometry::Geometry;
use crate::material::{FractionBasis, Material, MaterialId};

use FractionBasis::{Atom, Weight};

/// Fuel enrichments loaded in the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Enrichment {
    Percent16,
    Percent24,
    Percent31,
}

impl Enrichment {
    pub const ALL: [Enrichment; 3] = [Enrichment::Percent16, Enrichment::Percent24, Enrichment::Percent31];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Enrichment::Percent16 => "1.6%",
            Enrichment::Percent24 => "2.4%",
            Enrichment::Percent31 => "3.1%",
        }
    }

    /// Weight percent U-235 and pellet density in g/cm3.
    fn uo2(self) -> (f64, f64) {
        match self {
            Enrichment::Percent16 => (1.61006, 10.31341),
            Enrichment::Percent24 => (2.39993, 10.29748),
            Enrichment::Percent31 => (3.10221, 10.30166),
        }
    }
}

/// Soluble boron at the beginning of the equilibrium cycle.
pub const BORON_PPM: f64 = 1240.0;
/// Unborated water at the core average temperature and system pressure.
pub const WATER_DENSITY: f64 = 0.740582;

const ATOMIC_WEIGHT_B: f64 = 10.811;
const ATOMIC_WEIGHT_H: f64 = 1.00794;
const ATOMIC_WEIGHT_O: f64 = 15.9994;

/// Atom fraction seeded for every trace nuclide of depleted fuel.
pub const TRACE_FRACTION: f64 = 1.0e-11;

/// Actinides and fission products present in trace amounts in depleted
/// fuel so a depletion solver can track them from the first step.
pub const DEPLETION_NUCLIDES: &[&str] = &[
    "U239", "U240", "Np234", "Np235", "Np236", "Np237", "Np238", "Np239", "Pu236", "Pu237",
    "Pu238", "Pu239", "Pu240", "Pu241", "Pu242", "B11", "N14", "N15", "Fe57", "Fe58", "Co59",
    "Ni60", "Ni61", "Ni62", "Cu63", "Ni64", "Zn64", "Cu65", "Zn65", "Zn66", "Zn67", "Zn68",
    "Ga69", "Zn70", "Ge70", "Ga71", "Ge72", "Ge73", "Ge74", "As74", "Se74", "As75", "Ge76",
    "Se76", "Se77", "Se78", "Se79", "Br79", "Se80", "Kr80", "Br81", "Se82", "Kr82", "Kr83",
    "Kr84", "Sr84", "Kr85", "Rb85", "Kr86", "Rb86", "Sr86", "Rb87", "Sr87", "Sr88", "Sr89",
    "Y89", "Sr90", "Y90", "Zr90", "Y91", "Zr91", "Zr92", "Zr93", "Nb93", "Zr94", "Nb94",
    "Mo94", "Zr95", "Nb95", "Mo95", "Zr96", "Mo96", "Mo97", "Mo98", "Ru98", "Mo99", "Tc99",
    "Ru99", "Mo100", "Ru100", "Ru101", "Ru102", "Pd102", "Ru103", "Rh103", "Ru104", "Pd104",
    "Ru105", "Rh105", "Pd105", "Ru106", "Pd106", "Pd107", "Ag107", "Pd108", "Cd108", "Ag109",
    "Pd110", "Cd110", "Ag111", "Cd111", "Cd112", "Sn112", "Cd113", "In113", "Sn113", "Cd114",
    "Sn114", "In115", "Sn115", "Cd116", "Sn116", "Sn117", "Sn118", "Sn119", "Sn120", "Te120",
    "Sb121", "Sn122", "Te122", "Sn123", "Sb123", "Te123", "Sn124", "Sb124", "Te124", "Sn125",
    "Sb125", "Te125", "Sn126", "Sb126", "Te126", "Xe126", "I127", "Te128", "Xe128", "I129",
    "Xe129", "Te130", "I130", "Xe130", "I131", "Xe131", "Te132", "Xe132", "Ba132", "Xe133",
    "Cs133", "Ba133", "Xe134", "Cs134", "Ba134", "I135", "Xe135", "Cs135", "Ba135", "Xe136",
    "Cs136", "Ba136", "Cs137", "Ba137", "Ba138", "La138", "Ce138", "La139", "Ce139", "Ba140",
    "La140", "Ce140", "Ce141", "Pr141", "Ce142", "Pr142", "Nd142", "Ce143", "Pr143", "Nd143",
    "Ce144", "Nd144", "Nd145", "Nd146", "Nd147", "Pm147", "Sm147", "Nd148", "Pm148", "Sm148",
    "Pm149", "Sm149", "Nd150", "Sm150", "Pm151", "Sm151", "Eu151", "Sm152", "Eu152", "Gd152",
    "Sm153", "Eu153", "Gd153", "Sm154", "Eu154", "Gd154", "Eu155", "Gd155", "Eu156", "Gd156",
    "Eu157", "Gd157", "Gd158", "Dy158", "Tb159", "Gd160", "Tb160", "Dy160", "Dy161", "Dy162",
    "Dy163", "Dy164", "Er164", "Ho165", "Er166", "Er167", "Er168", "Tm168", "Tm169", "Er170",
    "Tm170",
];

#[derive(Clone, Copy, Debug)]
pub struct MaterialSet {
    pub he: MaterialId,
    pub air: MaterialId,
    pub inconel: MaterialId,
    pub ss302: MaterialId,
    pub ss304: MaterialId,
    pub carbon_steel: MaterialId,
    pub zircaloy: MaterialId,
    pub m5: MaterialId,
    pub ag_in_cd: MaterialId,
    pub water: MaterialId,
    pub borosilicate: MaterialId,
    /// Indexed by `Enrichment::index`.
    pub uo2: [MaterialId; 3],
}

impl MaterialSet {
    pub fn new(geometry: &mut Geometry, depleted: bool) -> Self {
        let uo2 = Enrichment::ALL.map(|e| geometry.add_material(uo2(e, depleted)));
        Self {
            he: geometry.add_material(Material::new("Helium", 0.0015981).element("He", 1.0, Atom)),
            air: geometry.add_material(
                Material::new("Air", 0.00616)
                    .element("O", 0.2095, Atom)
                    .element("N", 0.7809, Atom)
                    .element("Ar", 0.00933, Atom)
                    .element("C", 0.00027, Atom),
            ),
            inconel: geometry.add_material(
                Material::new("Inconel", 8.2)
                    .element("Si", 0.0035, Weight)
                    .element("Cr", 0.1896, Weight)
                    .element("Mn", 0.0087, Weight)
                    .element("Fe", 0.2863, Weight)
                    .element("Ni", 0.5119, Weight),
            ),
            ss302: geometry.add_material(
                Material::new("SS302", 7.86)
                    .element("Si", 0.01, Weight)
                    .element("Cr", 0.18, Weight)
                    .element("Mn", 0.02, Weight)
                    .element("Fe", 0.70, Weight)
                    .element("Ni", 0.09, Weight),
            ),
            ss304: geometry.add_material(
                Material::new("SS304", 8.03)
                    .element("Si", 0.0060, Weight)
                    .element("Cr", 0.1900, Weight)
                    .element("Mn", 0.0200, Weight)
                    .element("Fe", 0.6840, Weight)
                    .element("Ni", 0.1000, Weight),
            ),
            carbon_steel: geometry.add_material(carbon_steel()),
            zircaloy: geometry.add_material(
                Material::new("Zircaloy-4", 6.55)
                    .element("O", 0.00125, Weight)
                    .element("Cr", 0.0010, Weight)
                    .element("Fe", 0.0021, Weight)
                    .element("Zr", 0.98115, Weight)
                    .element("Sn", 0.0145, Weight),
            ),
            m5: geometry.add_material(
                Material::new("M5", 6.494)
                    .element("Zr", 1.0 - 0.01 - 0.00135, Atom)
                    .element("Nb", 0.01, Atom)
                    .element("O", 0.00135, Atom),
            ),
            ag_in_cd: geometry.add_material(
                Material::new("Ag-In-Cd", 10.16)
                    .element("Ag", 0.80, Weight)
                    .element("In", 0.15, Weight)
                    .element("Cd", 0.05, Weight),
            ),
            water: geometry.add_material(borated_water(BORON_PPM)),
            borosilicate: geometry.add_material(
                Material::new("Borosilicate Glass", 2.26)
                    .element("O", 0.5481, Weight)
                    .element("Si", 0.3787, Weight)
                    .element("Al", 0.0344, Weight)
                    .nuclide("B10", 0.0071, Weight)
                    .nuclide("B11", 0.0317, Weight)
                    .at_temperature(300.0),
            ),
            uo2,
        }
    }

    pub fn fuel(&self, enrichment: Enrichment) -> MaterialId {
        self.uo2[enrichment.index()]
    }
}

fn carbon_steel() -> Material {
    [
        ("C", 0.00270),
        ("Mn", 0.00750),
        ("P", 0.00025),
        ("S", 0.00025),
        ("Si", 0.00400),
        ("Ni", 0.00750),
        ("Cr", 0.00350),
        ("Mo", 0.00625),
        ("V", 0.00050),
        ("Nb", 0.00010),
        ("Cu", 0.00200),
        ("Ca", 0.00015),
        ("B", 0.00003),
        ("Ti", 0.00015),
        ("Al", 0.00025),
        ("Fe", 0.96487),
    ]
    .into_iter()
    .fold(Material::new("Carbon Steel", 7.8), |m, (symbol, w)| m.element(symbol, w, Weight))
}

fn uo2(enrichment: Enrichment, depleted: bool) -> Material {
    let (wt_percent, density) = enrichment.uo2();
    let mut material = Material::new(format!("{} Enr. UO2 Fuel", enrichment.label()), density)
        .element("O", 2.0, Atom)
        .enriched_element("U", 1.0, wt_percent)
        .at_temperature(300.0);
    if depleted {
        for nuclide in DEPLETION_NUCLIDES {
            material = material.nuclide(nuclide, TRACE_FRACTION, Atom);
        }
    }
    material
}

/// Atom fractions `(B, H, O)` of water carrying `ppm` natural boron by
/// weight.
pub fn borated_water_fractions(ppm: f64) -> (f64, f64, f64) {
    let w_boron = ppm * 1.0e-6;
    let w_water = 1.0 - w_boron;
    let m_water = 2.0 * ATOMIC_WEIGHT_H + ATOMIC_WEIGHT_O;
    let m_mix = 1.0 / (w_boron / ATOMIC_WEIGHT_B + w_water / m_water);

    let a_boron = w_boron * m_mix / ATOMIC_WEIGHT_B;
    let a_water = w_water * m_mix / m_water;
    (a_boron, 2.0 * a_water, a_water)
}

fn borated_water(ppm: f64) -> Material {
    let (b, h, o) = borated_water_fractions(ppm);
    Material::new("Borated Water", WATER_DENSITY / (1.0 - ppm * 1.0e-6))
        .element("B", b, Atom)
        .element("H", h, Atom)
        .element("O", o, Atom)
        .with_thermal_scattering("c_H_in_H2O")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn borated_water_has_two_hydrogen_per_oxygen() {
        let (b, h, o) = borated_water_fractions(BORON_PPM);
        assert_relative_eq!(h, 2.0 * o);
        assert_relative_eq!(b + o, 1.0, epsilon = 1e-12);
        assert!(b > 0.0 && b < 1e-3);
    }

    #[test]
    fn depleted_fuel_carries_trace_nuclides() {
        let mut geom = Geometry::new();
        let fresh = MaterialSet::new(&mut geom, false);
        let depleted = MaterialSet::new(&mut geom, true);
        let f = geom.material(fresh.fuel(Enrichment::Percent24)).constituents.len();
        let d = geom.material(depleted.fuel(Enrichment::Percent24)).constituents.len();
        assert_eq!(d - f, DEPLETION_NUCLIDES.len());
    }
}
