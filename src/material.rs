//! Opaque material descriptors.
//!
//! The geometry engine never inspects a composition; it only registers a
//! material once and shares its handle between cells.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractionBasis {
    Atom,
    Weight,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Constituent {
    /// Natural element, optionally enriched (weight percent U-235 for uranium).
    Element {
        symbol: String,
        fraction: f64,
        basis: FractionBasis,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        enrichment: Option<f64>,
    },
    Nuclide {
        name: String,
        fraction: f64,
        basis: FractionBasis,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub density_g_cm3: f64,
    pub constituents: Vec<Constituent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_k: Option<f64>,
    /// Thermal scattering tables, e.g. `c_H_in_H2O`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thermal_scattering: Vec<String>,
}

impl Material {
    pub fn new(name: impl Into<String>, density_g_cm3: f64) -> Self {
        Self {
            name: name.into(),
            density_g_cm3,
            constituents: Vec::new(),
            temperature_k: None,
            thermal_scattering: Vec::new(),
        }
    }

    pub fn element(mut self, symbol: &str, fraction: f64, basis: FractionBasis) -> Self {
        self.constituents.push(Constituent::Element {
            symbol: symbol.to_string(),
            fraction,
            basis,
            enrichment: None,
        });
        self
    }

    pub fn enriched_element(mut self, symbol: &str, fraction: f64, enrichment: f64) -> Self {
        self.constituents.push(Constituent::Element {
            symbol: symbol.to_string(),
            fraction,
            basis: FractionBasis::Atom,
            enrichment: Some(enrichment),
        });
        self
    }

    pub fn nuclide(mut self, name: &str, fraction: f64, basis: FractionBasis) -> Self {
        self.constituents.push(Constituent::Nuclide {
            name: name.to_string(),
            fraction,
            basis,
        });
        self
    }

    pub fn at_temperature(mut self, kelvin: f64) -> Self {
        self.temperature_k = Some(kelvin);
        self
    }

    pub fn with_thermal_scattering(mut self, table: &str) -> Self {
        self.thermal_scattering.push(table.to_string());
        self
    }
}
