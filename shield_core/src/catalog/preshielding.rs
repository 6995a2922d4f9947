//! Pre-shielding equivalents (NCRP 147 Table 4.6)
//!
//! Attenuation already provided in the primary beam by the patient table,
//! grid, cassette and image receptor, expressed as an equivalent thickness of
//! the barrier material.

use serde::{Deserialize, Serialize};

use super::attenuation::Material;

/// Pre-shielding configuration of the image receptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreshieldingCategory {
    /// Receptor in table or wall holder: grid, cassette and receptor
    TableHolder,
    /// Cross-table lateral: grid and cassette only
    CrossTableLateral,
}

impl PreshieldingCategory {
    pub const ALL: [PreshieldingCategory; 2] = [
        PreshieldingCategory::TableHolder,
        PreshieldingCategory::CrossTableLateral,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            PreshieldingCategory::TableHolder => "Table/holder (grid, cassette, receptor)",
            PreshieldingCategory::CrossTableLateral => "Cross-table lateral (grid, cassette)",
        }
    }
}

impl std::fmt::Display for PreshieldingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Equivalent pre-shielding thickness for one category and material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreshieldingThickness {
    pub category: PreshieldingCategory,
    pub material: Material,
    pub thickness_mm: f64,
}

pub(crate) fn ncrp147_preshielding() -> Vec<PreshieldingThickness> {
    let entry = |category, material, thickness_mm| PreshieldingThickness {
        category,
        material,
        thickness_mm,
    };
    vec![
        entry(PreshieldingCategory::TableHolder, Material::Lead, 0.85),
        entry(PreshieldingCategory::TableHolder, Material::Concrete, 72.0),
        entry(PreshieldingCategory::CrossTableLateral, Material::Lead, 0.3),
        entry(PreshieldingCategory::CrossTableLateral, Material::Concrete, 30.0),
    ]
}
