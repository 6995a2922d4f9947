//! # Reference Data Catalog
//!
//! NCRP Report 147 reference data: modality kerma coefficients, Archer
//! attenuation fits, CT scatter constants, tabulated thickness columns and
//! pre-shielding equivalents.
//!
//! The built-in catalog is compiled in and built once on first use. It is
//! never mutated afterwards, so `&'static Catalog` can be shared freely
//! between threads. A catalog with the same keys can also be read from a TOML
//! resource with [`load_catalog`] or [`Catalog::from_toml_str`].
//!
//! Every lookup returns [`ShieldError::MissingReferenceData`] when the key is
//! absent. That is an expected outcome (several modalities have no primary
//! beam case) and callers branch on it.
//!
//! ## Example
//!
//! ```rust
//! use shield_core::catalog::{self, BarrierClass, FitSource, Material, Modality};
//!
//! let catalog = catalog::builtin();
//! let fit = catalog
//!     .fit(FitSource::Modality(Modality::RadRoomFloor), Material::Lead, BarrierClass::Primary)
//!     .unwrap();
//! assert_eq!(fit.alpha, 2.651);
//!
//! assert!(catalog.primary_kerma(Modality::Mammography).is_err());
//! ```

pub mod attenuation;
pub mod ct;
pub mod modalities;
pub mod preshielding;
pub mod tables;

pub use attenuation::{AttenuationFit, BarrierClass, FitSource, Material};
pub use ct::{CtConstants, CtVoltage};
pub use modalities::{ImagingCategory, Modality, ModalityProfile, SecondaryKermaComponent};
pub use preshielding::{PreshieldingCategory, PreshieldingThickness};
pub use tables::{TableId, TableVariant, ThicknessTable, WallPosition, TABLE_LEN};

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{ShieldError, ShieldResult};

/// Version tag of the built-in catalog
pub const CATALOG_VERSION: &str = "ncrp147-r3";

static BUILTIN: Lazy<Catalog> = Lazy::new(Catalog::ncrp147);

/// The compiled-in NCRP 147 catalog
pub fn builtin() -> &'static Catalog {
    &BUILTIN
}

/// Complete reference data set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: String,
    pub ct: CtConstants,
    pub modalities: Vec<ModalityProfile>,
    pub fits: Vec<AttenuationFit>,
    pub tables: Vec<ThicknessTable>,
    pub preshielding: Vec<PreshieldingThickness>,
}

impl Catalog {
    /// Build the NCRP 147 catalog from the compiled-in tables
    pub fn ncrp147() -> Catalog {
        Catalog {
            version: CATALOG_VERSION.to_string(),
            ct: CtConstants::default(),
            modalities: modalities::ncrp147_profiles(),
            fits: attenuation::ncrp147_fits(),
            tables: tables::ncrp147_tables(),
            preshielding: preshielding::ncrp147_preshielding(),
        }
    }

    /// Parse and validate a catalog from TOML text
    pub fn from_toml_str(text: &str) -> ShieldResult<Catalog> {
        let catalog: Catalog = toml::from_str(text).map_err(|e| ShieldError::SerializationError {
            reason: format!("catalog TOML: {}", e),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Kerma profile of a modality
    pub fn profile(&self, modality: Modality) -> ShieldResult<&ModalityProfile> {
        self.modalities
            .iter()
            .find(|p| p.modality == modality)
            .ok_or_else(|| ShieldError::missing_reference_data("modality profile", modality.key()))
    }

    /// Primary kerma per patient at 1 m; missing for secondary-only modalities
    pub fn primary_kerma(&self, modality: Modality) -> ShieldResult<f64> {
        self.profile(modality)?
            .primary_kerma
            .ok_or_else(|| ShieldError::missing_reference_data("primary kerma", modality.key()))
    }

    /// Attenuation fit for a source, material and barrier class
    pub fn fit(&self, source: FitSource, material: Material, barrier: BarrierClass) -> ShieldResult<&AttenuationFit> {
        self.fits
            .iter()
            .find(|f| f.matches(source, material, barrier))
            .ok_or_else(|| {
                ShieldError::missing_reference_data(
                    "attenuation fit",
                    format!("{}/{}/{}", source, material.display_name().to_lowercase(), barrier.display_name().to_lowercase()),
                )
            })
    }

    /// Thickness column for a table family and wall position
    pub fn table(&self, id: TableId, wall: WallPosition) -> ShieldResult<&ThicknessTable> {
        self.tables
            .iter()
            .find(|t| t.id == id && t.wall == wall)
            .ok_or_else(|| ShieldError::missing_reference_data("thickness table", format!("{}:{}", id, wall.key())))
    }

    /// Equivalent pre-shielding thickness (mm of the barrier material)
    pub fn preshielding_thickness(&self, category: PreshieldingCategory, material: Material) -> ShieldResult<f64> {
        self.preshielding
            .iter()
            .find(|p| p.category == category && p.material == material)
            .map(|p| p.thickness_mm)
            .ok_or_else(|| {
                ShieldError::missing_reference_data(
                    "pre-shielding",
                    format!("{:?}/{}", category, material.display_name().to_lowercase()),
                )
            })
    }

    /// Check catalog invariants.
    ///
    /// - every fit has finite coefficients with α ≠ 0 and γ ≠ 0
    /// - every table has `TABLE_LEN` finite, non-decreasing entries
    /// - no key appears twice
    pub fn validate(&self) -> ShieldResult<()> {
        for (i, f) in self.fits.iter().enumerate() {
            let id = f.identifier();
            if ![f.alpha, f.beta, f.gamma].iter().all(|v| v.is_finite()) {
                return Err(ShieldError::catalog_invalid(id, "fit coefficients must be finite"));
            }
            if f.alpha == 0.0 || f.gamma == 0.0 {
                return Err(ShieldError::catalog_invalid(id, "alpha and gamma must be non-zero"));
            }
            if self.fits[..i].iter().any(|g| g.matches(f.source, f.material, f.barrier)) {
                return Err(ShieldError::catalog_invalid(id, "duplicate fit key"));
            }
        }

        for (i, t) in self.tables.iter().enumerate() {
            let id = t.identifier();
            if t.thickness_mm.len() != TABLE_LEN {
                return Err(ShieldError::catalog_invalid(
                    id,
                    format!("expected {} entries, found {}", TABLE_LEN, t.thickness_mm.len()),
                ));
            }
            if t.thickness_mm.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(ShieldError::catalog_invalid(id, "thickness entries must be finite and non-negative"));
            }
            if !t.is_non_decreasing() {
                return Err(ShieldError::catalog_invalid(id, "thickness must not decrease with attenuation length"));
            }
            if self.tables[..i].iter().any(|u| u.id == t.id && u.wall == t.wall) {
                return Err(ShieldError::catalog_invalid(id, "duplicate table key"));
            }
        }

        for (i, p) in self.modalities.iter().enumerate() {
            if self.modalities[..i].iter().any(|q| q.modality == p.modality) {
                return Err(ShieldError::catalog_invalid(p.modality.key(), "duplicate modality profile"));
            }
            if p.normalized_workload <= 0.0 {
                return Err(ShieldError::catalog_invalid(p.modality.key(), "normalized workload must be positive"));
            }
        }

        Ok(())
    }
}

/// Read a catalog from a TOML file
pub fn load_catalog(path: impl AsRef<Path>) -> ShieldResult<Catalog> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| ShieldError::file_error("read", path.display().to_string(), e.to_string()))?;
    let catalog = Catalog::from_toml_str(&text)?;
    tracing::info!(path = %path.display(), version = %catalog.version, "loaded catalog");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        builtin().validate().unwrap();
        assert_eq!(builtin().version, CATALOG_VERSION);
    }

    #[test]
    fn test_every_modality_has_both_fits_for_both_materials() {
        let catalog = builtin();
        for modality in Modality::ALL {
            for material in Material::ALL {
                for barrier in BarrierClass::ALL {
                    assert!(catalog.fit(FitSource::Modality(modality), material, barrier).is_ok());
                }
            }
        }
        for voltage in CtVoltage::ALL {
            for material in Material::ALL {
                assert!(catalog
                    .fit(FitSource::CtVoltage(voltage), material, BarrierClass::Secondary)
                    .is_ok());
            }
        }
    }

    #[test]
    fn test_missing_primary_kerma_is_reported() {
        let err = builtin().primary_kerma(Modality::FluoroscopyTube).unwrap_err();
        assert!(err.is_missing_reference_data());
        assert!(err.to_string().contains("fluoroscopy-tube"));
        assert_eq!(builtin().primary_kerma(Modality::RadRoomChestBucky).unwrap(), 2.3);
    }

    #[test]
    fn test_ct_primary_fit_is_absent() {
        let err = builtin()
            .fit(FitSource::CtVoltage(CtVoltage::Kvp120), Material::Lead, BarrierClass::Primary)
            .unwrap_err();
        assert_eq!(err.error_code(), "MISSING_REFERENCE_DATA");
    }

    #[test]
    fn test_table_lookup() {
        let id = TableId::select(Material::Lead, BarrierClass::Primary, false);
        let table = builtin().table(id, WallPosition::Floor).unwrap();
        assert_eq!(table.kerma_source, Modality::RadRoomFloor);
        assert!(builtin().table(id, WallPosition::CrossTableLateral).is_err());
    }

    #[test]
    fn test_preshielding_lookup() {
        let t = builtin()
            .preshielding_thickness(PreshieldingCategory::TableHolder, Material::Concrete)
            .unwrap();
        assert_eq!(t, 72.0);
    }

    #[test]
    fn test_validate_rejects_zero_gamma() {
        let mut catalog = Catalog::ncrp147();
        catalog.fits[0].gamma = 0.0;
        let err = catalog.validate().unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_INVALID");
    }

    #[test]
    fn test_validate_rejects_decreasing_table() {
        let mut catalog = Catalog::ncrp147();
        catalog.tables[1].thickness_mm[5] = 0.1;
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_from_toml_str() {
        let text = r#"
version = "site-override"
tables = []
preshielding = []

[ct]
dlp_head = 1200.0
dlp_body = 550.0
scatter_coefficient_head = 9.0e-5
scatter_coefficient_body = 3.0e-4
body_correction = 1.2

[[modalities]]
modality = "rad-room-floor"
normalized_workload = 1.9
primary_kerma = 5.2
secondary_kerma_leakage_side = 2.3e-2
secondary_kerma_forward_back = 3.3e-2
secondary_kerma_combined = 3.3e-2

[[modalities]]
modality = "mammography"
normalized_workload = 6.7
secondary_kerma_leakage_side = 1.1e-2
secondary_kerma_forward_back = 4.9e-2
secondary_kerma_combined = 4.9e-2

[[fits]]
source = { modality = "rad-room-floor" }
material = "lead"
barrier = "primary"
alpha = 2.651
beta = 16.56
gamma = 0.4585

[[fits]]
source = { ct-voltage = "120kvp" }
material = "concrete"
barrier = "secondary"
alpha = 3.566e-2
beta = 7.109e-2
gamma = 0.6073
"#;

        let catalog = Catalog::from_toml_str(text).unwrap();
        assert_eq!(catalog.version, "site-override");
        assert_eq!(catalog.primary_kerma(Modality::RadRoomFloor).unwrap(), 5.2);
        assert!(catalog.primary_kerma(Modality::Mammography).is_err());
        let ct = catalog
            .fit(FitSource::CtVoltage(CtVoltage::Kvp120), Material::Concrete, BarrierClass::Secondary)
            .unwrap();
        assert_eq!(ct.beta, 7.109e-2);
        assert!(catalog.profile(Modality::ChestRoom).is_err());
    }

    #[test]
    fn test_from_toml_str_reports_parse_errors() {
        let err = Catalog::from_toml_str("version = 3").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
