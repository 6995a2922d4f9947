//! Attenuation fit parameters (NCRP 147 Appendices B and C)
//!
//! Each fit gives the three Archer parameters (α, β, γ) of the broad-beam
//! transmission curve of one barrier material for one source spectrum. The
//! spectrum is either a radiographic modality (primary: Table B.1, secondary:
//! Table C.1) or a CT tube voltage.

use serde::{Deserialize, Serialize};

use super::ct::CtVoltage;
use super::modalities::Modality;

/// Barrier material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Material {
    Lead,
    Concrete,
}

impl Material {
    pub const ALL: [Material; 2] = [Material::Lead, Material::Concrete];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Material::Lead => "Lead",
            Material::Concrete => "Concrete",
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Barrier class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BarrierClass {
    /// Intercepts the useful beam
    Primary,
    /// Intercepts leakage and scatter only
    Secondary,
}

impl BarrierClass {
    pub const ALL: [BarrierClass; 2] = [BarrierClass::Primary, BarrierClass::Secondary];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BarrierClass::Primary => "Primary",
            BarrierClass::Secondary => "Secondary",
        }
    }
}

impl std::fmt::Display for BarrierClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Spectrum a fit was derived for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitSource {
    Modality(Modality),
    CtVoltage(CtVoltage),
}

impl std::fmt::Display for FitSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitSource::Modality(m) => write!(f, "{}", m.key()),
            FitSource::CtVoltage(v) => write!(f, "ct-{}", v.key()),
        }
    }
}

/// Archer fit coefficients for one (source, material, barrier class)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttenuationFit {
    pub source: FitSource,
    pub material: Material,
    pub barrier: BarrierClass,
    /// α (mm⁻¹)
    pub alpha: f64,
    /// β (mm⁻¹)
    pub beta: f64,
    /// γ (dimensionless exponent)
    pub gamma: f64,
}

impl AttenuationFit {
    /// Identifier used in derivation trails, e.g. `rad-room-floor/lead/primary`
    pub fn identifier(&self) -> String {
        format!(
            "{}/{}/{}",
            self.source,
            self.material.display_name().to_lowercase(),
            self.barrier.display_name().to_lowercase()
        )
    }

    pub(crate) fn matches(&self, source: FitSource, material: Material, barrier: BarrierClass) -> bool {
        self.source == source && self.material == material && self.barrier == barrier
    }
}

fn fit(source: FitSource, material: Material, barrier: BarrierClass, alpha: f64, beta: f64, gamma: f64) -> AttenuationFit {
    AttenuationFit {
        source,
        material,
        barrier,
        alpha,
        beta,
        gamma,
    }
}

/// Radiographic fits: (modality, lead primary, concrete primary, lead secondary, concrete secondary)
type FitRow = (Modality, [f64; 3], [f64; 3], [f64; 3], [f64; 3]);

const RADIOGRAPHIC_FITS: [FitRow; 9] = [
    (
        Modality::RadRoomAllBarriers,
        [2.346, 1.59e+01, 4.982e-01],
        [3.626e-02, 1.429e-01, 4.931e-01],
        [2.298, 1.738e+01, 6.193e-01],
        [3.610e-02, 1.433e-01, 5.600e-01],
    ),
    (
        Modality::RadRoomChestBucky,
        [2.264, 1.308e+01, 5.6e-01],
        [3.552e-02, 1.177e-01, 6.007e-01],
        [2.256, 1.38e+01, 8.837e-01],
        [3.56e-02, 1.79e-01, 7.705e-01],
    ),
    (
        Modality::RadRoomFloor,
        [2.651, 1.656e+01, 4.585e-01],
        [3.994e-02, 1.448e-01, 4.231e-01],
        [2.513, 1.734e+01, 4.994e-01],
        [3.920e-02, 1.464e-01, 4.486e-01],
    ),
    (
        Modality::FluoroscopyTube,
        [2.347, 1.267e+01, 6.149e-01],
        [3.616e-02, 9.721e-02, 5.186e-01],
        [2.322, 1.291e+01, 7.575e-01],
        [3.630e-02, 9.360e+02, 5.955e-01],
    ),
    (
        Modality::RadiographicTubeRf,
        [2.295, 1.3e+01, 5.573e-01],
        [3.549e-02, 1.164e-01, 5.774e-01],
        [2.272, 1.360e+01, 7.184e-01],
        [3.560e-02, 1.114e-01, 6.620e-01],
    ),
    (
        Modality::ChestRoom,
        [2.283, 1.074e+01, 6.37e-01],
        [3.622e-02, 7.766e-02, 5.404e-01],
        [2.288, 9.848, 1.054],
        [3.640e-02, 6.590e-02, 7.543e-01],
    ),
    (
        Modality::Mammography,
        [30.6, 1.776e+02, 3.308e-01],
        [2.577e-01, 1.765, 3.644e-01],
        [29.91, 1.844e+02, 3.550e-01],
        [2.539e-01, 1.8411, 3.924e-01],
    ),
    (
        Modality::CardiacAngiography,
        [2.389, 1.426e+01, 5.948e-01],
        [3.717e-02, 1.087e-01, 4.879e-01],
        [2.354, 1.494e+01, 7.481e-01],
        [3.710e-02, 1.067e-01, 5.733e-01],
    ),
    (
        Modality::PeripheralAngiography,
        [2.728, 1.852e+01, 4.614e-01],
        [4.292e-02, 1.538e+02, 4.236e-01],
        [2.661, 1.954e+01, 5.094e-01],
        [4.219e-02, 1.559e-01, 4.472e-01],
    ),
];

/// CT secondary fits by tube voltage: (voltage, lead, concrete)
const CT_FITS: [(CtVoltage, [f64; 3], [f64; 3]); 2] = [
    (
        CtVoltage::Kvp120,
        [2.246, 8.95, 5.873e-01],
        [3.566e-02, 7.109e-02, 6.073e-01],
    ),
    (
        CtVoltage::Kvp140,
        [2.009, 5.916, 4.018e-01],
        [3.345e-02, 7.476e-02, 1.047],
    ),
];

/// Built-in fits, radiographic rows first, then CT.
pub(crate) fn ncrp147_fits() -> Vec<AttenuationFit> {
    let mut fits = Vec::with_capacity(RADIOGRAPHIC_FITS.len() * 4 + CT_FITS.len() * 2);
    for (modality, lead_p, concrete_p, lead_s, concrete_s) in RADIOGRAPHIC_FITS {
        let source = FitSource::Modality(modality);
        for (material, barrier, [a, b, g]) in [
            (Material::Lead, BarrierClass::Primary, lead_p),
            (Material::Concrete, BarrierClass::Primary, concrete_p),
            (Material::Lead, BarrierClass::Secondary, lead_s),
            (Material::Concrete, BarrierClass::Secondary, concrete_s),
        ] {
            fits.push(fit(source, material, barrier, a, b, g));
        }
    }
    for (voltage, [la, lb, lg], [ca, cb, cg]) in CT_FITS {
        let source = FitSource::CtVoltage(voltage);
        fits.push(fit(source, Material::Lead, BarrierClass::Secondary, la, lb, lg));
        fits.push(fit(source, Material::Concrete, BarrierClass::Secondary, ca, cb, cg));
    }
    fits
}
