//! CT scatter constants (NCRP 147 Section 5, Table 5.2)
//!
//! Secondary kerma at 1 m per procedure is derived from a reference
//! dose-length product and a scatter (diffusion) coefficient. Body procedures
//! carry an extra 1.2 factor for the larger scattering volume.

use serde::{Deserialize, Serialize};

/// CT tube voltage tier (selects the CT attenuation fit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CtVoltage {
    #[serde(rename = "120kvp")]
    Kvp120,
    #[serde(rename = "140kvp")]
    Kvp140,
}

impl CtVoltage {
    pub const ALL: [CtVoltage; 2] = [CtVoltage::Kvp120, CtVoltage::Kvp140];

    /// Catalog key
    pub fn key(&self) -> &'static str {
        match self {
            CtVoltage::Kvp120 => "120kvp",
            CtVoltage::Kvp140 => "140kvp",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CtVoltage::Kvp120 => "120 kVp",
            CtVoltage::Kvp140 => "140 kVp",
        }
    }
}

impl std::fmt::Display for CtVoltage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Reference values for the CT secondary kerma model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtConstants {
    /// Reference DLP for a head procedure (mGy·cm)
    pub dlp_head: f64,
    /// Reference DLP for a body procedure (mGy·cm)
    pub dlp_body: f64,
    /// Head scatter coefficient κ_head (cm⁻¹)
    pub scatter_coefficient_head: f64,
    /// Body scatter coefficient κ_body (cm⁻¹)
    pub scatter_coefficient_body: f64,
    /// Anatomical correction applied to body procedures
    pub body_correction: f64,
}

impl Default for CtConstants {
    fn default() -> Self {
        CtConstants {
            dlp_head: 1200.0,
            dlp_body: 550.0,
            scatter_coefficient_head: 9.0e-5,
            scatter_coefficient_body: 3.0e-4,
            body_correction: 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voltage_keys_match_serde() {
        for v in CtVoltage::ALL {
            assert_eq!(serde_json::to_string(&v).unwrap(), format!("\"{}\"", v.key()));
        }
    }

    #[test]
    fn test_default_constants() {
        let ct = CtConstants::default();
        assert_eq!(ct.dlp_head, 1200.0);
        assert_eq!(ct.dlp_body, 550.0);
        assert_eq!(ct.body_correction, 1.2);
    }
}
