//! # Engine Settings
//!
//! Choices that change how a result is derived without changing the request:
//! how pre-shielding is credited, which secondary kerma coefficient is the
//! design value, and the thickness reported when no solution exists.
//!
//! Settings are plain JSON so a site can keep them next to its requests:
//!
//! ```json
//! {
//!   "preshield_correction": "thickness-subtraction",
//!   "secondary_component": "leakage-side",
//!   "no_solution_mm": 999.0
//! }
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::SecondaryKermaComponent;
use crate::errors::{ShieldError, ShieldResult};

/// Thickness reported when the closed-form solver has no valid solution
pub const DEFAULT_NO_SOLUTION_MM: f64 = 999.0;

/// How pre-shielding is credited against the required barrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreshieldCorrection {
    /// Divide B by the transmission of the pre-shielding: B_net = B / B(x_pre)
    #[default]
    TransmissionSplit,
    /// Subtract the pre-shielding thickness from the solved thickness
    ThicknessSubtraction,
}

impl PreshieldCorrection {
    pub const ALL: [PreshieldCorrection; 2] = [
        PreshieldCorrection::TransmissionSplit,
        PreshieldCorrection::ThicknessSubtraction,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            PreshieldCorrection::TransmissionSplit => "Transmission split (B / B_pre)",
            PreshieldCorrection::ThicknessSubtraction => "Thickness subtraction (x - x_pre)",
        }
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Pre-shielding model
    pub preshield_correction: PreshieldCorrection,

    /// Secondary kerma coefficient used as the design value
    pub secondary_component: SecondaryKermaComponent,

    /// Sentinel thickness (mm) for "no valid solution"; never 0
    pub no_solution_mm: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            preshield_correction: PreshieldCorrection::default(),
            secondary_component: SecondaryKermaComponent::default(),
            no_solution_mm: DEFAULT_NO_SOLUTION_MM,
        }
    }
}

impl EngineSettings {
    /// Validate settings.
    pub fn validate(&self) -> ShieldResult<()> {
        if !self.no_solution_mm.is_finite() || self.no_solution_mm <= 0.0 {
            return Err(ShieldError::invalid_input(
                "no_solution_mm",
                self.no_solution_mm.to_string(),
                "No-solution sentinel must be a positive thickness",
            ));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON text
    pub fn from_json_str(text: &str) -> ShieldResult<EngineSettings> {
        let settings: EngineSettings = serde_json::from_str(text).map_err(|e| ShieldError::SerializationError {
            reason: format!("Invalid settings JSON: {}", e),
        })?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Load engine settings from a JSON file.
pub fn load_settings(path: impl AsRef<Path>) -> ShieldResult<EngineSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .map_err(|e| ShieldError::file_error("read", path.display().to_string(), e.to_string()))?;

    let settings = EngineSettings::from_json_str(&contents).map_err(|e| match e {
        ShieldError::SerializationError { reason } => ShieldError::SerializationError {
            reason: format!("{} ({})", reason, path.display()),
        },
        other => other,
    })?;

    tracing::debug!(path = %path.display(), ?settings, "loaded engine settings");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.preshield_correction, PreshieldCorrection::TransmissionSplit);
        assert_eq!(settings.secondary_component, SecondaryKermaComponent::Combined);
        assert_eq!(settings.no_solution_mm, 999.0);
        settings.validate().unwrap();
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let settings = EngineSettings::from_json_str(r#"{"preshield_correction": "thickness-subtraction"}"#).unwrap();
        assert_eq!(settings.preshield_correction, PreshieldCorrection::ThicknessSubtraction);
        assert_eq!(settings.no_solution_mm, DEFAULT_NO_SOLUTION_MM);
    }

    #[test]
    fn test_zero_sentinel_rejected() {
        let err = EngineSettings::from_json_str(r#"{"no_solution_mm": 0.0}"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        let err = EngineSettings::from_json_str(r#"{"secondary_component": "sideways"}"#).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_settings("/nonexistent/settings.json").unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }
}
