//! # Units
//!
//! Units attached to every value in a derivation trail. The engine works in
//! the NCRP 147 unit system throughout:
//!
//! - Kerma: milligray (mGy), weekly rates in mGy/wk
//! - Kerma coefficients: mGy·m² per patient at 1 m
//! - Distance: meters (m); thickness: millimeters (mm)
//! - CT dose-length product: mGy·cm; diffusion coefficients: cm⁻¹
//!
//! ## Example
//!
//! ```rust
//! use shield_core::units::Unit;
//!
//! assert_eq!(Unit::MilligrayPerWeek.symbol(), "mGy/wk");
//! assert_eq!(Unit::Dimensionless.symbol(), "");
//! ```

use serde::{Deserialize, Serialize};

/// Unit of a trail value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Pure number (B, U, T, factors)
    Dimensionless,
    /// Weekly air kerma
    MilligrayPerWeek,
    /// Air kerma per procedure
    MilligrayPerPatient,
    /// Unshielded kerma per patient at 1 m
    MilligraySquareMeterPerPatient,
    /// Workload per patient
    MilliampereMinutePerPatient,
    /// Patients or procedures per week
    PatientsPerWeek,
    /// CT dose-length product
    MilligrayCentimeter,
    /// CT scatter coefficient
    PerCentimeter,
    /// Attenuation fit coefficient
    PerMillimeter,
    /// Distance
    Meters,
    /// Barrier thickness
    Millimeters,
    /// log10(B⁻¹)
    AttenuationLengths,
    /// Catalog identifier or other label
    Label,
}

impl Unit {
    /// Short symbol for display
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Dimensionless => "",
            Unit::MilligrayPerWeek => "mGy/wk",
            Unit::MilligrayPerPatient => "mGy/patient",
            Unit::MilligraySquareMeterPerPatient => "mGy·m²/patient",
            Unit::MilliampereMinutePerPatient => "mA·min/patient",
            Unit::PatientsPerWeek => "patients/wk",
            Unit::MilligrayCentimeter => "mGy·cm",
            Unit::PerCentimeter => "cm⁻¹",
            Unit::PerMillimeter => "mm⁻¹",
            Unit::Meters => "m",
            Unit::Millimeters => "mm",
            Unit::AttenuationLengths => "n",
            Unit::Label => "",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
