//! Modality profiles (NCRP 147 Tables 4.5 and 4.7)
//!
//! Unshielded kerma per patient at 1 m for the primary beam and for the
//! secondary (leakage + scatter) field of each radiographic modality, plus the
//! workload per patient the coefficients were normalized to.

use serde::{Deserialize, Serialize};

/// Imaging category that decides which dispatch branch a request follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImagingCategory {
    /// General radiographic, chest and R&F rooms
    StandardRoom,
    /// Mammography and angiography suites
    Specialized,
    /// CT scanners
    ComputedTomography,
    /// Tabulated thickness curves by wall position
    Tabulated,
}

impl ImagingCategory {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ImagingCategory::StandardRoom => "Standard diagnostic room",
            ImagingCategory::Specialized => "Specialized diagnostic room",
            ImagingCategory::ComputedTomography => "CT",
            ImagingCategory::Tabulated => "Tabulated curves",
        }
    }
}

impl std::fmt::Display for ImagingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Radiographic modality (one catalog profile each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Modality {
    /// Rad room, all barriers (secondary only)
    RadRoomAllBarriers,
    /// Rad room, chest bucky wall
    RadRoomChestBucky,
    /// Rad room, floor and other barriers
    RadRoomFloor,
    /// Fluoroscopy tube of an R&F room
    FluoroscopyTube,
    /// Radiographic tube of an R&F room
    RadiographicTubeRf,
    /// Dedicated chest room
    ChestRoom,
    /// Mammography room
    Mammography,
    /// Cardiac angiography
    CardiacAngiography,
    /// Peripheral angiography
    PeripheralAngiography,
}

impl Modality {
    /// All modalities, in the order offered to the user
    pub const ALL: [Modality; 9] = [
        Modality::RadRoomAllBarriers,
        Modality::RadRoomChestBucky,
        Modality::RadRoomFloor,
        Modality::FluoroscopyTube,
        Modality::RadiographicTubeRf,
        Modality::ChestRoom,
        Modality::Mammography,
        Modality::CardiacAngiography,
        Modality::PeripheralAngiography,
    ];

    /// Catalog key (same string as the serde representation)
    pub fn key(&self) -> &'static str {
        match self {
            Modality::RadRoomAllBarriers => "rad-room-all-barriers",
            Modality::RadRoomChestBucky => "rad-room-chest-bucky",
            Modality::RadRoomFloor => "rad-room-floor",
            Modality::FluoroscopyTube => "fluoroscopy-tube",
            Modality::RadiographicTubeRf => "radiographic-tube-rf",
            Modality::ChestRoom => "chest-room",
            Modality::Mammography => "mammography",
            Modality::CardiacAngiography => "cardiac-angiography",
            Modality::PeripheralAngiography => "peripheral-angiography",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Modality::RadRoomAllBarriers => "Rad Room (all barriers)",
            Modality::RadRoomChestBucky => "Rad Room (chest bucky)",
            Modality::RadRoomFloor => "Rad Room (floor or other barriers)",
            Modality::FluoroscopyTube => "Fluoroscopy Tube (R&F room)",
            Modality::RadiographicTubeRf => "Rad Tube (R&F room)",
            Modality::ChestRoom => "Chest Room",
            Modality::Mammography => "Mammography Room",
            Modality::CardiacAngiography => "Cardiac Angiography",
            Modality::PeripheralAngiography => "Peripheral Angiography",
        }
    }

    /// Dispatch category of this modality
    pub fn category(&self) -> ImagingCategory {
        match self {
            Modality::Mammography | Modality::CardiacAngiography | Modality::PeripheralAngiography => {
                ImagingCategory::Specialized
            }
            _ => ImagingCategory::StandardRoom,
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which secondary kerma coefficient of a profile to design against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecondaryKermaComponent {
    /// Combined leakage and scatter (NCRP design value)
    #[default]
    Combined,
    /// Leakage plus side scatter
    LeakageSide,
    /// Leakage plus forward/back scatter
    ForwardBack,
}

impl SecondaryKermaComponent {
    pub const ALL: [SecondaryKermaComponent; 3] = [
        SecondaryKermaComponent::Combined,
        SecondaryKermaComponent::LeakageSide,
        SecondaryKermaComponent::ForwardBack,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SecondaryKermaComponent::Combined => "combined",
            SecondaryKermaComponent::LeakageSide => "leakage + side scatter",
            SecondaryKermaComponent::ForwardBack => "leakage + forward/back scatter",
        }
    }
}

/// Kerma reference values for one modality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalityProfile {
    pub modality: Modality,
    /// Workload per patient the coefficients assume (mA·min/patient)
    pub normalized_workload: f64,
    /// Primary kerma per patient at 1 m (mGy·m²/patient); `None` when the
    /// modality has no primary barrier case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_kerma: Option<f64>,
    /// Secondary kerma per patient at 1 m, leakage + side scatter
    pub secondary_kerma_leakage_side: f64,
    /// Secondary kerma per patient at 1 m, leakage + forward/back scatter
    pub secondary_kerma_forward_back: f64,
    /// Secondary kerma per patient at 1 m, combined design value
    pub secondary_kerma_combined: f64,
}

impl ModalityProfile {
    /// Secondary kerma coefficient for the chosen component
    pub fn secondary_kerma(&self, component: SecondaryKermaComponent) -> f64 {
        match component {
            SecondaryKermaComponent::Combined => self.secondary_kerma_combined,
            SecondaryKermaComponent::LeakageSide => self.secondary_kerma_leakage_side,
            SecondaryKermaComponent::ForwardBack => self.secondary_kerma_forward_back,
        }
    }
}

fn profile(
    modality: Modality,
    normalized_workload: f64,
    primary_kerma: Option<f64>,
    leakage_side: f64,
    forward_back: f64,
    combined: f64,
) -> ModalityProfile {
    ModalityProfile {
        modality,
        normalized_workload,
        primary_kerma,
        secondary_kerma_leakage_side: leakage_side,
        secondary_kerma_forward_back: forward_back,
        secondary_kerma_combined: combined,
    }
}

/// Built-in profiles. Secondary values and W_norm from Table 4.7, K_P1 from Table 4.5.
pub(crate) fn ncrp147_profiles() -> Vec<ModalityProfile> {
    vec![
        profile(Modality::RadRoomAllBarriers, 2.5, None, 3.4e-2, 4.8e-2, 4.9e-2),
        profile(Modality::RadRoomChestBucky, 0.60, Some(2.3), 5.3e-3, 6.9e-3, 7.3e-3),
        profile(Modality::RadRoomFloor, 1.9, Some(5.2), 2.3e-2, 3.3e-2, 3.3e-2),
        profile(Modality::FluoroscopyTube, 13.0, None, 3.2e-1, 4.4e-1, 4.6e-1),
        profile(Modality::RadiographicTubeRf, 1.5, Some(5.9), 2.9e-2, 3.9e-2, 4.0e-2),
        profile(Modality::ChestRoom, 0.22, Some(1.2), 2.7e-3, 3.2e-3, 3.6e-3),
        profile(Modality::Mammography, 6.7, None, 1.1e-2, 4.9e-2, 4.9e-2),
        profile(Modality::CardiacAngiography, 160.0, None, 2.7, 3.7, 3.8),
        profile(Modality::PeripheralAngiography, 64.0, None, 6.6e-1, 9.5e-1, 9.5e-1),
    ]
}
