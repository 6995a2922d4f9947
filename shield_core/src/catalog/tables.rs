//! Tabulated barrier thickness vs. attenuation length
//!
//! Each column lists the thickness (mm) needed for n = 0, 1, ..., 26
//! attenuation lengths, n = log10(B⁻¹), for one wall position of a
//! radiographic room. Columns are tabulated from the NCRP 147 Archer fits of
//! the modality named by `kerma_source`, rounded to 0.01 mm (lead) and
//! 0.1 mm (concrete). The pre-shielded primary variants subtract the
//! table/holder pre-shielding of Table 4.6 (0.85 mm lead, 72 mm concrete).
//!
//! Only the chest bucky and floor columns exist. Cross-table lateral and
//! opposite-chest-bucky positions read the floor column, and every secondary
//! barrier reads the single floor secondary column.

use serde::{Deserialize, Serialize};

use super::attenuation::{BarrierClass, Material};
use super::modalities::Modality;

/// Number of entries in every thickness column (n = 0..=26)
pub const TABLE_LEN: usize = 27;

/// Wall position of a radiographic room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WallPosition {
    /// Wall behind the chest bucky
    ChestBucky,
    /// Floor and other primary barriers
    Floor,
    /// Wall struck by cross-table lateral exposures
    CrossTableLateral,
    /// Wall opposite the chest bucky
    OppositeChestBucky,
}

impl WallPosition {
    pub const ALL: [WallPosition; 4] = [
        WallPosition::ChestBucky,
        WallPosition::Floor,
        WallPosition::CrossTableLateral,
        WallPosition::OppositeChestBucky,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            WallPosition::ChestBucky => "Chest bucky wall",
            WallPosition::Floor => "Floor / other barriers",
            WallPosition::CrossTableLateral => "Cross-table lateral wall",
            WallPosition::OppositeChestBucky => "Wall opposite chest bucky",
        }
    }

    /// Catalog key
    pub fn key(&self) -> &'static str {
        match self {
            WallPosition::ChestBucky => "chest-bucky",
            WallPosition::Floor => "floor",
            WallPosition::CrossTableLateral => "cross-table-lateral",
            WallPosition::OppositeChestBucky => "opposite-chest-bucky",
        }
    }

    /// Column that carries the tabulated data for this position.
    pub fn tabulated_column(&self, barrier: BarrierClass) -> WallPosition {
        match (barrier, self) {
            (BarrierClass::Primary, WallPosition::ChestBucky) => WallPosition::ChestBucky,
            _ => WallPosition::Floor,
        }
    }
}

impl std::fmt::Display for WallPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Table family within a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableVariant {
    Primary,
    /// Primary with table/holder pre-shielding already credited
    PrimaryPreshielded,
    Secondary,
}

impl TableVariant {
    pub const ALL: [TableVariant; 3] = [
        TableVariant::Primary,
        TableVariant::PrimaryPreshielded,
        TableVariant::Secondary,
    ];

    /// Catalog key
    pub fn key(&self) -> &'static str {
        match self {
            TableVariant::Primary => "primary",
            TableVariant::PrimaryPreshielded => "primary-preshielded",
            TableVariant::Secondary => "secondary",
        }
    }
}

/// Table identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableId {
    pub material: Material,
    pub variant: TableVariant,
}

impl TableId {
    /// Select the table family for a request.
    ///
    /// Secondary barriers have a single family; the pre-shielding flag only
    /// distinguishes the two primary variants.
    pub fn select(material: Material, barrier: BarrierClass, preshielded: bool) -> TableId {
        let variant = match (barrier, preshielded) {
            (BarrierClass::Secondary, _) => TableVariant::Secondary,
            (BarrierClass::Primary, false) => TableVariant::Primary,
            (BarrierClass::Primary, true) => TableVariant::PrimaryPreshielded,
        };
        TableId { material, variant }
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.material.display_name().to_lowercase(), self.variant.key())
    }
}

/// One thickness column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThicknessTable {
    pub id: TableId,
    pub wall: WallPosition,
    /// Modality whose kerma coefficient goes with this column
    pub kerma_source: Modality,
    /// Thickness (mm) at n = index attenuation lengths
    pub thickness_mm: Vec<f64>,
}

impl ThicknessTable {
    /// Largest tabulated attenuation-length index
    pub fn max_index(&self) -> usize {
        self.thickness_mm.len().saturating_sub(1)
    }

    /// True if no entry is smaller than its predecessor
    pub fn is_non_decreasing(&self) -> bool {
        self.thickness_mm.windows(2).all(|w| w[1] >= w[0])
    }

    /// Identifier used in derivation trails, e.g. `lead/primary:floor`
    pub fn identifier(&self) -> String {
        format!("{}:{}", self.id, self.wall.key())
    }
}

const LEAD_PRIMARY_CHEST_BUCKY: [f64; TABLE_LEN] = [
    0.0, 0.26, 0.81, 1.63, 2.58, 3.58, 4.59, 5.61, 6.63, 7.64, 8.66, 9.68, 10.7, 11.71,
    12.73, 13.75, 14.76, 15.78, 16.8, 17.81, 18.83, 19.85, 20.87, 21.88, 22.9, 23.92, 24.93,
];

const LEAD_PRIMARY_FLOOR: [f64; TABLE_LEN] = [
    0.0, 0.19, 0.57, 1.17, 1.92, 2.74, 3.59, 4.45, 5.32, 6.19, 7.06, 7.92, 8.79, 9.66,
    10.53, 11.4, 12.27, 13.14, 14.0, 14.87, 15.74, 16.61, 17.48, 18.35, 19.22, 20.08, 20.95,
];

const LEAD_PRESHIELDED_CHEST_BUCKY: [f64; TABLE_LEN] = [
    0.0, 0.0, 0.0, 0.78, 1.73, 2.73, 3.74, 4.76, 5.78, 6.79, 7.81, 8.83, 9.85, 10.86,
    11.88, 12.9, 13.91, 14.93, 15.95, 16.96, 17.98, 19.0, 20.02, 21.03, 22.05, 23.07, 24.08,
];

const LEAD_PRESHIELDED_FLOOR: [f64; TABLE_LEN] = [
    0.0, 0.0, 0.0, 0.32, 1.07, 1.89, 2.74, 3.6, 4.47, 5.34, 6.21, 7.07, 7.94, 8.81,
    9.68, 10.55, 11.42, 12.29, 13.15, 14.02, 14.89, 15.76, 16.63, 17.5, 18.37, 19.23, 20.1,
];

const LEAD_SECONDARY_FLOOR: [f64; TABLE_LEN] = [
    0.0, 0.19, 0.6, 1.26, 2.07, 2.95, 3.86, 4.77, 5.68, 6.6, 7.52, 8.43, 9.35, 10.26,
    11.18, 12.1, 13.01, 13.93, 14.85, 15.76, 16.68, 17.59, 18.51, 19.43, 20.34, 21.26, 22.18,
];

const CONCRETE_PRIMARY_CHEST_BUCKY: [f64; TABLE_LEN] = [
    0.0, 24.7, 70.0, 128.4, 191.4, 255.8, 320.5, 385.3, 450.1, 514.9, 579.7, 644.6, 709.4,
    774.2, 839.0, 903.9, 968.7, 1033.5, 1098.3, 1163.2, 1228.0, 1292.8, 1357.6, 1422.5,
    1487.3, 1552.1, 1616.9,
];

const CONCRETE_PRIMARY_FLOOR: [f64; TABLE_LEN] = [
    0.0, 18.0, 49.3, 92.9, 144.2, 199.2, 255.9, 313.2, 370.7, 428.3, 485.9, 543.5, 601.2,
    658.8, 716.5, 774.1, 831.8, 889.4, 947.1, 1004.7, 1062.4, 1120.0, 1177.7, 1235.3,
    1293.0, 1350.6, 1408.3,
];

const CONCRETE_PRESHIELDED_CHEST_BUCKY: [f64; TABLE_LEN] = [
    0.0, 0.0, 0.0, 56.4, 119.4, 183.8, 248.5, 313.3, 378.1, 442.9, 507.7, 572.6, 637.4,
    702.2, 767.0, 831.9, 896.7, 961.5, 1026.3, 1091.2, 1156.0, 1220.8, 1285.6, 1350.5,
    1415.3, 1480.1, 1544.9,
];

const CONCRETE_PRESHIELDED_FLOOR: [f64; TABLE_LEN] = [
    0.0, 0.0, 0.0, 20.9, 72.2, 127.2, 183.9, 241.2, 298.7, 356.3, 413.9, 471.5, 529.2,
    586.8, 644.5, 702.1, 759.8, 817.4, 875.1, 932.7, 990.4, 1048.0, 1105.7, 1163.3,
    1221.0, 1278.6, 1336.3,
];

const CONCRETE_SECONDARY_FLOOR: [f64; TABLE_LEN] = [
    0.0, 18.4, 51.1, 96.6, 149.8, 206.5, 264.4, 322.9, 381.5, 440.3, 499.0, 557.7, 616.5,
    675.2, 733.9, 792.7, 851.4, 910.1, 968.9, 1027.6, 1086.4, 1145.1, 1203.8, 1262.6,
    1321.3, 1380.1, 1438.8,
];

fn column(material: Material, variant: TableVariant, wall: WallPosition, values: &[f64]) -> ThicknessTable {
    let kerma_source = match wall {
        WallPosition::ChestBucky => Modality::RadRoomChestBucky,
        _ => Modality::RadRoomFloor,
    };
    ThicknessTable {
        id: TableId { material, variant },
        wall,
        kerma_source,
        thickness_mm: values.to_vec(),
    }
}

/// Built-in thickness columns
pub(crate) fn ncrp147_tables() -> Vec<ThicknessTable> {
    use Material::{Concrete, Lead};
    use TableVariant::{Primary, PrimaryPreshielded, Secondary};
    use WallPosition::{ChestBucky, Floor};

    vec![
        column(Lead, Primary, ChestBucky, &LEAD_PRIMARY_CHEST_BUCKY),
        column(Lead, Primary, Floor, &LEAD_PRIMARY_FLOOR),
        column(Lead, PrimaryPreshielded, ChestBucky, &LEAD_PRESHIELDED_CHEST_BUCKY),
        column(Lead, PrimaryPreshielded, Floor, &LEAD_PRESHIELDED_FLOOR),
        column(Lead, Secondary, Floor, &LEAD_SECONDARY_FLOOR),
        column(Concrete, Primary, ChestBucky, &CONCRETE_PRIMARY_CHEST_BUCKY),
        column(Concrete, Primary, Floor, &CONCRETE_PRIMARY_FLOOR),
        column(Concrete, PrimaryPreshielded, ChestBucky, &CONCRETE_PRESHIELDED_CHEST_BUCKY),
        column(Concrete, PrimaryPreshielded, Floor, &CONCRETE_PRESHIELDED_FLOOR),
        column(Concrete, Secondary, Floor, &CONCRETE_SECONDARY_FLOOR),
    ]
}
