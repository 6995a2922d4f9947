//! # Derivation Trail
//!
//! Ordered record of every value that went into a result, each with its unit
//! and, where one applies, the equation that produced it. The trail is what
//! a reviewer reads to check a barrier by hand.
//!
//! ```text
//! Kerma coefficient K1 = 5.2000 mGy·m²/patient
//! Unshielded kerma K = 32.5000 mGy/wk  [Eq. 4.3]
//! Transmission B = 6.1538e-4  [Eq. 4.6]
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::equations::Equation;
use crate::units::Unit;

/// Trail value: a number, or a catalog identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrailValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for TrailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailValue::Number(v) => {
                let magnitude = v.abs();
                if magnitude != 0.0 && !(1e-3..1e5).contains(&magnitude) {
                    write!(f, "{:.4e}", v)
                } else {
                    write!(f, "{:.4}", v)
                }
            }
            TrailValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One line of the trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailEntry {
    pub label: String,
    pub value: TrailValue,
    pub unit: Unit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equation: Option<Equation>,
}

impl TrailEntry {
    /// Numeric value, if this entry holds one
    pub fn number(&self) -> Option<f64> {
        match self.value {
            TrailValue::Number(v) => Some(v),
            TrailValue::Text(_) => None,
        }
    }
}

impl fmt::Display for TrailEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.label, self.value)?;
        if !self.unit.symbol().is_empty() {
            write!(f, " {}", self.unit)?;
        }
        if let Some(equation) = self.equation {
            let meta = equation.metadata();
            match meta.reference {
                crate::equations::CodeReference::Ncrp147 { section } => write!(f, "  [{}]", section)?,
                other => write!(f, "  [{}]", other.short_form())?,
            }
        }
        Ok(())
    }
}

/// Conditions worth a reviewer's attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrailFlag {
    /// Attenuation lengths above the last tabulated index
    Extrapolated,
    /// Attenuation lengths below 0
    BelowTableRange,
    /// B >= 1, the unshielded kerma already meets the design goal
    NoAddedShielding,
    /// Wall position has no column of its own; the floor column was used
    WallPositionFallback,
    /// Kerma rescaled to a site workload per patient
    NonReferenceWorkload,
}

impl TrailFlag {
    /// Get description
    pub fn description(&self) -> &'static str {
        match self {
            TrailFlag::Extrapolated => "extrapolated beyond the tabulated range",
            TrailFlag::BelowTableRange => "below the tabulated range, no barrier required",
            TrailFlag::NoAddedShielding => "no added shielding required",
            TrailFlag::WallPositionFallback => "wall position uses the floor column",
            TrailFlag::NonReferenceWorkload => "kerma rescaled to the site workload",
        }
    }
}

/// Ordered list of trail entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivationTrail {
    entries: Vec<TrailEntry>,
}

impl DerivationTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a numeric entry
    pub fn number(&mut self, label: impl Into<String>, value: f64, unit: Unit, equation: Option<Equation>) {
        self.entries.push(TrailEntry {
            label: label.into(),
            value: TrailValue::Number(value),
            unit,
            equation,
        });
    }

    /// Append a text entry (identifiers, case names)
    pub fn text(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.entries.push(TrailEntry {
            label: label.into(),
            value: TrailValue::Text(value.into()),
            unit: Unit::Label,
            equation: None,
        });
    }

    /// First entry with the given label
    pub fn find(&self, label: &str) -> Option<&TrailEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    pub fn entries(&self) -> &[TrailEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for DerivationTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(TrailValue::Number(32.5).to_string(), "32.5000");
        assert_eq!(TrailValue::Number(6.1538e-4).to_string(), "6.1538e-4");
        assert_eq!(TrailValue::Number(0.0).to_string(), "0.0000");
    }

    #[test]
    fn test_entry_display() {
        let mut trail = DerivationTrail::new();
        trail.number("Unshielded kerma K", 32.5, Unit::MilligrayPerWeek, Some(Equation::IncidentKerma));
        trail.text("Attenuation fit", "rad-room-floor/lead/primary");
        let text = trail.to_string();
        assert!(text.contains("Unshielded kerma K = 32.5000 mGy/wk  [Eq. 4.3]"));
        assert!(text.contains("Attenuation fit = rad-room-floor/lead/primary\n"));
    }

    #[test]
    fn test_find() {
        let mut trail = DerivationTrail::new();
        trail.number("Transmission B", 0.5, Unit::Dimensionless, None);
        assert_eq!(trail.find("Transmission B").and_then(|e| e.number()), Some(0.5));
        assert!(trail.find("missing").is_none());
        assert_eq!(trail.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let mut trail = DerivationTrail::new();
        trail.number("Distance d", 2.0, Unit::Meters, None);
        let json = serde_json::to_value(&trail).unwrap();
        assert_eq!(json[0]["value"], 2.0);
        assert_eq!(json[0]["unit"], "meters");
        assert!(json[0].get("equation").is_none());
    }
}
