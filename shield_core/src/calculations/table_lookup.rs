//! # Table-Interpolation Thickness Solver
//!
//! Reads a thickness from a tabulated column indexed by attenuation length
//! `n = log10(B⁻¹)`, with `B⁻¹ = N·T·K1 / (P·d²)`. The use factor is already
//! folded into the tabulated columns.
//!
//! - `n < 0`: no barrier (0 mm)
//! - `0 <= n <= n_max`: linear interpolation between neighbouring entries
//! - `n > n_max`: linear extrapolation from the last interval, not clamped
//!
//! ## Example
//!
//! ```rust
//! use shield_core::calculations::table_lookup::{interpolate, InterpolationRegion};
//!
//! let column = [0.0, 1.0, 3.0];
//! let reading = interpolate(&column, 1.5).unwrap();
//! assert_eq!(reading.thickness_mm, 2.0);
//! assert_eq!(reading.region, InterpolationRegion::Interpolated);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{ShieldError, ShieldResult};

/// Where a reading fell relative to the tabulated range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationRegion {
    /// n < 0: the unshielded kerma already meets the design goal
    BelowRange,
    Interpolated,
    /// n above the last tabulated index
    Extrapolated,
}

/// Thickness read from a column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableReading {
    pub thickness_mm: f64,
    pub region: InterpolationRegion,
}

/// Attenuation lengths `n = log10(N·T·K1 / (P·d²))`.
///
/// # Errors
///
/// `InvalidTransmissionInput` when `P <= 0` or `N·T·K1 / d² == 0`;
/// `InvalidInput` for a non-positive distance or negative inputs.
pub fn attenuation_lengths(
    patients_per_week: f64,
    occupancy: f64,
    kerma_per_patient: f64,
    design_goal: f64,
    distance_m: f64,
) -> ShieldResult<f64> {
    if !distance_m.is_finite() || distance_m <= 0.0 {
        return Err(ShieldError::invalid_input(
            "distance_m",
            distance_m.to_string(),
            "Distance must be positive",
        ));
    }
    for (field, value) in [
        ("patients_per_week", patients_per_week),
        ("occupancy", occupancy),
        ("kerma_per_patient", kerma_per_patient),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ShieldError::invalid_input(field, value.to_string(), "Must be finite and non-negative"));
        }
    }

    let exposure = patients_per_week * occupancy * kerma_per_patient / (distance_m * distance_m);
    if !design_goal.is_finite() || design_goal <= 0.0 {
        return Err(ShieldError::invalid_transmission(
            "Design goal P must be positive",
            design_goal,
            exposure,
        ));
    }
    if exposure == 0.0 {
        return Err(ShieldError::invalid_transmission(
            "Unshielded kerma times occupancy is zero",
            design_goal,
            exposure,
        ));
    }

    Ok((exposure / design_goal).log10())
}

/// Read the thickness at `n` attenuation lengths from a column.
///
/// # Errors
///
/// `InvalidInput` for non-finite `n`; `CatalogInvalid` for a column with
/// fewer than two entries.
pub fn interpolate(column: &[f64], n: f64) -> ShieldResult<TableReading> {
    if !n.is_finite() {
        return Err(ShieldError::invalid_input("n", n.to_string(), "Attenuation lengths must be finite"));
    }
    if column.len() < 2 {
        return Err(ShieldError::catalog_invalid(
            "thickness table",
            format!("needs at least 2 entries, found {}", column.len()),
        ));
    }

    if n < 0.0 {
        return Ok(TableReading {
            thickness_mm: 0.0,
            region: InterpolationRegion::BelowRange,
        });
    }

    let last = column.len() - 1;
    if n > last as f64 {
        let slope = column[last] - column[last - 1];
        return Ok(TableReading {
            thickness_mm: column[last] + (n - last as f64) * slope,
            region: InterpolationRegion::Extrapolated,
        });
    }

    let i = (n.floor() as usize).min(last - 1);
    let fraction = n - i as f64;
    Ok(TableReading {
        thickness_mm: column[i] + fraction * (column[i + 1] - column[i]),
        region: InterpolationRegion::Interpolated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, TABLE_LEN};

    #[test]
    fn test_attenuation_lengths() {
        // 100 · 1 · 5.2 / (0.02 · 4) = 6500
        let n = attenuation_lengths(100.0, 1.0, 5.2, 0.02, 2.0).unwrap();
        assert!((n - 6500f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn test_attenuation_lengths_rejects_bad_inputs() {
        assert_eq!(
            attenuation_lengths(100.0, 1.0, 5.2, 0.0, 2.0).unwrap_err().error_code(),
            "INVALID_TRANSMISSION_INPUT"
        );
        assert_eq!(
            attenuation_lengths(100.0, 0.0, 5.2, 0.02, 2.0).unwrap_err().error_code(),
            "INVALID_TRANSMISSION_INPUT"
        );
        assert_eq!(
            attenuation_lengths(100.0, 1.0, 5.2, 0.02, 0.0).unwrap_err().error_code(),
            "INVALID_INPUT"
        );
    }

    #[test]
    fn test_interpolation_at_nodes() {
        let column = [0.0, 1.0, 3.0, 6.0];
        for (i, expected) in column.iter().enumerate() {
            let reading = interpolate(&column, i as f64).unwrap();
            assert_eq!(reading.thickness_mm, *expected);
            assert_eq!(reading.region, InterpolationRegion::Interpolated);
        }
    }

    #[test]
    fn test_below_range_is_zero() {
        let reading = interpolate(&[0.5, 1.0], -0.3).unwrap();
        assert_eq!(reading.thickness_mm, 0.0);
        assert_eq!(reading.region, InterpolationRegion::BelowRange);
    }

    #[test]
    fn test_extrapolation_uses_last_interval() {
        let column = [0.0, 1.0, 3.0, 6.0];
        let reading = interpolate(&column, 5.0).unwrap();
        assert_eq!(reading.region, InterpolationRegion::Extrapolated);
        assert!((reading.thickness_mm - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_shipped_column_extrapolates_past_26() {
        let table = &catalog::builtin().tables[0];
        assert_eq!(table.thickness_mm.len(), TABLE_LEN);
        let at_max = interpolate(&table.thickness_mm, 26.0).unwrap();
        let beyond = interpolate(&table.thickness_mm, 30.0).unwrap();
        assert_eq!(beyond.region, InterpolationRegion::Extrapolated);
        assert!(beyond.thickness_mm > at_max.thickness_mm);
    }

    #[test]
    fn test_interpolation_is_monotone_on_every_table() {
        for table in &catalog::builtin().tables {
            let mut previous = 0.0;
            let mut n = 0.0;
            while n <= 28.0 {
                let x = interpolate(&table.thickness_mm, n).unwrap().thickness_mm;
                assert!(x >= previous - 1e-12, "{} at n = {}", table.identifier(), n);
                previous = x;
                n += 0.25;
            }
        }
    }

    #[test]
    fn test_rejects_short_column_and_nan() {
        assert!(interpolate(&[1.0], 0.5).is_err());
        assert!(interpolate(&[0.0, 1.0], f64::NAN).is_err());
    }
}
