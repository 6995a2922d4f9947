//! # Incident Kerma
//!
//! Unshielded weekly air kerma at the occupied point behind a barrier.
//!
//! Radiographic sources scale a per-patient kerma coefficient at 1 m by the
//! use factor and the weekly patient count, then apply the inverse square.
//! CT sources build the per-procedure coefficient from the dose-length
//! product and a scatter coefficient (NCRP 147 Eq. 5.1 to 5.3).
//!
//! Neither calculator fails: a non-positive distance gives 0, which the
//! transmission resolver then rejects with a diagnostic.
//!
//! ## Example
//!
//! ```rust
//! use shield_core::calculations::kerma::incident_kerma;
//!
//! // Rad room floor primary: K1 = 5.2, U = 0.25, N = 100, d = 2 m
//! let rate = incident_kerma(5.2, 0.25, 100.0, 2.0);
//! assert!((rate - 32.5).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::CtConstants;
use crate::errors::{ShieldError, ShieldResult};

/// Weekly kerma at distance `d` (mGy/wk): `K1 · U · N / d²`.
///
/// Returns 0 for `d <= 0`.
pub fn incident_kerma(kerma_per_patient: f64, use_factor: f64, patients_per_week: f64, distance_m: f64) -> f64 {
    if distance_m <= 0.0 {
        return 0.0;
    }
    kerma_per_patient * use_factor * patients_per_week / (distance_m * distance_m)
}

/// Rescale a kerma coefficient to the site's workload per patient.
pub fn scale_for_workload(kerma_per_patient: f64, workload_per_patient: f64, normalized_workload: f64) -> ShieldResult<f64> {
    if !workload_per_patient.is_finite() || workload_per_patient <= 0.0 {
        return Err(ShieldError::invalid_input(
            "workload_per_patient",
            workload_per_patient.to_string(),
            "Workload per patient must be positive",
        ));
    }
    if normalized_workload <= 0.0 {
        return Err(ShieldError::catalog_invalid(
            "normalized workload",
            format!("{} is not positive", normalized_workload),
        ));
    }
    Ok(kerma_per_patient * workload_per_patient / normalized_workload)
}

/// Secondary kerma at 1 m per CT procedure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CtProcedureKerma {
    /// K1sec(head), mGy per procedure
    pub head: f64,
    /// K1sec(body), mGy per procedure
    pub body: f64,
}

/// Per-procedure scatter kerma at 1 m for head and body scans.
///
/// `K1sec(head) = κ_head · DLP_head · Kc`, `K1sec(body) = 1.2 · κ_body · DLP_body · Kc`
pub fn ct_procedure_kerma(constants: &CtConstants, contrast_factor: f64) -> CtProcedureKerma {
    CtProcedureKerma {
        head: constants.scatter_coefficient_head * constants.dlp_head * contrast_factor,
        body: constants.body_correction * constants.scatter_coefficient_body * constants.dlp_body * contrast_factor,
    }
}

/// Weekly CT scatter kerma at distance `d` (mGy/wk). Returns 0 for `d <= 0`.
pub fn ct_weekly_kerma(per_procedure: &CtProcedureKerma, head_per_week: f64, body_per_week: f64, distance_m: f64) -> f64 {
    if distance_m <= 0.0 {
        return 0.0;
    }
    let at_one_meter = per_procedure.head * head_per_week + per_procedure.body * body_per_week;
    at_one_meter / (distance_m * distance_m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_kerma() {
        let rate = incident_kerma(5.2, 0.25, 100.0, 2.0);
        assert!((rate - 32.5).abs() < 1e-9);
    }

    #[test]
    fn test_incident_kerma_zero_distance() {
        assert_eq!(incident_kerma(5.2, 0.25, 100.0, 0.0), 0.0);
        assert_eq!(incident_kerma(5.2, 0.25, 100.0, -1.0), 0.0);
    }

    #[test]
    fn test_inverse_square() {
        let near = incident_kerma(2.3, 1.0, 50.0, 1.5);
        let far = incident_kerma(2.3, 1.0, 50.0, 3.0);
        assert!((near / far - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_workload_scaling() {
        let k = scale_for_workload(5.2, 3.8, 1.9).unwrap();
        assert!((k - 10.4).abs() < 1e-9);
        assert!(scale_for_workload(5.2, 0.0, 1.9).is_err());
    }

    #[test]
    fn test_ct_procedure_kerma() {
        let k = ct_procedure_kerma(&CtConstants::default(), 1.0);
        assert!((k.head - 0.108).abs() < 1e-12);
        assert!((k.body - 0.198).abs() < 1e-12);

        let contrast = ct_procedure_kerma(&CtConstants::default(), 1.4);
        assert!((contrast.head - 0.1512).abs() < 1e-12);
    }

    #[test]
    fn test_ct_weekly_kerma() {
        let k = ct_procedure_kerma(&CtConstants::default(), 1.0);
        // (0.108·100 + 0.198·150) / 4² = (10.8 + 29.7) / 16
        let rate = ct_weekly_kerma(&k, 100.0, 150.0, 4.0);
        assert!((rate - 40.5 / 16.0).abs() < 1e-9);
        assert_eq!(ct_weekly_kerma(&k, 100.0, 150.0, 0.0), 0.0);
    }
}
