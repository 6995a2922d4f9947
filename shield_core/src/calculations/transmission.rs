//! # Transmission Factor
//!
//! Required barrier transmission `B = P / (K · T)` and the two ways of
//! crediting pre-shielding already in the beam.
//!
//! `B >= 1` is a valid answer (the unshielded kerma already meets the design
//! goal). A zero design goal or a zero `K · T` has no answer and is reported
//! as [`ShieldError::InvalidTransmissionInput`].

use crate::errors::{ShieldError, ShieldResult};

/// Required transmission `B = P / (K · T)`.
///
/// # Errors
///
/// `InvalidTransmissionInput` when any value is negative or non-finite, when
/// `P == 0`, or when `K · T == 0`.
pub fn required_transmission(design_goal: f64, kerma_rate: f64, occupancy: f64) -> ShieldResult<f64> {
    let exposure = kerma_rate * occupancy;

    if !design_goal.is_finite() || !kerma_rate.is_finite() || !occupancy.is_finite() {
        return Err(ShieldError::invalid_transmission(
            "Design goal, kerma and occupancy must be finite",
            design_goal,
            exposure,
        ));
    }
    if design_goal < 0.0 || kerma_rate < 0.0 || occupancy < 0.0 {
        return Err(ShieldError::invalid_transmission(
            "Design goal, kerma and occupancy cannot be negative",
            design_goal,
            exposure,
        ));
    }
    if design_goal == 0.0 {
        return Err(ShieldError::invalid_transmission("Design goal P is zero", design_goal, exposure));
    }
    if exposure == 0.0 {
        return Err(ShieldError::invalid_transmission(
            "Unshielded kerma times occupancy is zero",
            design_goal,
            exposure,
        ));
    }

    Ok(design_goal / exposure)
}

/// Transmission the added barrier must still provide once the
/// pre-shielding is credited: `B_net = B / B_pre`.
pub fn split_for_preshielding(transmission: f64, preshield_transmission: f64) -> ShieldResult<f64> {
    if !preshield_transmission.is_finite() || preshield_transmission <= 0.0 {
        return Err(ShieldError::invalid_transmission(
            format!("Pre-shielding transmission {} is not positive", preshield_transmission),
            transmission,
            preshield_transmission,
        ));
    }
    Ok(transmission / preshield_transmission)
}

/// Added thickness after subtracting the pre-shielding: `max(0, x_ref − x_pre)`
pub fn subtract_preshielding(reference_mm: f64, preshield_mm: f64) -> f64 {
    (reference_mm - preshield_mm).max(0.0)
}
