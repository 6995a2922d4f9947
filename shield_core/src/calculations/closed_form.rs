//! # Closed-Form Thickness Solver
//!
//! Archer broad-beam model and its inverse.
//!
//! ```text
//! B(x) = [(1 + β/α)·e^(αγx) − β/α]^(−1/γ)
//! x(B) = ln[(B^(−γ) + β/α) / (1 + β/α)] / (αγ)
//! ```
//!
//! The inverse is undefined for `B <= 0`, `α = 0`, `γ = 0`, or a
//! non-positive log argument. Those cases return
//! [`Thickness::NoValidSolution`], which callers report as a large sentinel
//! thickness, never as 0. Valid results are clamped to `x >= 0`, so any
//! `B >= 1` needs no barrier.
//!
//! ## Example
//!
//! ```rust
//! use shield_core::calculations::closed_form::{archer_thickness_from, Thickness};
//!
//! let x = archer_thickness_from(2.651, 16.56, 0.4585, 6.1538e-4);
//! match x {
//!     Thickness::Required(mm) => assert!((mm - 1.3167).abs() < 0.01),
//!     Thickness::NoValidSolution => unreachable!(),
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::AttenuationFit;

/// Output of the inverse model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "mm", rename_all = "kebab-case")]
pub enum Thickness {
    /// Required thickness in mm, already clamped to >= 0
    Required(f64),
    /// Inputs outside the model's domain
    NoValidSolution,
}

impl Thickness {
    /// Thickness in mm, substituting `sentinel_mm` for no solution
    pub fn to_mm(self, sentinel_mm: f64) -> f64 {
        match self {
            Thickness::Required(mm) => mm,
            Thickness::NoValidSolution => sentinel_mm,
        }
    }
}

/// Thickness for transmission `B` through the given fit
pub fn archer_thickness(fit: &AttenuationFit, transmission: f64) -> Thickness {
    archer_thickness_from(fit.alpha, fit.beta, fit.gamma, transmission)
}

/// Thickness for transmission `B` from raw fit coefficients
pub fn archer_thickness_from(alpha: f64, beta: f64, gamma: f64, transmission: f64) -> Thickness {
    if !transmission.is_finite() || transmission <= 0.0 || alpha == 0.0 || gamma == 0.0 {
        return Thickness::NoValidSolution;
    }

    let ratio = beta / alpha;
    let numerator = transmission.powf(-gamma) + ratio;
    let denominator = 1.0 + ratio;
    if denominator <= 0.0 || numerator <= 0.0 {
        return Thickness::NoValidSolution;
    }

    let x = (numerator / denominator).ln() / (alpha * gamma);
    if !x.is_finite() {
        return Thickness::NoValidSolution;
    }
    Thickness::Required(x.max(0.0))
}

/// Transmission through `x` mm of the fit's material.
pub fn archer_transmission(fit: &AttenuationFit, thickness_mm: f64) -> f64 {
    archer_transmission_from(fit.alpha, fit.beta, fit.gamma, thickness_mm)
}

/// Transmission through `x` mm from raw fit coefficients
pub fn archer_transmission_from(alpha: f64, beta: f64, gamma: f64, thickness_mm: f64) -> f64 {
    let ratio = beta / alpha;
    ((1.0 + ratio) * (alpha * gamma * thickness_mm).exp() - ratio).powf(-1.0 / gamma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, BarrierClass, FitSource, Material, Modality};

    const FLOOR_LEAD: (f64, f64, f64) = (2.651, 16.56, 0.4585);

    fn solve(b: f64) -> Thickness {
        let (a, bt, g) = FLOOR_LEAD;
        archer_thickness_from(a, bt, g, b)
    }

    #[test]
    fn test_reference_thickness() {
        let x = solve(0.02 / 32.5).to_mm(999.0);
        assert!((x - 1.3167).abs() < 0.01, "x = {}", x);
    }

    #[test]
    fn test_no_barrier_needed_above_unit_transmission() {
        assert_eq!(solve(1.0), Thickness::Required(0.0));
        assert_eq!(solve(4.0), Thickness::Required(0.0));
    }

    #[test]
    fn test_sentinel_cases() {
        assert_eq!(solve(0.0), Thickness::NoValidSolution);
        assert_eq!(solve(-1e-3), Thickness::NoValidSolution);
        assert_eq!(archer_thickness_from(0.0, 16.56, 0.4585, 1e-3), Thickness::NoValidSolution);
        assert_eq!(archer_thickness_from(2.651, 16.56, 0.0, 1e-3), Thickness::NoValidSolution);
        // 1 + β/α <= 0
        assert_eq!(archer_thickness_from(1.0, -2.0, 0.5, 1e-3), Thickness::NoValidSolution);
        assert_eq!(Thickness::NoValidSolution.to_mm(999.0), 999.0);
    }

    #[test]
    fn test_monotone_in_transmission() {
        let mut previous = 0.0;
        for exponent in 1..=8 {
            let x = solve(10f64.powi(-exponent)).to_mm(999.0);
            assert!(x > previous, "B = 1e-{}: {} <= {}", exponent, x, previous);
            previous = x;
        }
    }

    #[test]
    fn test_round_trip_through_forward_model() {
        let (a, b, g) = FLOOR_LEAD;
        for x in [0.1, 0.5, 1.3167, 2.0, 4.0] {
            let transmission = archer_transmission_from(a, b, g, x);
            let back = archer_thickness_from(a, b, g, transmission).to_mm(999.0);
            assert!((back - x).abs() < 1e-9, "x = {}, back = {}", x, back);
        }
    }

    #[test]
    fn test_round_trip_every_catalog_fit() {
        let catalog = catalog::builtin();
        for fit in &catalog.fits {
            let transmission = archer_transmission(fit, 3.0);
            assert!(transmission > 0.0 && transmission < 1.0, "{}", fit.identifier());
            let back = archer_thickness(fit, transmission).to_mm(999.0);
            assert!((back - 3.0).abs() < 1e-6, "{}: {}", fit.identifier(), back);
        }
    }

    #[test]
    fn test_zero_thickness_transmits_everything() {
        let fit = catalog::builtin()
            .fit(FitSource::Modality(Modality::ChestRoom), Material::Concrete, BarrierClass::Secondary)
            .unwrap();
        assert!((archer_transmission(fit, 0.0) - 1.0).abs() < 1e-12);
    }
}
