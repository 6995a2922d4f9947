//! # shield_core - X-Ray Barrier Thickness Engine
//!
//! `shield_core` computes the lead or concrete thickness a wall, floor or
//! ceiling needs so that the weekly air kerma behind it stays below a design
//! goal, following NCRP Report No. 147. Every result carries the values and
//! equations that produced it.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: requests in, results out; nothing is retained between calls
//! - **JSON-First**: requests, results, settings and errors all serialize
//! - **Rich Errors**: structured error types naming the failed precondition
//! - **Shared reference data**: one immutable catalog, safe to share across threads
//!
//! ## Quick Start
//!
//! ```rust
//! use shield_core::calculations::{CalculationRequest, RadiographicSource, SourceSpec};
//! use shield_core::catalog::{BarrierClass, Material, Modality};
//!
//! let request = CalculationRequest {
//!     label: "Corridor".to_string(),
//!     source: SourceSpec::Radiographic(RadiographicSource {
//!         modality: Modality::RadRoomChestBucky,
//!         patients_per_week: 120.0,
//!         use_factor: 1.0,
//!         workload_per_patient: None,
//!     }),
//!     barrier: BarrierClass::Primary,
//!     material: Material::Lead,
//!     design_goal: 0.02,
//!     occupancy: 0.2,
//!     distance_m: 2.5,
//!     preshielding: None,
//! };
//!
//! let result = shield_core::evaluate(&request).unwrap();
//! println!("{:.2} mm lead", result.thickness_mm);
//! print!("{}", result.trail);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - NCRP 147 reference data (kerma, fits, tables, pre-shielding)
//! - [`calculations`] - Kerma, transmission, thickness solvers and dispatch
//! - [`equations`] - Equation registry cited by derivation trails
//! - [`settings`] - Engine settings (pre-shielding model, secondary component)
//! - [`units`] - Units attached to trail values
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod catalog;
pub mod equations;
pub mod errors;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationRequest, CalculationResult, Engine, Outcome};
pub use catalog::{builtin, Catalog, CATALOG_VERSION};
pub use errors::{ShieldError, ShieldResult};
pub use settings::{load_settings, EngineSettings, PreshieldCorrection};

/// Evaluate a request against the built-in catalog with default settings.
pub fn evaluate(request: &CalculationRequest) -> ShieldResult<CalculationResult> {
    Engine::default().evaluate(request)
}
