//! # Shielding Calculations
//!
//! Each stage of a barrier calculation lives in its own module and is a pure
//! function of its inputs:
//!
//! - [`kerma`] - Unshielded weekly kerma at the occupied point
//! - [`transmission`] - Required transmission B and pre-shielding credit
//! - [`closed_form`] - Archer model and its inverse
//! - [`table_lookup`] - Attenuation lengths and table interpolation
//! - [`trail`] - Derivation trail and result flags
//! - [`dispatch`] - Request/result types and the [`Engine`] that routes a
//!   request through the stages for its imaging case
//!
//! All request and result types are JSON-serializable.

pub mod closed_form;
pub mod dispatch;
pub mod kerma;
pub mod table_lookup;
pub mod trail;
pub mod transmission;

// Re-export commonly used types
pub use closed_form::Thickness;
pub use dispatch::{
    CalculationRequest, CalculationResult, ComponentThickness, CtSource, DispatchCase, Engine, Outcome, Preshielding,
    RadiographicSource, SourceSpec, TabulatedSource,
};
pub use table_lookup::{InterpolationRegion, TableReading};
pub use trail::{DerivationTrail, TrailEntry, TrailFlag, TrailValue};
