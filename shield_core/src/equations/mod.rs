//! # Shielding Equations
//!
//! Metadata for every relation the engine evaluates. The implementations live
//! in [`crate::calculations`]; this module only describes them, so a trail
//! entry can cite the equation that produced it.
//!
//! ## Modules
//!
//! - [`registry`] - Equation metadata and the generated EQUATIONS.md reference
//!
//! ## References
//!
//! - NCRP Report No. 147 (2004), Structural Shielding Design for Medical X-Ray Imaging Facilities
//! - Archer, Thornby and Bushong, Health Physics 44 (1983) 507-517

pub mod registry;

pub use registry::{
    CodeReference,
    Equation,
    EquationCategory,
    EquationMetadata,
    Variable,
    ALL_EQUATIONS,
    generate_equations_markdown,
};
