//! # Error Types
//!
//! Structured diagnostics for shield_core. Every failure path of the engine
//! returns one of these instead of panicking, and each variant carries enough
//! context to tell the user which precondition failed.
//!
//! ## Example
//!
//! ```rust
//! use shield_core::errors::{ShieldError, ShieldResult};
//!
//! fn check_distance(distance_m: f64) -> ShieldResult<()> {
//!     if distance_m <= 0.0 {
//!         return Err(ShieldError::invalid_input(
//!             "distance_m",
//!             distance_m.to_string(),
//!             "Distance to the occupied point must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for shield_core operations
pub type ShieldResult<T> = Result<T, ShieldError>;

/// Structured error type for shielding calculations.
///
/// `MissingReferenceData` is an expected outcome of catalog lookups: the
/// dispatcher turns it into a "not applicable" or "unsupported" result.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ShieldError {
    /// An input value is outside its documented range
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The catalog has no entry for the requested key
    #[error("Missing reference data: no {table} entry for {key}")]
    MissingReferenceData { table: String, key: String },

    /// B = P / (K·T) cannot be formed from the given values
    #[error("Cannot compute transmission factor: {reason} (P = {design_goal}, K·T = {kerma_times_occupancy})")]
    InvalidTransmissionInput {
        reason: String,
        design_goal: f64,
        kerma_times_occupancy: f64,
    },

    /// No computation path is defined for this request
    #[error("Unsupported combination: {category} / {source_label} / {barrier} - {reason}")]
    UnsupportedCombination {
        category: String,
        source_label: String,
        barrier: String,
        reason: String,
    },

    /// A loaded catalog violates an invariant
    #[error("Invalid catalog: {entry} - {reason}")]
    CatalogInvalid { entry: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/TOML deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl ShieldError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ShieldError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingReferenceData error
    pub fn missing_reference_data(table: impl Into<String>, key: impl Into<String>) -> Self {
        ShieldError::MissingReferenceData {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create an InvalidTransmissionInput error
    pub fn invalid_transmission(reason: impl Into<String>, design_goal: f64, kerma_times_occupancy: f64) -> Self {
        ShieldError::InvalidTransmissionInput {
            reason: reason.into(),
            design_goal,
            kerma_times_occupancy,
        }
    }

    /// Create an UnsupportedCombination error
    pub fn unsupported(
        category: impl Into<String>,
        source_label: impl Into<String>,
        barrier: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ShieldError::UnsupportedCombination {
            category: category.into(),
            source_label: source_label.into(),
            barrier: barrier.into(),
            reason: reason.into(),
        }
    }

    /// Create a CatalogInvalid error
    pub fn catalog_invalid(entry: impl Into<String>, reason: impl Into<String>) -> Self {
        ShieldError::CatalogInvalid {
            entry: entry.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ShieldError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for lookups that the dispatcher may recover from locally
    pub fn is_missing_reference_data(&self) -> bool {
        matches!(self, ShieldError::MissingReferenceData { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ShieldError::InvalidInput { .. } => "INVALID_INPUT",
            ShieldError::MissingReferenceData { .. } => "MISSING_REFERENCE_DATA",
            ShieldError::InvalidTransmissionInput { .. } => "INVALID_TRANSMISSION_INPUT",
            ShieldError::UnsupportedCombination { .. } => "UNSUPPORTED_COMBINATION",
            ShieldError::CatalogInvalid { .. } => "CATALOG_INVALID",
            ShieldError::FileError { .. } => "FILE_ERROR",
            ShieldError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ShieldError::invalid_transmission("Design goal P is zero", 0.0, 12.5);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("InvalidTransmissionInput"));
        let roundtrip: ShieldError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ShieldError::missing_reference_data("primary kerma", "mammography").error_code(),
            "MISSING_REFERENCE_DATA"
        );
        assert_eq!(
            ShieldError::unsupported("CT", "140 kVp", "secondary", "no fit").error_code(),
            "UNSUPPORTED_COMBINATION"
        );
    }

    #[test]
    fn test_messages_name_the_precondition() {
        let error = ShieldError::invalid_transmission("Occupancy factor T is zero", 0.02, 0.0);
        assert!(error.to_string().contains("Occupancy factor T is zero"));
        assert!(ShieldError::missing_reference_data("fit", "x").is_missing_reference_data());
    }
}
