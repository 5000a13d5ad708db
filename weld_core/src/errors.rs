//! # Error Types
//!
//! Structured error types for weld_core. Every variant names the field or
//! capability at fault so a front end can show the user exactly what to fix.
//!
//! Errors fall into two families:
//!
//! - **Input errors** (`InvalidLength`, `InvalidRodCount`, `InvalidLineItem`, ...)
//!   are raised before any calculation runs. No partial result is produced.
//! - **Export errors** (`UnsupportedEnvironment`, `ExportFailed`, `FileError`)
//!   come from rendering or sharing a result and are reported separately.
//!
//! ## Example
//!
//! ```rust
//! use weld_core::errors::{CalcError, CalcResult};
//!
//! fn validate_thickness(thickness_mm: f64) -> CalcResult<()> {
//!     if !thickness_mm.is_finite() || thickness_mm <= 0.0 {
//!         return Err(CalcError::invalid_length(
//!             "thickness_mm",
//!             thickness_mm.to_string(),
//!             "Thickness must be a positive number",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_thickness(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for weld_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation and export operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A length, joint length or thickness is missing, non-numeric or not positive
    #[error("Invalid length for '{field}': {value} - {reason}")]
    InvalidLength {
        field: String,
        value: String,
        reason: String,
    },

    /// Rod count is not a positive whole number
    #[error("Invalid rod count: {value} - {reason}")]
    InvalidRodCount { value: String, reason: String },

    /// An invoice line item failed validation
    #[error("Invalid line item #{index} ('{field}'): {reason}")]
    InvalidLineItem {
        /// 1-based position of the item in the invoice
        index: usize,
        field: String,
        reason: String,
    },

    /// Joint type text did not match a known joint
    #[error("Unknown joint type: '{value}' (expected butt, fillet or lap)")]
    UnknownJointType { value: String },

    /// Any other input value is invalid
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Host environment lacks the capability (e.g. nowhere to share to)
    #[error("Unsupported environment: {capability} is not available")]
    UnsupportedEnvironment { capability: String },

    /// Rendering or sharing was attempted and failed
    #[error("Export failed: {operation} - {reason}")]
    ExportFailed { operation: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidLength error
    pub fn invalid_length(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidLength {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidRodCount error
    pub fn invalid_rod_count(value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidRodCount {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidLineItem error
    pub fn invalid_line_item(index: usize, field: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidLineItem {
            index,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownJointType error
    pub fn unknown_joint_type(value: impl Into<String>) -> Self {
        CalcError::UnknownJointType { value: value.into() }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnsupportedEnvironment error
    pub fn unsupported_environment(capability: impl Into<String>) -> Self {
        CalcError::UnsupportedEnvironment {
            capability: capability.into(),
        }
    }

    /// Create an ExportFailed error
    pub fn export_failed(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ExportFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for failures raised while rendering or sharing a result,
    /// as opposed to rejected calculation input.
    pub fn is_export_error(&self) -> bool {
        matches!(
            self,
            CalcError::UnsupportedEnvironment { .. }
                | CalcError::ExportFailed { .. }
                | CalcError::FileError { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidLength { .. } => "INVALID_LENGTH",
            CalcError::InvalidRodCount { .. } => "INVALID_ROD_COUNT",
            CalcError::InvalidLineItem { .. } => "INVALID_LINE_ITEM",
            CalcError::UnknownJointType { .. } => "UNKNOWN_JOINT_TYPE",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnsupportedEnvironment { .. } => "UNSUPPORTED_ENVIRONMENT",
            CalcError::ExportFailed { .. } => "EXPORT_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }
}
