//! # Error Types
//!
//! Structured error types for wall_core. Every failure carries enough context
//! for the preview workflow to decide between a local fallback (substitute a
//! safe pattern, draw without the image) and a user-visible message.
//!
//! Coverage shortfalls are not errors: they are reported as
//! [`CoverageAdvisory`](crate::calculations::CoverageAdvisory) values next to
//! a successful result.
//!
//! ## Example
//!
//! ```rust
//! use wall_core::errors::{PreviewError, PreviewResult};
//!
//! fn validate_width(width_in: f64) -> PreviewResult<()> {
//!     if width_in <= 0.0 {
//!         return Err(PreviewError::invalid_input(
//!             "wall_width_in",
//!             width_in.to_string(),
//!             "Wall width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for wall_core operations
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Structured error type for preview operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PreviewError {
    /// A user-supplied value is invalid (zero wall width, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// No pattern with this id exists in the catalog
    #[error("Pattern not found: {pattern_id}")]
    PatternNotFound { pattern_id: String },

    /// Pattern metadata cannot produce sensible geometry
    #[error("Invalid pattern data for '{pattern_id}': {field} = {value} - {reason}")]
    InvalidPatternData {
        pattern_id: String,
        field: String,
        value: String,
        reason: String,
    },

    /// Pattern image failed to load or decode
    #[error("Pattern image unavailable: {source_ref} - {reason}")]
    AssetUnavailable { source_ref: String, reason: String },

    /// Offscreen surface allocation or encoding failed
    #[error("Render target error during {operation}: {reason}")]
    RenderTarget { operation: String, reason: String },

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

impl PreviewError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        PreviewError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a PatternNotFound error
    pub fn pattern_not_found(pattern_id: impl Into<String>) -> Self {
        PreviewError::PatternNotFound {
            pattern_id: pattern_id.into(),
        }
    }

    /// Create an InvalidPatternData error
    pub fn invalid_pattern(
        pattern_id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        PreviewError::InvalidPatternData {
            pattern_id: pattern_id.into(),
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an AssetUnavailable error
    pub fn asset_unavailable(source_ref: impl Into<String>, reason: impl Into<String>) -> Self {
        PreviewError::AssetUnavailable {
            source_ref: source_ref.into(),
            reason: reason.into(),
        }
    }

    /// Create a RenderTarget error
    pub fn render_target(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        PreviewError::RenderTarget {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        PreviewError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Errors the workflow recovers from without aborting the preview.
    ///
    /// Invalid pattern data is replaced by the safe default pattern; a
    /// missing image still renders outlines and dimensions.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PreviewError::InvalidPatternData { .. } | PreviewError::AssetUnavailable { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PreviewError::InvalidInput { .. } => "INVALID_INPUT",
            PreviewError::PatternNotFound { .. } => "PATTERN_NOT_FOUND",
            PreviewError::InvalidPatternData { .. } => "INVALID_PATTERN_DATA",
            PreviewError::AssetUnavailable { .. } => "ASSET_UNAVAILABLE",
            PreviewError::RenderTarget { .. } => "RENDER_TARGET_ERROR",
            PreviewError::FileError { .. } => "FILE_ERROR",
            PreviewError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PreviewError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for PreviewError {
    fn from(err: serde_json::Error) -> Self {
        PreviewError::SerializationError {
            reason: err.to_string(),
        }
    }
}
