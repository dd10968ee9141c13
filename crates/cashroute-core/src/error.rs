//! # Error Types
//!
//! Domain-specific error types for cashroute-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cashroute-core errors (this file)                                      │
//! │  ├── CoreError        - Aggregate mutation failures                     │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  cashroute-db errors (separate crate)                                   │
//! │  └── DbError          - Document store failures                         │
//! │                                                                         │
//! │  cashroute-service errors (separate crate)                              │
//! │  └── ServiceError     - What callers see (code + message)               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ServiceError → Caller    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, index, etc.)
//! 3. Errors are enum variants, never String
//! 4. Validation errors surface BEFORE any mutation happens

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Aggregate mutation errors.
///
/// These represent rule violations on the location aggregate itself.
/// Validation of raw input happens first and wraps into `Validation`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A log mutation targeted an index outside the log list.
    ///
    /// ## When This Occurs
    /// - Editing or deleting a log at an index >= logs.len()
    /// - Typically a stale UI acting on an already-shortened list
    ///
    /// Raised as an error rather than ignored so the stale-view case is
    /// visible to the caller.
    #[error("Log index {index} out of range (location has {len} logs)")]
    LogIndexOutOfRange { index: usize, len: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any aggregate mutation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., unparseable amount, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A monetary amount that must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::LogIndexOutOfRange { index: 3, len: 2 };
        assert_eq!(
            err.to_string(),
            "Log index 3 out of range (location has 2 logs)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Negative {
            field: "collection".to_string(),
        };
        assert_eq!(err.to_string(), "collection cannot be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
