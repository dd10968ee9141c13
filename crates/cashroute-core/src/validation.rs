//! # Validation Module
//!
//! Input validation utilities for Cashroute.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                      │
//! │  ├── Basic format checks (empty, numeric input)                        │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service boundary (Rust)                                      │
//! │  └── THIS MODULE: field validation BEFORE any mutation                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Aggregate invariants (location.rs)                           │
//! │                                                                         │
//! │  A validation failure leaves the aggregate completely untouched.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_NAME_LEN, MAX_NOTES_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a location (customer) name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
///
/// ## Example
/// ```rust
/// use cashroute_core::validation::validate_location_name;
///
/// assert!(validate_location_name("Cafe Central").is_ok());
/// assert!(validate_location_name("").is_err());
/// ```
pub fn validate_location_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates free-text notes (customer-level or per-log).
///
/// ## Rules
/// - Can be empty
/// - Must be at most 2000 characters
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.len() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Parses a raw collection amount entered by a technician.
///
/// ## Rules
/// - Empty or whitespace-only input means "not yet recorded" → `None`.
///   This is distinct from `"0"`, which means zero was collected.
/// - Otherwise the input must parse as a decimal with at most two
///   fractional digits, and must not be negative.
///
/// ## Example
/// ```rust
/// use cashroute_core::{money::Money, validation::parse_collection};
///
/// assert_eq!(parse_collection("245.00").unwrap(), Some(Money::from_cents(24500)));
/// assert_eq!(parse_collection("0").unwrap(), Some(Money::zero()));
/// assert_eq!(parse_collection("  ").unwrap(), None);
/// assert!(parse_collection("abc").is_err());
/// assert!(parse_collection("-5").is_err());
/// ```
pub fn parse_collection(raw: &str) -> ValidationResult<Option<Money>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let amount = Money::parse_decimal(raw).ok_or_else(|| ValidationError::InvalidFormat {
        field: "collection".to_string(),
        reason: "must be a decimal amount with at most two fractional digits".to_string(),
    })?;

    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: "collection".to_string(),
        });
    }

    Ok(Some(amount))
}

// =============================================================================
// Unit Tests
// =============================================================================
