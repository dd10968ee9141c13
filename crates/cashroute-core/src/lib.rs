//! # cashroute-core: Pure Business Logic for Cashroute
//!
//! This crate is the **heart** of Cashroute, a route and collection manager
//! for vending-machine operators. It contains all business logic as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cashroute Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              cashroute-service (Application Layer)              │   │
//! │  │    LocationService: add_log, edit_log, remove_log, reorder      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ cashroute-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   bills   │  │ location  │  │  policy   │  │   │
//! │  │   │   Money   │  │ BillCounts│  │ Location  │  │   Role    │  │   │
//! │  │   │   split   │  │ Denoms    │  │ VisitLog  │  │   User    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 cashroute-db (Database Layer)                   │   │
//! │  │            SQLite documents, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!) and
//!   the commission split calculator
//! - [`bills`] - Fixed bill denominations and per-visit bill counts
//! - [`log`] - Visit logs with frozen commission-rate snapshots
//! - [`location`] - The Location aggregate and derived-state recomputation
//! - [`policy`] - Roles and the mutation permission rules
//! - [`validation`] - Input validation for names, notes, and amounts
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use cashroute_core::money::{split, CommissionRate, Money};
//!
//! // Create money from cents (never from floats!)
//! let collected = Money::from_cents(24567); // $245.67
//!
//! // Split at a 40% customer commission, half-up rounding on the
//! // customer share, operator keeps the exact remainder.
//! let rate = CommissionRate::from_bps(4000);
//! let shares = split(collected, rate);
//!
//! assert_eq!(shares.customer_share.cents(), 9827);
//! assert_eq!(shares.operator_share.cents(), 14740);
//! assert_eq!(shares.customer_share + shares.operator_share, collected);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bills;
pub mod error;
pub mod location;
pub mod log;
pub mod money;
pub mod policy;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cashroute_core::Location` instead of
// `use cashroute_core::location::Location`

pub use bills::{BillCounts, Denomination};
pub use error::{CoreError, CoreResult, ValidationError};
pub use location::{Location, LocationDetails, VisitStatus};
pub use log::{LogDraft, VisitLog};
pub use money::{split, CommissionRate, Money, Split};
pub use policy::{can_mutate_log, Clock, Role, User};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Highest commission rate accepted, in basis points (99%).
///
/// ## Business Reason
/// A rate of 1.0 would hand the entire collection to the customer; capping
/// just below keeps the operator share strictly meaningful and swallows
/// fat-fingered entries like "400" instead of "40".
pub const COMMISSION_RATE_MAX_BPS: u32 = 9900;

/// Commission rate applied when a location doesn't specify one (40%).
///
/// ## Business Reason
/// 40% is the baseline deal offered to new customer sites; individual
/// locations override it per contract.
pub const DEFAULT_COMMISSION_RATE_BPS: u32 = 4000;

/// Maximum length of a location name.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of notes fields (customer notes and per-log notes).
pub const MAX_NOTES_LEN: usize = 2000;
