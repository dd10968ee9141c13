//! # Money Module
//!
//! Provides the `Money` type and the commission split calculator.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A collection of $100.00 split 40/60:                                   │
//! │    100 * 0.4 + 100 * 0.6 may not equal 100 in floats                    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    customer share is rounded once, operator share is the exact          │
//! │    remainder, so the two shares ALWAYS sum to the collection            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashroute_core::money::{split, CommissionRate, Money};
//!
//! let collected = Money::from_cents(10000); // $100.00
//! let rate = CommissionRate::from_bps(4000); // 40% to the customer
//!
//! let shares = split(collected, rate);
//! assert_eq!(shares.customer_share.cents(), 4000);
//! assert_eq!(shares.operator_share.cents(), 6000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::COMMISSION_RATE_MAX_BPS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate arithmetic may go negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Why Cents?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// The database, calculations, and API all use cents.
    /// Only the UI converts to a decimal for display.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses a plain decimal string ("245", "245.5", "245.00") into Money.
    ///
    /// ## Rules
    /// - At most two fractional digits (collection amounts are entered with
    ///   `step="0.01"` in the UI and stored with exactly that precision)
    /// - A leading `-` is accepted so callers can detect and reject negative
    ///   amounts themselves
    /// - No currency symbols, no thousands separators
    ///
    /// ## Example
    /// ```rust
    /// use cashroute_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("245.00"), Some(Money::from_cents(24500)));
    /// assert_eq!(Money::parse_decimal("245.5"), Some(Money::from_cents(24550)));
    /// assert_eq!(Money::parse_decimal("245"), Some(Money::from_cents(24500)));
    /// assert_eq!(Money::parse_decimal("abc"), None);
    /// ```
    pub fn parse_decimal(input: &str) -> Option<Money> {
        let s = input.trim();
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if frac.len() > 2 {
            return None;
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let whole_cents = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().ok()?.checked_mul(100)?
        };
        let frac_cents = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().ok()? * 10,
            _ => frac.parse::<i64>().ok()?,
        };

        let cents = whole_cents.checked_add(frac_cents)?;
        Some(Money(if negative { -cents } else { cents }))
    }

    /// Formats the value as a plain decimal string with two fractional
    /// digits ("245.00"). Round-trips through [`Money::parse_decimal`].
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Commission Rate
// =============================================================================

/// The customer's share of a collection, in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 4000 bps = 40% (the customary default split)
///
/// ## Clamping
/// Rates are clamped to `[0, 9900]` at construction. A 100% customer share
/// would make the operator share permanently zero, which the UI treats as
/// ambiguous, so 99% is the ceiling. Out-of-range inputs are clamped, not
/// rejected; callers relying on tolerant input handling depend on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommissionRate(u32);

impl CommissionRate {
    /// Creates a commission rate from basis points, clamping to `[0, 9900]`.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > COMMISSION_RATE_MAX_BPS {
            CommissionRate(COMMISSION_RATE_MAX_BPS)
        } else {
            CommissionRate(bps)
        }
    }

    /// Creates a commission rate from a decimal fraction (0.4 = 40%).
    ///
    /// Negative and non-finite inputs clamp to zero; anything above the
    /// ceiling clamps to 99%.
    pub fn from_fraction(fraction: f64) -> Self {
        if !fraction.is_finite() || fraction <= 0.0 {
            return CommissionRate(0);
        }
        let bps = (fraction * 10_000.0).round() as u32;
        CommissionRate::from_bps(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a decimal fraction (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for CommissionRate {
    fn default() -> Self {
        CommissionRate(crate::DEFAULT_COMMISSION_RATE_BPS)
    }
}

// =============================================================================
// Split Calculator
// =============================================================================

/// The two shares of a collected amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    /// "Give to customer": the commission paid to the site owner.
    pub customer_share: Money,
    /// "I receive": the operator's remainder.
    pub operator_share: Money,
}

/// Splits a collected amount between customer and operator.
///
/// ## Contract
/// - A negative amount is treated as zero (tolerant input handling,
///   matching the rest of the money pipeline)
/// - `customer_share = amount × rate`, rounded half-up once
/// - `operator_share` is the exact remainder, so the shares always sum
///   to the amount
/// - Pure and deterministic: same input, same output
///
/// ## Example
/// ```rust
/// use cashroute_core::money::{split, CommissionRate, Money};
///
/// let shares = split(Money::from_cents(10000), CommissionRate::from_bps(4000));
/// assert_eq!(shares.customer_share, Money::from_cents(4000));
/// assert_eq!(shares.operator_share, Money::from_cents(6000));
/// ```
pub fn split(amount: Money, rate: CommissionRate) -> Split {
    let amount = if amount.is_negative() {
        Money::zero()
    } else {
        amount
    };

    // i128 to prevent overflow on large amounts; +5000 rounds half-up
    let customer_cents = (amount.cents() as i128 * rate.bps() as i128 + 5000) / 10_000;
    let customer_share = Money::from_cents(customer_cents as i64);

    Split {
        customer_share,
        operator_share: amount - customer_share,
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging. Use frontend formatting for actual UI display
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
