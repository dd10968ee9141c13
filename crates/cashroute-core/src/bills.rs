//! # Bill Breakdown Module
//!
//! Counts of physical bills pulled from a machine on a visit.
//!
//! The denomination set is fixed: 50, 20, 10, 5, 1. The bill breakdown is
//! advisory — a technician can key a collection total without counting
//! bills, and the two are never forced to reconcile.

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Denomination
// =============================================================================

/// A bill denomination in the fixed set `{50, 20, 10, 5, 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Denomination {
    #[serde(rename = "50")]
    Fifty,
    #[serde(rename = "20")]
    Twenty,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "1")]
    One,
}

impl Denomination {
    /// All denominations, largest first (display order).
    pub const ALL: [Denomination; 5] = [
        Denomination::Fifty,
        Denomination::Twenty,
        Denomination::Ten,
        Denomination::Five,
        Denomination::One,
    ];

    /// The face value of one bill of this denomination.
    #[inline]
    pub const fn value(&self) -> Money {
        let dollars = match self {
            Denomination::Fifty => 50,
            Denomination::Twenty => 20,
            Denomination::Ten => 10,
            Denomination::Five => 5,
            Denomination::One => 1,
        };
        Money::from_cents(dollars * 100)
    }
}

// =============================================================================
// Bill Counts
// =============================================================================

/// How many bills of each denomination were collected.
///
/// ## Wire Format
/// Serialized as a map keyed by face value, the shape the frontend and the
/// stored documents use:
/// ```json
/// { "50": 4, "20": 2, "10": 0, "5": 1, "1": 0 }
/// ```
/// Keys outside the fixed set are ignored on deserialization; negative
/// counts clamp to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillCounts {
    #[serde(rename = "50", default, deserialize_with = "clamped_count")]
    pub fifty: u32,
    #[serde(rename = "20", default, deserialize_with = "clamped_count")]
    pub twenty: u32,
    #[serde(rename = "10", default, deserialize_with = "clamped_count")]
    pub ten: u32,
    #[serde(rename = "5", default, deserialize_with = "clamped_count")]
    pub five: u32,
    #[serde(rename = "1", default, deserialize_with = "clamped_count")]
    pub one: u32,
}

/// Accepts any integer and clamps negatives to zero.
///
/// Old documents written by the JS client can contain transient negative
/// counts from rapid-fire decrement taps; they mean zero.
fn clamped_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.max(0).min(u32::MAX as i64) as u32)
}

impl BillCounts {
    /// An empty breakdown (all counts zero).
    pub const fn empty() -> Self {
        BillCounts {
            fifty: 0,
            twenty: 0,
            ten: 0,
            five: 0,
            one: 0,
        }
    }

    /// Returns the count for a denomination.
    pub const fn count(&self, denomination: Denomination) -> u32 {
        match denomination {
            Denomination::Fifty => self.fifty,
            Denomination::Twenty => self.twenty,
            Denomination::Ten => self.ten,
            Denomination::Five => self.five,
            Denomination::One => self.one,
        }
    }

    /// Sets the count for a denomination.
    pub fn set_count(&mut self, denomination: Denomination, count: u32) {
        match denomination {
            Denomination::Fifty => self.fifty = count,
            Denomination::Twenty => self.twenty = count,
            Denomination::Ten => self.ten = count,
            Denomination::Five => self.five = count,
            Denomination::One => self.one = count,
        }
    }

    /// Applies a signed delta to one denomination, clamping at zero.
    ///
    /// Mirrors the +/- steppers in the log form: a decrement below zero
    /// stays at zero, never goes negative.
    pub fn apply_delta(&mut self, denomination: Denomination, delta: i64) {
        let current = self.count(denomination) as i64;
        let next = (current + delta).max(0).min(u32::MAX as i64) as u32;
        self.set_count(denomination, next);
    }

    /// Aggregates the breakdown into a total: `Σ denomination × count`.
    ///
    /// ## Example
    /// ```rust
    /// use cashroute_core::bills::BillCounts;
    ///
    /// let bills = BillCounts { fifty: 2, twenty: 1, one: 3, ..BillCounts::empty() };
    /// assert_eq!(bills.total().cents(), 12300); // $123.00
    /// ```
    pub fn total(&self) -> Money {
        Denomination::ALL
            .iter()
            .fold(Money::zero(), |sum, denomination| {
                let count = self.count(*denomination) as i64;
                sum + Money::from_cents(denomination.value().cents() * count)
            })
    }

    /// True if every count is zero.
    pub const fn is_empty(&self) -> bool {
        self.fifty == 0 && self.twenty == 0 && self.ten == 0 && self.five == 0 && self.one == 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_aggregation() {
        let bills = BillCounts {
            fifty: 2,
            twenty: 1,
            one: 3,
            ..BillCounts::empty()
        };
        // 2×$50 + 1×$20 + 3×$1 = $123.00
        assert_eq!(bills.total(), Money::from_cents(12300));
    }

    #[test]
    fn test_missing_denominations_count_zero() {
        let bills: BillCounts = serde_json::from_str(r#"{"50": 2}"#).unwrap();
        assert_eq!(bills.fifty, 2);
        assert_eq!(bills.twenty, 0);
        assert_eq!(bills.total(), Money::from_cents(10000));
    }

    #[test]
    fn test_unknown_denominations_ignored() {
        // "100" is not in the fixed set and must not affect the total
        let bills: BillCounts = serde_json::from_str(r#"{"100": 7, "20": 1}"#).unwrap();
        assert_eq!(bills.total(), Money::from_cents(2000));
    }

    #[test]
    fn test_negative_counts_clamp_to_zero() {
        let bills: BillCounts = serde_json::from_str(r#"{"50": -3, "5": 2}"#).unwrap();
        assert_eq!(bills.fifty, 0);
        assert_eq!(bills.five, 2);
    }

    #[test]
    fn test_apply_delta_clamps_at_zero() {
        let mut bills = BillCounts::empty();
        bills.apply_delta(Denomination::Twenty, 3);
        assert_eq!(bills.twenty, 3);

        bills.apply_delta(Denomination::Twenty, -5);
        assert_eq!(bills.twenty, 0);

        bills.apply_delta(Denomination::One, -1);
        assert_eq!(bills.one, 0);
    }

    #[test]
    fn test_empty() {
        assert!(BillCounts::empty().is_empty());
        assert_eq!(BillCounts::empty().total(), Money::zero());

        let bills = BillCounts { one: 1, ..BillCounts::empty() };
        assert!(!bills.is_empty());
    }

    #[test]
    fn test_wire_format_round_trip() {
        let bills = BillCounts {
            fifty: 4,
            twenty: 2,
            five: 1,
            ..BillCounts::empty()
        };
        let json = serde_json::to_string(&bills).unwrap();
        assert!(json.contains(r#""50":4"#));

        let back: BillCounts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bills);
    }
}
