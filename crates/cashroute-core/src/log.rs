//! # Visit Log Entity
//!
//! A single recorded visit to a location: date, cash collected, bill
//! breakdown, commission snapshot, notes.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Location.commission_rate_bps   ← default for FUTURE logs, editable     │
//! │       │                                                                 │
//! │       │  captured once at log creation                                  │
//! │       ▼                                                                 │
//! │  VisitLog.commission_rate_bps   ← FROZEN for the life of the log        │
//! │                                                                         │
//! │  Changing the location's rate later never rewrites history: each log   │
//! │  keeps the rate that was actually in effect on that visit.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::bills::BillCounts;
use crate::money::{split, CommissionRate, Money, Split};
use crate::validation::{parse_collection, validate_notes, ValidationResult};

// =============================================================================
// Visit Log
// =============================================================================

/// One recorded visit, embedded in its parent location.
///
/// Logs are never addressable outside their parent; the external mutation
/// contract is index-based (index 0 = most recent). Each log still carries
/// a stable generated `id` for attribution and client-side keying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VisitLog {
    /// Stable identifier, generated at creation (UUID v4).
    pub id: String,

    /// Visit date (ISO calendar date).
    #[ts(as = "String")]
    pub date: NaiveDate,

    /// Display name of the person who recorded the visit.
    pub user: String,

    /// Total cash collected, in cents. `None` means "not yet recorded",
    /// which is distinct from `Some(0)` ("zero was collected").
    pub collection_cents: Option<i64>,

    /// Commission rate in effect for THIS visit (frozen snapshot).
    pub commission_rate_bps: u32,

    /// Bill breakdown for this visit. Advisory only: it is never forced to
    /// reconcile with `collection_cents`.
    #[serde(default)]
    pub bills: BillCounts,

    /// Free text for this specific visit.
    #[serde(default)]
    pub notes: String,

    /// When the log record was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl VisitLog {
    /// Builds a new log from a draft.
    ///
    /// ## Normalization
    /// - `date` defaults to `today` when the draft omits it
    /// - blank collection input → `None`; garbage or negative input is a
    ///   validation error and nothing is created
    /// - the commission snapshot is the draft's explicit rate if present,
    ///   otherwise `default_rate` (the parent location's current rate)
    pub fn create(
        draft: &LogDraft,
        default_rate: CommissionRate,
        user: &str,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ValidationResult<VisitLog> {
        let collection = parse_collection(&draft.collection)?;
        validate_notes(&draft.notes)?;

        let rate = draft
            .commission_rate_bps
            .map(CommissionRate::from_bps)
            .unwrap_or(default_rate);

        Ok(VisitLog {
            id: Uuid::new_v4().to_string(),
            date: draft.date.unwrap_or(today),
            user: user.to_string(),
            collection_cents: collection.map(|m| m.cents()),
            commission_rate_bps: rate.bps(),
            bills: draft.bills,
            notes: draft.notes.trim().to_string(),
            created_at: now,
        })
    }

    /// Applies an edit as a full replace of the field set.
    ///
    /// Identity (`id`), attribution (`user`) and `created_at` are preserved;
    /// everything else comes from the draft. `collection` and `bills` are
    /// independently authoritative: replacing one never derives the other.
    /// A draft without an explicit rate keeps the existing frozen snapshot,
    /// never the parent location's current rate.
    pub fn apply_edit(&self, draft: &LogDraft) -> ValidationResult<VisitLog> {
        let collection = parse_collection(&draft.collection)?;
        validate_notes(&draft.notes)?;

        let rate = draft
            .commission_rate_bps
            .map(CommissionRate::from_bps)
            .map(|r| r.bps())
            .unwrap_or(self.commission_rate_bps);

        Ok(VisitLog {
            id: self.id.clone(),
            date: draft.date.unwrap_or(self.date),
            user: self.user.clone(),
            collection_cents: collection.map(|m| m.cents()),
            commission_rate_bps: rate,
            bills: draft.bills,
            notes: draft.notes.trim().to_string(),
            created_at: self.created_at,
        })
    }

    /// The collected amount, if recorded.
    #[inline]
    pub fn collection(&self) -> Option<Money> {
        self.collection_cents.map(Money::from_cents)
    }

    /// The frozen commission snapshot.
    #[inline]
    pub fn commission_rate(&self) -> CommissionRate {
        CommissionRate::from_bps(self.commission_rate_bps)
    }

    /// Computes the customer/operator shares for this visit, if a
    /// collection was recorded.
    pub fn shares(&self) -> Option<Split> {
        self.collection()
            .map(|amount| split(amount, self.commission_rate()))
    }
}

// =============================================================================
// Log Draft
// =============================================================================

/// Raw per-visit input, as entered in the log form.
///
/// The collection amount arrives as the raw string from the form so that
/// "blank" and "0" stay distinguishable through the whole pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LogDraft {
    /// Visit date; omitted means "today".
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,

    /// Raw collection amount ("245.00", "0", or blank).
    #[serde(default)]
    pub collection: String,

    /// Explicit rate override; omitted means "use the location's current
    /// rate" on create, or "keep the frozen snapshot" on edit.
    pub commission_rate_bps: Option<u32>,

    /// Bill breakdown.
    #[serde(default)]
    pub bills: BillCounts,

    /// Per-visit notes.
    #[serde(default)]
    pub notes: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
