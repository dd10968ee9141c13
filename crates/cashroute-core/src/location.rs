//! # Location Aggregate
//!
//! A customer site with its embedded visit history and the denormalized
//! "current" fields that mirror the most recent log.
//!
//! ## The Recompute Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Derived-State Recomputation                             │
//! │                                                                         │
//! │  logs: [ newest, ..., oldest ]        (index 0 = most recent visit)     │
//! │           │                                                             │
//! │           │  after EVERY mutation                                       │
//! │           ▼                                                             │
//! │  last_visited      = logs[0].date          (None if no logs)            │
//! │  last_collection   = logs[0].collection    (None if no logs)            │
//! │  bills             = logs[0].bills         (empty if no logs)           │
//! │  log_notes         = logs[0].notes         ("" if no logs)              │
//! │                                                                         │
//! │  The location's own commission_rate_bps is the DEFAULT for future       │
//! │  logs and is not part of the mirror — except on delete-of-head,         │
//! │  which adopts the newly exposed head's snapshot (see remove_log).       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The mirror is a single synchronous in-memory step: callers persist the
//! whole aggregate afterwards, so readers only ever observe the pre- or
//! post-mutation snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::bills::BillCounts;
use crate::error::{CoreError, CoreResult};
use crate::log::{LogDraft, VisitLog};
use crate::money::{CommissionRate, Money};
use crate::validation::validate_location_name;

// =============================================================================
// Visit Status
// =============================================================================

/// Whether the location has been visited on the current route cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    /// Not yet visited this cycle.
    Pending,
    /// Visited; `last_visited` says when.
    Visited,
}

impl Default for VisitStatus {
    fn default() -> Self {
        VisitStatus::Pending
    }
}

// =============================================================================
// Location Details
// =============================================================================

/// The descriptive, independently editable part of a location.
///
/// Everything here is set by the add/edit-customer forms; none of it is
/// derived from the log history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetails {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    /// Geographic zone used for route grouping.
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub location_type: String,
    /// Default commission rate for future logs, in basis points.
    #[serde(default = "default_rate_bps")]
    pub commission_rate_bps: u32,
    /// Number of change machines on site.
    #[serde(default)]
    pub change_machine_count: u32,
}

fn default_rate_bps() -> u32 {
    crate::DEFAULT_COMMISSION_RATE_BPS
}

// =============================================================================
// Location
// =============================================================================

/// A customer site, the aggregate root of the collection model.
///
/// ## Invariants
/// - `logs` is ordered newest-first; index 0 is the most recent visit
/// - after any log mutation the denormalized fields equal a pure function
///   of `logs[0]` (or the empty defaults when `logs` is empty)
/// - `name` is never empty
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Unique identifier (UUID v4), assigned at creation, immutable.
    pub id: String,

    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    /// Geographic zone used for route grouping.
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub location_type: String,

    #[serde(default)]
    pub status: VisitStatus,

    /// Default commission rate for NEW logs, in basis points. Editing this
    /// never rewrites the snapshots already frozen into the log history.
    #[serde(default = "default_rate_bps")]
    pub commission_rate_bps: u32,

    /// Number of change machines on site. Old documents stored a boolean
    /// `hasChangeMachine`; deserialization accepts both forms.
    #[serde(
        default,
        alias = "hasChangeMachine",
        deserialize_with = "count_or_legacy_bool"
    )]
    pub change_machine_count: u32,

    /// Customer-level notes, distinct from any per-log notes.
    #[serde(default)]
    pub notes: String,

    // --- denormalized "current" fields, mirroring logs[0] ---
    /// Date of the most recent visit.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub last_visited: Option<NaiveDate>,

    /// Collection amount of the most recent visit, in cents.
    #[serde(default)]
    pub last_collection_cents: Option<i64>,

    /// Bill breakdown of the most recent visit.
    #[serde(default)]
    pub bills: BillCounts,

    /// Notes of the most recent visit.
    #[serde(default)]
    pub log_notes: String,

    /// Visit history, newest-first.
    #[serde(default)]
    pub logs: Vec<VisitLog>,

    /// Manual sort position among locations.
    #[serde(default)]
    pub order: i64,

    /// When the location was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Accepts either an integer count or the legacy `hasChangeMachine` boolean.
fn count_or_legacy_bool<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CountOrBool {
        Count(i64),
        Legacy(bool),
    }

    Ok(match CountOrBool::deserialize(deserializer)? {
        CountOrBool::Count(n) => n.max(0).min(u32::MAX as i64) as u32,
        CountOrBool::Legacy(true) => 1,
        CountOrBool::Legacy(false) => 0,
    })
}

impl Location {
    /// Creates a fresh location with an empty history.
    ///
    /// Denormalized fields start at their empty defaults; `order` is the
    /// caller-assigned sort position (max existing + 1 by convention).
    pub fn new(
        id: String,
        details: LocationDetails,
        order: i64,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Location> {
        validate_location_name(&details.name)?;

        Ok(Location {
            id,
            name: details.name.trim().to_string(),
            address: details.address,
            city: details.city,
            state: details.state,
            zip_code: details.zip_code,
            region: details.region,
            location_type: details.location_type,
            status: VisitStatus::Pending,
            commission_rate_bps: CommissionRate::from_bps(details.commission_rate_bps).bps(),
            change_machine_count: details.change_machine_count,
            notes: String::new(),
            last_visited: None,
            last_collection_cents: None,
            bills: BillCounts::empty(),
            log_notes: String::new(),
            logs: Vec::new(),
            order,
            created_at,
        })
    }

    /// Replaces the descriptive fields, leaving logs and the denormalized
    /// mirror untouched.
    pub fn apply_details(&mut self, details: LocationDetails) -> CoreResult<()> {
        validate_location_name(&details.name)?;

        self.name = details.name.trim().to_string();
        self.address = details.address;
        self.city = details.city;
        self.state = details.state;
        self.zip_code = details.zip_code;
        self.region = details.region;
        self.location_type = details.location_type;
        self.commission_rate_bps = CommissionRate::from_bps(details.commission_rate_bps).bps();
        self.change_machine_count = details.change_machine_count;
        Ok(())
    }

    /// The default rate applied to new logs.
    #[inline]
    pub fn commission_rate(&self) -> CommissionRate {
        CommissionRate::from_bps(self.commission_rate_bps)
    }

    /// The most recent visit's collection amount, if recorded.
    #[inline]
    pub fn last_collection(&self) -> Option<Money> {
        self.last_collection_cents.map(Money::from_cents)
    }

    /// True when the location was visited within the past 10 days.
    /// Drives the "recently visited" highlight in the route list.
    pub fn is_recently_visited(&self, today: NaiveDate) -> bool {
        if self.status != VisitStatus::Visited {
            return false;
        }
        match self.last_visited {
            Some(date) => (today - date).num_days() <= 10,
            None => false,
        }
    }

    // =========================================================================
    // Log transitions (the recomputation engine)
    // =========================================================================

    /// **Append**: prepends a new log and mirrors it into the current
    /// fields.
    ///
    /// The location's headline `commission_rate_bps` is left unchanged: it
    /// is the default for future logs, not a mirror of the last snapshot.
    pub fn add_log(&mut self, log: VisitLog) {
        self.logs.insert(0, log);
        self.status = VisitStatus::Visited;
        self.mirror_head();
    }

    /// **Edit at index**: replaces `logs[index]` with the re-validated
    /// full field set from the draft.
    ///
    /// Only an edit of the head (index 0) touches the denormalized fields;
    /// older logs are history and the mirror only ever reflects the newest.
    pub fn edit_log(&mut self, index: usize, draft: &LogDraft) -> CoreResult<()> {
        let existing = self
            .logs
            .get(index)
            .ok_or(CoreError::LogIndexOutOfRange {
                index,
                len: self.logs.len(),
            })?;

        let updated = existing.apply_edit(draft)?;
        self.logs[index] = updated;

        if index == 0 {
            self.mirror_head();
        }
        Ok(())
    }

    /// **Delete at index**: removes `logs[index]`, preserving the relative
    /// order of the remaining entries.
    ///
    /// Deleting the head exposes the previous entry as the new current
    /// record. In that one case the location's headline commission rate is
    /// also set to the new head's frozen snapshot, so the "current rate"
    /// shown next to the latest visible record is the rate that record was
    /// actually split at. Append and edit deliberately do not do this.
    pub fn remove_log(&mut self, index: usize) -> CoreResult<()> {
        if index >= self.logs.len() {
            return Err(CoreError::LogIndexOutOfRange {
                index,
                len: self.logs.len(),
            });
        }

        self.logs.remove(index);

        if index == 0 {
            if let Some(head) = self.logs.first() {
                self.commission_rate_bps = head.commission_rate_bps;
            }
            self.mirror_head();
        }
        Ok(())
    }

    /// Recomputes the denormalized fields from the current head log, or
    /// resets them to the empty defaults when the history is empty.
    fn mirror_head(&mut self) {
        match self.logs.first() {
            Some(head) => {
                self.last_visited = Some(head.date);
                self.last_collection_cents = head.collection_cents;
                self.bills = head.bills;
                self.log_notes = head.notes.clone();
            }
            None => {
                self.last_visited = None;
                self.last_collection_cents = None;
                self.bills = BillCounts::empty();
                self.log_notes.clear();
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LogDraft;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        date(26).and_hms_opt(8, 0, 0).unwrap().and_utc()
    }

    fn location() -> Location {
        Location::new(
            "loc-1".to_string(),
            LocationDetails {
                name: "Cafe Central".to_string(),
                region: "Center".to_string(),
                commission_rate_bps: 4000,
                ..LocationDetails::default()
            },
            0,
            now(),
        )
        .unwrap()
    }

    fn log(day: u32, cents: i64, rate_bps: u32) -> VisitLog {
        VisitLog::create(
            &LogDraft {
                date: Some(date(day)),
                collection: Money::from_cents(cents).to_decimal_string(),
                commission_rate_bps: Some(rate_bps),
                bills: BillCounts { twenty: 1, ..BillCounts::empty() },
                notes: format!("visit {}", day),
                ..LogDraft::default()
            },
            CommissionRate::default(),
            "Mardi",
            date(day),
            now(),
        )
        .unwrap()
    }

    /// The single most important property: the denormalized fields are a
    /// pure function of the head log after every mutation.
    fn assert_mirrors_head(loc: &Location) {
        match loc.logs.first() {
            Some(head) => {
                assert_eq!(loc.last_visited, Some(head.date));
                assert_eq!(loc.last_collection_cents, head.collection_cents);
                assert_eq!(loc.bills, head.bills);
                assert_eq!(loc.log_notes, head.notes);
            }
            None => {
                assert_eq!(loc.last_visited, None);
                assert_eq!(loc.last_collection_cents, None);
                assert!(loc.bills.is_empty());
                assert!(loc.log_notes.is_empty());
            }
        }
    }

    #[test]
    fn test_new_location_starts_empty() {
        let loc = location();
        assert!(loc.logs.is_empty());
        assert_eq!(loc.status, VisitStatus::Pending);
        assert_mirrors_head(&loc);
    }

    #[test]
    fn test_new_location_rejects_empty_name() {
        let result = Location::new(
            "loc-x".to_string(),
            LocationDetails {
                name: "   ".to_string(),
                ..LocationDetails::default()
            },
            0,
            now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_add_log_prepends() {
        let mut loc = location();
        let l1 = log(20, 10000, 4000);
        let l2 = log(25, 15000, 4000);
        let l2_id = l2.id.clone();

        loc.add_log(l1);
        loc.add_log(l2);

        assert_eq!(loc.logs.len(), 2);
        assert_eq!(loc.logs[0].id, l2_id);
        assert_eq!(loc.status, VisitStatus::Visited);
        assert_eq!(loc.last_visited, Some(date(25)));
        assert_eq!(loc.last_collection(), Some(Money::from_cents(15000)));
        assert_mirrors_head(&loc);
    }

    #[test]
    fn test_add_log_leaves_headline_rate_alone() {
        let mut loc = location();
        loc.add_log(log(25, 10000, 2500));
        // the log carries its own snapshot; the location default is untouched
        assert_eq!(loc.commission_rate_bps, 4000);
        assert_eq!(loc.logs[0].commission_rate_bps, 2500);
    }

    #[test]
    fn test_edit_head_recomputes_mirror() {
        let mut loc = location();
        loc.add_log(log(25, 10000, 4000));

        loc.edit_log(
            0,
            &LogDraft {
                date: Some(date(24)),
                collection: "80.00".to_string(),
                notes: "recount".to_string(),
                ..LogDraft::default()
            },
        )
        .unwrap();

        assert_eq!(loc.last_visited, Some(date(24)));
        assert_eq!(loc.last_collection(), Some(Money::from_cents(8000)));
        assert_eq!(loc.log_notes, "recount");
        assert_mirrors_head(&loc);
    }

    #[test]
    fn test_edit_older_log_leaves_mirror_untouched() {
        let mut loc = location();
        loc.add_log(log(20, 10000, 4000));
        loc.add_log(log(25, 15000, 4000));

        loc.edit_log(
            1,
            &LogDraft {
                collection: "1.00".to_string(),
                ..LogDraft::default()
            },
        )
        .unwrap();

        assert_eq!(loc.logs[1].collection_cents, Some(100));
        assert_eq!(loc.last_collection(), Some(Money::from_cents(15000)));
        assert_eq!(loc.last_visited, Some(date(25)));
        assert_mirrors_head(&loc);
    }

    #[test]
    fn test_remove_head_cascades_to_previous_log() {
        let mut loc = location();
        loc.add_log(log(20, 10000, 2500)); // older, different snapshot
        loc.add_log(log(25, 15000, 4000));

        loc.remove_log(0).unwrap();

        assert_eq!(loc.logs.len(), 1);
        assert_eq!(loc.last_visited, Some(date(20)));
        assert_eq!(loc.last_collection(), Some(Money::from_cents(10000)));
        // delete-of-head adopts the newly exposed head's snapshot
        assert_eq!(loc.commission_rate_bps, 2500);
        assert_mirrors_head(&loc);
    }

    #[test]
    fn test_remove_to_empty_resets_defaults() {
        let mut loc = location();
        loc.add_log(log(25, 15000, 4000));

        loc.remove_log(0).unwrap();

        assert!(loc.logs.is_empty());
        assert_eq!(loc.last_visited, None);
        assert_eq!(loc.last_collection_cents, None);
        assert!(loc.bills.is_empty());
        assert!(loc.log_notes.is_empty());
        assert_mirrors_head(&loc);
    }

    #[test]
    fn test_remove_older_log_leaves_mirror_untouched() {
        let mut loc = location();
        loc.add_log(log(20, 10000, 4000));
        loc.add_log(log(25, 15000, 4000));

        loc.remove_log(1).unwrap();

        assert_eq!(loc.logs.len(), 1);
        assert_eq!(loc.last_visited, Some(date(25)));
        assert_eq!(loc.last_collection(), Some(Money::from_cents(15000)));
        assert_mirrors_head(&loc);
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let mut loc = location();
        loc.add_log(log(25, 15000, 4000));

        assert!(matches!(
            loc.remove_log(5),
            Err(CoreError::LogIndexOutOfRange { index: 5, len: 1 })
        ));
        assert!(matches!(
            loc.edit_log(1, &LogDraft::default()),
            Err(CoreError::LogIndexOutOfRange { .. })
        ));
        // the failed mutation left everything alone
        assert_eq!(loc.logs.len(), 1);
        assert_mirrors_head(&loc);
    }

    #[test]
    fn test_mirror_invariant_across_operation_sequences() {
        // Exhaustively drive add/edit/remove sequences and check the mirror
        // after every single step.
        let mut loc = location();

        let steps: Vec<Box<dyn Fn(&mut Location)>> = vec![
            Box::new(|l| l.add_log(log(18, 5000, 3000))),
            Box::new(|l| l.add_log(log(20, 10000, 4000))),
            Box::new(|l| {
                l.edit_log(0, &LogDraft {
                    collection: "99.00".to_string(),
                    ..LogDraft::default()
                })
                .unwrap()
            }),
            Box::new(|l| l.add_log(log(25, 15000, 5000))),
            Box::new(|l| {
                l.edit_log(2, &LogDraft {
                    notes: "oldest".to_string(),
                    ..LogDraft::default()
                })
                .unwrap()
            }),
            Box::new(|l| l.remove_log(1).unwrap()),
            Box::new(|l| l.remove_log(0).unwrap()),
            Box::new(|l| l.remove_log(0).unwrap()),
            Box::new(|l| l.add_log(log(26, 100, 4000))),
        ];

        for step in steps {
            step(&mut loc);
            assert_mirrors_head(&loc);
        }
        assert_eq!(loc.logs.len(), 1);
    }

    #[test]
    fn test_apply_details_preserves_history_and_mirror() {
        let mut loc = location();
        loc.add_log(log(25, 15000, 4000));

        loc.apply_details(LocationDetails {
            name: "Cafe Central (renamed)".to_string(),
            commission_rate_bps: 5000,
            change_machine_count: 2,
            ..LocationDetails::default()
        })
        .unwrap();

        assert_eq!(loc.name, "Cafe Central (renamed)");
        assert_eq!(loc.commission_rate_bps, 5000);
        // history keeps its frozen snapshot
        assert_eq!(loc.logs[0].commission_rate_bps, 4000);
        assert_mirrors_head(&loc);
    }

    #[test]
    fn test_recently_visited_window() {
        let mut loc = location();
        loc.add_log(log(20, 10000, 4000));

        assert!(loc.is_recently_visited(date(26))); // 6 days later
        assert!(!loc.is_recently_visited(NaiveDate::from_ymd_opt(2026, 9, 15).unwrap()));

        let pending = location();
        assert!(!pending.is_recently_visited(date(26)));
    }

    #[test]
    fn test_legacy_boolean_change_machine_field() {
        let json = r#"{
            "id": "loc-9",
            "name": "Old Doc",
            "hasChangeMachine": true,
            "lastVisited": null,
            "lastCollectionCents": null,
            "createdAt": "2026-08-26T08:00:00Z"
        }"#;
        let loc: Location = serde_json::from_str(json).unwrap();
        assert_eq!(loc.change_machine_count, 1);
        assert_eq!(loc.commission_rate_bps, 4000); // default applied
    }

    #[test]
    fn test_document_round_trip() {
        let mut loc = location();
        loc.add_log(log(25, 24500, 4000));
        loc.notes = "Key under the mat".to_string();

        let json = serde_json::to_string(&loc).unwrap();
        let back: Location = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, loc.id);
        assert_eq!(back.logs.len(), 1);
        assert_eq!(back.last_collection_cents, Some(24500));
        assert_eq!(back.logs[0].id, loc.logs[0].id);
    }
}
