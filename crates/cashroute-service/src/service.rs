//! # Location Service
//!
//! The application-level operations: each one loads an aggregate, applies a
//! pure domain transition, persists the whole document, then broadcasts a
//! change event.
//!
//! ## Operation Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Every Mutation Follows One Shape                     │
//! │                                                                         │
//! │  1. LOAD      repo.get_by_id(id)        → Location (or NOT_FOUND)      │
//! │  2. GATE      can_mutate_log(...)       → or PERMISSION_DENIED         │
//! │  3. MUTATE    location.add_log(...)     → pure, in memory              │
//! │  4. PERSIST   repo.update(&location)    → whole document               │
//! │  5. NOTIFY    events.emit(...)          → after the write lands        │
//! │                                                                         │
//! │  Steps 3 never touches I/O and step 4 writes the full aggregate, so    │
//! │  the stored logs and derived fields always come from the same state.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent writers are last-writer-wins at the document level; the tool
//! is used by a handful of people who rarely touch the same site at once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use cashroute_core::{
    can_mutate_log, validation::validate_notes, Clock, Location, LocationDetails, LogDraft, User,
    VisitLog,
};
use cashroute_db::Database;

use crate::error::{ServiceError, ServiceResult};
use crate::events::{ChangeEvent, EventBus};

// =============================================================================
// Clock
// =============================================================================

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// =============================================================================
// LocationService
// =============================================================================

/// Application service for the route list and its collection logs.
///
/// Cheap to clone; clones share the pool, the clock, and the event bus.
///
/// ## Usage
/// ```rust,ignore
/// let service = LocationService::new(db);
/// let mut events = service.subscribe();
///
/// let location = service.add_location(details).await?;
/// service.add_log(&location.id, &user, draft).await?;
/// ```
#[derive(Clone)]
pub struct LocationService {
    db: Database,
    clock: Arc<dyn Clock>,
    events: EventBus,
}

impl LocationService {
    /// Creates a service using the system clock.
    pub fn new(db: Database) -> Self {
        LocationService::with_clock(db, Arc::new(SystemClock))
    }

    /// Creates a service with an injected clock (tests pin "now").
    pub fn with_clock(db: Database, clock: Arc<dyn Clock>) -> Self {
        LocationService {
            db,
            clock,
            events: EventBus::new(),
        }
    }

    /// Subscribes to change events emitted by this service (and its clones).
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lists every location in manual sort order.
    pub async fn list_locations(&self) -> ServiceResult<Vec<Location>> {
        Ok(self.db.locations().list_all().await?)
    }

    /// Gets one location by ID.
    pub async fn get_location(&self, id: &str) -> ServiceResult<Location> {
        self.db
            .locations()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Location", id))
    }

    // =========================================================================
    // Location lifecycle
    // =========================================================================

    /// Creates a new location at the end of the route list.
    pub async fn add_location(&self, details: LocationDetails) -> ServiceResult<Location> {
        let repo = self.db.locations();

        let order = repo.next_sort_order().await?;
        let location = Location::new(
            Uuid::new_v4().to_string(),
            details,
            order,
            self.clock.now(),
        )?;

        repo.insert(&location).await?;
        info!(id = %location.id, name = %location.name, "Added location");

        self.events.emit(ChangeEvent::LocationAdded {
            id: location.id.clone(),
        });
        Ok(location)
    }

    /// Replaces a location's descriptive fields.
    ///
    /// Changing the commission rate here only affects future logs; frozen
    /// snapshots in the history keep the rate they were recorded at.
    pub async fn update_details(
        &self,
        id: &str,
        details: LocationDetails,
    ) -> ServiceResult<Location> {
        let mut location = self.get_location(id).await?;
        location.apply_details(details)?;

        self.db.locations().update(&location).await?;
        debug!(id = %id, "Updated location details");

        self.events.emit(ChangeEvent::LocationUpdated { id: id.to_string() });
        Ok(location)
    }

    /// Replaces a location's customer-level notes.
    pub async fn update_notes(&self, id: &str, notes: String) -> ServiceResult<Location> {
        validate_notes(&notes)?;

        let mut location = self.get_location(id).await?;
        location.notes = notes;

        self.db.locations().update(&location).await?;
        debug!(id = %id, "Updated location notes");

        self.events.emit(ChangeEvent::LocationUpdated { id: id.to_string() });
        Ok(location)
    }

    /// Deletes a location and its embedded history.
    pub async fn remove_location(&self, id: &str) -> ServiceResult<()> {
        self.db.locations().delete(id).await?;
        info!(id = %id, "Removed location");

        self.events.emit(ChangeEvent::LocationRemoved { id: id.to_string() });
        Ok(())
    }

    /// Applies a complete new ordering of the route list.
    ///
    /// `ids` is every location ID in the desired display order; positions
    /// are assigned 0..n and written in one transaction.
    pub async fn reorder_locations(&self, ids: &[String]) -> ServiceResult<()> {
        let orders: Vec<(String, i64)> = ids
            .iter()
            .enumerate()
            .map(|(position, id)| (id.clone(), position as i64))
            .collect();

        self.db.locations().set_sort_orders(&orders).await?;
        debug!(count = ids.len(), "Reordered locations");

        self.events.emit(ChangeEvent::LocationsReordered);
        Ok(())
    }

    // =========================================================================
    // Log operations
    // =========================================================================

    /// Records a new visit for a location.
    ///
    /// The draft's omitted fields take their defaults: today's date and the
    /// location's current commission rate (frozen into the log).
    pub async fn add_log(
        &self,
        id: &str,
        user: &User,
        draft: &LogDraft,
    ) -> ServiceResult<Location> {
        let mut location = self.get_location(id).await?;

        let log = VisitLog::create(
            draft,
            location.commission_rate(),
            &user.name,
            self.clock.today(),
            self.clock.now(),
        )?;

        location.add_log(log);
        self.db.locations().update(&location).await?;
        info!(id = %id, user = %user.name, "Added collection log");

        self.events.emit(ChangeEvent::LocationUpdated { id: id.to_string() });
        Ok(location)
    }

    /// Edits the log at `index` (0 = newest) with a full replacement draft.
    ///
    /// ## Errors
    /// * `PERMISSION_DENIED` - The user may not touch this log
    /// * `VALIDATION_ERROR` - Index out of range or invalid draft fields
    pub async fn edit_log(
        &self,
        id: &str,
        user: &User,
        index: usize,
        draft: &LogDraft,
    ) -> ServiceResult<Location> {
        let mut location = self.get_location(id).await?;
        self.check_log_permission(&location, user, index)?;

        location.edit_log(index, draft)?;
        self.db.locations().update(&location).await?;
        info!(id = %id, index, user = %user.name, "Edited collection log");

        self.events.emit(ChangeEvent::LocationUpdated { id: id.to_string() });
        Ok(location)
    }

    /// Deletes the log at `index` (0 = newest).
    ///
    /// Deleting the newest log promotes the previous one into the current
    /// fields, including its commission rate snapshot.
    pub async fn remove_log(
        &self,
        id: &str,
        user: &User,
        index: usize,
    ) -> ServiceResult<Location> {
        let mut location = self.get_location(id).await?;
        self.check_log_permission(&location, user, index)?;

        location.remove_log(index)?;
        self.db.locations().update(&location).await?;
        info!(id = %id, index, user = %user.name, "Removed collection log");

        self.events.emit(ChangeEvent::LocationUpdated { id: id.to_string() });
        Ok(location)
    }

    /// Gates a log mutation on the permission policy.
    fn check_log_permission(
        &self,
        location: &Location,
        user: &User,
        index: usize,
    ) -> ServiceResult<()> {
        let log = location.logs.get(index).ok_or_else(|| {
            ServiceError::from(cashroute_core::CoreError::LogIndexOutOfRange {
                index,
                len: location.logs.len(),
            })
        })?;

        if !can_mutate_log(user, log, index, self.clock.now()) {
            warn!(
                location = %location.id,
                user = %user.name,
                index,
                "Log mutation denied"
            );
            return Err(ServiceError::permission_denied(
                "Only admins can change older logs or other users' entries",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cashroute_core::{BillCounts, Role};
    use cashroute_db::DbConfig;
    use chrono::NaiveDate;

    /// Clock pinned to 2026-08-26 12:00 UTC.
    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            NaiveDate::from_ymd_opt(2026, 8, 26)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc()
        }
    }

    async fn service() -> LocationService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        LocationService::with_clock(db, Arc::new(FixedClock))
    }

    fn details(name: &str) -> LocationDetails {
        LocationDetails {
            name: name.to_string(),
            region: "Center".to_string(),
            commission_rate_bps: 4000,
            ..LocationDetails::default()
        }
    }

    fn admin() -> User {
        User::new("u1", "Boss", Role::Admin)
    }

    fn employee() -> User {
        User::new("u2", "Mardi", Role::Employee)
    }

    fn draft(collection: &str) -> LogDraft {
        LogDraft {
            collection: collection.to_string(),
            bills: BillCounts { twenty: 2, ..BillCounts::empty() },
            ..LogDraft::default()
        }
    }

    #[tokio::test]
    async fn test_add_location_appends_in_order() {
        let service = service().await;

        let a = service.add_location(details("First")).await.unwrap();
        let b = service.add_location(details("Second")).await.unwrap();
        assert_eq!(a.order, 0);
        assert_eq!(b.order, 1);

        let names: Vec<String> = service
            .list_locations()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_add_location_rejects_blank_name() {
        let service = service().await;
        let result = service.add_location(details("  ")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_add_log_freezes_location_rate() {
        let service = service().await;
        let loc = service.add_location(details("Cafe")).await.unwrap();

        let updated = service
            .add_log(&loc.id, &employee(), &draft("245.00"))
            .await
            .unwrap();

        assert_eq!(updated.logs.len(), 1);
        assert_eq!(updated.logs[0].commission_rate_bps, 4000);
        assert_eq!(updated.logs[0].user, "Mardi");
        assert_eq!(updated.last_collection_cents, Some(24500));
        assert_eq!(updated.last_visited, NaiveDate::from_ymd_opt(2026, 8, 26));

        // persisted, not just in memory
        let reloaded = service.get_location(&loc.id).await.unwrap();
        assert_eq!(reloaded.logs.len(), 1);
    }

    #[tokio::test]
    async fn test_rate_change_applies_to_future_logs_only() {
        let service = service().await;
        let loc = service.add_location(details("Cafe")).await.unwrap();
        service
            .add_log(&loc.id, &admin(), &draft("100.00"))
            .await
            .unwrap();

        let mut new_details = details("Cafe");
        new_details.commission_rate_bps = 2500;
        service.update_details(&loc.id, new_details).await.unwrap();

        let updated = service
            .add_log(&loc.id, &admin(), &draft("100.00"))
            .await
            .unwrap();

        assert_eq!(updated.logs[0].commission_rate_bps, 2500);
        assert_eq!(updated.logs[1].commission_rate_bps, 4000);
    }

    #[tokio::test]
    async fn test_employee_can_fix_own_fresh_log() {
        let service = service().await;
        let loc = service.add_location(details("Cafe")).await.unwrap();
        service
            .add_log(&loc.id, &employee(), &draft("100.00"))
            .await
            .unwrap();

        let updated = service
            .edit_log(&loc.id, &employee(), 0, &draft("110.00"))
            .await
            .unwrap();
        assert_eq!(updated.last_collection_cents, Some(11000));
    }

    #[tokio::test]
    async fn test_employee_cannot_touch_others_logs() {
        let service = service().await;
        let loc = service.add_location(details("Cafe")).await.unwrap();
        service
            .add_log(&loc.id, &admin(), &draft("100.00"))
            .await
            .unwrap();

        let err = service
            .edit_log(&loc.id, &employee(), 0, &draft("110.00"))
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn test_employee_cannot_touch_older_logs() {
        let service = service().await;
        let loc = service.add_location(details("Cafe")).await.unwrap();
        service
            .add_log(&loc.id, &employee(), &draft("100.00"))
            .await
            .unwrap();
        service
            .add_log(&loc.id, &employee(), &draft("120.00"))
            .await
            .unwrap();

        let err = service
            .remove_log(&loc.id, &employee(), 1)
            .await
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn test_admin_delete_head_promotes_previous_snapshot() {
        let service = service().await;
        let loc = service.add_location(details("Cafe")).await.unwrap();
        service
            .add_log(&loc.id, &admin(), &draft("100.00"))
            .await
            .unwrap();

        let mut cheaper = details("Cafe");
        cheaper.commission_rate_bps = 2500;
        service.update_details(&loc.id, cheaper).await.unwrap();
        service
            .add_log(&loc.id, &admin(), &draft("200.00"))
            .await
            .unwrap();

        let updated = service.remove_log(&loc.id, &admin(), 0).await.unwrap();

        assert_eq!(updated.logs.len(), 1);
        assert_eq!(updated.last_collection_cents, Some(10000));
        // the promoted head's frozen rate becomes the headline rate again
        assert_eq!(updated.commission_rate_bps, 4000);
    }

    #[tokio::test]
    async fn test_out_of_range_log_index_is_validation_error() {
        let service = service().await;
        let loc = service.add_location(details("Cafe")).await.unwrap();

        let err = service.remove_log(&loc.id, &admin(), 0).await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_reorder_locations() {
        let service = service().await;
        let a = service.add_location(details("A")).await.unwrap();
        let b = service.add_location(details("B")).await.unwrap();
        let c = service.add_location(details("C")).await.unwrap();

        service
            .reorder_locations(&[c.id.clone(), a.id.clone(), b.id.clone()])
            .await
            .unwrap();

        let names: Vec<String> = service
            .list_locations()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_mutations_emit_events() {
        let service = service().await;
        let mut rx = service.subscribe();

        let loc = service.add_location(details("Cafe")).await.unwrap();
        service
            .add_log(&loc.id, &admin(), &draft("100.00"))
            .await
            .unwrap();
        service.remove_location(&loc.id).await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            ChangeEvent::LocationAdded { id: loc.id.clone() }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            ChangeEvent::LocationUpdated { id: loc.id.clone() }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            ChangeEvent::LocationRemoved { id: loc.id.clone() }
        );
    }

    #[tokio::test]
    async fn test_get_missing_location_is_not_found() {
        let service = service().await;
        let err = service.get_location("nope").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_update_notes() {
        let service = service().await;
        let loc = service.add_location(details("Cafe")).await.unwrap();

        service
            .update_notes(&loc.id, "Key under the mat".to_string())
            .await
            .unwrap();

        let reloaded = service.get_location(&loc.id).await.unwrap();
        assert_eq!(reloaded.notes, "Key under the mat");
    }
}
