//! # Location Repository
//!
//! Database operations for location documents.
//!
//! ## Storage Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Whole-Document Storage                               │
//! │                                                                         │
//! │  locations table                                                        │
//! │  ┌──────────┬──────────────────────────────┬────────────┬───────────┐  │
//! │  │ id       │ doc (JSON)                   │ sort_order │ *_at      │  │
//! │  ├──────────┼──────────────────────────────┼────────────┼───────────┤  │
//! │  │ uuid-1   │ {"name":"Cafe Central",      │     0      │ ISO-8601  │  │
//! │  │          │  "logs":[...], "bills":{...}}│            │           │  │
//! │  │ uuid-2   │ {"name":"Brooklyn Deli", ...}│     1      │ ISO-8601  │  │
//! │  └──────────┴──────────────────────────────┴────────────┴───────────┘  │
//! │                                                                         │
//! │  Every write replaces the full document, so a location's logs and      │
//! │  derived fields can never drift apart on disk: they were serialized    │
//! │  from the same in-memory aggregate.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Not query! Macros?
//! The aggregate lives in a schemaless JSON column; there is no typed row
//! shape for the macros to verify against, so queries here are runtime-bound.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use cashroute_core::Location;

/// Repository for location database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = LocationRepository::new(pool);
///
/// let all = repo.list_all().await?;
/// let one = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct LocationRepository {
    pool: SqlitePool,
}

impl LocationRepository {
    /// Creates a new LocationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LocationRepository { pool }
    }

    /// Lists all locations ordered by their manual sort position.
    ///
    /// This is the route list: every location, every time. The dataset is a
    /// single operator's customer base (tens to low hundreds of rows), so
    /// there is no pagination.
    pub async fn list_all(&self) -> DbResult<Vec<Location>> {
        let rows = sqlx::query(
            r#"
            SELECT id, doc
            FROM locations
            ORDER BY sort_order, created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut locations = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let doc: String = row.get("doc");
            locations.push(decode_document(&id, &doc)?);
        }

        debug!(count = locations.len(), "Listed locations");
        Ok(locations)
    }

    /// Gets a location by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Location))` - Location found
    /// * `Ok(None)` - Location not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Location>> {
        let row = sqlx::query(
            r#"
            SELECT id, doc
            FROM locations
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let doc: String = row.get("doc");
                Ok(Some(decode_document(id, &doc)?))
            }
            None => Ok(None),
        }
    }

    /// Inserts a new location document.
    pub async fn insert(&self, location: &Location) -> DbResult<()> {
        let doc = encode_document(location)?;
        let now = Utc::now().to_rfc3339();
        let created_at = location.created_at.to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO locations (id, doc, sort_order, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&location.id)
        .bind(&doc)
        .bind(location.order)
        .bind(&created_at)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(id = %location.id, name = %location.name, "Inserted location");
        Ok(())
    }

    /// Replaces a location's full document.
    ///
    /// The sort_order column is refreshed from the aggregate so ORDER BY
    /// stays consistent with the document.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No row with this ID exists
    pub async fn update(&self, location: &Location) -> DbResult<()> {
        let doc = encode_document(location)?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            UPDATE locations
            SET doc = ?2, sort_order = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&location.id)
        .bind(&doc)
        .bind(location.order)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Location", &location.id));
        }

        debug!(id = %location.id, "Updated location");
        Ok(())
    }

    /// Deletes a location.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No row with this ID exists
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM locations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Location", id));
        }

        debug!(id = %id, "Deleted location");
        Ok(())
    }

    /// Applies a batch of (id, sort_order) assignments in one transaction.
    ///
    /// Used by drag-and-drop reordering: the caller sends the complete new
    /// ordering and either every position updates or none do. The sort
    /// position is also patched into each document so the stored aggregate
    /// agrees with the column.
    pub async fn set_sort_orders(&self, orders: &[(String, i64)]) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        for (id, sort_order) in orders {
            sqlx::query(
                r#"
                UPDATE locations
                SET sort_order = ?2,
                    doc = json_set(doc, '$.order', ?2),
                    updated_at = ?3
                WHERE id = ?1
                "#,
            )
            .bind(id)
            .bind(sort_order)
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(count = orders.len(), "Applied sort order batch");
        Ok(())
    }

    /// Returns the sort position for a newly added location: one past the
    /// current maximum, or 0 for an empty table.
    pub async fn next_sort_order(&self) -> DbResult<i64> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(sort_order) FROM locations")
            .fetch_one(&self.pool)
            .await?;

        Ok(max.map_or(0, |m| m + 1))
    }

    /// Counts all locations.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes every location. Used by the demo-data loader.
    pub async fn clear_all(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM locations")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn encode_document(location: &Location) -> DbResult<String> {
    serde_json::to_string(location)
        .map_err(|e| DbError::Internal(format!("Failed to encode location {}: {}", location.id, e)))
}

fn decode_document(id: &str, doc: &str) -> DbResult<Location> {
    serde_json::from_str(doc).map_err(|e| DbError::decode("Location", id, e))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use cashroute_core::{BillCounts, CommissionRate, Location, LocationDetails, LogDraft, VisitLog};
    use chrono::NaiveDate;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn location(name: &str, order: i64) -> Location {
        Location::new(
            uuid::Uuid::new_v4().to_string(),
            LocationDetails {
                name: name.to_string(),
                region: "Center".to_string(),
                ..LocationDetails::default()
            },
            order,
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = db().await;
        let repo = db.locations();

        let mut loc = location("Cafe Central", 0);
        let today = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        let log = VisitLog::create(
            &LogDraft {
                collection: "245.00".to_string(),
                bills: BillCounts { fifty: 4, ..BillCounts::empty() },
                notes: "machine jammed".to_string(),
                ..LogDraft::default()
            },
            CommissionRate::default(),
            "Mardi",
            today,
            Utc::now(),
        )
        .unwrap();
        loc.add_log(log);

        repo.insert(&loc).await.unwrap();

        let loaded = repo.get_by_id(&loc.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Cafe Central");
        assert_eq!(loaded.logs.len(), 1);
        assert_eq!(loaded.last_collection_cents, Some(24500));
        assert_eq!(loaded.log_notes, "machine jammed");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let db = db().await;
        let found = db.locations().get_by_id("nope").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_all_respects_sort_order() {
        let db = db().await;
        let repo = db.locations();

        repo.insert(&location("Second", 1)).await.unwrap();
        repo.insert(&location("First", 0)).await.unwrap();
        repo.insert(&location("Third", 2)).await.unwrap();

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();

        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_update_replaces_document() {
        let db = db().await;
        let repo = db.locations();

        let mut loc = location("Original", 0);
        repo.insert(&loc).await.unwrap();

        loc.notes = "Key under the mat".to_string();
        repo.update(&loc).await.unwrap();

        let loaded = repo.get_by_id(&loc.id).await.unwrap().unwrap();
        assert_eq!(loaded.notes, "Key under the mat");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = db().await;
        let loc = location("Ghost", 0);

        let result = db.locations().update(&loc).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = db().await;
        let result = db.locations().delete("nope").await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_next_sort_order_appends_to_end() {
        let db = db().await;
        let repo = db.locations();

        assert_eq!(repo.next_sort_order().await.unwrap(), 0);

        repo.insert(&location("A", 0)).await.unwrap();
        repo.insert(&location("B", 5)).await.unwrap();

        assert_eq!(repo.next_sort_order().await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_set_sort_orders_batch() {
        let db = db().await;
        let repo = db.locations();

        let a = location("A", 0);
        let b = location("B", 1);
        repo.insert(&a).await.unwrap();
        repo.insert(&b).await.unwrap();

        // swap them
        repo.set_sort_orders(&[(a.id.clone(), 1), (b.id.clone(), 0)])
            .await
            .unwrap();

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, vec!["B", "A"]);

        // the documents themselves carry the new positions
        let a_doc = repo.get_by_id(&a.id).await.unwrap().unwrap();
        assert_eq!(a_doc.order, 1);
    }
}
