//! # Permission Policy
//!
//! Who may change what. Two roles only:
//!
//! ```text
//! ┌───────────┬──────────────────────────────────────────────────────────┐
//! │ admin     │ full access: any log, any index, any age                 │
//! ├───────────┼──────────────────────────────────────────────────────────┤
//! │ employee  │ may edit/delete ONLY the newest log (index 0), ONLY if   │
//! │           │ they recorded it themselves, ONLY within 24 hours of the │
//! │           │ visit date                                               │
//! └───────────┴──────────────────────────────────────────────────────────┘
//! ```
//!
//! The 24-hour window is measured from UTC midnight of the log's visit
//! date, so a log dated today stays editable until tomorrow's midnight
//! regardless of the hour it was entered.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::log::VisitLog;

// =============================================================================
// Roles
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

impl Role {
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// An authenticated operator of the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// Display name; logs record this as their author.
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> User {
        User {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

// =============================================================================
// Clock
// =============================================================================

/// Time source. Pure logic never calls the system clock directly; callers
/// inject one so tests can pin "now" to a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

// =============================================================================
// Policy
// =============================================================================

/// How long after a visit's date an employee may still correct their own
/// newest log.
pub const EMPLOYEE_EDIT_WINDOW_HOURS: i64 = 24;

/// Whether `user` may edit or delete the log at `index`.
///
/// ## Rules
/// - admins: always
/// - employees: only the head log (index 0), only if they authored it,
///   and only while `now` is within 24 hours of the visit date's UTC
///   midnight
///
/// Viewing is unrestricted; this gate covers mutation only.
pub fn can_mutate_log(user: &User, log: &VisitLog, index: usize, now: DateTime<Utc>) -> bool {
    if user.role.is_admin() {
        return true;
    }
    if index != 0 {
        return false;
    }
    if log.user != user.name {
        return false;
    }

    let visit_start = log.date.and_time(chrono::NaiveTime::MIN).and_utc();
    let age = now - visit_start;
    age.num_hours() < EMPLOYEE_EDIT_WINDOW_HOURS
}
