//! # cashroute-service: Application Layer for Cashroute
//!
//! The orchestration layer: loads location aggregates from the database,
//! applies the pure transitions from `cashroute-core`, enforces the
//! permission policy, persists whole documents, and broadcasts change
//! events to subscribers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cashroute Control Flow                             │
//! │                                                                         │
//! │  Caller (UI shell, CLI, tests)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                cashroute-service (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌──────────────┐    │   │
//! │  │   │LocationService│   │   EventBus    │   │ ServiceError │    │   │
//! │  │   │ (service.rs)  │──►│  (events.rs)  │   │  (error.rs)  │    │   │
//! │  │   │               │   │ broadcast     │   │ stable codes │    │   │
//! │  │   │ load→mutate→  │   │ fan-out       │   │              │    │   │
//! │  │   │ persist→notify│   │               │   │              │    │   │
//! │  │   └──────┬────────┘   └───────────────┘   └──────────────┘    │   │
//! │  └──────────┼──────────────────────────────────────────────────────┘  │
//! │             │                                                          │
//! │     ┌───────┴────────┐                                                 │
//! │     ▼                ▼                                                 │
//! │  cashroute-core   cashroute-db                                        │
//! │  (pure logic)     (SQLite documents)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cashroute_db::{Database, DbConfig};
//! use cashroute_service::LocationService;
//!
//! let db = Database::new(DbConfig::new("./cashroute.db")).await?;
//! let service = LocationService::new(db);
//!
//! let mut events = service.subscribe();
//! let location = service.add_location(details).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod events;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ErrorCode, ServiceError, ServiceResult};
pub use events::{ChangeEvent, EventBus};
pub use service::{LocationService, SystemClock};
