//! # Repository Module
//!
//! Database repository implementations for Cashroute.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service Operation                                                     │
//! │       │                                                                 │
//! │       │  db.locations().get_by_id(&id)                                 │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  LocationRepository                                                    │
//! │  ├── list_all(&self)                                                   │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, location)                                           │
//! │  ├── update(&self, location)                                           │
//! │  └── set_sort_orders(&self, orders)                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test against an in-memory database                          │
//! │  • SQL is isolated in one place                                        │
//! │  • Can swap database implementations                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`location::LocationRepository`] - Location document CRUD and ordering

pub mod location;
