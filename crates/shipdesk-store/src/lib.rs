//! # shipdesk-store
//!
//! Local storage for the Shipdesk dashboard.
//!
//! Persisted state is an opaque key/value map (the same shape the browser
//! build keeps in `localStorage`). The [`KeyValueStore`] port has an
//! in-memory implementation for tests and a SQLite-backed one for durable
//! local use. Shipment and user repositories keep each collection as a
//! single JSON array under its own key.

pub mod database;
pub mod kv;
pub mod memory;
pub mod migrations;
pub mod seed;
pub mod shipments;
pub mod users;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use kv::{KeyValueStore, StoreBackend};
pub use memory::MemoryStore;
pub use shipments::{ApiLatency, StoredShipmentRepository};
pub use users::StoredUserRepository;
