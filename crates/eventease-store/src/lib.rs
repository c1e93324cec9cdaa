//! Durable client storage for eventease
//!
//! A string-valued key-value store holding whole-collection snapshots:
//! - `user`: the current session identity
//! - `events`: the event catalog
//! - `bookings`: all bookings
//!
//! An absent key means the collection was never initialized; a present empty
//! array means it was deliberately emptied.

mod memory;
mod snapshot;
mod sqlite;
mod traits;

pub use memory::*;
pub use snapshot::*;
pub use sqlite::*;
pub use traits::*;

use thiserror::Error;

/// Storage key for the persisted session identity
pub const USER_KEY: &str = "user";

/// Storage key for the event collection
pub const EVENTS_KEY: &str = "events";

/// Storage key for the booking collection
pub const BOOKINGS_KEY: &str = "bookings";

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
