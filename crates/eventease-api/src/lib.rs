//! Domain types for eventease
//!
//! This crate defines the shapes shared by the stores and their consumers:
//! - Events, bookings and identities (as persisted to client storage)
//! - Notices (transient user-facing messages)
//! - Read-only listing queries over the catalog

mod notices;
mod query;
mod types;

pub use notices::*;
pub use query::*;
pub use types::*;
