//! Session and catalog stores for eventease
//!
//! This crate is the behavioral core of eventease:
//! - Session store (Unauthenticated <-> Authenticated, persisted identity)
//! - Catalog store (events and bookings, cascade delete, booking rules)
//! - Derived read views and dashboard statistics
//! - Notices for every login, logout and mutation
//!
//! Both stores are plain values constructed over a shared
//! [`eventease_store::KeyValueStore`]; they never read each other.

mod catalog;
mod directory;
mod notify;
mod seed;
mod session;
mod stats;

pub use catalog::*;
pub use directory::*;
pub use notify::*;
pub use seed::*;
pub use session::*;
pub use stats::*;
