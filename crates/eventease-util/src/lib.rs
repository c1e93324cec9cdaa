//! Shared utilities for eventease
//!
//! This crate provides:
//! - ID types (EventId, BookingId, UserId)
//! - Clock helpers (wall-clock now/today with debug mock time)
//! - Default paths for config and data directories
//! - Display formatting for prices

mod format;
mod ids;
mod paths;
mod time;

pub use format::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
