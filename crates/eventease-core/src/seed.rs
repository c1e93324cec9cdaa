//! Demonstration dataset loaded when nothing was ever persisted

use eventease_api::{Booking, Event};

const DEMO_EVENTS: &str = include_str!("demo/events.json");
const DEMO_BOOKINGS: &str = include_str!("demo/bookings.json");

/// The six demo events
pub fn demo_events() -> serde_json::Result<Vec<Event>> {
    serde_json::from_str(DEMO_EVENTS)
}

/// Two demo bookings held by the demo user "2"
pub fn demo_bookings() -> serde_json::Result<Vec<Booking>> {
    serde_json::from_str(DEMO_BOOKINGS)
}
