//! Admin dashboard figures

use chrono::NaiveDate;
use eventease_api::{Booking, BookingStatus, Event, EventCategory};
use eventease_util::EventId;
use serde::Serialize;

use crate::UNKNOWN_EVENT_NAME;

/// Number of entries in [`CatalogStats::top_events`]
pub const TOP_EVENTS_LIMIT: usize = 5;

/// Bookings held by one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventBookingCount {
    pub event_id: EventId,
    pub name: String,
    pub bookings: usize,
}

/// Bookings across all events of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBookingCount {
    pub category: EventCategory,
    pub bookings: usize,
}

/// Snapshot of catalog totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_events: usize,
    /// Events dated today or later
    pub upcoming_events: usize,
    pub total_bookings: usize,
    /// One entry per status, in [`BookingStatus::ALL`] order
    pub bookings_by_status: Vec<(BookingStatus, usize)>,
    /// Most-booked events, descending; ties keep the order in which the
    /// event was first booked
    pub top_events: Vec<EventBookingCount>,
    /// Categories in the order they first appear among events, including
    /// categories whose events have no bookings
    pub bookings_by_category: Vec<CategoryBookingCount>,
}

impl CatalogStats {
    pub fn compute(events: &[Event], bookings: &[Booking], today: NaiveDate) -> Self {
        let bookings_by_status = BookingStatus::ALL
            .into_iter()
            .map(|status| (status, bookings.iter().filter(|b| b.status == status).count()))
            .collect();

        // Group by event id in order of first booking
        let mut per_event: Vec<(&EventId, usize)> = Vec::new();
        for booking in bookings {
            match per_event.iter_mut().find(|(id, _)| *id == &booking.event_id) {
                Some((_, count)) => *count += 1,
                None => per_event.push((&booking.event_id, 1)),
            }
        }
        per_event.sort_by(|a, b| b.1.cmp(&a.1));

        let top_events = per_event
            .into_iter()
            .take(TOP_EVENTS_LIMIT)
            .map(|(id, count)| EventBookingCount {
                event_id: id.clone(),
                name: events
                    .iter()
                    .find(|e| &e.id == id)
                    .map(|e| e.name.clone())
                    .unwrap_or_else(|| UNKNOWN_EVENT_NAME.to_string()),
                bookings: count,
            })
            .collect();

        let mut bookings_by_category: Vec<CategoryBookingCount> = Vec::new();
        for event in events {
            let count = bookings.iter().filter(|b| b.event_id == event.id).count();
            match bookings_by_category
                .iter_mut()
                .find(|c| c.category == event.category)
            {
                Some(entry) => entry.bookings += count,
                None => bookings_by_category.push(CategoryBookingCount {
                    category: event.category,
                    bookings: count,
                }),
            }
        }

        Self {
            total_events: events.len(),
            upcoming_events: events.iter().filter(|e| e.date >= today).count(),
            total_bookings: bookings.len(),
            bookings_by_status,
            top_events,
            bookings_by_category,
        }
    }

    pub fn status_count(&self, status: BookingStatus) -> usize {
        self.bookings_by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}
