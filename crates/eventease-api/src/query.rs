//! Read-only listing queries over the catalog
//!
//! These mirror the filters offered by the event listing, home page and admin
//! tables. None of them mutate anything; they take slices and return fresh
//! vectors in a well-defined order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Booking, BookingStatus, Event, ParseEnumError};

/// Number of featured events shown on the home page
pub const FEATURED_LIMIT: usize = 3;

/// Number of upcoming events shown on the home page
pub const UPCOMING_LIMIT: usize = 6;

/// Sort order for the event listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "date-asc")]
    DateAsc,
    #[serde(rename = "date-desc")]
    DateDesc,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateAsc => "date-asc",
            SortKey::DateDesc => "date-desc",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-asc" => Ok(SortKey::DateAsc),
            "date-desc" => Ok(SortKey::DateDesc),
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            other => Err(ParseEnumError {
                kind: "sort key",
                value: other.to_string(),
            }),
        }
    }
}

/// Event listing query, as driven by the `category`, `search` and `sortBy`
/// query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// Raw category name. An unrecognized name matches no event.
    pub category: Option<String>,
    pub search: Option<String>,
    /// Unknown sort keys are dropped and leave insertion order intact.
    pub sort_by: Option<SortKey>,
}

impl EventQuery {
    /// Build a query from query-string pairs. Empty values count as absent.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = EventQuery::default();
        for (key, value) in params {
            if value.is_empty() {
                continue;
            }
            match key {
                "category" => query.category = Some(value.to_string()),
                "search" => query.search = Some(value.to_string()),
                "sortBy" => query.sort_by = value.parse().ok(),
                _ => {}
            }
        }
        query
    }

    /// Whether a single event passes the category and search filters
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(category) = &self.category
            && event.category.as_str() != category
        {
            return false;
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            return contains_lower(&event.name, &needle)
                || contains_lower(&event.description, &needle)
                || contains_lower(&event.location, &needle);
        }

        true
    }

    /// Filter then sort. Sorting is stable, so ties keep insertion order.
    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        let mut result: Vec<Event> = events.iter().filter(|e| self.matches(e)).cloned().collect();

        match self.sort_by {
            Some(SortKey::DateAsc) => result.sort_by(|a, b| a.date.cmp(&b.date)),
            Some(SortKey::DateDesc) => result.sort_by(|a, b| b.date.cmp(&a.date)),
            Some(SortKey::PriceAsc) => result.sort_by(|a, b| a.price.cmp(&b.price)),
            Some(SortKey::PriceDesc) => result.sort_by(|a, b| b.price.cmp(&a.price)),
            None => {}
        }

        result
    }
}

/// Featured events in insertion order, at most `limit`
pub fn featured_events(events: &[Event], limit: usize) -> Vec<Event> {
    events
        .iter()
        .filter(|e| e.featured)
        .take(limit)
        .cloned()
        .collect()
}

/// Events dated `today` or later, soonest first, at most `limit`
pub fn upcoming_events(events: &[Event], today: NaiveDate, limit: usize) -> Vec<Event> {
    let mut upcoming: Vec<Event> = events.iter().filter(|e| e.date >= today).cloned().collect();
    upcoming.sort_by(|a, b| a.date.cmp(&b.date));
    upcoming.truncate(limit);
    upcoming
}

/// Admin table search: name, location or category name
pub fn search_events(events: &[Event], term: &str) -> Vec<Event> {
    let needle = term.to_lowercase();
    events
        .iter()
        .filter(|e| {
            contains_lower(&e.name, &needle)
                || contains_lower(&e.location, &needle)
                || contains_lower(e.category.as_str(), &needle)
        })
        .cloned()
        .collect()
}

/// Admin booking table filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// Matched against user name, user email and the booked event's name
    pub search: String,
    pub status: Option<BookingStatus>,
}

impl BookingFilter {
    /// `event_name` is the name of the referenced event, or a placeholder if
    /// it no longer exists.
    pub fn matches(&self, booking: &Booking, event_name: &str) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = contains_lower(&booking.user_name, &needle)
            || contains_lower(&booking.user_email, &needle)
            || contains_lower(event_name, &needle);

        let matches_status = self.status.is_none_or(|s| booking.status == s);

        matches_search && matches_status
    }
}

fn contains_lower(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
