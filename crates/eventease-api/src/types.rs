//! Entity types for events, bookings and sessions
//!
//! Field names serialize in camelCase so persisted snapshots keep the layout
//! the browser client already writes (`organizerName`, `eventId`, ...).

use chrono::NaiveDate;
use eventease_util::{BookingId, EventId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing one of the fixed enumerations from text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Music,
    Tech,
    Workshop,
    Business,
    Fitness,
    Food,
    Art,
    Community,
}

impl EventCategory {
    pub const ALL: [EventCategory; 8] = [
        EventCategory::Music,
        EventCategory::Tech,
        EventCategory::Workshop,
        EventCategory::Business,
        EventCategory::Fitness,
        EventCategory::Food,
        EventCategory::Art,
        EventCategory::Community,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Music => "music",
            EventCategory::Tech => "tech",
            EventCategory::Workshop => "workshop",
            EventCategory::Business => "business",
            EventCategory::Fitness => "fitness",
            EventCategory::Food => "food",
            EventCategory::Art => "art",
            EventCategory::Community => "community",
        }
    }

    /// Human-readable name for listings
    pub fn display_name(&self) -> &'static str {
        match self {
            EventCategory::Music => "Music",
            EventCategory::Tech => "Technology",
            EventCategory::Workshop => "Workshop",
            EventCategory::Business => "Business",
            EventCategory::Fitness => "Fitness",
            EventCategory::Food => "Food & Drink",
            EventCategory::Art => "Arts",
            EventCategory::Community => "Community",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Booking status
///
/// Any status may be overwritten by any other; there is no transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Upcoming,
    Attended,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Confirmed,
        BookingStatus::Upcoming,
        BookingStatus::Attended,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Upcoming => "upcoming",
            BookingStatus::Attended => "attended",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the booking still lies ahead (shown under "upcoming" on a profile)
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Upcoming)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "booking status",
                value: s.to_string(),
            })
    }
}

/// A bookable occasion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Assigned by the catalog, never by the caller
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    pub date: NaiveDate,
    /// Local time of day as entered, e.g. "09:00 AM"
    pub time: String,
    pub location: String,
    pub organizer_name: String,
    pub price: Decimal,
    /// Image URL
    pub image: String,
    #[serde(default)]
    pub featured: bool,
}

/// Event fields supplied when creating an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub category: EventCategory,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub organizer_name: String,
    pub price: Decimal,
    pub image: String,
    #[serde(default)]
    pub featured: bool,
}

impl NewEvent {
    /// Attach an identifier, producing the stored event
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            date: self.date,
            time: self.time,
            location: self.location,
            organizer_name: self.organizer_name,
            price: self.price,
            image: self.image,
            featured: self.featured,
        }
    }
}

/// Partial update of an event. Absent fields are left untouched; the id can
/// never be changed through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EventCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }

    /// Merge the present fields into `event`
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(name) = &self.name {
            event.name = name.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(time) = &self.time {
            event.time = time.clone();
        }
        if let Some(location) = &self.location {
            event.location = location.clone();
        }
        if let Some(organizer_name) = &self.organizer_name {
            event.organizer_name = organizer_name.clone();
        }
        if let Some(price) = self.price {
            event.price = price;
        }
        if let Some(image) = &self.image {
            event.image = image.clone();
        }
        if let Some(featured) = self.featured {
            event.featured = featured;
        }
    }
}

/// One user's reservation against one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub event_id: EventId,
    pub user_id: UserId,
    /// Snapshot taken at booking time; not re-synced with the profile
    pub user_name: String,
    pub user_email: String,
    /// Date the booking was made
    pub date: NaiveDate,
    pub status: BookingStatus,
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Resolved identity of an authenticated user. Never carries a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
