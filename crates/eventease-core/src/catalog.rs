//! Catalog store: events and bookings
//!
//! Both collections live in memory and are written to storage in full after
//! every successful mutation, empty collections included. Each mutation
//! builds the new collection first, persists it, and only then replaces the
//! in-memory copy, so a storage failure leaves the catalog unchanged.
//!
//! Booking uniqueness per (event, user) is a check-then-insert against the
//! in-memory collection. That is only sound because a `CatalogStore` is owned
//! by a single caller and every mutation takes `&mut self`.

use chrono::NaiveDate;
use eventease_api::{
    Booking, BookingFilter, BookingStatus, Event, EventPatch, EventQuery, FEATURED_LIMIT,
    NewEvent, Notice, UPCOMING_LIMIT, featured_events, search_events, upcoming_events,
};
use eventease_config::CatalogConfig;
use eventease_store::{
    BOOKINGS_KEY, EVENTS_KEY, KeyValueStore, StoreError, StoreResult, encode_json, read_json,
};
use eventease_util::{BookingId, EventId, UserId};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{CatalogStats, Notifier, demo_bookings, demo_events};

/// Placeholder name for bookings whose event no longer exists
pub const UNKNOWN_EVENT_NAME: &str = "Unknown Event";

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    #[error("Already booked: user {user_id} already holds a booking for event {event_id}")]
    AlreadyBooked { event_id: EventId, user_id: UserId },

    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Outcome of a cascade delete
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedEvent {
    pub event: Event,
    pub removed_bookings: Vec<Booking>,
}

/// Owner of the event and booking collections
pub struct CatalogStore {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    events: Vec<Event>,
    bookings: Vec<Booking>,
}

impl CatalogStore {
    /// Load both collections from storage.
    ///
    /// A collection that was never persisted is seeded with the demo dataset
    /// when `config.seed_demo_data` is set, and starts empty otherwise. A
    /// corrupt snapshot is treated the same as a missing one.
    ///
    /// Demo bookings reference demo events, so they are only seeded when the
    /// events were seeded by the same call. A missing booking snapshot next
    /// to persisted events starts empty.
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        config: &CatalogConfig,
    ) -> StoreResult<Self> {
        let seed = config.seed_demo_data;

        let (events, events_seeded) =
            load_collection(store.as_ref(), EVENTS_KEY, seed, demo_events)?;
        let (bookings, bookings_seeded) = load_collection(
            store.as_ref(),
            BOOKINGS_KEY,
            seed && events_seeded,
            demo_bookings,
        )?;

        let catalog = Self {
            store,
            notifier,
            events,
            bookings,
        };

        // Record the initial state so the next start does not seed again
        let mut initial = Vec::new();
        if events_seeded {
            initial.push((EVENTS_KEY, encode_json(&catalog.events)?));
        }
        if bookings_seeded {
            initial.push((BOOKINGS_KEY, encode_json(&catalog.bookings)?));
        }
        if !initial.is_empty() {
            catalog.store.set_many(&initial)?;
        }

        info!(
            events = catalog.events.len(),
            bookings = catalog.bookings.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// All events, in insertion order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// All bookings, in insertion order
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Add an event. The catalog assigns its id.
    pub fn add_event(&mut self, new_event: NewEvent) -> CatalogResult<Event> {
        if let Err(e) = validate_price(&new_event.price) {
            return Err(self.reject("Event Not Added", e));
        }

        let mut id = EventId::generate();
        while self.event_by_id(&id).is_some() {
            id = EventId::generate();
        }
        let event = new_event.into_event(id);

        let mut events = self.events.clone();
        events.push(event.clone());
        self.save_events(events)?;

        info!(event_id = %event.id, name = %event.name, "Event added");
        self.notifier.notify(Notice::info(
            "Event Added",
            format!("{} has been successfully added.", event.name),
        ));
        Ok(event)
    }

    /// Merge `patch` into the event with `id`. Fields absent from the patch
    /// keep their values; the id never changes.
    pub fn update_event(&mut self, id: &EventId, patch: &EventPatch) -> CatalogResult<Event> {
        let Some(index) = self.event_index(id) else {
            return Err(self.reject("Update Failed", CatalogError::EventNotFound(id.clone())));
        };

        if let Some(price) = &patch.price
            && let Err(e) = validate_price(price)
        {
            return Err(self.reject("Update Failed", e));
        }

        let mut events = self.events.clone();
        patch.apply_to(&mut events[index]);
        let updated = events[index].clone();
        self.save_events(events)?;

        debug!(event_id = %id, "Event updated");
        self.notifier.notify(Notice::info(
            "Event Updated",
            "The event has been successfully updated.",
        ));
        Ok(updated)
    }

    /// Remove the event with `id` and every booking that references it
    pub fn delete_event(&mut self, id: &EventId) -> CatalogResult<DeletedEvent> {
        let Some(index) = self.event_index(id) else {
            return Err(self.reject("Delete Failed", CatalogError::EventNotFound(id.clone())));
        };

        let mut events = self.events.clone();
        let event = events.remove(index);

        let (removed_bookings, bookings): (Vec<Booking>, Vec<Booking>) = self
            .bookings
            .iter()
            .cloned()
            .partition(|b| &b.event_id == id);

        let writes = [
            (EVENTS_KEY, encode_json(&events)?),
            (BOOKINGS_KEY, encode_json(&bookings)?),
        ];
        if let Err(e) = self.store.set_many(&writes) {
            return Err(self.storage_failure(e));
        }
        self.events = events;
        self.bookings = bookings;

        info!(
            event_id = %id,
            removed_bookings = removed_bookings.len(),
            "Event deleted"
        );
        self.notifier.notify(Notice::info(
            "Event Deleted",
            "The event has been successfully deleted.",
        ));
        Ok(DeletedEvent {
            event,
            removed_bookings,
        })
    }

    /// Book `event_id` for a user. The user's name and email are copied into
    /// the booking as they are now.
    ///
    /// Rejected when the event does not exist or the user already holds a
    /// booking for it, whatever that booking's status.
    pub fn book_event(
        &mut self,
        event_id: &EventId,
        user_id: &UserId,
        user_name: &str,
        user_email: &str,
    ) -> CatalogResult<Booking> {
        let Some(event_name) = self.event_by_id(event_id).map(|e| e.name.clone()) else {
            warn!(event_id = %event_id, "Booking rejected: event not found");
            self.notifier
                .notify(Notice::destructive("Booking Failed", "Event not found."));
            return Err(CatalogError::EventNotFound(event_id.clone()));
        };

        if self
            .bookings
            .iter()
            .any(|b| &b.event_id == event_id && &b.user_id == user_id)
        {
            debug!(event_id = %event_id, user_id = %user_id, "Booking rejected: already booked");
            self.notifier.notify(Notice::destructive(
                "Already Booked",
                "You have already booked this event.",
            ));
            return Err(CatalogError::AlreadyBooked {
                event_id: event_id.clone(),
                user_id: user_id.clone(),
            });
        }

        let mut id = BookingId::generate();
        while self.bookings.iter().any(|b| b.id == id) {
            id = BookingId::generate();
        }

        let booking = Booking {
            id,
            event_id: event_id.clone(),
            user_id: user_id.clone(),
            user_name: user_name.to_string(),
            user_email: user_email.to_string(),
            date: eventease_util::today(),
            status: BookingStatus::Confirmed,
        };

        let mut bookings = self.bookings.clone();
        bookings.push(booking.clone());
        self.save_bookings(bookings)?;

        info!(booking_id = %booking.id, event_id = %event_id, user_id = %user_id, "Booking confirmed");
        self.notifier.notify(Notice::info(
            "Booking Confirmed",
            format!("You have successfully booked {}.", event_name),
        ));
        Ok(booking)
    }

    /// Overwrite a booking's status. Any status may replace any other.
    pub fn update_booking_status(
        &mut self,
        booking_id: &BookingId,
        status: BookingStatus,
    ) -> CatalogResult<Booking> {
        let Some(index) = self.bookings.iter().position(|b| &b.id == booking_id) else {
            return Err(self.reject(
                "Update Failed",
                CatalogError::BookingNotFound(booking_id.clone()),
            ));
        };

        let mut bookings = self.bookings.clone();
        bookings[index].status = status;
        let updated = bookings[index].clone();
        self.save_bookings(bookings)?;

        debug!(booking_id = %booking_id, status = %status, "Booking status updated");
        self.notifier.notify(Notice::info(
            "Booking Updated",
            format!("Booking status changed to {}.", status),
        ));
        Ok(updated)
    }

    /// Bookings held by `user_id`, in insertion order. Call again for a
    /// fresh pass.
    pub fn user_bookings(&self, user_id: &UserId) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |b| &b.user_id == user_id)
    }

    /// Bookings against `event_id`, in insertion order
    pub fn event_bookings(&self, event_id: &EventId) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |b| &b.event_id == event_id)
    }

    pub fn event_by_id(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    pub fn booking_by_id(&self, id: &BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| &b.id == id)
    }

    pub fn has_bookings(&self, event_id: &EventId) -> bool {
        self.event_bookings(event_id).next().is_some()
    }

    pub fn user_booking_count(&self, user_id: &UserId) -> usize {
        self.user_bookings(user_id).count()
    }

    /// A user's bookings split into active (confirmed, upcoming) and past
    /// (attended, cancelled)
    pub fn user_bookings_split(&self, user_id: &UserId) -> (Vec<&Booking>, Vec<&Booking>) {
        self.user_bookings(user_id).partition(|b| b.status.is_active())
    }

    /// Name of the referenced event, or [`UNKNOWN_EVENT_NAME`]
    pub fn event_name(&self, event_id: &EventId) -> &str {
        self.event_by_id(event_id)
            .map(|e| e.name.as_str())
            .unwrap_or(UNKNOWN_EVENT_NAME)
    }

    /// Event listing with category, search and sort applied
    pub fn list_events(&self, query: &EventQuery) -> Vec<Event> {
        query.apply(&self.events)
    }

    pub fn featured_events(&self) -> Vec<Event> {
        featured_events(&self.events, FEATURED_LIMIT)
    }

    pub fn upcoming_events(&self, today: NaiveDate) -> Vec<Event> {
        upcoming_events(&self.events, today, UPCOMING_LIMIT)
    }

    /// Admin event table search
    pub fn search_events(&self, term: &str) -> Vec<Event> {
        search_events(&self.events, term)
    }

    /// Admin booking table filter
    pub fn filter_bookings(&self, filter: &BookingFilter) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|b| filter.matches(b, self.event_name(&b.event_id)))
            .collect()
    }

    /// Dashboard figures as of `today`
    pub fn stats(&self, today: NaiveDate) -> CatalogStats {
        CatalogStats::compute(&self.events, &self.bookings, today)
    }

    fn event_index(&self, id: &EventId) -> Option<usize> {
        self.events.iter().position(|e| &e.id == id)
    }

    fn save_events(&mut self, events: Vec<Event>) -> CatalogResult<()> {
        let text = encode_json(&events)?;
        if let Err(e) = self.store.set(EVENTS_KEY, &text) {
            return Err(self.storage_failure(e));
        }
        self.events = events;
        Ok(())
    }

    fn save_bookings(&mut self, bookings: Vec<Booking>) -> CatalogResult<()> {
        let text = encode_json(&bookings)?;
        if let Err(e) = self.store.set(BOOKINGS_KEY, &text) {
            return Err(self.storage_failure(e));
        }
        self.bookings = bookings;
        Ok(())
    }

    fn storage_failure(&self, e: StoreError) -> CatalogError {
        warn!(error = %e, "Failed to persist catalog");
        self.notifier.notify(Notice::destructive(
            "Save Failed",
            "Your changes could not be saved.",
        ));
        CatalogError::Store(e)
    }

    fn reject(&self, title: &str, error: CatalogError) -> CatalogError {
        let description = match &error {
            CatalogError::EventNotFound(_) => "Event not found.".to_string(),
            CatalogError::BookingNotFound(_) => "Booking not found.".to_string(),
            other => other.to_string(),
        };
        debug!(error = %error, "Catalog operation rejected");
        self.notifier.notify(Notice::destructive(title, description));
        error
    }
}

fn validate_price(price: &rust_decimal::Decimal) -> CatalogResult<()> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CatalogError::InvalidEvent("price must not be negative".into()));
    }
    Ok(())
}

/// Read one collection. Returns the items and whether they were created
/// here (seed or empty) rather than read from storage.
fn load_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    seed: bool,
    demo: fn() -> serde_json::Result<Vec<T>>,
) -> StoreResult<(Vec<T>, bool)> {
    match read_json::<Vec<T>>(store, key) {
        Ok(Some(items)) => return Ok((items, false)),
        Ok(None) => debug!(key, "No persisted snapshot"),
        Err(StoreError::Serialization(e)) => {
            warn!(key, error = %e, "Discarding corrupt snapshot");
        }
        Err(e) => return Err(e),
    }

    if seed {
        Ok((demo()?, true))
    } else {
        Ok((Vec::new(), true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingNotifier;
    use eventease_api::EventCategory;
    use eventease_store::{MemoryStore, write_json};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn empty_config() -> CatalogConfig {
        CatalogConfig {
            seed_demo_data: false,
        }
    }

    fn new_event(name: &str) -> NewEvent {
        NewEvent {
            name: name.into(),
            description: "A gathering worth attending".into(),
            category: EventCategory::Tech,
            date: NaiveDate::from_ymd_opt(2030, 7, 15).unwrap(),
            time: "09:00 AM".into(),
            location: "Convention Center, San Francisco".into(),
            organizer_name: "Tech Innovators Association".into(),
            price: Decimal::new(14999, 2),
            image: "https://example.com/summit.jpg".into(),
            featured: false,
        }
    }

    fn setup(config: &CatalogConfig) -> (Arc<MemoryStore>, Arc<RecordingNotifier>, CatalogStore) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let catalog = CatalogStore::open(store.clone(), notifier.clone(), config).unwrap();
        (store, notifier, catalog)
    }

    fn user(id: &str) -> UserId {
        UserId::new(id)
    }

    #[test]
    fn seeds_demo_data_and_persists_it() {
        let (store, _, catalog) = setup(&CatalogConfig::default());
        assert_eq!(catalog.events().len(), 6);
        assert_eq!(catalog.bookings().len(), 2);
        assert!(store.get(EVENTS_KEY).unwrap().is_some());
        assert!(store.get(BOOKINGS_KEY).unwrap().is_some());
    }

    #[test]
    fn starts_empty_without_seed() {
        let (store, _, catalog) = setup(&empty_config());
        assert!(catalog.events().is_empty());
        assert!(catalog.bookings().is_empty());
        assert_eq!(store.get(EVENTS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn add_event_assigns_unique_ids() {
        let (_, notifier, mut catalog) = setup(&CatalogConfig::default());

        let mut seen: Vec<EventId> = catalog.events().iter().map(|e| e.id.clone()).collect();
        for i in 0..50 {
            let event = catalog.add_event(new_event(&format!("Event {}", i))).unwrap();
            assert!(!seen.contains(&event.id));
            seen.push(event.id);
        }
        assert_eq!(catalog.events().len(), 56);

        let notice = notifier.last().unwrap();
        assert_eq!(notice.title, "Event Added");
        assert_eq!(notice.description, "Event 49 has been successfully added.");
    }

    #[test]
    fn add_event_rejects_negative_price() {
        let (_, notifier, mut catalog) = setup(&empty_config());
        let mut draft = new_event("Bad Price");
        draft.price = Decimal::new(-1, 0);

        assert!(matches!(catalog.add_event(draft), Err(CatalogError::InvalidEvent(_))));
        assert!(catalog.events().is_empty());
        assert!(notifier.last().unwrap().is_destructive());
    }

    #[test]
    fn add_event_accepts_free_events() {
        let (_, _, mut catalog) = setup(&empty_config());
        let mut draft = new_event("Free Meetup");
        draft.price = Decimal::ZERO;
        assert!(catalog.add_event(draft).is_ok());
    }

    #[test]
    fn update_event_merges_fields() {
        let (_, _, mut catalog) = setup(&CatalogConfig::default());
        let id = EventId::new("2");
        let before = catalog.event_by_id(&id).unwrap().clone();

        let patch = EventPatch {
            name: Some("Music Festival Weekend 2025".into()),
            ..Default::default()
        };
        let updated = catalog.update_event(&id, &patch).unwrap();
        let patch = EventPatch {
            featured: Some(true),
            ..Default::default()
        };
        let updated_again = catalog.update_event(&id, &patch).unwrap();

        assert_eq!(updated.name, "Music Festival Weekend 2025");
        assert_eq!(updated_again.name, "Music Festival Weekend 2025");
        assert!(updated_again.featured);
        assert_eq!(updated_again.id, before.id);
        assert_eq!(updated_again.price, before.price);
        assert_eq!(updated_again.date, before.date);
        assert_eq!(updated_again.description, before.description);
    }

    #[test]
    fn update_missing_event_is_not_found() {
        let (_, notifier, mut catalog) = setup(&CatalogConfig::default());
        let before = catalog.events().to_vec();

        let result = catalog.update_event(&EventId::new("missing"), &EventPatch::default());
        assert!(matches!(result, Err(CatalogError::EventNotFound(_))));
        assert_eq!(catalog.events(), before.as_slice());
        assert_eq!(notifier.last().unwrap().description, "Event not found.");
    }

    #[test]
    fn delete_event_cascades_to_its_bookings_only() {
        let (store, _, mut catalog) = setup(&CatalogConfig::default());
        catalog
            .book_event(&EventId::new("3"), &user("7"), "Alice", "a@x.com")
            .unwrap();
        assert_eq!(catalog.bookings().len(), 3);

        let deleted = catalog.delete_event(&EventId::new("1")).unwrap();
        assert_eq!(deleted.event.id.as_str(), "1");
        assert_eq!(deleted.removed_bookings.len(), 1);

        assert!(catalog.event_by_id(&EventId::new("1")).is_none());
        assert_eq!(catalog.events().len(), 5);
        assert_eq!(catalog.bookings().len(), 2);
        assert!(catalog.bookings().iter().all(|b| b.event_id.as_str() == "3"));

        let persisted: Vec<Booking> = read_json(&*store, BOOKINGS_KEY).unwrap().unwrap();
        assert_eq!(persisted, catalog.bookings());
    }

    #[test]
    fn delete_event_without_bookings_keeps_bookings_identical() {
        let (_, _, mut catalog) = setup(&CatalogConfig::default());
        let before = catalog.bookings().to_vec();

        catalog.delete_event(&EventId::new("6")).unwrap();
        assert_eq!(catalog.bookings(), before.as_slice());
    }

    #[test]
    fn deleting_every_event_persists_the_empty_catalog() {
        let (store, _, mut catalog) = setup(&CatalogConfig::default());
        let ids: Vec<EventId> = catalog.events().iter().map(|e| e.id.clone()).collect();
        for id in &ids {
            catalog.delete_event(id).unwrap();
        }

        assert_eq!(store.get(EVENTS_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get(BOOKINGS_KEY).unwrap().as_deref(), Some("[]"));

        let reopened = CatalogStore::open(
            store,
            Arc::new(RecordingNotifier::new()),
            &CatalogConfig::default(),
        )
        .unwrap();
        assert!(reopened.events().is_empty());
        assert!(reopened.bookings().is_empty());
    }

    #[test]
    fn book_event_then_reject_duplicate() {
        let (_, notifier, mut catalog) = setup(&empty_config());
        let event = catalog.add_event(new_event("Tech Summit")).unwrap();

        let booking = catalog
            .book_event(&event.id, &user("u1"), "Alice", "a@x.com")
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.date, eventease_util::today());
        assert_eq!(booking.user_name, "Alice");
        assert_eq!(
            notifier.last().unwrap().description,
            "You have successfully booked Tech Summit."
        );

        let again = catalog.book_event(&event.id, &user("u1"), "Alice", "a@x.com");
        assert!(matches!(again, Err(CatalogError::AlreadyBooked { .. })));
        assert_eq!(catalog.bookings().len(), 1);
        assert_eq!(notifier.last().unwrap().title, "Already Booked");
    }

    #[test]
    fn cancelled_booking_still_blocks_rebooking() {
        let (_, _, mut catalog) = setup(&CatalogConfig::default());
        catalog
            .update_booking_status(&BookingId::new("1"), BookingStatus::Cancelled)
            .unwrap();

        let result = catalog.book_event(
            &EventId::new("1"),
            &user("2"),
            "John Doe",
            "user@eventease.com",
        );
        assert!(matches!(result, Err(CatalogError::AlreadyBooked { .. })));
    }

    #[test]
    fn book_missing_event_leaves_bookings_alone() {
        let (_, notifier, mut catalog) = setup(&CatalogConfig::default());
        let before = catalog.bookings().to_vec();

        let result = catalog.book_event(&EventId::new("404"), &user("u1"), "Alice", "a@x.com");
        assert!(matches!(result, Err(CatalogError::EventNotFound(_))));
        assert_eq!(catalog.bookings(), before.as_slice());

        let notice = notifier.last().unwrap();
        assert_eq!(notice.title, "Booking Failed");
        assert_eq!(notice.description, "Event not found.");
    }

    #[test]
    fn status_update_is_unconstrained() {
        let (_, notifier, mut catalog) = setup(&CatalogConfig::default());
        let id = BookingId::new("2");

        catalog.update_booking_status(&id, BookingStatus::Cancelled).unwrap();
        let revived = catalog.update_booking_status(&id, BookingStatus::Confirmed).unwrap();
        assert_eq!(revived.status, BookingStatus::Confirmed);
        assert_eq!(
            notifier.last().unwrap().description,
            "Booking status changed to confirmed."
        );

        let missing = catalog.update_booking_status(&BookingId::new("x"), BookingStatus::Attended);
        assert!(matches!(missing, Err(CatalogError::BookingNotFound(_))));
    }

    #[test]
    fn user_and_event_views_preserve_order() {
        let (_, _, mut catalog) = setup(&CatalogConfig::default());
        catalog
            .book_event(&EventId::new("2"), &user("2"), "John Doe", "user@eventease.com")
            .unwrap();
        catalog
            .book_event(&EventId::new("2"), &user("9"), "Zed", "z@x.com")
            .unwrap();

        let mine: Vec<&str> = catalog
            .user_bookings(&user("2"))
            .map(|b| b.event_id.as_str())
            .collect();
        assert_eq!(mine, vec!["1", "3", "2"]);

        // Views can be taken again
        assert_eq!(catalog.user_bookings(&user("2")).count(), 3);
        assert_eq!(catalog.user_booking_count(&user("9")), 1);

        let for_event: Vec<&str> = catalog
            .event_bookings(&EventId::new("2"))
            .map(|b| b.user_id.as_str())
            .collect();
        assert_eq!(for_event, vec!["2", "9"]);
        assert!(catalog.has_bookings(&EventId::new("2")));
        assert!(!catalog.has_bookings(&EventId::new("5")));
    }

    #[test]
    fn profile_split() {
        let (_, _, mut catalog) = setup(&CatalogConfig::default());
        catalog
            .update_booking_status(&BookingId::new("1"), BookingStatus::Attended)
            .unwrap();

        let (active, past) = catalog.user_bookings_split(&user("2"));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id.as_str(), "2");
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].id.as_str(), "1");
    }

    #[test]
    fn booking_filter_uses_event_names() {
        let (_, _, catalog) = setup(&CatalogConfig::default());
        let filter = BookingFilter {
            search: "startup".into(),
            status: None,
        };
        let found = catalog.filter_bookings(&filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "2");

        assert_eq!(catalog.event_name(&EventId::new("gone")), UNKNOWN_EVENT_NAME);
    }

    #[test]
    fn corrupt_snapshot_falls_back_to_seed() {
        let store = Arc::new(MemoryStore::new());
        store.set(EVENTS_KEY, "[{\"broken\":").unwrap();

        let catalog = CatalogStore::open(
            store.clone(),
            Arc::new(RecordingNotifier::new()),
            &CatalogConfig::default(),
        )
        .unwrap();
        assert_eq!(catalog.events().len(), 6);

        let persisted: Vec<Event> = read_json(&*store, EVENTS_KEY).unwrap().unwrap();
        assert_eq!(persisted.len(), 6);
    }

    #[test]
    fn persisted_state_survives_reopen() {
        let (store, _, mut catalog) = setup(&empty_config());
        let event = catalog.add_event(new_event("Local Meetup")).unwrap();
        catalog
            .book_event(&event.id, &user("u1"), "Alice", "a@x.com")
            .unwrap();

        let reopened = CatalogStore::open(
            store,
            Arc::new(RecordingNotifier::new()),
            &CatalogConfig::default(),
        )
        .unwrap();
        assert_eq!(reopened.events(), catalog.events());
        assert_eq!(reopened.bookings(), catalog.bookings());
    }

    #[test]
    fn persisted_events_are_not_paired_with_demo_bookings() {
        let store = Arc::new(MemoryStore::new());
        let events: Vec<Event> = demo_events()
            .unwrap()
            .into_iter()
            .filter(|e| e.id.as_str() != "1" && e.id.as_str() != "3")
            .collect();
        write_json(&*store, EVENTS_KEY, &events).unwrap();
        store.set(BOOKINGS_KEY, "[{oops").unwrap();

        let catalog = CatalogStore::open(
            store.clone(),
            Arc::new(RecordingNotifier::new()),
            &CatalogConfig::default(),
        )
        .unwrap();

        assert_eq!(catalog.events(), events.as_slice());
        assert!(catalog.bookings().is_empty());
        assert_eq!(store.get(BOOKINGS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn missing_bookings_next_to_persisted_events_start_empty() {
        let store = Arc::new(MemoryStore::new());
        write_json(&*store, EVENTS_KEY, &demo_events().unwrap()).unwrap();

        let catalog = CatalogStore::open(
            store,
            Arc::new(RecordingNotifier::new()),
            &CatalogConfig::default(),
        )
        .unwrap();
        assert_eq!(catalog.events().len(), 6);
        assert!(catalog.bookings().is_empty());
    }

    /// Memory store whose writes can be switched off
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl FlakyStore {
        fn write_check(&self) -> StoreResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(StoreError::Database("disk full".into()))
            } else {
                Ok(())
            }
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StoreResult<()> {
            self.write_check()?;
            self.inner.set(key, value)
        }

        fn set_many(&self, entries: &[(&str, String)]) -> StoreResult<()> {
            self.write_check()?;
            self.inner.set_many(entries)
        }

        fn remove(&self, key: &str) -> StoreResult<()> {
            self.write_check()?;
            self.inner.remove(key)
        }

        fn is_healthy(&self) -> bool {
            !self.fail_writes.load(Ordering::SeqCst)
        }
    }

    fn assert_save_failed(
        result: CatalogResult<impl std::fmt::Debug>,
        notifier: &RecordingNotifier,
    ) {
        assert!(matches!(result, Err(CatalogError::Store(_))), "got {:?}", result);
        let notice = notifier.last().unwrap();
        assert_eq!(notice.title, "Save Failed");
        assert!(notice.is_destructive());
    }

    #[test]
    fn failed_writes_leave_catalog_unchanged() {
        let store = Arc::new(FlakyStore::default());
        let notifier = Arc::new(RecordingNotifier::new());
        let mut catalog =
            CatalogStore::open(store.clone(), notifier.clone(), &CatalogConfig::default())
                .unwrap();

        let events = catalog.events().to_vec();
        let bookings = catalog.bookings().to_vec();
        store.fail_writes.store(true, Ordering::SeqCst);

        assert_save_failed(catalog.add_event(new_event("Never Saved")), &notifier);

        let patch = EventPatch {
            name: Some("Renamed".into()),
            ..Default::default()
        };
        assert_save_failed(catalog.update_event(&EventId::new("1"), &patch), &notifier);
        assert_save_failed(catalog.delete_event(&EventId::new("1")), &notifier);
        assert_save_failed(
            catalog.book_event(&EventId::new("2"), &user("u1"), "Alice", "a@x.com"),
            &notifier,
        );
        assert_save_failed(
            catalog.update_booking_status(&BookingId::new("1"), BookingStatus::Cancelled),
            &notifier,
        );

        assert_eq!(catalog.events(), events.as_slice());
        assert_eq!(catalog.bookings(), bookings.as_slice());

        // Storage still holds the last good snapshot
        let persisted: Vec<Event> = read_json(&*store, EVENTS_KEY).unwrap().unwrap();
        assert_eq!(persisted, events);

        store.fail_writes.store(false, Ordering::SeqCst);
        assert!(catalog.delete_event(&EventId::new("1")).is_ok());
    }
}
