pub mod ddb_booking_repository;
pub mod memory_booking_repository;

use std::collections::HashMap;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::bookings::domain::model::BookingEntity;
use crate::bookings::domain::state::{StatePredicate, Viewpoint};
use crate::core::repository::Repository;
use crate::core::sharing::{BookingStatus, SharingResult};

#[async_trait]
pub trait BookingRepository: Repository<BookingEntity> {
    // bookings of the user on the given side matching the predicate, newest start first
    async fn find_by_state(&self, viewpoint: Viewpoint, user_id: &str, predicate: &StatePredicate,
                           skip: usize, limit: usize) -> SharingResult<Vec<BookingEntity>>;

    // sets the status only while the stored status is one of `expected` and returns the stored booking,
    // None when the booking is missing or its status did not match
    async fn update_status(&self, booking_id: &str, expected: &[BookingStatus],
                           status: BookingStatus, at: NaiveDateTime) -> SharingResult<Option<BookingEntity>>;

    // per item, the approved booking with the latest end among those started at or before now
    async fn find_last_approved(&self, item_ids: &[String],
                                now: NaiveDateTime) -> SharingResult<HashMap<String, BookingEntity>>;

    // per item, the approved booking with the earliest start after now
    async fn find_next_approved(&self, item_ids: &[String],
                                now: NaiveDateTime) -> SharingResult<HashMap<String, BookingEntity>>;

    async fn has_completed_booking(&self, booker_id: &str, item_id: &str,
                                   now: NaiveDateTime) -> SharingResult<bool>;
}

// keeps the best booking per item according to `better(candidate, current)`
pub(crate) fn pick_per_item<F>(bookings: Vec<BookingEntity>, better: F) -> HashMap<String, BookingEntity>
    where F: Fn(&BookingEntity, &BookingEntity) -> bool {
    let mut picked: HashMap<String, BookingEntity> = HashMap::new();
    for booking in bookings {
        let replace = match picked.get(booking.item_id.as_str()) {
            Some(current) => better(&booking, current),
            None => true,
        };
        if replace {
            picked.insert(booking.item_id.to_string(), booking);
        }
    }
    picked
}

pub(crate) fn is_later_end(candidate: &BookingEntity, current: &BookingEntity) -> bool {
    candidate.end_at > current.end_at
}

pub(crate) fn is_earlier_start(candidate: &BookingEntity, current: &BookingEntity) -> bool {
    candidate.start_at < current.start_at
}
