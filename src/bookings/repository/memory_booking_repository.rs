use std::collections::HashMap;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use crate::bookings::domain::model::BookingEntity;
use crate::bookings::domain::state::{sort_by_start_desc, StatePredicate, Viewpoint};
use crate::bookings::repository::{BookingRepository, is_earlier_start, is_later_end, pick_per_item};
use crate::core::repository::Repository;
use crate::core::sharing::{BookingStatus, PaginatedResult, SharingResult};
use crate::utils::memory::MemoryTable;

lazy_static! {
    static ref BOOKINGS: MemoryTable<BookingEntity> = MemoryTable::default();
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBookingRepository {
    table: MemoryTable<BookingEntity>,
}

impl MemoryBookingRepository {
    pub fn new(table: MemoryTable<BookingEntity>) -> Self {
        Self { table }
    }

    pub fn shared() -> Self {
        Self::new(BOOKINGS.clone())
    }

    fn approved_on(&self, item_ids: &[String]) -> SharingResult<Vec<BookingEntity>> {
        self.table.filter(|b| b.booking_status == BookingStatus::Approved && item_ids.contains(&b.item_id))
    }
}

#[async_trait]
impl Repository<BookingEntity> for MemoryBookingRepository {
    async fn create(&self, entity: &BookingEntity) -> SharingResult<usize> {
        self.table.create(entity)
    }

    async fn update(&self, entity: &BookingEntity) -> SharingResult<usize> {
        self.table.update_versioned(entity, |b| b.version += 1)
    }

    async fn get(&self, id: &str) -> SharingResult<BookingEntity> {
        self.table.get(id, "booking")
    }

    async fn delete(&self, id: &str) -> SharingResult<usize> {
        self.table.delete(id)
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> SharingResult<PaginatedResult<BookingEntity>> {
        self.table.query(predicate, page, page_size)
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn find_by_state(&self, viewpoint: Viewpoint, user_id: &str, predicate: &StatePredicate,
                           skip: usize, limit: usize) -> SharingResult<Vec<BookingEntity>> {
        let mut matching = self.table.filter(|b| viewpoint.user_of(b) == user_id && predicate.matches(b))?;
        sort_by_start_desc(&mut matching);
        Ok(matching.into_iter().skip(skip).take(limit).collect())
    }

    async fn update_status(&self, booking_id: &str, expected: &[BookingStatus],
                           status: BookingStatus, at: NaiveDateTime) -> SharingResult<Option<BookingEntity>> {
        let mut rows = self.table.write()?;
        match rows.get_mut(booking_id) {
            Some(booking) if expected.contains(&booking.booking_status) => {
                booking.booking_status = status;
                booking.version += 1;
                booking.updated_at = at;
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find_last_approved(&self, item_ids: &[String],
                                now: NaiveDateTime) -> SharingResult<HashMap<String, BookingEntity>> {
        let started = self.approved_on(item_ids)?.into_iter().filter(|b| b.start_at <= now).collect();
        Ok(pick_per_item(started, is_later_end))
    }

    async fn find_next_approved(&self, item_ids: &[String],
                                now: NaiveDateTime) -> SharingResult<HashMap<String, BookingEntity>> {
        let upcoming = self.approved_on(item_ids)?.into_iter().filter(|b| b.start_at > now).collect();
        Ok(pick_per_item(upcoming, is_earlier_start))
    }

    async fn has_completed_booking(&self, booker_id: &str, item_id: &str,
                                   now: NaiveDateTime) -> SharingResult<bool> {
        let found = self.table.read()?.values()
            .any(|b| b.booker_id == booker_id && b.item_id == item_id && b.is_completed(now));
        Ok(found)
    }
}
