use async_trait::async_trait;
use chrono::NaiveDateTime;
use crate::bookings::domain::state::Viewpoint;
use crate::bookings::dto::BookingDto;
use crate::core::sharing::SharingResult;

pub mod model;
pub mod eligibility;
pub mod state;
pub mod service;

#[async_trait]
pub trait BookingService: Sync + Send {
    async fn create_booking(&self, booker_id: &str, item_id: &str,
                            start: NaiveDateTime, end: NaiveDateTime) -> SharingResult<BookingDto>;
    async fn decide_booking(&self, decider_id: &str, booking_id: &str, approve: bool) -> SharingResult<BookingDto>;
    async fn get_booking(&self, user_id: &str, booking_id: &str) -> SharingResult<BookingDto>;
    async fn list_bookings(&self, viewpoint: Viewpoint, user_id: &str, state: &str,
                           offset: i64, limit: i64) -> SharingResult<Vec<BookingDto>>;
}
