use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::sharing::BookingStatus;
use crate::utils::date::serializer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDto {
    pub booking_id: String,
    pub version: i64,
    pub item_id: String,
    pub owner_id: String,
    pub booker_id: String,
    pub status: BookingStatus,
    #[serde(with = "serializer")]
    pub start: NaiveDateTime,
    #[serde(with = "serializer")]
    pub end: NaiveDateTime,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

// BookingShortDto is the projection shown to item owners as last/next booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingShortDto {
    pub booking_id: String,
    pub item_id: String,
    pub booker_id: String,
}
