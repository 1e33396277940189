use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::bookings::dto::BookingShortDto;
use crate::comments::dto::CommentDto;
use crate::utils::date::serializer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDto {
    pub item_id: String,
    pub version: i64,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<String>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl ItemDto {
    pub fn new(owner_id: &str, name: &str, description: &str, available: bool) -> Self {
        Self {
            item_id: Uuid::new_v4().to_string(),
            version: 0,
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            available,
            request_id: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

// ItemPatchDto carries the fields an owner may change, absent fields are kept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatchDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

// ItemInfoDto is the item detail view, booking summaries are only filled in for the owner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemInfoDto {
    #[serde(flatten)]
    pub item: ItemDto,
    pub last_booking: Option<BookingShortDto>,
    pub next_booking: Option<BookingShortDto>,
    pub comments: Vec<CommentDto>,
}
