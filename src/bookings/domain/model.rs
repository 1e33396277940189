use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::core::sharing::{BookingStatus, SharingError, SharingResult};
use crate::items::domain::model::ItemEntity;
use crate::utils::date::serializer;

// BookingEntity is a reservation window on an item, owner_id is copied from the item at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEntity {
    pub booking_id: String,
    pub version: i64,
    pub item_id: String,
    pub owner_id: String,
    pub booker_id: String,
    pub booking_status: BookingStatus,
    #[serde(with = "serializer")]
    pub start_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub end_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl BookingEntity {
    pub fn create(start_at: NaiveDateTime, end_at: NaiveDateTime, item: &ItemEntity,
                  booker_id: &str, now: NaiveDateTime) -> SharingResult<Self> {
        if start_at >= end_at {
            return Err(SharingError::invalid_argument("start must precede end"));
        }
        if item.owner_id == booker_id {
            return Err(SharingError::invalid_argument("owner cannot book own item"));
        }
        Ok(Self {
            booking_id: Uuid::new_v4().to_string(),
            version: 0,
            item_id: item.item_id.to_string(),
            owner_id: item.owner_id.to_string(),
            booker_id: booker_id.to_string(),
            booking_status: BookingStatus::Waiting,
            start_at,
            end_at,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn approve(&mut self) -> SharingResult<()> {
        if self.booking_status != BookingStatus::Waiting {
            return Err(SharingError::illegal_state(
                format!("cannot approve {} booking {}", self.booking_status, self.booking_id).as_str()));
        }
        self.booking_status = BookingStatus::Approved;
        Ok(())
    }

    // rejection has no precondition, it also overrides an approval and repeats are persisted
    pub fn reject(&mut self) {
        self.booking_status = BookingStatus::Rejected;
    }

    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.booker_id == user_id || self.owner_id == user_id
    }

    pub fn is_completed(&self, now: NaiveDateTime) -> bool {
        self.booking_status == BookingStatus::Approved && self.end_at <= now
    }
}

impl Identifiable for BookingEntity {
    fn id(&self) -> String {
        self.booking_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}
