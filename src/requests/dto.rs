use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::items::dto::ItemDto;
use crate::utils::date::serializer;

// RequestDto is a request with the items listed in answer to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDto {
    pub request_id: String,
    pub requester_id: String,
    pub description: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    pub items: Vec<ItemDto>,
}
