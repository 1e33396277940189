use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::utils::date::serializer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentDto {
    pub comment_id: String,
    pub item_id: String,
    pub author_id: String,
    pub author_name: String,
    pub text: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}
