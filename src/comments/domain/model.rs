use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentEntity {
    pub comment_id: String,
    pub version: i64,
    pub item_id: String,
    pub author_id: String,
    pub text: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}

impl CommentEntity {
    pub fn new(item_id: &str, author_id: &str, text: &str, created_at: NaiveDateTime) -> Self {
        Self {
            comment_id: Uuid::new_v4().to_string(),
            version: 0,
            item_id: item_id.to_string(),
            author_id: author_id.to_string(),
            text: text.trim().to_string(),
            created_at,
        }
    }
}

impl Identifiable for CommentEntity {
    fn id(&self) -> String {
        self.comment_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

pub(crate) fn sort_newest_first(comments: &mut [CommentEntity]) {
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.comment_id.cmp(&a.comment_id)));
}
