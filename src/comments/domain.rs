use std::collections::HashMap;
use async_trait::async_trait;
use crate::comments::dto::CommentDto;
use crate::core::sharing::SharingResult;

pub mod model;
pub mod gate;
pub mod service;

#[async_trait]
pub trait CommentService: Sync + Send {
    async fn can_comment(&self, user_id: &str, item_id: &str) -> SharingResult<bool>;
    async fn add_comment(&self, user_id: &str, item_id: &str, text: &str) -> SharingResult<CommentDto>;
    // newest first
    async fn find_by_item(&self, item_id: &str) -> SharingResult<Vec<CommentDto>>;
    async fn find_by_items(&self, item_ids: &[String]) -> SharingResult<HashMap<String, Vec<CommentDto>>>;
}
