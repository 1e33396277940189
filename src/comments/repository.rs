pub mod ddb_comment_repository;
pub mod memory_comment_repository;

use std::collections::HashMap;
use async_trait::async_trait;
use crate::comments::domain::model::CommentEntity;
use crate::core::repository::Repository;
use crate::core::sharing::SharingResult;

#[async_trait]
pub trait CommentRepository: Repository<CommentEntity> {
    // newest first
    async fn find_by_item(&self, item_id: &str) -> SharingResult<Vec<CommentEntity>>;

    // comments grouped by item, newest first within each item
    async fn find_by_items(&self, item_ids: &[String]) -> SharingResult<HashMap<String, Vec<CommentEntity>>>;
}
