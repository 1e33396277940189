pub mod ddb_item_repository;
pub mod memory_item_repository;

use async_trait::async_trait;
use crate::core::repository::Repository;
use crate::core::sharing::SharingResult;
use crate::items::domain::model::ItemEntity;

#[async_trait]
pub trait ItemRepository: Repository<ItemEntity> {
    // all items of the owner, oldest first
    async fn find_by_owner(&self, owner_id: &str) -> SharingResult<Vec<ItemEntity>>;
    // available items whose name or description contains the text ignoring case, oldest first
    async fn search(&self, text: &str) -> SharingResult<Vec<ItemEntity>>;
    // items listed in answer to any of the requests
    async fn find_by_requests(&self, request_ids: &[String]) -> SharingResult<Vec<ItemEntity>>;
}
