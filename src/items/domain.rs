use async_trait::async_trait;
use crate::core::sharing::SharingResult;
use crate::items::dto::{ItemDto, ItemInfoDto, ItemPatchDto};

pub mod model;
pub mod summary;
pub mod service;

#[async_trait]
pub trait ItemService: Sync + Send {
    async fn add_item(&self, owner_id: &str, item: &ItemDto) -> SharingResult<ItemDto>;
    async fn update_item(&self, owner_id: &str, item_id: &str, patch: &ItemPatchDto) -> SharingResult<ItemDto>;
    // item detail with booking summary for the owner and comments for everyone
    async fn get_item(&self, item_id: &str, viewer_id: &str) -> SharingResult<ItemInfoDto>;
    async fn list_owner_items(&self, owner_id: &str, offset: i64, limit: i64) -> SharingResult<Vec<ItemInfoDto>>;
    // available items matching the text in name or description, a blank text finds nothing
    async fn search_items(&self, user_id: &str, text: &str, offset: i64, limit: i64) -> SharingResult<Vec<ItemDto>>;
}
