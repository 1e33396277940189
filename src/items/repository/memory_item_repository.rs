use std::collections::HashMap;
use async_trait::async_trait;
use lazy_static::lazy_static;
use crate::core::repository::Repository;
use crate::core::sharing::{PaginatedResult, SharingResult};
use crate::items::domain::model::ItemEntity;
use crate::items::repository::ItemRepository;
use crate::utils::memory::MemoryTable;

lazy_static! {
    static ref ITEMS: MemoryTable<ItemEntity> = MemoryTable::default();
}

#[derive(Debug, Clone, Default)]
pub struct MemoryItemRepository {
    table: MemoryTable<ItemEntity>,
}

impl MemoryItemRepository {
    pub fn new(table: MemoryTable<ItemEntity>) -> Self {
        Self { table }
    }

    pub fn shared() -> Self {
        Self::new(ITEMS.clone())
    }
}

#[async_trait]
impl Repository<ItemEntity> for MemoryItemRepository {
    async fn create(&self, entity: &ItemEntity) -> SharingResult<usize> {
        self.table.create(entity)
    }

    async fn update(&self, entity: &ItemEntity) -> SharingResult<usize> {
        self.table.update_versioned(entity, |i| i.version += 1)
    }

    async fn get(&self, id: &str) -> SharingResult<ItemEntity> {
        self.table.get(id, "item")
    }

    async fn delete(&self, id: &str) -> SharingResult<usize> {
        self.table.delete(id)
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> SharingResult<PaginatedResult<ItemEntity>> {
        self.table.query(predicate, page, page_size)
    }
}

#[async_trait]
impl ItemRepository for MemoryItemRepository {
    async fn find_by_owner(&self, owner_id: &str) -> SharingResult<Vec<ItemEntity>> {
        let mut items = self.table.filter(|i| i.owner_id == owner_id)?;
        sort_by_created(&mut items);
        Ok(items)
    }

    async fn search(&self, text: &str) -> SharingResult<Vec<ItemEntity>> {
        let text = text.to_lowercase();
        let mut items = self.table.filter(|i| i.matches_text(text.as_str()))?;
        sort_by_created(&mut items);
        Ok(items)
    }

    async fn find_by_requests(&self, request_ids: &[String]) -> SharingResult<Vec<ItemEntity>> {
        let mut items = self.table.filter(|i| i.request_id.as_ref().map_or(false, |r| request_ids.contains(r)))?;
        sort_by_created(&mut items);
        Ok(items)
    }
}

fn sort_by_created(items: &mut [ItemEntity]) {
    items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.item_id.cmp(&b.item_id)));
}
