use std::collections::HashMap;
use async_trait::async_trait;
use lazy_static::lazy_static;
use crate::core::repository::Repository;
use crate::core::sharing::{PaginatedResult, SharingResult};
use crate::requests::domain::model::{RequestEntity, sort_newest_first};
use crate::requests::repository::RequestRepository;
use crate::utils::memory::MemoryTable;

lazy_static! {
    static ref REQUESTS: MemoryTable<RequestEntity> = MemoryTable::default();
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRequestRepository {
    table: MemoryTable<RequestEntity>,
}

impl MemoryRequestRepository {
    pub fn new(table: MemoryTable<RequestEntity>) -> Self {
        Self { table }
    }

    pub fn shared() -> Self {
        Self::new(REQUESTS.clone())
    }
}

#[async_trait]
impl Repository<RequestEntity> for MemoryRequestRepository {
    async fn create(&self, entity: &RequestEntity) -> SharingResult<usize> {
        self.table.create(entity)
    }

    async fn update(&self, entity: &RequestEntity) -> SharingResult<usize> {
        self.table.update_versioned(entity, |r| r.version += 1)
    }

    async fn get(&self, id: &str) -> SharingResult<RequestEntity> {
        self.table.get(id, "request")
    }

    async fn delete(&self, id: &str) -> SharingResult<usize> {
        self.table.delete(id)
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> SharingResult<PaginatedResult<RequestEntity>> {
        self.table.query(predicate, page, page_size)
    }
}

#[async_trait]
impl RequestRepository for MemoryRequestRepository {
    async fn find_by_requester(&self, requester_id: &str) -> SharingResult<Vec<RequestEntity>> {
        let mut requests = self.table.filter(|r| r.requester_id == requester_id)?;
        sort_newest_first(&mut requests);
        Ok(requests)
    }

    async fn find_by_others(&self, requester_id: &str) -> SharingResult<Vec<RequestEntity>> {
        let mut requests = self.table.filter(|r| r.requester_id != requester_id)?;
        sort_newest_first(&mut requests);
        Ok(requests)
    }
}
