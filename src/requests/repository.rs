pub mod ddb_request_repository;
pub mod memory_request_repository;

use async_trait::async_trait;
use crate::core::repository::Repository;
use crate::core::sharing::SharingResult;
use crate::requests::domain::model::RequestEntity;

#[async_trait]
pub trait RequestRepository: Repository<RequestEntity> {
    // newest first
    async fn find_by_requester(&self, requester_id: &str) -> SharingResult<Vec<RequestEntity>>;

    // requests of every other user, newest first
    async fn find_by_others(&self, requester_id: &str) -> SharingResult<Vec<RequestEntity>>;
}
