use async_trait::async_trait;
use crate::core::sharing::SharingResult;
use crate::requests::dto::RequestDto;

pub mod model;
pub mod service;

// RequestService lets users ask for items nobody lists yet, owners answer by listing an item for the request
#[async_trait]
pub trait RequestService: Sync + Send {
    async fn add_request(&self, requester_id: &str, description: &str) -> SharingResult<RequestDto>;
    // the requester's own requests, newest first
    async fn list_own_requests(&self, requester_id: &str) -> SharingResult<Vec<RequestDto>>;
    // everyone else's requests, newest first
    async fn list_other_requests(&self, user_id: &str, offset: i64, limit: i64) -> SharingResult<Vec<RequestDto>>;
    async fn get_request(&self, user_id: &str, request_id: &str) -> SharingResult<RequestDto>;
}
