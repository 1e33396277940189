use async_trait::async_trait;
use crate::core::sharing::SharingResult;
use crate::users::dto::{UserDto, UserPatchDto};

pub mod model;
pub mod service;

// UserService is the account collaborator consulted by bookings, items and comments
#[async_trait]
pub trait UserService: Sync + Send {
    async fn add_user(&self, user: &UserDto) -> SharingResult<UserDto>;
    async fn find_user_by_id(&self, id: &str) -> SharingResult<UserDto>;
    async fn user_exists(&self, id: &str) -> SharingResult<bool>;
    async fn list_users(&self) -> SharingResult<Vec<UserDto>>;
    async fn update_user(&self, id: &str, patch: &UserPatchDto) -> SharingResult<UserDto>;
    // removes the account only, items and bookings that refer to it are kept
    async fn delete_user(&self, id: &str) -> SharingResult<()>;
}
