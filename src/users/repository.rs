pub mod ddb_user_repository;
pub mod memory_user_repository;

use async_trait::async_trait;
use crate::core::repository::Repository;
use crate::core::sharing::SharingResult;
use crate::users::domain::model::UserEntity;

#[async_trait]
pub trait UserRepository: Repository<UserEntity> {
    async fn find_by_email(&self, email: &str) -> SharingResult<Option<UserEntity>>;
    // every user, oldest first
    async fn find_all(&self) -> SharingResult<Vec<UserEntity>>;
}
