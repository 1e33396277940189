use std::collections::HashMap;
use async_trait::async_trait;
use lazy_static::lazy_static;
use crate::core::repository::Repository;
use crate::core::sharing::{PaginatedResult, SharingResult};
use crate::users::domain::model::UserEntity;
use crate::users::repository::UserRepository;
use crate::utils::memory::MemoryTable;

lazy_static! {
    static ref USERS: MemoryTable<UserEntity> = MemoryTable::default();
}

#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    table: MemoryTable<UserEntity>,
}

impl MemoryUserRepository {
    pub fn new(table: MemoryTable<UserEntity>) -> Self {
        Self { table }
    }

    // repository over the process-wide users table
    pub fn shared() -> Self {
        Self::new(USERS.clone())
    }
}

#[async_trait]
impl Repository<UserEntity> for MemoryUserRepository {
    async fn create(&self, entity: &UserEntity) -> SharingResult<usize> {
        self.table.create(entity)
    }

    async fn update(&self, entity: &UserEntity) -> SharingResult<usize> {
        self.table.update_versioned(entity, |u| u.version += 1)
    }

    async fn get(&self, id: &str) -> SharingResult<UserEntity> {
        self.table.get(id, "user")
    }

    async fn delete(&self, id: &str) -> SharingResult<usize> {
        self.table.delete(id)
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> SharingResult<PaginatedResult<UserEntity>> {
        self.table.query(predicate, page, page_size)
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> SharingResult<Option<UserEntity>> {
        let email = email.to_lowercase();
        Ok(self.table.filter(|u| u.email == email)?.into_iter().next())
    }

    async fn find_all(&self) -> SharingResult<Vec<UserEntity>> {
        let mut users = self.table.filter(|_| true)?;
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.user_id.cmp(&b.user_id)));
        Ok(users)
    }
}
