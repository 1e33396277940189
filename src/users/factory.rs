use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::users::domain::service::UserServiceImpl;
use crate::users::domain::UserService;
use crate::users::repository::ddb_user_repository::DDBUserRepository;
use crate::users::repository::memory_user_repository::MemoryUserRepository;
use crate::users::repository::UserRepository;
use crate::utils::ddb::{build_db_client, create_table, TableIndex};

const USERS_INDEX: TableIndex<'static> = TableIndex { name: "users_ndx", pk: "email", sk: "created_at" };

pub async fn create_user_repository(store: RepositoryStore) -> Box<dyn UserRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBUserRepository::new(client, "users", USERS_INDEX.name))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "users", "user_id", &[USERS_INDEX]).await;
            Box::new(DDBUserRepository::new(client, "users", USERS_INDEX.name))
        }
        RepositoryStore::InMemory => {
            Box::new(MemoryUserRepository::shared())
        }
    }
}

pub async fn create_user_service(config: &Configuration, store: RepositoryStore) -> Box<dyn UserService> {
    let user_repository = create_user_repository(store).await;
    Box::new(UserServiceImpl::new(config, user_repository))
}
