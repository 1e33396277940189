use std::sync::Arc;
use crate::bookings::factory::create_booking_repository;
use crate::comments::factory::create_comment_service;
use crate::core::clock::SystemClock;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::items::domain::ItemService;
use crate::items::domain::service::ItemServiceImpl;
use crate::items::repository::ddb_item_repository::DDBItemRepository;
use crate::items::repository::ItemRepository;
use crate::items::repository::memory_item_repository::MemoryItemRepository;
use crate::requests::factory::create_request_repository;
use crate::users::factory::create_user_service;
use crate::utils::ddb::{build_db_client, create_table, TableIndex};

const ITEMS_INDEX: TableIndex<'static> = TableIndex { name: "items_ndx", pk: "owner_id", sk: "created_at" };

pub async fn create_item_repository(store: RepositoryStore) -> Box<dyn ItemRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBItemRepository::new(client, "items", ITEMS_INDEX.name))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "items", "item_id", &[ITEMS_INDEX]).await;
            Box::new(DDBItemRepository::new(client, "items", ITEMS_INDEX.name))
        }
        RepositoryStore::InMemory => {
            Box::new(MemoryItemRepository::shared())
        }
    }
}

pub async fn create_item_service(config: &Configuration, store: RepositoryStore) -> Box<dyn ItemService> {
    let item_repository = create_item_repository(store).await;
    let booking_repository = create_booking_repository(store).await;
    let request_repository = create_request_repository(store).await;
    let user_service = create_user_service(config, store).await;
    let comment_service = create_comment_service(config, store).await;
    Box::new(ItemServiceImpl::new(config, item_repository, booking_repository, request_repository,
                                  user_service, comment_service, Arc::new(SystemClock)))
}
