use std::sync::Arc;
use crate::core::clock::SystemClock;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::gateway::factory::create_publisher;
use crate::items::factory::create_item_repository;
use crate::requests::domain::RequestService;
use crate::requests::domain::service::RequestServiceImpl;
use crate::requests::repository::ddb_request_repository::DDBRequestRepository;
use crate::requests::repository::memory_request_repository::MemoryRequestRepository;
use crate::requests::repository::RequestRepository;
use crate::users::factory::create_user_service;
use crate::utils::ddb::{build_db_client, create_table, TableIndex};

const REQUESTS_INDEX: TableIndex<'static> = TableIndex { name: "requests_ndx", pk: "requester_id", sk: "created_at" };

pub async fn create_request_repository(store: RepositoryStore) -> Box<dyn RequestRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBRequestRepository::new(client, "requests", REQUESTS_INDEX.name))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "requests", "request_id", &[REQUESTS_INDEX]).await;
            Box::new(DDBRequestRepository::new(client, "requests", REQUESTS_INDEX.name))
        }
        RepositoryStore::InMemory => {
            Box::new(MemoryRequestRepository::shared())
        }
    }
}

pub async fn create_request_service(config: &Configuration, store: RepositoryStore) -> Box<dyn RequestService> {
    let request_repository = create_request_repository(store).await;
    let item_repository = create_item_repository(store).await;
    let user_service = create_user_service(config, store).await;
    let publisher = create_publisher(store.gateway_publisher()).await;
    Box::new(RequestServiceImpl::new(config, request_repository, item_repository, user_service,
                                     publisher, Arc::new(SystemClock)))
}
