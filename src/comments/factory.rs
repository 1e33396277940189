use std::sync::Arc;
use crate::bookings::factory::create_booking_repository;
use crate::comments::domain::CommentService;
use crate::comments::domain::service::CommentServiceImpl;
use crate::comments::repository::CommentRepository;
use crate::comments::repository::ddb_comment_repository::DDBCommentRepository;
use crate::comments::repository::memory_comment_repository::MemoryCommentRepository;
use crate::core::clock::SystemClock;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::gateway::factory::create_publisher;
use crate::items::factory::create_item_repository;
use crate::users::factory::create_user_service;
use crate::utils::ddb::{build_db_client, create_table, TableIndex};

const COMMENTS_INDEX: TableIndex<'static> = TableIndex { name: "comments_ndx", pk: "item_id", sk: "created_at" };

pub async fn create_comment_repository(store: RepositoryStore) -> Box<dyn CommentRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBCommentRepository::new(client, "comments", COMMENTS_INDEX.name))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, "comments", "comment_id", &[COMMENTS_INDEX]).await;
            Box::new(DDBCommentRepository::new(client, "comments", COMMENTS_INDEX.name))
        }
        RepositoryStore::InMemory => {
            Box::new(MemoryCommentRepository::shared())
        }
    }
}

pub async fn create_comment_service(config: &Configuration, store: RepositoryStore) -> Box<dyn CommentService> {
    let comment_repository = create_comment_repository(store).await;
    let booking_repository = create_booking_repository(store).await;
    let item_repository = create_item_repository(store).await;
    let user_service = create_user_service(config, store).await;
    let publisher = create_publisher(store.gateway_publisher()).await;
    Box::new(CommentServiceImpl::new(config, comment_repository, booking_repository, item_repository,
                                     user_service, publisher, Arc::new(SystemClock)))
}
