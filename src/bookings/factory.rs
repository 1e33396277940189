use std::sync::Arc;
use crate::bookings::domain::BookingService;
use crate::bookings::domain::service::BookingServiceImpl;
use crate::bookings::repository::BookingRepository;
use crate::bookings::repository::ddb_booking_repository::DDBBookingRepository;
use crate::bookings::repository::memory_booking_repository::MemoryBookingRepository;
use crate::core::clock::SystemClock;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::gateway::factory::create_publisher;
use crate::items::factory::create_item_repository;
use crate::users::factory::create_user_service;
use crate::utils::ddb::{build_db_client, create_table, TableIndex};

const BOOKINGS_TABLE: &str = "bookings";

// booker, owner and item index names of a bookings table, in that order
pub fn booking_index_names(table_name: &str) -> [String; 3] {
    [
        format!("{}_booker_ndx", table_name),
        format!("{}_owner_ndx", table_name),
        format!("{}_item_ndx", table_name),
    ]
}

pub fn booking_indexes(names: &[String; 3]) -> [TableIndex<'_>; 3] {
    [
        TableIndex { name: names[0].as_str(), pk: "booker_id", sk: "start_at" },
        TableIndex { name: names[1].as_str(), pk: "owner_id", sk: "start_at" },
        TableIndex { name: names[2].as_str(), pk: "item_id", sk: "start_at" },
    ]
}

pub async fn create_booking_repository(store: RepositoryStore) -> Box<dyn BookingRepository> {
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBBookingRepository::new(client, BOOKINGS_TABLE))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let names = booking_index_names(BOOKINGS_TABLE);
            let _ = create_table(&client, BOOKINGS_TABLE, "booking_id", &booking_indexes(&names)).await;
            Box::new(DDBBookingRepository::new(client, BOOKINGS_TABLE))
        }
        RepositoryStore::InMemory => {
            Box::new(MemoryBookingRepository::shared())
        }
    }
}

pub async fn create_booking_service(config: &Configuration, store: RepositoryStore) -> Box<dyn BookingService> {
    let booking_repository = create_booking_repository(store).await;
    let item_repository = create_item_repository(store).await;
    let user_service = create_user_service(config, store).await;
    let publisher = create_publisher(store.gateway_publisher()).await;
    Box::new(BookingServiceImpl::new(config, booking_repository, item_repository,
                                     user_service, publisher, Arc::new(SystemClock)))
}

#[cfg(test)]
mod tests {
    use crate::bookings::factory::{booking_index_names, booking_indexes};

    #[tokio::test]
    async fn test_should_name_indexes_after_table() {
        let names = booking_index_names("bookings");
        let indexes = booking_indexes(&names);
        assert_eq!("bookings_booker_ndx", indexes[0].name);
        assert_eq!("owner_id", indexes[1].pk);
        assert_eq!("bookings_item_ndx", indexes[2].name);
        assert!(indexes.iter().all(|ndx| ndx.sk == "start_at"));
    }
}
