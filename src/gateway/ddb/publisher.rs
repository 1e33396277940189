use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use tracing::debug;
use crate::core::events::DomainEvent;
use crate::core::sharing::{SharingError, SharingResult};
use crate::gateway::events::EventPublisher;
use crate::utils::ddb::parse_item;

// DDBPublisher appends events to a table, used with DynamoDB Local during development
#[derive(Debug)]
pub struct DDBPublisher {
    client: Client,
    table_name: String,
}

impl DDBPublisher {
    pub fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }
}

#[async_trait]
impl EventPublisher for DDBPublisher {
    async fn publish(&self, event: &DomainEvent) -> SharingResult<()> {
        let item = parse_item(serde_json::to_value(event)?)?;
        self.client
            .put_item()
            .table_name(self.table_name.as_str())
            .condition_expression("attribute_not_exists(event_id)")
            .set_item(Some(item))
            .send()
            .await.map_err(SharingError::from)?;
        debug!(event_id = %event.event_id, name = %event.name, table = %self.table_name, "event stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use chrono::Utc;
    use lazy_static::lazy_static;
    use crate::core::events::DomainEvent;
    use crate::core::repository::RepositoryStore;
    use crate::gateway::ddb::publisher::DDBPublisher;
    use crate::gateway::events::EventPublisher;
    use crate::utils::ddb::{build_db_client, create_table, delete_table, TableIndex};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, "events").await;
                let _ = create_table(&client, "events", "event_id",
                    &[TableIndex { name: "events_ndx", pk: "key", sk: "created_at" }]).await;
                client
            });
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_publish_to_ddb() {
        let event = DomainEvent::added("booking_created", "bookings", "key", "user1",
                                       &"payload".to_string(), Utc::now().naive_utc()).expect("build event");
        let publisher = DDBPublisher::new(CLIENT.get().await.clone(), "events");
        publisher.publish(&event).await.expect("should publish");
    }
}
