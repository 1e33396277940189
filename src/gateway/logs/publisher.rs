use async_trait::async_trait;
use tracing::info;
use crate::core::events::DomainEvent;
use crate::core::sharing::SharingResult;
use crate::gateway::events::EventPublisher;

// LogPublisher writes events to the tracing subscriber, used with the in-memory store
#[derive(Debug, Default)]
pub struct LogPublisher;

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, event: &DomainEvent) -> SharingResult<()> {
        info!(event_id = %event.event_id, name = %event.name, key = %event.key,
            actor_id = %event.actor_id, kind = ?event.kind, "domain event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::core::events::DomainEvent;
    use crate::gateway::{factory, GatewayPublisherVia};

    #[tokio::test]
    async fn test_should_publish_to_logs() {
        let event = DomainEvent::added("comment_added", "comments", "key", "user1",
                                       &"payload".to_string(), Utc::now().naive_utc()).expect("build event");
        let publisher = factory::create_publisher(GatewayPublisherVia::Logs).await;
        publisher.publish(&event).await.expect("should publish");
    }
}
