use std::collections::HashMap;
use aws_sdk_sns::Client;
use async_trait::async_trait;
use aws_sdk_sns::error::SdkError;
use aws_sdk_sns::operation::create_topic::CreateTopicError;
use aws_sdk_sns::operation::publish::PublishError;
use tokio::sync::Mutex;
use tracing::info;
use crate::core::events::DomainEvent;
use crate::core::sharing::{SharingError, SharingResult};
use crate::gateway::events::EventPublisher;

// SNSPublisher publishes each event to a topic named after the event, topics are created on first use
#[derive(Debug)]
pub struct SNSPublisher {
    client: Client,
    topics: Mutex<HashMap<String, String>>,
}

impl SNSPublisher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            topics: Mutex::new(HashMap::new()),
        }
    }

    async fn topic_arn(&self, topic: &str) -> SharingResult<String> {
        let mut topics = self.topics.lock().await;
        if let Some(arn) = topics.get(topic) {
            return Ok(arn.to_string());
        }
        // CreateTopic is idempotent and returns the existing ARN
        let resp = self.client.create_topic().name(topic).send().await?;
        let arn = resp.topic_arn().unwrap_or_default().to_string();
        if arn.is_empty() {
            return Err(SharingError::runtime(format!("topic is not found {}", topic).as_str(), None));
        }
        info!("Created topic with ARN: {}", arn);
        topics.insert(topic.to_string(), arn.clone());
        Ok(arn)
    }
}

#[async_trait]
impl EventPublisher for SNSPublisher {
    async fn publish(&self, event: &DomainEvent) -> SharingResult<()> {
        let arn = self.topic_arn(event.name.as_str()).await?;
        let json = serde_json::to_string(event)?;
        self.client.publish().topic_arn(arn).message(json).send().await?;
        Ok(())
    }
}

impl From<SdkError<CreateTopicError>> for SharingError {
    fn from(err: SdkError<CreateTopicError>) -> Self {
        SharingError::runtime(format!("{:?}", err).as_str(), None)
    }
}

impl From<SdkError<PublishError>> for SharingError {
    fn from(err: SdkError<PublishError>) -> Self {
        SharingError::runtime(format!("{:?}", err).as_str(), None)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::core::events::DomainEvent;
    use crate::gateway::{factory, GatewayPublisherVia};

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_should_publish_to_sns() {
        let event = DomainEvent::added("booking_created", "bookings", "key", "user1",
                                       &"payload".to_string(), Utc::now().naive_utc()).expect("build event");
        let publisher = factory::create_publisher(GatewayPublisherVia::Sns).await;
        publisher.publish(&event).await.expect("should publish");
    }
}
