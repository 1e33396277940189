use std::collections::HashMap;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::utils::date::serializer;

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum DomainEventType {
    Added,
    Updated,
}

// DomainEvent records a committed change to a booking or comment
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub event_id: String,
    pub name: String,
    pub group: String,
    pub key: String,
    pub kind: DomainEventType,
    pub actor_id: String,
    pub metadata: HashMap<String, String>,
    pub json_data: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}

impl DomainEvent {
    pub fn added<T: Serialize>(name: &str, group: &str, key: &str, actor_id: &str,
                               data: &T, at: NaiveDateTime) -> serde_json::Result<Self> {
        let json = serde_json::to_string(data)?;
        Ok(Self::build(name, group, key, DomainEventType::Added, actor_id, json, at))
    }

    pub fn updated<T: Serialize>(name: &str, group: &str, key: &str, actor_id: &str,
                                 data: &T, at: NaiveDateTime) -> serde_json::Result<Self> {
        let json = serde_json::to_string(data)?;
        Ok(Self::build(name, group, key, DomainEventType::Updated, actor_id, json, at))
    }

    pub fn with_metadata(mut self, k: &str, v: &str) -> Self {
        self.metadata.insert(k.to_string(), v.to_string());
        self
    }

    fn build(name: &str, group: &str, key: &str, kind: DomainEventType, actor_id: &str,
             json: String, at: NaiveDateTime) -> DomainEvent {
        DomainEvent {
            event_id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            group: group.to_string(),
            key: key.to_string(),
            kind,
            actor_id: actor_id.to_string(),
            metadata: HashMap::new(),
            json_data: json,
            created_at: at,
        }
    }
}
