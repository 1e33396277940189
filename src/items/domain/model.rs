use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntity {
    pub item_id: String,
    pub version: i64,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub available: bool,
    // the item request this item was listed for, if any
    pub request_id: Option<String>,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl ItemEntity {
    pub fn new(owner_id: &str, name: &str, description: &str, available: bool) -> Self {
        Self {
            item_id: Uuid::new_v4().to_string(),
            version: 0,
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            available,
            request_id: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    // available items whose name or description contains the lowercased text
    pub fn matches_text(&self, lowercase_text: &str) -> bool {
        self.available && (self.name.to_lowercase().contains(lowercase_text) ||
            self.description.to_lowercase().contains(lowercase_text))
    }
}

impl Identifiable for ItemEntity {
    fn id(&self) -> String {
        self.item_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use crate::items::domain::model::ItemEntity;

    #[tokio::test]
    async fn test_should_match_text_on_available_items() {
        let item = ItemEntity::new("owner1", "Cordless Drill", "with two BATTERIES", true);
        assert!(item.matches_text("drill"));
        assert!(item.matches_text("batteries"));
        assert!(!item.matches_text("saw"));
        let hidden = ItemEntity { available: false, ..item };
        assert!(!hidden.matches_text("drill"));
    }
}
