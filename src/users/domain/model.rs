use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEntity {
    pub user_id: String,
    pub version: i64,
    pub name: String,
    pub email: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl UserEntity {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            user_id: Uuid::new_v4().to_string(),
            version: 0,
            name: name.to_string(),
            email: email.to_lowercase(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        }
    }
}

impl Identifiable for UserEntity {
    fn id(&self) -> String {
        self.user_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use crate::core::domain::Identifiable;
    use crate::users::domain::model::UserEntity;

    #[tokio::test]
    async fn test_should_build_user() {
        let user = UserEntity::new("Ann", "Ann@Example.com");
        assert_eq!("ann@example.com", user.email.as_str());
        assert_eq!(user.user_id, user.id());
        assert_eq!(0, user.version());
    }
}
