use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::core::domain::Identifiable;
use crate::utils::date::serializer;

pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEntity {
    pub request_id: String,
    pub version: i64,
    pub requester_id: String,
    pub description: String,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
}

impl RequestEntity {
    pub fn new(requester_id: &str, description: &str, created_at: NaiveDateTime) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            version: 0,
            requester_id: requester_id.to_string(),
            description: description.trim().to_string(),
            created_at,
        }
    }
}

impl Identifiable for RequestEntity {
    fn id(&self) -> String {
        self.request_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

pub(crate) fn sort_newest_first(requests: &mut [RequestEntity]) {
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.request_id.cmp(&a.request_id)));
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use crate::requests::domain::model::{RequestEntity, sort_newest_first};

    #[tokio::test]
    async fn test_should_sort_newest_first() {
        let t0 = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let mut requests = vec![
            RequestEntity::new("user1", " a tent ", t0),
            RequestEntity::new("user1", "a stove", t0 + Duration::hours(1)),
        ];
        sort_newest_first(&mut requests);
        assert_eq!(vec!["a stove", "a tent"], requests.iter().map(|r| r.description.as_str()).collect::<Vec<&str>>());
    }
}
