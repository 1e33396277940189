use std::collections::HashMap;
use async_trait::async_trait;
use lazy_static::lazy_static;
use crate::comments::domain::model::{CommentEntity, sort_newest_first};
use crate::comments::repository::CommentRepository;
use crate::core::repository::Repository;
use crate::core::sharing::{PaginatedResult, SharingResult};
use crate::utils::memory::MemoryTable;

lazy_static! {
    static ref COMMENTS: MemoryTable<CommentEntity> = MemoryTable::default();
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCommentRepository {
    table: MemoryTable<CommentEntity>,
}

impl MemoryCommentRepository {
    pub fn new(table: MemoryTable<CommentEntity>) -> Self {
        Self { table }
    }

    pub fn shared() -> Self {
        Self::new(COMMENTS.clone())
    }
}

#[async_trait]
impl Repository<CommentEntity> for MemoryCommentRepository {
    async fn create(&self, entity: &CommentEntity) -> SharingResult<usize> {
        self.table.create(entity)
    }

    async fn update(&self, entity: &CommentEntity) -> SharingResult<usize> {
        self.table.update_versioned(entity, |c| c.version += 1)
    }

    async fn get(&self, id: &str) -> SharingResult<CommentEntity> {
        self.table.get(id, "comment")
    }

    async fn delete(&self, id: &str) -> SharingResult<usize> {
        self.table.delete(id)
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> SharingResult<PaginatedResult<CommentEntity>> {
        self.table.query(predicate, page, page_size)
    }
}

#[async_trait]
impl CommentRepository for MemoryCommentRepository {
    async fn find_by_item(&self, item_id: &str) -> SharingResult<Vec<CommentEntity>> {
        let mut comments = self.table.filter(|c| c.item_id == item_id)?;
        sort_newest_first(&mut comments);
        Ok(comments)
    }

    async fn find_by_items(&self, item_ids: &[String]) -> SharingResult<HashMap<String, Vec<CommentEntity>>> {
        let mut grouped: HashMap<String, Vec<CommentEntity>> = HashMap::new();
        for comment in self.table.filter(|c| item_ids.contains(&c.item_id))? {
            grouped.entry(comment.item_id.to_string()).or_default().push(comment);
        }
        for comments in grouped.values_mut() {
            sort_newest_first(comments);
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use crate::comments::domain::model::CommentEntity;
    use crate::comments::repository::CommentRepository;
    use crate::comments::repository::memory_comment_repository::MemoryCommentRepository;
    use crate::core::repository::Repository;

    #[tokio::test]
    async fn test_should_group_comments_newest_first() {
        let repo = MemoryCommentRepository::default();
        let t0 = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
        for i in 0..3 {
            repo.create(&CommentEntity::new("item1", "user1", format!("note {}", i).as_str(), t0 + Duration::minutes(i)))
                .await.expect("should create comment");
        }
        repo.create(&CommentEntity::new("item2", "user1", "other", t0)).await.expect("should create comment");

        let comments = repo.find_by_item("item1").await.expect("should find comments");
        assert_eq!(vec!["note 2", "note 1", "note 0"], comments.iter().map(|c| c.text.as_str()).collect::<Vec<&str>>());

        let grouped = repo.find_by_items(&["item1".to_string(), "item2".to_string(), "item3".to_string()])
            .await.expect("should find comments");
        assert_eq!(3, grouped.get("item1").map(|c| c.len()).unwrap_or_default());
        assert_eq!(1, grouped.get("item2").map(|c| c.len()).unwrap_or_default());
        assert!(!grouped.contains_key("item3"));
    }
}
