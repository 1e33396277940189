use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::comments::domain::model::{CommentEntity, sort_newest_first};
use crate::comments::repository::CommentRepository;
use crate::core::repository::Repository;
use crate::core::sharing::{PaginatedResult, SharingError, SharingResult};
use crate::utils::ddb::{add_filter_expr, execute_statement_all, from_ddb, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, to_ddb_page};

const MAX_IN_KEYS: usize = 50;

#[derive(Debug)]
pub struct DDBCommentRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBCommentRepository {
    pub fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<CommentEntity> for DDBCommentRepository {
    async fn create(&self, entity: &CommentEntity) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(comment_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn update(&self, entity: &CommentEntity) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("comment_id", AttributeValue::S(entity.comment_id.clone()))
            .update_expression("SET version = :version, #text = :text")
            .expression_attribute_names("#text", "text")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":text", AttributeValue::S(entity.text.to_string()))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn get(&self, id: &str) -> SharingResult<CommentEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression("comment_id = :comment_id")
            .expression_attribute_values(":comment_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map_err(SharingError::from).and_then(|req| {
            match req.items.as_deref() {
                Some([map]) => Ok(CommentEntity::from(map)),
                Some([_, _, ..]) => Err(SharingError::database(format!("too many comments for {}", id).as_str(), None, false)),
                _ => Err(SharingError::not_found(format!("comment not found for {}", id).as_str())),
            }
        })
    }

    async fn delete(&self, id: &str) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("comment_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> SharingResult<PaginatedResult<CommentEntity>> {
        let item_id = predicate.get("item_id")
            .ok_or_else(|| SharingError::invalid_argument("item_id is required to query comments"))?;
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .scan_index_forward(false)
            .set_exclusive_start_key(to_ddb_page(page, predicate))
            .key_condition_expression("item_id = :item_id")
            .expression_attribute_values(":item_id", AttributeValue::S(item_id.to_string()));
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != "item_id" {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", ks).as_str(), AttributeValue::S(v.to_string()));
            }
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }
        request
            .send()
            .await.map_err(SharingError::from).map(|req| {
            let records = req.items().unwrap_or_default().iter()
                .map(CommentEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl CommentRepository for DDBCommentRepository {
    async fn find_by_item(&self, item_id: &str) -> SharingResult<Vec<CommentEntity>> {
        let predicate = HashMap::from([("item_id".to_string(), item_id.to_string())]);
        let mut comments = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = self.query(&predicate, next_page.as_deref(), 500).await?;
            comments.extend(res.records);
            match res.next_page {
                Some(page) => next_page = Some(page),
                None => return Ok(comments),
            }
        }
    }

    async fn find_by_items(&self, item_ids: &[String]) -> SharingResult<HashMap<String, Vec<CommentEntity>>> {
        let mut grouped: HashMap<String, Vec<CommentEntity>> = HashMap::new();
        for chunk in item_ids.chunks(MAX_IN_KEYS) {
            let statement = format!("SELECT * FROM \"{}\".\"{}\" WHERE item_id IN [{}]",
                                    self.table_name, self.index_name, vec!["?"; chunk.len()].join(", "));
            let parameters: Vec<AttributeValue> = chunk.iter().map(|id| AttributeValue::S(id.to_string())).collect();
            for comment in execute_statement_all(&self.client, statement.as_str(), parameters).await?.iter().map(CommentEntity::from) {
                grouped.entry(comment.item_id.to_string()).or_default().push(comment);
            }
        }
        for comments in grouped.values_mut() {
            sort_newest_first(comments);
        }
        Ok(grouped)
    }
}

impl From<&HashMap<String, AttributeValue>> for CommentEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        CommentEntity {
            comment_id: parse_string_attribute("comment_id", map).unwrap_or_default(),
            version: parse_number_attribute("version", map),
            item_id: parse_string_attribute("item_id", map).unwrap_or_default(),
            author_id: parse_string_attribute("author_id", map).unwrap_or_default(),
            text: parse_string_attribute("text", map).unwrap_or_default(),
            created_at: parse_date_attribute("created_at", map).unwrap_or(Utc::now().naive_utc()),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use chrono::{Duration, Utc};
    use lazy_static::lazy_static;
    use crate::comments::domain::model::CommentEntity;
    use crate::comments::repository::CommentRepository;
    use crate::comments::repository::ddb_comment_repository::DDBCommentRepository;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::utils::ddb::{build_db_client, create_table, delete_table, TableIndex};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, "comments_test").await;
                let _ = create_table(&client, "comments_test", "comment_id",
                    &[TableIndex { name: "comments_test_ndx", pk: "item_id", sk: "created_at" }]).await;
                client
            });
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_create_find_comments() {
        let repo = DDBCommentRepository::new(CLIENT.get().await.clone(), "comments_test", "comments_test_ndx");
        let now = Utc::now().naive_utc();
        let older = CommentEntity::new("ddb-item1", "user1", "fine", now - Duration::minutes(5));
        let newer = CommentEntity::new("ddb-item1", "user2", "great", now);
        repo.create(&older).await.expect("should create comment");
        repo.create(&newer).await.expect("should create comment");
        let comments = repo.find_by_item("ddb-item1").await.expect("should find comments");
        assert_eq!(vec![newer.comment_id.clone(), older.comment_id.clone()],
                   comments.iter().map(|c| c.comment_id.to_string()).collect::<Vec<String>>());
        let grouped = repo.find_by_items(&["ddb-item1".to_string()]).await.expect("should find comments");
        assert_eq!(2, grouped.get("ddb-item1").map(|c| c.len()).unwrap_or_default());
    }
}
