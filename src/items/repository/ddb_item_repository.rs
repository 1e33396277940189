use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;
use tracing::debug;

use crate::core::repository::Repository;
use crate::core::sharing::{PaginatedResult, SharingError, SharingResult};
use crate::items::domain::model::ItemEntity;
use crate::items::repository::ItemRepository;
use crate::utils::ddb::{add_filter_expr, execute_statement_all, from_ddb, parse_bool_attribute, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

const MAX_IN_KEYS: usize = 50;

#[derive(Debug)]
pub struct DDBItemRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBItemRepository {
    pub fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

// available is stored as a boolean, everything else the items are queried by is a string
fn filter_value(name: &str, value: &str) -> AttributeValue {
    if name == "available" {
        AttributeValue::Bool(value == "true")
    } else {
        AttributeValue::S(value.to_string())
    }
}

#[async_trait]
impl Repository<ItemEntity> for DDBItemRepository {
    async fn create(&self, entity: &ItemEntity) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(item_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn update(&self, entity: &ItemEntity) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("item_id", AttributeValue::S(entity.item_id.clone()))
            .update_expression("SET version = :version, #name = :name, #description = :description, available = :available, updated_at = :updated_at")
            .expression_attribute_names("#name", "name")
            .expression_attribute_names("#description", "description")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":name", AttributeValue::S(entity.name.to_string()))
            .expression_attribute_values(":description", AttributeValue::S(entity.description.to_string()))
            .expression_attribute_values(":available", AttributeValue::Bool(entity.available))
            .expression_attribute_values(":updated_at", string_date(entity.updated_at))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn get(&self, id: &str) -> SharingResult<ItemEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression("item_id = :item_id")
            .expression_attribute_values(":item_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map_err(SharingError::from).and_then(|req| {
            match req.items.as_deref() {
                Some([map]) => Ok(ItemEntity::from(map)),
                Some([_, _, ..]) => Err(SharingError::database(format!("too many items for {}", id).as_str(), None, false)),
                _ => Err(SharingError::not_found(format!("item not found for {}", id).as_str())),
            }
        })
    }

    async fn delete(&self, id: &str) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("item_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> SharingResult<PaginatedResult<ItemEntity>> {
        let owner_id = predicate.get("owner_id")
            .ok_or_else(|| SharingError::invalid_argument("owner_id is required to query items"))?;
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .set_exclusive_start_key(to_ddb_page(page, predicate))
            .key_condition_expression("owner_id = :owner_id")
            .expression_attribute_values(":owner_id", AttributeValue::S(owner_id.to_string()));
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != "owner_id" {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", ks).as_str(), filter_value(ks.as_str(), v));
            }
        }
        if !filter_expr.is_empty() {
            request = request.filter_expression(filter_expr);
        }
        request
            .send()
            .await.map_err(SharingError::from).map(|req| {
            let records = req.items().unwrap_or_default().iter()
                .map(ItemEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl ItemRepository for DDBItemRepository {
    async fn find_by_owner(&self, owner_id: &str) -> SharingResult<Vec<ItemEntity>> {
        let predicate = HashMap::from([("owner_id".to_string(), owner_id.to_string())]);
        let mut items = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = self.query(&predicate, next_page.as_deref(), 500).await?;
            items.extend(res.records);
            match res.next_page {
                Some(page) => next_page = Some(page),
                None => return Ok(items),
            }
        }
    }

    // PartiQL has no case-insensitive contains, the text is matched after the available items are read
    async fn search(&self, text: &str) -> SharingResult<Vec<ItemEntity>> {
        let statement = format!("SELECT * FROM \"{}\" WHERE available = ?", self.table_name);
        let rows = execute_statement_all(&self.client, statement.as_str(), vec![AttributeValue::Bool(true)]).await?;
        let text = text.to_lowercase();
        let mut items: Vec<ItemEntity> = rows.iter().map(ItemEntity::from)
            .filter(|i| i.matches_text(text.as_str()))
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.item_id.cmp(&b.item_id)));
        debug!(text = text.as_str(), found = items.len(), "searched items");
        Ok(items)
    }

    async fn find_by_requests(&self, request_ids: &[String]) -> SharingResult<Vec<ItemEntity>> {
        let mut items = vec![];
        for chunk in request_ids.chunks(MAX_IN_KEYS) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let statement = format!("SELECT * FROM \"{}\" WHERE request_id IN [{}]", self.table_name, placeholders);
            let parameters = chunk.iter().map(|id| AttributeValue::S(id.to_string())).collect();
            let rows = execute_statement_all(&self.client, statement.as_str(), parameters).await?;
            items.extend(rows.iter().map(ItemEntity::from));
        }
        Ok(items)
    }
}

impl From<&HashMap<String, AttributeValue>> for ItemEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        ItemEntity {
            item_id: parse_string_attribute("item_id", map).unwrap_or_default(),
            version: parse_number_attribute("version", map),
            owner_id: parse_string_attribute("owner_id", map).unwrap_or_default(),
            name: parse_string_attribute("name", map).unwrap_or_default(),
            description: parse_string_attribute("description", map).unwrap_or_default(),
            available: parse_bool_attribute("available", map),
            request_id: parse_string_attribute("request_id", map),
            created_at: parse_date_attribute("created_at", map).unwrap_or(Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or(Utc::now().naive_utc()),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use lazy_static::lazy_static;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::items::domain::model::ItemEntity;
    use crate::items::repository::ddb_item_repository::DDBItemRepository;
    use crate::items::repository::ItemRepository;
    use crate::utils::ddb::{build_db_client, create_table, delete_table, TableIndex};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, "items_test").await;
                let _ = create_table(&client, "items_test", "item_id",
                    &[TableIndex { name: "items_test_ndx", pk: "owner_id", sk: "created_at" }]).await;
                client
            });
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_create_update_find_item() {
        let repo = DDBItemRepository::new(CLIENT.get().await.clone(), "items_test", "items_test_ndx");
        let mut item = ItemEntity::new("ddb-owner1", "ladder", "aluminium", true);
        assert_eq!(1, repo.create(&item).await.expect("should create item"));
        item.available = false;
        assert_eq!(1, repo.update(&item).await.expect("should update item"));
        let loaded = repo.get(item.item_id.as_str()).await.expect("should get item");
        assert!(!loaded.available);
        assert_eq!(None, loaded.request_id);
        let items = repo.find_by_owner("ddb-owner1").await.expect("should find items");
        assert_eq!(1, items.len());
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local"]
    async fn test_should_search_and_find_by_requests() {
        let repo = DDBItemRepository::new(CLIENT.get().await.clone(), "items_test", "items_test_ndx");
        let mut item = ItemEntity::new("ddb-owner2", "Camping Stove", "gas", true);
        item.request_id = Some("ddb-request1".to_string());
        repo.create(&item).await.expect("should create item");
        let found = repo.search("STOVE").await.expect("should search");
        assert!(found.iter().any(|i| i.item_id == item.item_id));
        let answers = repo.find_by_requests(&["ddb-request1".to_string()]).await.expect("should find items");
        assert_eq!(vec![item.item_id], answers.iter().map(|i| i.item_id.to_string()).collect::<Vec<_>>());
    }
}
