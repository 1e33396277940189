use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::core::repository::Repository;
use crate::core::sharing::{PaginatedResult, SharingError, SharingResult};
use crate::requests::domain::model::{RequestEntity, sort_newest_first};
use crate::requests::repository::RequestRepository;
use crate::utils::ddb::{add_filter_expr, execute_statement_all, from_ddb, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, to_ddb_page};

#[derive(Debug)]
pub struct DDBRequestRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBRequestRepository {
    pub fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<RequestEntity> for DDBRequestRepository {
    async fn create(&self, entity: &RequestEntity) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(request_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn update(&self, entity: &RequestEntity) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("request_id", AttributeValue::S(entity.request_id.clone()))
            .update_expression("SET version = :version, #description = :description")
            .expression_attribute_names("#description", "description")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":description", AttributeValue::S(entity.description.to_string()))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn get(&self, id: &str) -> SharingResult<RequestEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression("request_id = :request_id")
            .expression_attribute_values(":request_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map_err(SharingError::from).and_then(|req| {
            match req.items.as_deref() {
                Some([map]) => Ok(RequestEntity::from(map)),
                Some([_, _, ..]) => Err(SharingError::database(format!("too many requests for {}", id).as_str(), None, false)),
                _ => Err(SharingError::not_found(format!("request not found for {}", id).as_str())),
            }
        })
    }

    async fn delete(&self, id: &str) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("request_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> SharingResult<PaginatedResult<RequestEntity>> {
        let requester_id = predicate.get("requester_id")
            .ok_or_else(|| SharingError::invalid_argument("requester_id is required to query requests"))?;
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
            .key_condition_expression("requester_id = :requester_id")
            .expression_attribute_values(":requester_id", AttributeValue::S(requester_id.to_string()));
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != "requester_id" {
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
                .map(RequestEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl RequestRepository for DDBRequestRepository {
    async fn find_by_requester(&self, requester_id: &str) -> SharingResult<Vec<RequestEntity>> {
        let predicate = HashMap::from([("requester_id".to_string(), requester_id.to_string())]);
        let mut requests = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = self.query(&predicate, next_page.as_deref(), 500).await?;
            requests.extend(res.records);
            match res.next_page {
                Some(page) => next_page = Some(page),
                None => return Ok(requests),
            }
        }
    }

    // the index is keyed by requester, so everyone else's requests come from a filtered table read
    async fn find_by_others(&self, requester_id: &str) -> SharingResult<Vec<RequestEntity>> {
        let statement = format!("SELECT * FROM \"{}\" WHERE requester_id <> ?", self.table_name);
        let rows = execute_statement_all(
            &self.client, statement.as_str(), vec![AttributeValue::S(requester_id.to_string())]).await?;
        let mut requests: Vec<RequestEntity> = rows.iter().map(RequestEntity::from).collect();
        sort_newest_first(&mut requests);
        Ok(requests)
    }
}

impl From<&HashMap<String, AttributeValue>> for RequestEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        RequestEntity {
            request_id: parse_string_attribute("request_id", map).unwrap_or_default(),
            version: parse_number_attribute("version", map),
            requester_id: parse_string_attribute("requester_id", map).unwrap_or_default(),
            description: parse_string_attribute("description", map).unwrap_or_default(),
            created_at: parse_date_attribute("created_at", map).unwrap_or(Utc::now().naive_utc()),
        }
    }
}
