use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Utc;

use crate::core::repository::Repository;
use crate::core::sharing::{PaginatedResult, SharingError, SharingResult};
use crate::users::domain::model::UserEntity;
use crate::users::repository::UserRepository;
use crate::utils::ddb::{add_filter_expr, execute_statement_all, from_ddb, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

#[derive(Debug)]
pub struct DDBUserRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBUserRepository {
    pub fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<UserEntity> for DDBUserRepository {
    async fn create(&self, entity: &UserEntity) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(user_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn update(&self, entity: &UserEntity) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("user_id", AttributeValue::S(entity.user_id.clone()))
            .update_expression("SET version = :version, #name = :name, email = :email, updated_at = :updated_at")
            .expression_attribute_names("#name", "name")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":name", AttributeValue::S(entity.name.to_string()))
            .expression_attribute_values(":email", AttributeValue::S(entity.email.to_string()))
            .expression_attribute_values(":updated_at", string_date(entity.updated_at))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn get(&self, id: &str) -> SharingResult<UserEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression("user_id = :user_id")
            .expression_attribute_values(":user_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map_err(SharingError::from).and_then(|req| {
            match req.items.as_deref() {
                Some([map]) => Ok(UserEntity::from(map)),
                Some([_, _, ..]) => Err(SharingError::database(format!("too many users for {}", id).as_str(), None, false)),
                _ => Err(SharingError::not_found(format!("user not found for {}", id).as_str())),
            }
        })
    }

    async fn delete(&self, id: &str) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("user_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    // queries the email index, other attributes become filters
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> SharingResult<PaginatedResult<UserEntity>> {
        let email = predicate.get("email")
            .ok_or_else(|| SharingError::invalid_argument("email is required to query users"))?;
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .set_exclusive_start_key(to_ddb_page(page, predicate))
            .key_condition_expression("email = :email")
            .expression_attribute_values(":email", AttributeValue::S(email.to_lowercase()));
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != "email" {
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
                .map(UserEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl UserRepository for DDBUserRepository {
    async fn find_by_email(&self, email: &str) -> SharingResult<Option<UserEntity>> {
        let res = self.query(&HashMap::from([("email".to_string(), email.to_string())]), None, 1).await?;
        Ok(res.records.into_iter().next())
    }

    async fn find_all(&self) -> SharingResult<Vec<UserEntity>> {
        let statement = format!("SELECT * FROM \"{}\"", self.table_name);
        let rows = execute_statement_all(&self.client, statement.as_str(), vec![]).await?;
        let mut users: Vec<UserEntity> = rows.iter().map(UserEntity::from).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.user_id.cmp(&b.user_id)));
        Ok(users)
    }
}

impl From<&HashMap<String, AttributeValue>> for UserEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        UserEntity {
            user_id: parse_string_attribute("user_id", map).unwrap_or_default(),
            version: parse_number_attribute("version", map),
            name: parse_string_attribute("name", map).unwrap_or_default(),
            email: parse_string_attribute("email", map).unwrap_or_default(),
            created_at: parse_date_attribute("created_at", map).unwrap_or(Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or(Utc::now().naive_utc()),
        }
    }
}
