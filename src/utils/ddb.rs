use std::collections::HashMap;
use std::time::Duration;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::execute_statement::ExecuteStatementError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeDefinition, AttributeValue, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection, ProjectionType, ProvisionedThroughput, ScalarAttributeType, TableStatus};
use chrono::NaiveDateTime;
use serde_json::Value;
use crate::core::sharing::{PaginatedResult, SharingError, SharingResult};
use crate::core::repository::RepositoryStore;
use crate::utils::date::{DATE_FMT, format_date};

// TableIndex describes a global secondary index as (index name, hash key, range key)
#[derive(Debug, Clone, Copy)]
pub struct TableIndex<'a> {
    pub name: &'a str,
    pub pk: &'a str,
    pub sk: &'a str,
}

pub async fn create_table(client: &Client, table_name: &str, pk: &str,
                          indexes: &[TableIndex<'_>]) -> SharingResult<()> {
    let mut request = client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(pk)
                .key_type(KeyType::Hash)
                .build(),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(pk)
                .attribute_type(ScalarAttributeType::S)
                .build(),
        )
        .provisioned_throughput(
            ProvisionedThroughput::builder()
                .read_capacity_units(10)
                .write_capacity_units(10)
                .build(),
        );

    let mut defined = vec![pk.to_string()];
    for index in indexes {
        let gsi = GlobalSecondaryIndex::builder()
            .index_name(index.name)
            .key_schema(KeySchemaElement::builder()
                .attribute_name(index.pk)
                .key_type(KeyType::Hash).build())
            .key_schema(KeySchemaElement::builder()
                .attribute_name(index.sk)
                .key_type(KeyType::Range).build())
            .projection(Projection::builder().projection_type(ProjectionType::All).build())
            .provisioned_throughput(
                ProvisionedThroughput::builder().read_capacity_units(10).write_capacity_units(10).build())
            .build();
        request = request.global_secondary_indexes(gsi);
        for attr in [index.pk, index.sk] {
            if !defined.iter().any(|d| d == attr) {
                request = request.attribute_definitions(
                    AttributeDefinition::builder()
                        .attribute_name(attr)
                        .attribute_type(ScalarAttributeType::S)
                        .build());
                defined.push(attr.to_string());
            }
        }
    }

    match request.send().await {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Creating).await;
            Ok(())
        }
        Err(err) => {
            Err(SharingError::database_or_unavailable(format!("failed to create {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

pub async fn delete_table(client: &Client, table_name: &str) -> SharingResult<()> {
    match client.delete_table().table_name(table_name).send().await {
        Ok(_k) => {
            wait_until_table_status_is_not(client, table_name, TableStatus::Deleting).await;
            Ok(())
        }
        Err(err) => {
            Err(SharingError::database_or_unavailable(format!("failed to delete {} table due to {}",
                                                              table_name, err).as_str(), None, false))
        }
    }
}

async fn wait_until_table_status_is_not(client: &Client, table_name: &str, other_status: TableStatus) {
    for _ in 0..30 {
        match describe_table(client, table_name).await {
            Ok(status) if status != other_status => return,
            _ => tokio::time::sleep(Duration::from_secs(1)).await,
        }
    }
}

async fn describe_table(client: &Client, table_name: &str) -> SharingResult<TableStatus> {
    let out = client.describe_table().table_name(table_name).send().await
        .map_err(|err| SharingError::database_or_unavailable(
            format!("failed to describe {} table due to {}", table_name, err).as_str(), None, false))?;
    out.table()
        .and_then(|t| t.table_status())
        .cloned()
        .ok_or_else(|| SharingError::runtime(format!("no status for {} table", table_name).as_str(), None))
}

pub(crate) fn parse_item(value: Value) -> Result<HashMap<String, AttributeValue>, String> {
    match value_to_item(value) {
        AttributeValue::M(map) => Ok(map),
        other => Err(format!("expected a map attribute but got {:?}", other)),
    }
}

pub(crate) fn parse_string_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<String> {
    map.get(name).and_then(|v| v.as_s().ok()).cloned()
}

pub(crate) fn parse_bool_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> bool {
    map.get(name).and_then(|v| v.as_bool().ok()).copied().unwrap_or(false)
}

pub(crate) fn parse_date_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> Option<NaiveDateTime> {
    map.get(name)
        .and_then(|v| v.as_s().ok())
        .and_then(|s| NaiveDateTime::parse_from_str(s, DATE_FMT).ok())
}

// dates are stored as sortable strings so that range keys compare chronologically
pub(crate) fn string_date(date: NaiveDateTime) -> AttributeValue {
    AttributeValue::S(format_date(date))
}

pub(crate) fn parse_number_attribute(name: &str, map: &HashMap<String, AttributeValue>) -> i64 {
    map.get(name)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse::<i64>().ok())
        .unwrap_or(0)
}

// Appends "name op :name" for a "name:op" predicate key and returns the bare attribute name.
pub(crate) fn add_filter_expr(k: &str, filter_expr: &mut String) -> String {
    let (name, op) = k.split_once(':').unwrap_or((k, "="));
    if !filter_expr.is_empty() {
        filter_expr.push_str(" AND ");
    }
    filter_expr.push_str(format!("{} {} :{}", name, op, name).as_str());
    name.to_string()
}

// The page token is the JSON encoded last evaluated key, equality predicates are merged back into it.
pub(crate) fn to_ddb_page(page: Option<&str>,
                          predicate: &HashMap<String, String>) -> Option<HashMap<String, AttributeValue>> {
    let last_key = serde_json::from_str::<HashMap<String, String>>(page?).ok()?;
    let key_attrs = predicate.iter().filter(|(k, _)| !k.contains(':'));
    Some(last_key.into_iter()
        .chain(key_attrs.map(|(k, v)| (k.to_string(), v.to_string())))
        .map(|(k, v)| (k, AttributeValue::S(v)))
        .collect())
}

pub(crate) fn from_ddb<T>(page: Option<&str>, page_size: usize,
                          last_evaluated_key: Option<&HashMap<String, AttributeValue>>,
                          records: Vec<T>) -> PaginatedResult<T> {
    let next_page = last_evaluated_key.and_then(|attrs| {
        let key: HashMap<&String, &String> = attrs.iter()
            .filter_map(|(k, v)| v.as_s().ok().map(|s| (k, s)))
            .collect();
        serde_json::to_string(&key).ok()
    });
    PaginatedResult::new(page, page_size, next_page, records)
}

// runs a PartiQL statement and follows its next tokens until every page is read
pub(crate) async fn execute_statement_all(client: &Client, statement: &str,
                                          parameters: Vec<AttributeValue>) -> SharingResult<Vec<HashMap<String, AttributeValue>>> {
    let parameters = if parameters.is_empty() { None } else { Some(parameters) };
    let mut items = vec![];
    let mut next_token: Option<String> = None;
    loop {
        let resp = client
            .execute_statement()
            .statement(statement)
            .set_parameters(parameters.clone())
            .set_next_token(next_token.take())
            .send()
            .await?;
        items.extend(resp.items().unwrap_or_default().iter().cloned());
        match resp.next_token() {
            Some(token) => next_token = Some(token.to_string()),
            None => return Ok(items),
        }
    }
}

fn value_to_item(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(a) => AttributeValue::L(a.into_iter().map(value_to_item).collect()),
        Value::Object(o) => AttributeValue::M(o.into_iter().map(|(k, v)| (k, value_to_item(v))).collect()),
    }
}

// builds the DynamoDB client for the selected store, the in-memory store never uses it
pub async fn build_db_client(store: RepositoryStore) -> Client {
    if store == RepositoryStore::DynamoDB {
        return Client::new(&aws_config::load_from_env().await);
    }
    // See https://docs.aws.amazon.com/sdk-for-rust/latest/dg/dynamodb-local.html
    let endpoint = std::env::var("DYNAMODB_LOCAL_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());
    let local_config = aws_sdk_dynamodb::Config::builder()
        .region(Region::new("local"))
        .credentials_provider(Credentials::new("AKIDLOCAL", "localsecret", None, None, "local"))
        .endpoint_url(endpoint)
        .build();
    Client::from_conf(local_config)
}

pub async fn build_sns_client() -> aws_sdk_sns::Client {
    aws_sdk_sns::Client::new(&aws_config::load_from_env().await)
}

// JSON lines for CloudWatch: no ANSI colors, no module target, no timestamp since ingestion adds one.
// SHAREIT_LOG_LEVEL overrides the default INFO level.
pub fn setup_tracing() {
    let level = std::env::var("SHAREIT_LOG_LEVEL").ok()
        .and_then(|l| l.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .json()
        .init();
}

// true when DynamoDB refused a write because its condition expression did not hold
pub(crate) fn is_conditional_check_failed(err: &SdkError<UpdateItemError>) -> bool {
    matches!(err, SdkError::ServiceError(ctx) if ctx.err().is_conditional_check_failed_exception())
}

macro_rules! sdk_error_into_sharing {
    ($($op_err:ty),+ $(,)?) => {
        $(
            impl From<SdkError<$op_err>> for SharingError {
                fn from(err: SdkError<$op_err>) -> Self {
                    let (retryable, reason) = retryable_sdk_error(&err);
                    SharingError::database_or_unavailable(format!("{:?}", err).as_str(), reason, retryable)
                }
            }
        )+
    };
}

sdk_error_into_sharing!(UpdateItemError, PutItemError, DeleteItemError, QueryError, ExecuteStatementError);

// throttling surfaces as a 400 whose body mentions an exceeded limit or throughput, it is retryable
fn retryable_sdk_error<T>(err: &SdkError<T>) -> (bool, Option<String>) {
    match err {
        SdkError::ConstructionFailure(_) => (false, Some("ConstructionFailure".to_string())),
        SdkError::TimeoutError(_) => (true, Some("TimeoutError".to_string())),
        SdkError::DispatchFailure(_) => (true, Some("DispatchFailure".to_string())),
        SdkError::ResponseError { .. } => (true, Some("ResponseError".to_string())),
        SdkError::ServiceError(ctx) => {
            let http = ctx.raw().http();
            let retryable = http.status().is_server_error() || has_exceeded_limit(http.body().bytes());
            (retryable, Some(http.status().to_string()))
        }
        _ => (true, Some("Unknown".to_string())),
    }
}

fn has_exceeded_limit(body: Option<&[u8]>) -> bool {
    body.map(|b| b.windows(6).any(|w| w == b"ceeded")).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use aws_sdk_dynamodb::error::SdkError;
    use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
    use aws_sdk_dynamodb::types::AttributeValue;
    use chrono::NaiveDate;
    use serde_json::json;
    use crate::utils::ddb::{add_filter_expr, from_ddb, has_exceeded_limit, is_conditional_check_failed, parse_bool_attribute, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

    #[tokio::test]
    async fn test_should_build_filter_expr() {
        let mut filter_expr = String::new();
        assert_eq!("item_id", add_filter_expr("item_id", &mut filter_expr).as_str());
        assert_eq!("end_at", add_filter_expr("end_at:<=", &mut filter_expr).as_str());
        assert_eq!("item_id = :item_id AND end_at <= :end_at", filter_expr.as_str());
    }

    #[tokio::test]
    async fn test_should_parse_item_attributes() {
        let start = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap().and_hms_opt(10, 0, 0).unwrap();
        let map = parse_item(json!({
            "booking_id": "b1",
            "version": 3,
            "available": true,
            "start_at": "2023-05-01T10:00:00",
        })).expect("should parse");
        assert_eq!(Some("b1".to_string()), parse_string_attribute("booking_id", &map));
        assert_eq!(3, parse_number_attribute("version", &map));
        assert!(parse_bool_attribute("available", &map));
        assert_eq!(Some(start), parse_date_attribute("start_at", &map));
        assert_eq!(AttributeValue::S("2023-05-01T10:00:00".to_string()), string_date(start));
    }

    #[tokio::test]
    async fn test_should_round_trip_page_token() {
        let key = HashMap::from([("booking_id".to_string(), AttributeValue::S("b1".to_string()))]);
        let res = from_ddb::<String>(None, 10, Some(&key), vec![]);
        let token = res.next_page.expect("should have next page");
        let predicate = HashMap::from([("booker_id".to_string(), "u1".to_string())]);
        let start_key = to_ddb_page(Some(token.as_str()), &predicate).expect("should parse token");
        assert_eq!(Some(&AttributeValue::S("b1".to_string())), start_key.get("booking_id"));
        assert_eq!(Some(&AttributeValue::S("u1".to_string())), start_key.get("booker_id"));
    }

    #[tokio::test]
    async fn test_should_detect_exceeded_limit() {
        assert!(has_exceeded_limit(Some(b"ProvisionedThroughputExceededException")));
        assert!(!has_exceeded_limit(Some(b"oops")));
        assert!(!has_exceeded_limit(None));
    }

    #[tokio::test]
    async fn test_should_not_treat_transport_errors_as_failed_condition() {
        let err: SdkError<UpdateItemError> = SdkError::construction_failure("no endpoint");
        assert!(!is_conditional_check_failed(&err));
        let err: SdkError<UpdateItemError> = SdkError::timeout_error("slow");
        assert!(!is_conditional_check_failed(&err));
    }
}
