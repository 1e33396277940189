use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use chrono::{NaiveDateTime, Utc};
use tracing::debug;

use crate::bookings::domain::model::BookingEntity;
use crate::bookings::domain::state::{StatePredicate, Viewpoint};
use crate::bookings::repository::{BookingRepository, is_earlier_start, is_later_end, pick_per_item};
use crate::core::repository::Repository;
use crate::core::sharing::{BookingStatus, PaginatedResult, SharingError, SharingResult};
use crate::utils::date::format_date;
use crate::utils::ddb::{add_filter_expr, execute_statement_all, from_ddb, is_conditional_check_failed, parse_date_attribute, parse_item, parse_number_attribute, parse_string_attribute, string_date, to_ddb_page};

// PartiQL accepts a bounded number of partition keys in one IN list
const MAX_IN_KEYS: usize = 50;

#[derive(Debug)]
pub struct DDBBookingRepository {
    client: Client,
    table_name: String,
}

impl DDBBookingRepository {
    pub fn new(client: Client, table_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    pub fn index_name(&self, attribute: &str) -> String {
        match attribute {
            "booker_id" => format!("{}_booker_ndx", self.table_name),
            "owner_id" => format!("{}_owner_ndx", self.table_name),
            _ => format!("{}_item_ndx", self.table_name),
        }
    }

    // approved bookings on the items whose start satisfies `start_op now`, one statement per chunk of items
    async fn approved_on(&self, item_ids: &[String], start_op: &str,
                         now: NaiveDateTime) -> SharingResult<Vec<BookingEntity>> {
        let mut records = vec![];
        for chunk in item_ids.chunks(MAX_IN_KEYS) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let statement = format!(
                "SELECT * FROM \"{}\".\"{}\" WHERE item_id IN [{}] AND booking_status = ? AND start_at {} ?",
                self.table_name, self.index_name("item_id"), placeholders, start_op);
            let mut parameters: Vec<AttributeValue> = chunk.iter()
                .map(|id| AttributeValue::S(id.to_string())).collect();
            parameters.push(AttributeValue::S(BookingStatus::Approved.to_string()));
            parameters.push(string_date(now));
            let items = execute_statement_all(&self.client, statement.as_str(), parameters).await?;
            records.extend(items.iter().map(BookingEntity::from));
        }
        debug!(items = item_ids.len(), found = records.len(), "approved bookings on items");
        Ok(records)
    }
}

#[async_trait]
impl Repository<BookingEntity> for DDBBookingRepository {
    async fn create(&self, entity: &BookingEntity) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let val = serde_json::to_value(entity)?;
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(booking_id)")
            .set_item(Some(parse_item(val)?))
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn update(&self, entity: &BookingEntity) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .update_item()
            .table_name(table_name)
            .key("booking_id", AttributeValue::S(entity.booking_id.clone()))
            .update_expression("SET version = :version, booking_status = :booking_status, start_at = :start_at, end_at = :end_at, updated_at = :updated_at")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":booking_status", AttributeValue::S(entity.booking_status.to_string()))
            .expression_attribute_values(":start_at", string_date(entity.start_at))
            .expression_attribute_values(":end_at", string_date(entity.end_at))
            .expression_attribute_values(":updated_at", string_date(entity.updated_at))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    async fn get(&self, id: &str) -> SharingResult<BookingEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression("booking_id = :booking_id")
            .expression_attribute_values(":booking_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map_err(SharingError::from).and_then(|req| {
            match req.items.as_deref() {
                Some([map]) => Ok(BookingEntity::from(map)),
                Some([_, _, ..]) => Err(SharingError::database(format!("too many bookings for {}", id).as_str(), None, false)),
                _ => Err(SharingError::not_found(format!("booking not found for {}", id).as_str())),
            }
        })
    }

    async fn delete(&self, id: &str) -> SharingResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("booking_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(SharingError::from)
    }

    // the predicate must name booker_id, owner_id or item_id, which selects the index
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> SharingResult<PaginatedResult<BookingEntity>> {
        let (key, key_value) = ["booker_id", "owner_id", "item_id"].iter()
            .find_map(|k| predicate.get(*k).map(|v| (*k, v.to_string())))
            .ok_or_else(|| SharingError::invalid_argument("booker_id, owner_id or item_id is required to query bookings"))?;
        let table_name: &str = self.table_name.as_ref();
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(self.index_name(key))
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .scan_index_forward(false)
            .set_exclusive_start_key(to_ddb_page(page, predicate))
            .key_condition_expression(format!("{} = :{}", key, key))
            .expression_attribute_values(format!(":{}", key), AttributeValue::S(key_value));
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != key {
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
                .map(BookingEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl BookingRepository for DDBBookingRepository {
    // start_at is the index range key so its bounds go into the key condition, the rest is filtered
    async fn find_by_state(&self, viewpoint: Viewpoint, user_id: &str, predicate: &StatePredicate,
                           skip: usize, limit: usize) -> SharingResult<Vec<BookingEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let attribute = viewpoint.attribute();
        let conditions = predicate.conditions();
        let mut key_cond = format!("{} = :user_id", attribute);
        let mut filter_expr = String::new();
        let mut values = HashMap::from([(":user_id".to_string(), AttributeValue::S(user_id.to_string()))]);
        for (k, v) in &conditions {
            let ks = match k.split_once(':') {
                Some(("start_at", op)) => {
                    key_cond.push_str(format!(" AND start_at {} :start_at", op).as_str());
                    "start_at".to_string()
                }
                _ => add_filter_expr(k.as_str(), &mut filter_expr),
            };
            values.insert(format!(":{}", ks), AttributeValue::S(v.to_string()));
        }

        let mut records = vec![];
        let mut skipped = 0;
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let mut request = self.client
                .query()
                .table_name(table_name)
                .index_name(self.index_name(attribute))
                .limit(cmp::min(skip + limit, 500) as i32)
                .scan_index_forward(false)
                .key_condition_expression(key_cond.as_str())
                .set_expression_attribute_values(Some(values.clone()))
                .set_exclusive_start_key(start_key.take());
            if !filter_expr.is_empty() {
                request = request.filter_expression(filter_expr.as_str());
            }
            let resp = request.send().await?;
            for map in resp.items().unwrap_or_default() {
                if skipped < skip {
                    skipped += 1;
                    continue;
                }
                records.push(BookingEntity::from(map));
                if records.len() >= limit {
                    return Ok(records);
                }
            }
            match resp.last_evaluated_key() {
                Some(key) => start_key = Some(key.clone()),
                None => return Ok(records),
            }
        }
    }

    async fn update_status(&self, booking_id: &str, expected: &[BookingStatus],
                           status: BookingStatus, at: NaiveDateTime) -> SharingResult<Option<BookingEntity>> {
        if expected.is_empty() {
            return Ok(None);
        }
        let table_name: &str = self.table_name.as_ref();
        let placeholders: Vec<String> = (0..expected.len()).map(|i| format!(":expected{}", i)).collect();
        let mut request = self.client
            .update_item()
            .table_name(table_name)
            .key("booking_id", AttributeValue::S(booking_id.to_string()))
            .update_expression("SET booking_status = :booking_status, version = version + :one, updated_at = :updated_at")
            .condition_expression(format!("attribute_exists(booking_id) AND booking_status IN ({})", placeholders.join(", ")))
            .expression_attribute_values(":booking_status", AttributeValue::S(status.to_string()))
            .expression_attribute_values(":one", AttributeValue::N("1".to_string()))
            .expression_attribute_values(":updated_at", string_date(at))
            .return_values(ReturnValue::AllNew);
        for (placeholder, expected_status) in placeholders.iter().zip(expected) {
            request = request.expression_attribute_values(placeholder.as_str(), AttributeValue::S(expected_status.to_string()));
        }
        match request.send().await {
            Ok(resp) => Ok(resp.attributes().map(BookingEntity::from)),
            Err(err) if is_conditional_check_failed(&err) => Ok(None),
            Err(err) => Err(SharingError::from(err)),
        }
    }

    async fn find_last_approved(&self, item_ids: &[String],
                                now: NaiveDateTime) -> SharingResult<HashMap<String, BookingEntity>> {
        let started = self.approved_on(item_ids, "<=", now).await?;
        Ok(pick_per_item(started, is_later_end))
    }

    async fn find_next_approved(&self, item_ids: &[String],
                                now: NaiveDateTime) -> SharingResult<HashMap<String, BookingEntity>> {
        let upcoming = self.approved_on(item_ids, ">", now).await?;
        Ok(pick_per_item(upcoming, is_earlier_start))
    }

    async fn has_completed_booking(&self, booker_id: &str, item_id: &str,
                                   now: NaiveDateTime) -> SharingResult<bool> {
        let predicate = HashMap::from([
            ("item_id".to_string(), item_id.to_string()),
            ("booker_id".to_string(), booker_id.to_string()),
            ("booking_status".to_string(), BookingStatus::Approved.to_string()),
            ("end_at:<=".to_string(), format_date(now)),
        ]);
        let mut next_page: Option<String> = None;
        loop {
            let res = self.query_item_index(&predicate, next_page.as_deref()).await?;
            if !res.records.is_empty() {
                return Ok(true);
            }
            match res.next_page {
                Some(page) => next_page = Some(page),
                None => return Ok(false),
            }
        }
    }
}

impl DDBBookingRepository {
    // like query() but always on the item index, booker_id would otherwise be picked as the key
    async fn query_item_index(&self, predicate: &HashMap<String, String>,
                              page: Option<&str>) -> SharingResult<PaginatedResult<BookingEntity>> {
        let item_id = predicate.get("item_id").map(String::to_string).unwrap_or_default();
        let table_name: &str = self.table_name.as_ref();
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(self.index_name("item_id"))
            .limit(100)
            .set_exclusive_start_key(to_ddb_page(page, &HashMap::new()))
            .key_condition_expression("item_id = :item_id")
            .expression_attribute_values(":item_id", AttributeValue::S(item_id));
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k != "item_id" {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", ks).as_str(), AttributeValue::S(v.to_string()));
            }
        }
        request
            .filter_expression(filter_expr)
            .send()
            .await.map_err(SharingError::from).map(|req| {
            let records = req.items().unwrap_or_default().iter()
                .map(BookingEntity::from).collect();
            from_ddb(page, 100, req.last_evaluated_key(), records)
        })
    }
}

impl From<&HashMap<String, AttributeValue>> for BookingEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        BookingEntity {
            booking_id: parse_string_attribute("booking_id", map).unwrap_or_default(),
            version: parse_number_attribute("version", map),
            item_id: parse_string_attribute("item_id", map).unwrap_or_default(),
            owner_id: parse_string_attribute("owner_id", map).unwrap_or_default(),
            booker_id: parse_string_attribute("booker_id", map).unwrap_or_default(),
            booking_status: BookingStatus::from(parse_string_attribute("booking_status", map).unwrap_or_default()),
            start_at: parse_date_attribute("start_at", map).unwrap_or(Utc::now().naive_utc()),
            end_at: parse_date_attribute("end_at", map).unwrap_or(Utc::now().naive_utc()),
            created_at: parse_date_attribute("created_at", map).unwrap_or(Utc::now().naive_utc()),
            updated_at: parse_date_attribute("updated_at", map).unwrap_or(Utc::now().naive_utc()),
        }
    }
}
