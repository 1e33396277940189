use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::Serialize;
use serde_json::Value;
use crate::core::domain::Identifiable;
use crate::core::sharing::{PaginatedResult, SharingError, SharingResult};

// MemoryTable is a process-local table keyed by entity id, used by the in-memory store and tests.
#[derive(Debug)]
pub struct MemoryTable<T> {
    rows: Arc<RwLock<HashMap<String, T>>>,
}

impl<T> Clone for MemoryTable<T> {
    fn clone(&self) -> Self {
        Self { rows: self.rows.clone() }
    }
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self { rows: Arc::new(RwLock::new(HashMap::new())) }
    }
}

impl<T: Identifiable + Serialize + Clone> MemoryTable<T> {
    pub(crate) fn read(&self) -> SharingResult<RwLockReadGuard<'_, HashMap<String, T>>> {
        self.rows.read().map_err(|err| SharingError::runtime(
            format!("memory table poisoned {}", err).as_str(), None))
    }

    pub(crate) fn write(&self) -> SharingResult<RwLockWriteGuard<'_, HashMap<String, T>>> {
        self.rows.write().map_err(|err| SharingError::runtime(
            format!("memory table poisoned {}", err).as_str(), None))
    }

    pub(crate) fn create(&self, entity: &T) -> SharingResult<usize> {
        let mut rows = self.write()?;
        if rows.contains_key(entity.id().as_str()) {
            return Err(SharingError::duplicate_key(format!("{} already exists", entity.id()).as_str()));
        }
        rows.insert(entity.id(), entity.clone());
        Ok(1)
    }

    // Optimistic update: the stored version must match the caller's version, which is then bumped.
    pub(crate) fn update_versioned<F>(&self, entity: &T, bump: F) -> SharingResult<usize>
        where F: FnOnce(&mut T) {
        let mut rows = self.write()?;
        match rows.get(entity.id().as_str()) {
            Some(existing) if existing.version() == entity.version() => {
                let mut updated = entity.clone();
                bump(&mut updated);
                rows.insert(entity.id(), updated);
                Ok(1)
            }
            Some(_) => Err(SharingError::access_denied(
                format!("stale version {} for {}", entity.version(), entity.id()).as_str(), Some("400".to_string()))),
            None => Err(SharingError::not_found(format!("{} not found", entity.id()).as_str())),
        }
    }

    pub(crate) fn get(&self, id: &str, kind: &str) -> SharingResult<T> {
        self.read()?.get(id).cloned()
            .ok_or_else(|| SharingError::not_found(format!("{} not found for {}", kind, id).as_str()))
    }

    pub(crate) fn delete(&self, id: &str) -> SharingResult<usize> {
        Ok(self.write()?.remove(id).map(|_| 1).unwrap_or(0))
    }

    pub(crate) fn filter<F>(&self, pred: F) -> SharingResult<Vec<T>>
        where F: Fn(&T) -> bool {
        let mut records: Vec<T> = self.read()?.values().filter(|e| pred(e)).cloned().collect();
        records.sort_by_key(|e| e.id());
        Ok(records)
    }

    // The page token is the number of matching rows already returned.
    pub(crate) fn query(&self, predicate: &HashMap<String, String>,
                        page: Option<&str>, page_size: usize) -> SharingResult<PaginatedResult<T>> {
        let matching = self.filter(|e| matches_predicate(e, predicate))?;
        let start = page.and_then(|p| p.parse::<usize>().ok()).unwrap_or(0);
        let records: Vec<T> = matching.iter().skip(start).take(page_size).cloned().collect();
        let end = start + records.len();
        let next_page = if end < matching.len() { Some(end.to_string()) } else { None };
        Ok(PaginatedResult::new(page, page_size, next_page, records))
    }
}

// Compares serialized attributes the way a DynamoDB filter expression would, keys use "name:op".
pub(crate) fn matches_predicate<T: Serialize>(entity: &T, predicate: &HashMap<String, String>) -> bool {
    let value = match serde_json::to_value(entity) {
        Ok(value) => value,
        Err(_) => return false,
    };
    predicate.iter().all(|(k, expected)| {
        let (name, op) = k.split_once(':').unwrap_or((k.as_str(), "="));
        let actual = match value.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return false,
        };
        let actual = actual.as_str();
        let expected = expected.as_str();
        match op {
            "=" => actual == expected,
            "<>" => actual != expected,
            "<" => actual < expected,
            "<=" => actual <= expected,
            ">" => actual > expected,
            ">=" => actual >= expected,
            _ => false,
        }
    })
}
