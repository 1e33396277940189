use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum SharingError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    AccessDenied {
        message: String,
        reason_code: Option<String>,
    },
    // reserved for duplicate users or items, bookings never raise it
    DuplicateKey {
        message: String,
    },
    // also returned when the caller is not allowed to see or change the resource
    NotFound {
        message: String,
    },
    CurrentlyUnavailable {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    InvalidArgument {
        message: String,
        reason_code: Option<String>,
    },
    IllegalState {
        message: String,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl SharingError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> SharingError {
        SharingError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn access_denied(message: &str, reason_code: Option<String>) -> SharingError {
        SharingError::AccessDenied { message: message.to_string(), reason_code }
    }

    pub fn duplicate_key(message: &str) -> SharingError {
        SharingError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> SharingError {
        SharingError::NotFound { message: message.to_string() }
    }

    pub fn unavailable(message: &str, reason_code: Option<String>, retryable: bool) -> SharingError {
        SharingError::CurrentlyUnavailable { message: message.to_string(), reason_code, retryable }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> SharingError {
        if retryable {
            SharingError::unavailable(
                format!("ddb database unavailable error {:?} {:?}", message, reason).as_str(), reason, true)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                SharingError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str())
            } else if reason_val.as_str().contains("400") {
                SharingError::access_denied(
                    format!("access-denied error {:?} {:?}", message, reason).as_str(), reason)
            } else {
                SharingError::database(
                    format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            SharingError::database(
                format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn invalid_argument(message: &str) -> SharingError {
        SharingError::InvalidArgument { message: message.to_string(), reason_code: Some("400".to_string()) }
    }

    pub fn illegal_state(message: &str) -> SharingError {
        SharingError::IllegalState { message: message.to_string() }
    }

    pub fn serialization(message: &str) -> SharingError {
        SharingError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> SharingError {
        SharingError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            SharingError::Database { retryable, .. } => { *retryable }
            SharingError::CurrentlyUnavailable { retryable, .. } => { *retryable }
            _ => { false }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SharingError::NotFound { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SharingError::InvalidArgument { .. })
    }

    pub fn is_illegal_state(&self) -> bool {
        matches!(self, SharingError::IllegalState { .. })
    }
}

impl From<std::io::Error> for SharingError {
    fn from(err: std::io::Error) -> Self {
        SharingError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for SharingError {
    fn from(err: serde_json::Error) -> Self {
        SharingError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for SharingError {
    fn from(err: String) -> Self {
        SharingError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl Display for SharingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SharingError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            SharingError::AccessDenied { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            SharingError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            SharingError::NotFound { message } => {
                write!(f, "{}", message)
            }
            SharingError::CurrentlyUnavailable { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            SharingError::InvalidArgument { message, .. } => {
                write!(f, "{}", message)
            }
            SharingError::IllegalState { message } => {
                write!(f, "{}", message)
            }
            SharingError::Serialization { message } => {
                write!(f, "{}", message)
            }
            SharingError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

impl std::error::Error for SharingError {}

/// A specialized Result type for the sharing services.
pub type SharingResult<T> = Result<T, SharingError>;

// It defines abstraction for token paginated result as returned by the stores
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    // The page number or token
    pub page: Option<String>,
    // page size
    pub page_size: usize,
    // Next page if available
    pub next_page: Option<String>,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(page: Option<&str>, page_size: usize,
                      next_page: Option<String>, records: Vec<T>) -> Self {
        PaginatedResult {
            page: page.map(str::to_string),
            page_size,
            next_page,
            records,
        }
    }
}

// PageRequest is the offset/limit window requested by callers of the listing operations.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(offset: i64, limit: i64) -> SharingResult<Self> {
        if offset < 0 || limit <= 0 {
            return Err(SharingError::invalid_argument(
                format!("page parameters incorrect offset={} limit={}", offset, limit).as_str()));
        }
        Ok(PageRequest { offset: offset as usize, limit: limit as usize })
    }

    pub fn capped(self, max_limit: usize) -> Self {
        PageRequest { offset: self.offset, limit: self.limit.min(max_limit.max(1)) }
    }

    // With rounding the offset snaps down to a page boundary: page index = offset / limit.
    pub fn skip(&self, rounding: bool) -> usize {
        if rounding && self.offset > 0 {
            (self.offset / self.limit) * self.limit
        } else {
            self.offset
        }
    }

    pub fn slice<T: Clone>(&self, rounding: bool, records: &[T]) -> Vec<T> {
        records.iter().skip(self.skip(rounding)).take(self.limit).cloned().collect()
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Waiting)
    }
}

impl From<String> for BookingStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "WAITING" => BookingStatus::Waiting,
            "APPROVED" => BookingStatus::Approved,
            "REJECTED" => BookingStatus::Rejected,
            "CANCELED" => BookingStatus::Canceled,
            _ => BookingStatus::Waiting,
        }
    }
}

impl Display for BookingStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BookingStatus::Waiting => write!(f, "WAITING"),
            BookingStatus::Approved => write!(f, "APPROVED"),
            BookingStatus::Rejected => write!(f, "REJECTED"),
            BookingStatus::Canceled => write!(f, "CANCELED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::sharing::{BookingStatus, PageRequest, SharingError};

    #[tokio::test]
    async fn test_should_create_database_error() {
        assert!(matches!(SharingError::database("test", None, false), SharingError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(SharingError::not_found("test").is_not_found());
    }

    #[tokio::test]
    async fn test_should_create_invalid_argument_error() {
        let err = SharingError::invalid_argument("start must precede end");
        assert!(err.is_invalid_argument());
        assert_eq!("start must precede end", err.to_string());
    }

    #[tokio::test]
    async fn test_should_create_illegal_state_error() {
        assert!(SharingError::illegal_state("test").is_illegal_state());
    }

    #[tokio::test]
    async fn test_should_create_database_or_unavailable_error() {
        assert!(matches!(SharingError::database_or_unavailable("test", None, true), SharingError::CurrentlyUnavailable{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(SharingError::database_or_unavailable("test", Some("404".to_string()), false), SharingError::NotFound{ message: _ }));
        assert!(matches!(SharingError::database_or_unavailable("test", Some("400".to_string()), false), SharingError::AccessDenied{ message: _, reason_code: _ }));
        assert!(matches!(SharingError::database_or_unavailable("test", Some("500".to_string()), false), SharingError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert!(!SharingError::database("test", None, false).retryable());
        assert!(!SharingError::not_found("test").retryable());
        assert!(SharingError::unavailable("test", None, true).retryable());
        assert!(!SharingError::invalid_argument("test").retryable());
        assert!(!SharingError::illegal_state("test").retryable());
    }

    #[tokio::test]
    async fn test_should_format_booking_status() {
        let statuses = vec![
            BookingStatus::Waiting,
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Canceled,
        ];
        for status in statuses {
            let str = status.to_string();
            let str_status = BookingStatus::from(str);
            assert_eq!(status, str_status);
        }
        assert!(!BookingStatus::Waiting.is_terminal());
        assert!(BookingStatus::Canceled.is_terminal());
    }

    #[tokio::test]
    async fn test_should_validate_page_request() {
        assert!(PageRequest::new(-1, 10).unwrap_err().is_invalid_argument());
        assert!(PageRequest::new(0, 0).unwrap_err().is_invalid_argument());
        let page = PageRequest::new(15, 10).expect("should build page");
        assert_eq!(15, page.skip(false));
        assert_eq!(10, page.skip(true));
        assert_eq!(5, PageRequest::new(0, 50).unwrap().capped(5).limit);
    }

    #[tokio::test]
    async fn test_should_slice_page() {
        let records: Vec<usize> = (0..25).collect();
        let page = PageRequest::new(15, 10).expect("should build page");
        assert_eq!((15..25).collect::<Vec<usize>>(), page.slice(false, &records));
        assert_eq!((10..20).collect::<Vec<usize>>(), page.slice(true, &records));
    }
}
