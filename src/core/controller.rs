use axum::http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use crate::core::command::CommandError;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppState {
    pub config: Configuration,
    pub store: RepositoryStore,
}

impl AppState {
    pub fn new(config: Configuration, store: RepositoryStore) -> AppState {
        AppState {
            config,
            store,
        }
    }
}

pub type ServerError = (StatusCode, String);

// the calling user is identified by a header set by the gateway
pub const SHARER_HEADER: &str = "X-Sharer-User-Id";

pub fn sharer_id(headers: &HeaderMap) -> Result<String, ServerError> {
    headers.get(SHARER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("{} header is required", SHARER_HEADER)))
}

// PageParams are the listing query parameters, from is a row offset and size the page length
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub state: Option<String>,
    pub text: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    pub fn offset(&self) -> i64 {
        self.from.unwrap_or(0)
    }

    pub fn limit(&self, config: &Configuration) -> i64 {
        self.size.unwrap_or(config.default_page_size as i64)
    }

    pub fn state(&self) -> &str {
        self.state.as_deref().unwrap_or("ALL")
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

pub fn json_to_server_error(err: serde_json::Error) -> ServerError {
    (StatusCode::BAD_REQUEST, format!("{}", err))
}

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = match err {
            CommandError::Access { .. } => StatusCode::BAD_REQUEST,
            CommandError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CommandError::DuplicateKey { .. } => StatusCode::CONFLICT,
            CommandError::NotFound { .. } => StatusCode::NOT_FOUND,
            CommandError::Runtime { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CommandError::Serialization { .. } => StatusCode::BAD_REQUEST,
            CommandError::Validation { .. } => StatusCode::BAD_REQUEST,
            CommandError::State { .. } => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            tracing::error!("request failed {:?}", err);
        }
        (status, err.message().to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, StatusCode};
    use crate::core::command::CommandError;
    use crate::core::controller::{PageParams, ServerError, SHARER_HEADER, sharer_id};
    use crate::core::domain::Configuration;

    #[tokio::test]
    async fn test_should_read_sharer_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(StatusCode::BAD_REQUEST, sharer_id(&headers).unwrap_err().0);
        headers.insert(SHARER_HEADER, HeaderValue::from_static("user1"));
        assert_eq!("user1", sharer_id(&headers).expect("should read header").as_str());
    }

    #[tokio::test]
    async fn test_should_default_page_params() {
        let config = Configuration::new("test");
        let params = PageParams::default();
        assert_eq!(0, params.offset());
        assert_eq!(10, params.limit(&config));
        assert_eq!("ALL", params.state());
        assert_eq!("", params.text());
    }

    #[tokio::test]
    async fn test_should_map_status_codes() {
        let (status, message) = ServerError::from(CommandError::NotFound { message: "booking".to_string() });
        assert_eq!(StatusCode::NOT_FOUND, status);
        assert_eq!("booking", message.as_str());
        let (status, _) = ServerError::from(CommandError::Validation { message: "state".to_string(), reason_code: None });
        assert_eq!(StatusCode::BAD_REQUEST, status);
        let (status, _) = ServerError::from(CommandError::State { message: "approved".to_string() });
        assert_eq!(StatusCode::BAD_REQUEST, status);
        let (status, _) = ServerError::from(CommandError::DuplicateKey { message: "email".to_string() });
        assert_eq!(StatusCode::CONFLICT, status);
    }
}
