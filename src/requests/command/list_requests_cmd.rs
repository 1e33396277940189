use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::requests::domain::RequestService;
use crate::requests::dto::RequestDto;

// whose requests are listed: the caller's own, or everyone else's one page at a time
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub enum RequestScope {
    Own,
    Others,
}

pub struct ListRequestsCommand {
    request_service: Box<dyn RequestService>,
}

impl ListRequestsCommand {
    pub fn new(request_service: Box<dyn RequestService>) -> Self {
        Self {
            request_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListRequestsCommandRequest {
    pub scope: RequestScope,
    pub user_id: String,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct ListRequestsCommandResponse {
    pub requests: Vec<RequestDto>,
}

impl ListRequestsCommandResponse {
    pub fn new(requests: Vec<RequestDto>) -> Self {
        Self {
            requests,
        }
    }
}

#[async_trait]
impl Command<ListRequestsCommandRequest, ListRequestsCommandResponse> for ListRequestsCommand {
    async fn execute(&self, req: ListRequestsCommandRequest) -> Result<ListRequestsCommandResponse, CommandError> {
        let res = match req.scope {
            RequestScope::Own => self.request_service.list_own_requests(req.user_id.as_str()).await,
            RequestScope::Others => self.request_service.list_other_requests(
                req.user_id.as_str(), req.offset, req.limit).await,
        };
        res.map_err(CommandError::from).map(ListRequestsCommandResponse::new)
    }
}
