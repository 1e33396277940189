use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::requests::domain::RequestService;
use crate::requests::dto::RequestDto;

pub struct GetRequestCommand {
    request_service: Box<dyn RequestService>,
}

impl GetRequestCommand {
    pub fn new(request_service: Box<dyn RequestService>) -> Self {
        Self {
            request_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetRequestCommandRequest {
    pub user_id: String,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
pub struct GetRequestCommandResponse {
    pub request: RequestDto,
}

impl GetRequestCommandResponse {
    pub fn new(request: RequestDto) -> Self {
        Self {
            request,
        }
    }
}

#[async_trait]
impl Command<GetRequestCommandRequest, GetRequestCommandResponse> for GetRequestCommand {
    async fn execute(&self, req: GetRequestCommandRequest) -> Result<GetRequestCommandResponse, CommandError> {
        self.request_service.get_request(req.user_id.as_str(), req.request_id.as_str())
            .await.map_err(CommandError::from).map(GetRequestCommandResponse::new)
    }
}
