use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::requests::domain::RequestService;
use crate::requests::dto::RequestDto;

pub struct AddRequestCommand {
    request_service: Box<dyn RequestService>,
}

impl AddRequestCommand {
    pub fn new(request_service: Box<dyn RequestService>) -> Self {
        Self {
            request_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddRequestCommandRequest {
    #[serde(default)]
    pub requester_id: String,
    pub description: String,
}

impl AddRequestCommandRequest {
    pub fn new(requester_id: &str, description: &str) -> Self {
        Self {
            requester_id: requester_id.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddRequestCommandResponse {
    pub request: RequestDto,
}

impl AddRequestCommandResponse {
    pub fn new(request: RequestDto) -> Self {
        Self {
            request,
        }
    }
}

#[async_trait]
impl Command<AddRequestCommandRequest, AddRequestCommandResponse> for AddRequestCommand {
    async fn execute(&self, req: AddRequestCommandRequest) -> Result<AddRequestCommandResponse, CommandError> {
        self.request_service.add_request(req.requester_id.as_str(), req.description.as_str())
            .await.map_err(CommandError::from).map(AddRequestCommandResponse::new)
    }
}
