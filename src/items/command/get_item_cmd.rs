use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::items::domain::ItemService;
use crate::items::dto::ItemInfoDto;

pub struct GetItemCommand {
    item_service: Box<dyn ItemService>,
}

impl GetItemCommand {
    pub fn new(item_service: Box<dyn ItemService>) -> Self {
        Self {
            item_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetItemCommandRequest {
    pub item_id: String,
    pub viewer_id: String,
}

#[derive(Debug, Serialize)]
pub struct GetItemCommandResponse {
    pub item: ItemInfoDto,
}

impl GetItemCommandResponse {
    pub fn new(item: ItemInfoDto) -> Self {
        Self {
            item,
        }
    }
}

#[async_trait]
impl Command<GetItemCommandRequest, GetItemCommandResponse> for GetItemCommand {
    async fn execute(&self, req: GetItemCommandRequest) -> Result<GetItemCommandResponse, CommandError> {
        self.item_service.get_item(req.item_id.as_str(), req.viewer_id.as_str())
            .await.map_err(CommandError::from).map(GetItemCommandResponse::new)
    }
}
