use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::items::domain::ItemService;
use crate::items::dto::ItemInfoDto;

pub struct ListItemsCommand {
    item_service: Box<dyn ItemService>,
}

impl ListItemsCommand {
    pub fn new(item_service: Box<dyn ItemService>) -> Self {
        Self {
            item_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListItemsCommandRequest {
    pub owner_id: String,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct ListItemsCommandResponse {
    pub items: Vec<ItemInfoDto>,
}

impl ListItemsCommandResponse {
    pub fn new(items: Vec<ItemInfoDto>) -> Self {
        Self {
            items,
        }
    }
}

#[async_trait]
impl Command<ListItemsCommandRequest, ListItemsCommandResponse> for ListItemsCommand {
    async fn execute(&self, req: ListItemsCommandRequest) -> Result<ListItemsCommandResponse, CommandError> {
        self.item_service.list_owner_items(req.owner_id.as_str(), req.offset, req.limit)
            .await.map_err(CommandError::from).map(ListItemsCommandResponse::new)
    }
}
