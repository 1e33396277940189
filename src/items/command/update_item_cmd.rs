use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::items::domain::ItemService;
use crate::items::dto::{ItemDto, ItemPatchDto};

pub struct UpdateItemCommand {
    item_service: Box<dyn ItemService>,
}

impl UpdateItemCommand {
    pub fn new(item_service: Box<dyn ItemService>) -> Self {
        Self {
            item_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemCommandRequest {
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub item_id: String,
    #[serde(flatten)]
    pub patch: ItemPatchDto,
}

#[derive(Debug, Serialize)]
pub struct UpdateItemCommandResponse {
    pub item: ItemDto,
}

impl UpdateItemCommandResponse {
    pub fn new(item: ItemDto) -> Self {
        Self {
            item,
        }
    }
}

#[async_trait]
impl Command<UpdateItemCommandRequest, UpdateItemCommandResponse> for UpdateItemCommand {
    async fn execute(&self, req: UpdateItemCommandRequest) -> Result<UpdateItemCommandResponse, CommandError> {
        self.item_service.update_item(req.owner_id.as_str(), req.item_id.as_str(), &req.patch)
            .await.map_err(CommandError::from).map(UpdateItemCommandResponse::new)
    }
}
