use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::items::domain::ItemService;
use crate::items::dto::ItemDto;

pub struct AddItemCommand {
    item_service: Box<dyn ItemService>,
}

impl AddItemCommand {
    pub fn new(item_service: Box<dyn ItemService>) -> Self {
        Self {
            item_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddItemCommandRequest {
    #[serde(default)]
    pub owner_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub available: bool,
    pub request_id: Option<String>,
}

impl AddItemCommandRequest {
    pub fn new(owner_id: &str, name: &str, description: &str, available: bool) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            available,
            request_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddItemCommandResponse {
    pub item: ItemDto,
}

impl AddItemCommandResponse {
    pub fn new(item: ItemDto) -> Self {
        Self {
            item,
        }
    }
}

#[async_trait]
impl Command<AddItemCommandRequest, AddItemCommandResponse> for AddItemCommand {
    async fn execute(&self, req: AddItemCommandRequest) -> Result<AddItemCommandResponse, CommandError> {
        let mut item = ItemDto::new(req.owner_id.as_str(), req.name.as_str(), req.description.as_str(), req.available);
        item.request_id = req.request_id;
        self.item_service.add_item(req.owner_id.as_str(), &item)
            .await.map_err(CommandError::from).map(AddItemCommandResponse::new)
    }
}
