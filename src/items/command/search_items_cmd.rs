use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::items::domain::ItemService;
use crate::items::dto::ItemDto;

pub struct SearchItemsCommand {
    item_service: Box<dyn ItemService>,
}

impl SearchItemsCommand {
    pub fn new(item_service: Box<dyn ItemService>) -> Self {
        Self {
            item_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchItemsCommandRequest {
    pub user_id: String,
    pub text: String,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct SearchItemsCommandResponse {
    pub items: Vec<ItemDto>,
}

impl SearchItemsCommandResponse {
    pub fn new(items: Vec<ItemDto>) -> Self {
        Self {
            items,
        }
    }
}

#[async_trait]
impl Command<SearchItemsCommandRequest, SearchItemsCommandResponse> for SearchItemsCommand {
    async fn execute(&self, req: SearchItemsCommandRequest) -> Result<SearchItemsCommandResponse, CommandError> {
        self.item_service.search_items(req.user_id.as_str(), req.text.as_str(), req.offset, req.limit)
            .await.map_err(CommandError::from).map(SearchItemsCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::items::command::add_item_cmd::{AddItemCommand, AddItemCommandRequest};
    use crate::items::command::search_items_cmd::{SearchItemsCommand, SearchItemsCommandRequest};
    use crate::items::factory::create_item_service;
    use crate::users::dto::UserDto;
    use crate::users::factory::create_user_service;

    #[tokio::test]
    async fn test_should_run_search_items() {
        let config = Configuration::new("test");
        let store = RepositoryStore::InMemory;
        let owner = create_user_service(&config, store).await
            .add_user(&UserDto::new("owner", "owner@search-items-cmd.example")).await.expect("should add user");
        // the shared in-memory table is seen by other tests, a unique word keeps the matches ours
        let word = Uuid::new_v4().simple().to_string();
        let add_cmd = AddItemCommand::new(create_item_service(&config, store).await);
        add_cmd.execute(AddItemCommandRequest::new(owner.user_id.as_str(), format!("Tool {}", word).as_str(), "", true))
            .await.expect("should add item");
        add_cmd.execute(AddItemCommandRequest::new(owner.user_id.as_str(), "spare", format!("for {}", word).as_str(), false))
            .await.expect("should add item");

        let cmd = SearchItemsCommand::new(create_item_service(&config, store).await);
        let req = |text: &str, offset: i64| SearchItemsCommandRequest {
            user_id: owner.user_id.to_string(), text: text.to_string(), offset, limit: 10 };
        let res = cmd.execute(req(word.to_uppercase().as_str(), 0)).await.expect("should search");
        assert_eq!(1, res.items.len());
        assert!(res.items[0].name.starts_with("Tool"));
        assert!(cmd.execute(req("", 0)).await.expect("should search").items.is_empty());
        let err = cmd.execute(req(word.as_str(), -1)).await.unwrap_err();
        assert!(matches!(err, CommandError::Validation { .. }));
    }
}
