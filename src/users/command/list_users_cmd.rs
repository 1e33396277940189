use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::users::domain::UserService;
use crate::users::dto::UserDto;

pub struct ListUsersCommand {
    user_service: Box<dyn UserService>,
}

impl ListUsersCommand {
    pub fn new(user_service: Box<dyn UserService>) -> Self {
        Self {
            user_service,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListUsersCommandRequest {}

#[derive(Debug, Serialize)]
pub struct ListUsersCommandResponse {
    pub users: Vec<UserDto>,
}

impl ListUsersCommandResponse {
    pub fn new(users: Vec<UserDto>) -> Self {
        Self {
            users,
        }
    }
}

#[async_trait]
impl Command<ListUsersCommandRequest, ListUsersCommandResponse> for ListUsersCommand {
    async fn execute(&self, _req: ListUsersCommandRequest) -> Result<ListUsersCommandResponse, CommandError> {
        self.user_service.list_users()
            .await.map_err(CommandError::from).map(ListUsersCommandResponse::new)
    }
}
