use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::users::domain::UserService;

pub struct DeleteUserCommand {
    user_service: Box<dyn UserService>,
}

impl DeleteUserCommand {
    pub fn new(user_service: Box<dyn UserService>) -> Self {
        Self {
            user_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserCommandRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserCommandResponse {
    pub user_id: String,
}

#[async_trait]
impl Command<DeleteUserCommandRequest, DeleteUserCommandResponse> for DeleteUserCommand {
    async fn execute(&self, req: DeleteUserCommandRequest) -> Result<DeleteUserCommandResponse, CommandError> {
        self.user_service.delete_user(req.user_id.as_str())
            .await.map_err(CommandError::from).map(|_| DeleteUserCommandResponse { user_id: req.user_id })
    }
}
