use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::users::domain::UserService;
use crate::users::dto::{UserDto, UserPatchDto};

pub struct UpdateUserCommand {
    user_service: Box<dyn UserService>,
}

impl UpdateUserCommand {
    pub fn new(user_service: Box<dyn UserService>) -> Self {
        Self {
            user_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserCommandRequest {
    #[serde(default)]
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateUserCommandResponse {
    pub user: UserDto,
}

impl UpdateUserCommandResponse {
    pub fn new(user: UserDto) -> Self {
        Self {
            user,
        }
    }
}

#[async_trait]
impl Command<UpdateUserCommandRequest, UpdateUserCommandResponse> for UpdateUserCommand {
    async fn execute(&self, req: UpdateUserCommandRequest) -> Result<UpdateUserCommandResponse, CommandError> {
        let patch = UserPatchDto { name: req.name, email: req.email };
        self.user_service.update_user(req.user_id.as_str(), &patch)
            .await.map_err(CommandError::from).map(UpdateUserCommandResponse::new)
    }
}
