use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::users::domain::UserService;
use crate::users::dto::UserDto;

pub struct GetUserCommand {
    user_service: Box<dyn UserService>,
}

impl GetUserCommand {
    pub fn new(user_service: Box<dyn UserService>) -> Self {
        Self {
            user_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetUserCommandRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct GetUserCommandResponse {
    pub user: UserDto,
}

impl GetUserCommandResponse {
    pub fn new(user: UserDto) -> Self {
        Self {
            user,
        }
    }
}

#[async_trait]
impl Command<GetUserCommandRequest, GetUserCommandResponse> for GetUserCommand {
    async fn execute(&self, req: GetUserCommandRequest) -> Result<GetUserCommandResponse, CommandError> {
        self.user_service.find_user_by_id(req.user_id.as_str())
            .await.map_err(CommandError::from).map(GetUserCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::users::command::add_user_cmd::{AddUserCommand, AddUserCommandRequest};
    use crate::users::command::get_user_cmd::{GetUserCommand, GetUserCommandRequest};
    use crate::users::factory::create_user_service;

    #[tokio::test]
    async fn test_should_run_get_user() {
        let config = Configuration::new("test");
        let add_cmd = AddUserCommand::new(create_user_service(&config, RepositoryStore::InMemory).await);
        let get_cmd = GetUserCommand::new(create_user_service(&config, RepositoryStore::InMemory).await);
        let added = add_cmd.execute(AddUserCommandRequest::new("bob", "bob@get-cmd.example")).await.expect("should add user");
        let res = get_cmd.execute(GetUserCommandRequest { user_id: added.user.user_id.to_string() }).await.expect("should get user");
        assert_eq!(added.user.email, res.user.email);
        let err = get_cmd.execute(GetUserCommandRequest { user_id: "missing".to_string() }).await.unwrap_err();
        assert!(matches!(err, CommandError::NotFound { .. }));
    }
}
