use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::core::command::{Command, CommandError};
use crate::users::domain::UserService;
use crate::users::dto::UserDto;

pub struct AddUserCommand {
    user_service: Box<dyn UserService>,
}

impl AddUserCommand {
    pub fn new(user_service: Box<dyn UserService>) -> Self {
        Self {
            user_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddUserCommandRequest {
    name: String,
    email: String,
}

impl AddUserCommandRequest {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddUserCommandResponse {
    pub user: UserDto,
}

impl AddUserCommandResponse {
    pub fn new(user: UserDto) -> Self {
        Self {
            user,
        }
    }
}

#[async_trait]
impl Command<AddUserCommandRequest, AddUserCommandResponse> for AddUserCommand {
    async fn execute(&self, req: AddUserCommandRequest) -> Result<AddUserCommandResponse, CommandError> {
        let user = UserDto::new(req.name.as_str(), req.email.as_str());
        self.user_service.add_user(&user)
            .await.map_err(CommandError::from).map(AddUserCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use lazy_static::lazy_static;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::users::command::add_user_cmd::{AddUserCommand, AddUserCommandRequest};
    use crate::users::factory::create_user_service;

    lazy_static! {
        static ref SUT_CMD: AsyncOnce<AddUserCommand> = AsyncOnce::new(async {
                let svc = create_user_service(&Configuration::new("test"), RepositoryStore::InMemory).await;
                AddUserCommand::new(svc)
            });
    }

    #[tokio::test]
    async fn test_should_run_add_user() {
        let cmd: &AddUserCommand = SUT_CMD.get().await;
        let res = cmd.execute(AddUserCommandRequest::new("ann", "ann@add-cmd.example")).await.expect("should add user");
        assert_eq!("ann", res.user.name.as_str());
        let err = cmd.execute(AddUserCommandRequest::new("ann", "ann@add-cmd.example")).await.unwrap_err();
        assert!(matches!(err, CommandError::DuplicateKey { .. }));
    }
}
