use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::comments::domain::CommentService;
use crate::comments::dto::CommentDto;
use crate::core::command::{Command, CommandError};

pub struct AddCommentCommand {
    comment_service: Box<dyn CommentService>,
}

impl AddCommentCommand {
    pub fn new(comment_service: Box<dyn CommentService>) -> Self {
        Self {
            comment_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddCommentCommandRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub item_id: String,
    pub text: String,
}

impl AddCommentCommandRequest {
    pub fn new(user_id: &str, item_id: &str, text: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            item_id: item_id.to_string(),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddCommentCommandResponse {
    pub comment: CommentDto,
}

impl AddCommentCommandResponse {
    pub fn new(comment: CommentDto) -> Self {
        Self {
            comment,
        }
    }
}

#[async_trait]
impl Command<AddCommentCommandRequest, AddCommentCommandResponse> for AddCommentCommand {
    async fn execute(&self, req: AddCommentCommandRequest) -> Result<AddCommentCommandResponse, CommandError> {
        self.comment_service.add_comment(req.user_id.as_str(), req.item_id.as_str(), req.text.as_str())
            .await.map_err(CommandError::from).map(AddCommentCommandResponse::new)
    }
}
