use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use serde_json::Value;
use crate::comments::command::add_comment_cmd::{AddCommentCommand, AddCommentCommandRequest, AddCommentCommandResponse};
use crate::comments::domain::CommentService;
use crate::comments::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError, sharer_id};

async fn build_service(state: AppState) -> Box<dyn CommentService> {
    factory::create_comment_service(&state.config, state.store).await
}

pub async fn add_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
    json: Json<Value>) -> Result<Json<AddCommentCommandResponse>, ServerError> {
    let mut req: AddCommentCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.user_id = sharer_id(&headers)?;
    req.item_id = item_id;
    let svc = build_service(state).await;
    let res = AddCommentCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
