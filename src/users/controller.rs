use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, ServerError};
use crate::users::command::add_user_cmd::{AddUserCommand, AddUserCommandRequest, AddUserCommandResponse};
use crate::users::command::delete_user_cmd::{DeleteUserCommand, DeleteUserCommandRequest, DeleteUserCommandResponse};
use crate::users::command::get_user_cmd::{GetUserCommand, GetUserCommandRequest, GetUserCommandResponse};
use crate::users::command::list_users_cmd::{ListUsersCommand, ListUsersCommandRequest, ListUsersCommandResponse};
use crate::users::command::update_user_cmd::{UpdateUserCommand, UpdateUserCommandRequest, UpdateUserCommandResponse};
use crate::users::domain::UserService;
use crate::users::factory;

async fn build_service(state: AppState) -> Box<dyn UserService> {
    factory::create_user_service(&state.config, state.store).await
}

pub async fn add_user(
    State(state): State<AppState>,
    json: Json<Value>) -> Result<Json<AddUserCommandResponse>, ServerError> {
    let req: AddUserCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(state).await;
    let res = AddUserCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn find_user_by_id(
    State(state): State<AppState>,
    Path(user_id): Path<String>) -> Result<Json<GetUserCommandResponse>, ServerError> {
    let req = GetUserCommandRequest { user_id };
    let svc = build_service(state).await;
    let res = GetUserCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn list_users(
    State(state): State<AppState>) -> Result<Json<ListUsersCommandResponse>, ServerError> {
    let svc = build_service(state).await;
    let res = ListUsersCommand::new(svc).execute(ListUsersCommandRequest::default()).await?;
    Ok(Json(res))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateUserCommandResponse>, ServerError> {
    let mut req: UpdateUserCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.user_id = user_id;
    let svc = build_service(state).await;
    let res = UpdateUserCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>) -> Result<Json<DeleteUserCommandResponse>, ServerError> {
    let req = DeleteUserCommandRequest { user_id };
    let svc = build_service(state).await;
    let res = DeleteUserCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
