use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, PageParams, ServerError, sharer_id};
use crate::items::command::add_item_cmd::{AddItemCommand, AddItemCommandRequest, AddItemCommandResponse};
use crate::items::command::get_item_cmd::{GetItemCommand, GetItemCommandRequest, GetItemCommandResponse};
use crate::items::command::list_items_cmd::{ListItemsCommand, ListItemsCommandRequest, ListItemsCommandResponse};
use crate::items::command::search_items_cmd::{SearchItemsCommand, SearchItemsCommandRequest, SearchItemsCommandResponse};
use crate::items::command::update_item_cmd::{UpdateItemCommand, UpdateItemCommandRequest, UpdateItemCommandResponse};
use crate::items::domain::ItemService;
use crate::items::factory;

async fn build_service(state: &AppState) -> Box<dyn ItemService> {
    factory::create_item_service(&state.config, state.store).await
}

pub async fn add_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    json: Json<Value>) -> Result<Json<AddItemCommandResponse>, ServerError> {
    let mut req: AddItemCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.owner_id = sharer_id(&headers)?;
    let svc = build_service(&state).await;
    let res = AddItemCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn update_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
    json: Json<Value>) -> Result<Json<UpdateItemCommandResponse>, ServerError> {
    let mut req: UpdateItemCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.owner_id = sharer_id(&headers)?;
    req.item_id = item_id;
    let svc = build_service(&state).await;
    let res = UpdateItemCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn get_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>) -> Result<Json<GetItemCommandResponse>, ServerError> {
    let req = GetItemCommandRequest { item_id, viewer_id: sharer_id(&headers)? };
    let svc = build_service(&state).await;
    let res = GetItemCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn list_owner_items(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>) -> Result<Json<ListItemsCommandResponse>, ServerError> {
    let req = ListItemsCommandRequest {
        owner_id: sharer_id(&headers)?,
        offset: params.offset(),
        limit: params.limit(&state.config),
    };
    let svc = build_service(&state).await;
    let res = ListItemsCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn search_items(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>) -> Result<Json<SearchItemsCommandResponse>, ServerError> {
    let req = SearchItemsCommandRequest {
        user_id: sharer_id(&headers)?,
        text: params.text().to_string(),
        offset: params.offset(),
        limit: params.limit(&state.config),
    };
    let svc = build_service(&state).await;
    let res = SearchItemsCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
