use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Json,
};
use serde_json::Value;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, PageParams, ServerError, sharer_id};
use crate::requests::command::add_request_cmd::{AddRequestCommand, AddRequestCommandRequest, AddRequestCommandResponse};
use crate::requests::command::get_request_cmd::{GetRequestCommand, GetRequestCommandRequest, GetRequestCommandResponse};
use crate::requests::command::list_requests_cmd::{ListRequestsCommand, ListRequestsCommandRequest, ListRequestsCommandResponse, RequestScope};
use crate::requests::domain::RequestService;
use crate::requests::factory;

async fn build_service(state: &AppState) -> Box<dyn RequestService> {
    factory::create_request_service(&state.config, state.store).await
}

pub async fn add_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    json: Json<Value>) -> Result<Json<AddRequestCommandResponse>, ServerError> {
    let mut req: AddRequestCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.requester_id = sharer_id(&headers)?;
    let svc = build_service(&state).await;
    let res = AddRequestCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn get_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(request_id): Path<String>) -> Result<Json<GetRequestCommandResponse>, ServerError> {
    let req = GetRequestCommandRequest { user_id: sharer_id(&headers)?, request_id };
    let svc = build_service(&state).await;
    let res = GetRequestCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn list_own_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>) -> Result<Json<ListRequestsCommandResponse>, ServerError> {
    list_requests(state, RequestScope::Own, headers, params).await
}

pub async fn list_other_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>) -> Result<Json<ListRequestsCommandResponse>, ServerError> {
    list_requests(state, RequestScope::Others, headers, params).await
}

async fn list_requests(state: AppState, scope: RequestScope, headers: HeaderMap,
                       params: PageParams) -> Result<Json<ListRequestsCommandResponse>, ServerError> {
    let req = ListRequestsCommandRequest {
        scope,
        user_id: sharer_id(&headers)?,
        offset: params.offset(),
        limit: params.limit(&state.config),
    };
    let svc = build_service(&state).await;
    let res = ListRequestsCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
