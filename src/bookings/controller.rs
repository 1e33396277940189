use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use crate::bookings::command::create_booking_cmd::{CreateBookingCommand, CreateBookingCommandRequest, CreateBookingCommandResponse};
use crate::bookings::command::decide_booking_cmd::{DecideBookingCommand, DecideBookingCommandRequest, DecideBookingCommandResponse};
use crate::bookings::command::get_booking_cmd::{GetBookingCommand, GetBookingCommandRequest, GetBookingCommandResponse};
use crate::bookings::command::list_bookings_cmd::{ListBookingsCommand, ListBookingsCommandRequest, ListBookingsCommandResponse};
use crate::bookings::domain::BookingService;
use crate::bookings::domain::state::Viewpoint;
use crate::bookings::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, json_to_server_error, PageParams, ServerError, sharer_id};

async fn build_service(state: &AppState) -> Box<dyn BookingService> {
    factory::create_booking_service(&state.config, state.store).await
}

#[derive(Debug, Deserialize)]
pub struct DecisionParams {
    pub approved: bool,
}

pub async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    json: Json<Value>) -> Result<Json<CreateBookingCommandResponse>, ServerError> {
    let mut req: CreateBookingCommandRequest = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    req.booker_id = sharer_id(&headers)?;
    let svc = build_service(&state).await;
    let res = CreateBookingCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn decide_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
    Query(params): Query<DecisionParams>) -> Result<Json<DecideBookingCommandResponse>, ServerError> {
    let req = DecideBookingCommandRequest {
        decider_id: sharer_id(&headers)?,
        booking_id,
        approved: params.approved,
    };
    let svc = build_service(&state).await;
    let res = DecideBookingCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn get_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(booking_id): Path<String>) -> Result<Json<GetBookingCommandResponse>, ServerError> {
    let req = GetBookingCommandRequest { user_id: sharer_id(&headers)?, booking_id };
    let svc = build_service(&state).await;
    let res = GetBookingCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}

pub async fn list_booker_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>) -> Result<Json<ListBookingsCommandResponse>, ServerError> {
    list_bookings(state, Viewpoint::Booker, headers, params).await
}

pub async fn list_owner_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>) -> Result<Json<ListBookingsCommandResponse>, ServerError> {
    list_bookings(state, Viewpoint::Owner, headers, params).await
}

async fn list_bookings(state: AppState, viewpoint: Viewpoint, headers: HeaderMap,
                       params: PageParams) -> Result<Json<ListBookingsCommandResponse>, ServerError> {
    let req = ListBookingsCommandRequest {
        viewpoint,
        user_id: sharer_id(&headers)?,
        state: params.state().to_string(),
        offset: params.offset(),
        limit: params.limit(&state.config),
    };
    let svc = build_service(&state).await;
    let res = ListBookingsCommand::new(svc).execute(req).await?;
    Ok(Json(res))
}
