use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::bookings::domain::BookingService;
use crate::bookings::dto::BookingDto;
use crate::core::command::{Command, CommandError};
use crate::utils::date::serializer;

pub struct CreateBookingCommand {
    booking_service: Box<dyn BookingService>,
}

impl CreateBookingCommand {
    pub fn new(booking_service: Box<dyn BookingService>) -> Self {
        Self {
            booking_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingCommandRequest {
    #[serde(default)]
    pub booker_id: String,
    pub item_id: String,
    #[serde(with = "serializer")]
    pub start: NaiveDateTime,
    #[serde(with = "serializer")]
    pub end: NaiveDateTime,
}

impl CreateBookingCommandRequest {
    pub fn new(booker_id: &str, item_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            booker_id: booker_id.to_string(),
            item_id: item_id.to_string(),
            start,
            end,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateBookingCommandResponse {
    pub booking: BookingDto,
}

impl CreateBookingCommandResponse {
    pub fn new(booking: BookingDto) -> Self {
        Self {
            booking,
        }
    }
}

#[async_trait]
impl Command<CreateBookingCommandRequest, CreateBookingCommandResponse> for CreateBookingCommand {
    async fn execute(&self, req: CreateBookingCommandRequest) -> Result<CreateBookingCommandResponse, CommandError> {
        self.booking_service.create_booking(req.booker_id.as_str(), req.item_id.as_str(), req.start, req.end)
            .await.map_err(CommandError::from).map(CreateBookingCommandResponse::new)
    }
}
