use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::bookings::domain::BookingService;
use crate::bookings::dto::BookingDto;
use crate::core::command::{Command, CommandError};

pub struct GetBookingCommand {
    booking_service: Box<dyn BookingService>,
}

impl GetBookingCommand {
    pub fn new(booking_service: Box<dyn BookingService>) -> Self {
        Self {
            booking_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetBookingCommandRequest {
    pub user_id: String,
    pub booking_id: String,
}

#[derive(Debug, Serialize)]
pub struct GetBookingCommandResponse {
    pub booking: BookingDto,
}

impl GetBookingCommandResponse {
    pub fn new(booking: BookingDto) -> Self {
        Self {
            booking,
        }
    }
}

#[async_trait]
impl Command<GetBookingCommandRequest, GetBookingCommandResponse> for GetBookingCommand {
    async fn execute(&self, req: GetBookingCommandRequest) -> Result<GetBookingCommandResponse, CommandError> {
        self.booking_service.get_booking(req.user_id.as_str(), req.booking_id.as_str())
            .await.map_err(CommandError::from).map(GetBookingCommandResponse::new)
    }
}
