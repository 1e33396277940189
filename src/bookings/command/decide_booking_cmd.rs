use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::bookings::domain::BookingService;
use crate::bookings::dto::BookingDto;
use crate::core::command::{Command, CommandError};

pub struct DecideBookingCommand {
    booking_service: Box<dyn BookingService>,
}

impl DecideBookingCommand {
    pub fn new(booking_service: Box<dyn BookingService>) -> Self {
        Self {
            booking_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DecideBookingCommandRequest {
    pub decider_id: String,
    pub booking_id: String,
    pub approved: bool,
}

#[derive(Debug, Serialize)]
pub struct DecideBookingCommandResponse {
    pub booking: BookingDto,
}

impl DecideBookingCommandResponse {
    pub fn new(booking: BookingDto) -> Self {
        Self {
            booking,
        }
    }
}

#[async_trait]
impl Command<DecideBookingCommandRequest, DecideBookingCommandResponse> for DecideBookingCommand {
    async fn execute(&self, req: DecideBookingCommandRequest) -> Result<DecideBookingCommandResponse, CommandError> {
        self.booking_service.decide_booking(req.decider_id.as_str(), req.booking_id.as_str(), req.approved)
            .await.map_err(CommandError::from).map(DecideBookingCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use crate::bookings::command::decide_booking_cmd::{DecideBookingCommand, DecideBookingCommandRequest};
    use crate::bookings::factory::create_booking_service;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::core::sharing::BookingStatus;
    use crate::items::dto::ItemDto;
    use crate::items::factory::create_item_service;
    use crate::users::dto::UserDto;
    use crate::users::factory::create_user_service;

    #[tokio::test]
    async fn test_should_run_decide_booking() {
        let config = Configuration::new("test");
        let store = RepositoryStore::InMemory;
        let users = create_user_service(&config, store).await;
        let owner = users.add_user(&UserDto::new("owner", "owner@decide-booking-cmd.example")).await.expect("should add owner");
        let booker = users.add_user(&UserDto::new("booker", "booker@decide-booking-cmd.example")).await.expect("should add booker");
        let item = create_item_service(&config, store).await
            .add_item(owner.user_id.as_str(), &ItemDto::new(owner.user_id.as_str(), "tile cutter", "", true))
            .await.expect("should add item");
        let now = Utc::now().naive_utc();
        let booking = create_booking_service(&config, store).await
            .create_booking(booker.user_id.as_str(), item.item_id.as_str(), now + Duration::days(1), now + Duration::days(2))
            .await.expect("should create booking");

        let cmd = DecideBookingCommand::new(create_booking_service(&config, store).await);
        let req = |decider_id: &str, approved: bool| DecideBookingCommandRequest {
            decider_id: decider_id.to_string(),
            booking_id: booking.booking_id.to_string(),
            approved,
        };
        let err = cmd.execute(req(booker.user_id.as_str(), true)).await.unwrap_err();
        assert!(matches!(err, CommandError::NotFound { .. }));
        let res = cmd.execute(req(owner.user_id.as_str(), true)).await.expect("should approve");
        assert_eq!(BookingStatus::Approved, res.booking.status);
        let err = cmd.execute(req(owner.user_id.as_str(), true)).await.unwrap_err();
        assert!(matches!(err, CommandError::Validation { .. }));
        let res = cmd.execute(req(owner.user_id.as_str(), false)).await.expect("should reject approved booking");
        assert_eq!(BookingStatus::Rejected, res.booking.status);
        let err = cmd.execute(req(owner.user_id.as_str(), true)).await.unwrap_err();
        assert!(matches!(err, CommandError::Validation { .. }));
    }
}
