use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::bookings::domain::BookingService;
use crate::bookings::domain::state::Viewpoint;
use crate::bookings::dto::BookingDto;
use crate::core::command::{Command, CommandError};

pub struct ListBookingsCommand {
    booking_service: Box<dyn BookingService>,
}

impl ListBookingsCommand {
    pub fn new(booking_service: Box<dyn BookingService>) -> Self {
        Self {
            booking_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListBookingsCommandRequest {
    pub viewpoint: Viewpoint,
    pub user_id: String,
    pub state: String,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct ListBookingsCommandResponse {
    pub bookings: Vec<BookingDto>,
}

impl ListBookingsCommandResponse {
    pub fn new(bookings: Vec<BookingDto>) -> Self {
        Self {
            bookings,
        }
    }
}

#[async_trait]
impl Command<ListBookingsCommandRequest, ListBookingsCommandResponse> for ListBookingsCommand {
    async fn execute(&self, req: ListBookingsCommandRequest) -> Result<ListBookingsCommandResponse, CommandError> {
        self.booking_service.list_bookings(req.viewpoint, req.user_id.as_str(), req.state.as_str(), req.offset, req.limit)
            .await.map_err(CommandError::from).map(ListBookingsCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use chrono::{Duration, Utc};
    use lazy_static::lazy_static;
    use crate::bookings::command::create_booking_cmd::{CreateBookingCommand, CreateBookingCommandRequest};
    use crate::bookings::command::get_booking_cmd::{GetBookingCommand, GetBookingCommandRequest};
    use crate::bookings::command::list_bookings_cmd::{ListBookingsCommand, ListBookingsCommandRequest};
    use crate::bookings::domain::state::Viewpoint;
    use crate::bookings::factory::create_booking_service;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;
    use crate::items::dto::ItemDto;
    use crate::items::factory::create_item_service;
    use crate::users::dto::UserDto;
    use crate::users::factory::create_user_service;

    lazy_static! {
        static ref CREATE_CMD: AsyncOnce<CreateBookingCommand> = AsyncOnce::new(async {
                CreateBookingCommand::new(create_booking_service(&Configuration::new("test"), RepositoryStore::InMemory).await)
            });
        static ref GET_CMD: AsyncOnce<GetBookingCommand> = AsyncOnce::new(async {
                GetBookingCommand::new(create_booking_service(&Configuration::new("test"), RepositoryStore::InMemory).await)
            });
        static ref LIST_CMD: AsyncOnce<ListBookingsCommand> = AsyncOnce::new(async {
                ListBookingsCommand::new(create_booking_service(&Configuration::new("test"), RepositoryStore::InMemory).await)
            });
    }

    fn list_req(viewpoint: Viewpoint, user_id: &str, state: &str) -> ListBookingsCommandRequest {
        ListBookingsCommandRequest { viewpoint, user_id: user_id.to_string(), state: state.to_string(), offset: 0, limit: 10 }
    }

    #[tokio::test]
    async fn test_should_run_get_and_list_bookings() {
        let config = Configuration::new("test");
        let store = RepositoryStore::InMemory;
        let users = create_user_service(&config, store).await;
        let owner = users.add_user(&UserDto::new("owner", "owner@list-bookings-cmd.example")).await.expect("should add owner");
        let booker = users.add_user(&UserDto::new("booker", "booker@list-bookings-cmd.example")).await.expect("should add booker");
        let other = users.add_user(&UserDto::new("other", "other@list-bookings-cmd.example")).await.expect("should add user");
        let item = create_item_service(&config, store).await
            .add_item(owner.user_id.as_str(), &ItemDto::new(owner.user_id.as_str(), "bike rack", "", true))
            .await.expect("should add item");

        let create_cmd: &CreateBookingCommand = CREATE_CMD.get().await;
        let now = Utc::now().naive_utc();
        for days in [1, 2, 3] {
            create_cmd.execute(CreateBookingCommandRequest::new(
                booker.user_id.as_str(), item.item_id.as_str(), now + Duration::days(days), now + Duration::days(days) + Duration::hours(4)))
                .await.expect("should create booking");
        }

        let list_cmd: &ListBookingsCommand = LIST_CMD.get().await;
        let res = list_cmd.execute(list_req(Viewpoint::Booker, booker.user_id.as_str(), "FUTURE"))
            .await.expect("should list bookings");
        assert_eq!(3, res.bookings.len());
        assert!(res.bookings[0].start > res.bookings[2].start);
        let res = list_cmd.execute(list_req(Viewpoint::Owner, owner.user_id.as_str(), "WAITING"))
            .await.expect("should list bookings");
        assert_eq!(3, res.bookings.len());
        let res = list_cmd.execute(list_req(Viewpoint::Owner, owner.user_id.as_str(), "PAST"))
            .await.expect("should list bookings");
        assert!(res.bookings.is_empty());
        let err = list_cmd.execute(list_req(Viewpoint::Owner, owner.user_id.as_str(), "SOON")).await.unwrap_err();
        assert!(matches!(err, CommandError::Validation { .. }));

        let get_cmd: &GetBookingCommand = GET_CMD.get().await;
        let booking_id = first_booking_id(list_cmd, booker.user_id.as_str()).await;
        let res = get_cmd.execute(GetBookingCommandRequest { user_id: owner.user_id.to_string(), booking_id: booking_id.to_string() })
            .await.expect("should get booking");
        assert_eq!(booking_id, res.booking.booking_id);
        let err = get_cmd.execute(GetBookingCommandRequest { user_id: other.user_id.to_string(), booking_id })
            .await.unwrap_err();
        assert!(matches!(err, CommandError::NotFound { .. }));
    }

    async fn first_booking_id(cmd: &ListBookingsCommand, booker_id: &str) -> String {
        let res = cmd.execute(list_req(Viewpoint::Booker, booker_id, "ALL")).await.expect("should list bookings");
        res.bookings[0].booking_id.to_string()
    }
}
