use std::str::FromStr;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};
use crate::bookings::domain::BookingService;
use crate::bookings::domain::eligibility::BookingEligibilityValidator;
use crate::bookings::domain::model::BookingEntity;
use crate::bookings::domain::state::{BookingState, StatePredicate, Viewpoint};
use crate::bookings::dto::BookingDto;
use crate::bookings::repository::BookingRepository;
use crate::core::clock::Clock;
use crate::core::domain::Configuration;
use crate::core::events::DomainEvent;
use crate::core::sharing::{BookingStatus, PageRequest, SharingError, SharingResult};
use crate::gateway::events::EventPublisher;
use crate::items::repository::ItemRepository;
use crate::users::domain::UserService;

pub(crate) struct BookingServiceImpl {
    max_page_size: usize,
    page_rounding: bool,
    booking_repository: Box<dyn BookingRepository>,
    item_repository: Box<dyn ItemRepository>,
    user_service: Box<dyn UserService>,
    events_publisher: Box<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl BookingServiceImpl {
    pub(crate) fn new(config: &Configuration, booking_repository: Box<dyn BookingRepository>,
                      item_repository: Box<dyn ItemRepository>, user_service: Box<dyn UserService>,
                      events_publisher: Box<dyn EventPublisher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_page_size: config.max_page_size,
            page_rounding: config.page_rounding,
            booking_repository,
            item_repository,
            user_service,
            events_publisher,
            clock,
        }
    }

    fn validator(&self) -> BookingEligibilityValidator<'_> {
        BookingEligibilityValidator::new(self.user_service.as_ref(), self.item_repository.as_ref())
    }

    // loads the booking for its item owner, anyone else sees it as missing
    async fn owned_booking(&self, owner_id: &str, booking_id: &str) -> SharingResult<BookingEntity> {
        let booking = self.booking_repository.get(booking_id).await?;
        self.validator().check_user(owner_id).await?;
        if booking.owner_id != owner_id {
            return Err(SharingError::not_found(format!("booking not found for {}", booking_id).as_str()));
        }
        Ok(booking)
    }
}

// every status a rejection may replace
const ANY_STATUS: [BookingStatus; 4] =
    [BookingStatus::Waiting, BookingStatus::Approved, BookingStatus::Rejected, BookingStatus::Canceled];

#[async_trait]
impl BookingService for BookingServiceImpl {
    async fn create_booking(&self, booker_id: &str, item_id: &str,
                            start: NaiveDateTime, end: NaiveDateTime) -> SharingResult<BookingDto> {
        let item = self.validator().check(booker_id, item_id, start, end).await?;
        let now = self.clock.now();
        let booking = BookingEntity::create(start, end, &item, booker_id, now)?;
        self.booking_repository.create(&booking).await?;
        let dto = BookingDto::from(&booking);
        self.events_publisher.publish(&DomainEvent::added(
            "booking_created", "bookings", booking.booking_id.as_str(), booker_id, &dto, now)?
            .with_metadata("item_id", item_id)).await?;
        info!(booking_id = %booking.booking_id, item_id, booker_id, "booking created");
        Ok(dto)
    }

    async fn decide_booking(&self, decider_id: &str, booking_id: &str, approve: bool) -> SharingResult<BookingDto> {
        let mut booking = self.owned_booking(decider_id, booking_id).await?;
        let now = self.clock.now();
        let (expected, event_name): (&[BookingStatus], &str) = if approve {
            if let Err(err) = booking.approve() {
                warn!(booking_id, decider_id, "approval refused {}", err);
                return Err(SharingError::invalid_argument("booking not waiting approval"));
            }
            (&[BookingStatus::Waiting], "booking_approved")
        } else {
            booking.reject();
            (&ANY_STATUS, "booking_rejected")
        };

        let updated = self.booking_repository.update_status(
            booking_id, expected, booking.booking_status, now).await?;
        let booking = match updated {
            Some(booking) => booking,
            None if approve => {
                // another decision landed between the read and the conditional write
                warn!(booking_id, decider_id, "booking changed concurrently");
                return Err(SharingError::invalid_argument("booking not waiting approval"));
            }
            None => return Err(SharingError::not_found(format!("booking not found for {}", booking_id).as_str())),
        };

        let dto = BookingDto::from(&booking);
        self.events_publisher.publish(&DomainEvent::updated(
            event_name, "bookings", booking_id, decider_id, &dto, now)?
            .with_metadata("item_id", booking.item_id.as_str())).await?;
        info!(booking_id, decider_id, status = %booking.booking_status, "booking decided");
        Ok(dto)
    }

    async fn get_booking(&self, user_id: &str, booking_id: &str) -> SharingResult<BookingDto> {
        self.validator().check_user(user_id).await?;
        let booking = self.booking_repository.get(booking_id).await?;
        if !booking.is_visible_to(user_id) {
            return Err(SharingError::not_found(format!("booking not found for {}", booking_id).as_str()));
        }
        Ok(BookingDto::from(&booking))
    }

    async fn list_bookings(&self, viewpoint: Viewpoint, user_id: &str, state: &str,
                           offset: i64, limit: i64) -> SharingResult<Vec<BookingDto>> {
        let page = PageRequest::new(offset, limit)?.capped(self.max_page_size);
        self.validator().check_user(user_id).await?;
        let predicate = StatePredicate::new(BookingState::from_str(state)?, self.clock.now());
        debug!(user_id, state = %predicate.state, ?viewpoint, "listing bookings");
        let bookings = self.booking_repository.find_by_state(
            viewpoint, user_id, &predicate, page.skip(self.page_rounding), page.limit).await?;
        Ok(bookings.iter().map(BookingDto::from).collect())
    }
}

impl From<&BookingEntity> for BookingDto {
    fn from(other: &BookingEntity) -> Self {
        Self {
            booking_id: other.booking_id.to_string(),
            version: other.version,
            item_id: other.item_id.to_string(),
            owner_id: other.owner_id.to_string(),
            booker_id: other.booker_id.to_string(),
            status: other.booking_status,
            start: other.start_at,
            end: other.end_at,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}
