use chrono::NaiveDateTime;
use crate::core::sharing::{SharingError, SharingResult};
use crate::items::domain::model::ItemEntity;
use crate::items::repository::ItemRepository;
use crate::users::domain::UserService;

// BookingEligibilityValidator runs the pre-creation checks in a fixed order, the first failure wins.
// Booking one's own item is reported as a missing booking.
pub(crate) struct BookingEligibilityValidator<'a> {
    user_service: &'a dyn UserService,
    item_repository: &'a dyn ItemRepository,
}

impl<'a> BookingEligibilityValidator<'a> {
    pub(crate) fn new(user_service: &'a dyn UserService, item_repository: &'a dyn ItemRepository) -> Self {
        Self {
            user_service,
            item_repository,
        }
    }

    pub(crate) async fn check_user(&self, user_id: &str) -> SharingResult<()> {
        if self.user_service.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(SharingError::not_found(format!("user not found for {}", user_id).as_str()))
        }
    }

    // returns the item to book
    pub(crate) async fn check(&self, booker_id: &str, item_id: &str,
                              start: NaiveDateTime, end: NaiveDateTime) -> SharingResult<ItemEntity> {
        self.check_user(booker_id).await?;
        let item = self.item_repository.get(item_id).await?;
        if item.is_owned_by(booker_id) {
            return Err(SharingError::not_found(format!("booking not found for item {}", item_id).as_str()));
        }
        if !item.available {
            return Err(SharingError::invalid_argument("item not available"));
        }
        if start >= end {
            return Err(SharingError::invalid_argument("start must precede end"));
        }
        Ok(item)
    }
}
