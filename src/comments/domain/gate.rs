use crate::bookings::repository::BookingRepository;
use crate::core::clock::Clock;
use crate::core::sharing::{SharingError, SharingResult};

// CommentEligibilityGate admits authors with at least one completed booking of the item:
// approved and ended at or before now.
pub(crate) struct CommentEligibilityGate<'a> {
    booking_repository: &'a dyn BookingRepository,
    clock: &'a dyn Clock,
}

impl<'a> CommentEligibilityGate<'a> {
    pub(crate) fn new(booking_repository: &'a dyn BookingRepository, clock: &'a dyn Clock) -> Self {
        Self {
            booking_repository,
            clock,
        }
    }

    pub(crate) async fn is_eligible(&self, user_id: &str, item_id: &str) -> SharingResult<bool> {
        self.booking_repository.has_completed_booking(user_id, item_id, self.clock.now()).await
    }

    pub(crate) async fn check(&self, user_id: &str, item_id: &str) -> SharingResult<()> {
        if self.is_eligible(user_id, item_id).await? {
            Ok(())
        } else {
            Err(SharingError::invalid_argument("no completed booking found"))
        }
    }
}
