use std::collections::HashMap;
use crate::bookings::domain::model::BookingEntity;
use crate::bookings::dto::BookingShortDto;
use crate::bookings::repository::BookingRepository;
use crate::core::clock::Clock;
use crate::core::sharing::SharingResult;
use crate::items::domain::model::ItemEntity;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemBookingSummary {
    pub last_booking: Option<BookingShortDto>,
    pub next_booking: Option<BookingShortDto>,
}

// ItemBookingSummaryBuilder decorates items with their last and next approved bookings.
// Summaries are only computed for items the viewer owns, others get an empty summary.
pub(crate) struct ItemBookingSummaryBuilder<'a> {
    booking_repository: &'a dyn BookingRepository,
    clock: &'a dyn Clock,
}

impl<'a> ItemBookingSummaryBuilder<'a> {
    pub(crate) fn new(booking_repository: &'a dyn BookingRepository, clock: &'a dyn Clock) -> Self {
        Self {
            booking_repository,
            clock,
        }
    }

    pub(crate) async fn summarize(&self, item: &ItemEntity, viewer_id: &str) -> SharingResult<ItemBookingSummary> {
        let mut summaries = self.summarize_all(std::slice::from_ref(item), viewer_id).await?;
        Ok(summaries.remove(item.item_id.as_str()).unwrap_or_default())
    }

    // two batched lookups regardless of the number of items
    pub(crate) async fn summarize_all(&self, items: &[ItemEntity],
                                      viewer_id: &str) -> SharingResult<HashMap<String, ItemBookingSummary>> {
        let mut summaries: HashMap<String, ItemBookingSummary> = items.iter()
            .map(|i| (i.item_id.to_string(), ItemBookingSummary::default())).collect();
        let owned: Vec<String> = items.iter()
            .filter(|i| i.is_owned_by(viewer_id))
            .map(|i| i.item_id.to_string()).collect();
        if owned.is_empty() {
            return Ok(summaries);
        }
        let now = self.clock.now();
        let lasts = self.booking_repository.find_last_approved(&owned, now).await?;
        let nexts = self.booking_repository.find_next_approved(&owned, now).await?;
        for item_id in owned {
            if let Some(summary) = summaries.get_mut(item_id.as_str()) {
                summary.last_booking = lasts.get(item_id.as_str()).map(BookingShortDto::from);
                summary.next_booking = nexts.get(item_id.as_str()).map(BookingShortDto::from);
            }
        }
        Ok(summaries)
    }
}

impl From<&BookingEntity> for BookingShortDto {
    fn from(other: &BookingEntity) -> Self {
        Self {
            booking_id: other.booking_id.to_string(),
            item_id: other.item_id.to_string(),
            booker_id: other.booker_id.to_string(),
        }
    }
}
