use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, info};
use crate::bookings::repository::BookingRepository;
use crate::comments::domain::CommentService;
use crate::comments::dto::CommentDto;
use crate::core::clock::Clock;
use crate::core::domain::Configuration;
use crate::core::sharing::{PageRequest, SharingError, SharingResult};
use crate::items::domain::ItemService;
use crate::items::domain::model::ItemEntity;
use crate::items::domain::summary::{ItemBookingSummary, ItemBookingSummaryBuilder};
use crate::items::dto::{ItemDto, ItemInfoDto, ItemPatchDto};
use crate::items::repository::ItemRepository;
use crate::requests::repository::RequestRepository;
use crate::users::domain::UserService;

pub(crate) struct ItemServiceImpl {
    config: Configuration,
    item_repository: Box<dyn ItemRepository>,
    booking_repository: Box<dyn BookingRepository>,
    request_repository: Box<dyn RequestRepository>,
    user_service: Box<dyn UserService>,
    comment_service: Box<dyn CommentService>,
    clock: Arc<dyn Clock>,
}

impl ItemServiceImpl {
    pub(crate) fn new(config: &Configuration, item_repository: Box<dyn ItemRepository>,
                      booking_repository: Box<dyn BookingRepository>, request_repository: Box<dyn RequestRepository>,
                      user_service: Box<dyn UserService>, comment_service: Box<dyn CommentService>,
                      clock: Arc<dyn Clock>) -> Self {
        Self {
            config: config.clone(),
            item_repository,
            booking_repository,
            request_repository,
            user_service,
            comment_service,
            clock,
        }
    }

    fn summaries(&self) -> ItemBookingSummaryBuilder<'_> {
        ItemBookingSummaryBuilder::new(self.booking_repository.as_ref(), self.clock.as_ref())
    }

    async fn check_user(&self, user_id: &str) -> SharingResult<()> {
        if self.user_service.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(SharingError::not_found(format!("user not found for {}", user_id).as_str()))
        }
    }
}

fn to_info(item: &ItemEntity, summary: ItemBookingSummary, comments: Vec<CommentDto>) -> ItemInfoDto {
    ItemInfoDto {
        item: ItemDto::from(item),
        last_booking: summary.last_booking,
        next_booking: summary.next_booking,
        comments,
    }
}

#[async_trait]
impl ItemService for ItemServiceImpl {
    async fn add_item(&self, owner_id: &str, item: &ItemDto) -> SharingResult<ItemDto> {
        self.check_user(owner_id).await?;
        if item.name.trim().is_empty() {
            return Err(SharingError::invalid_argument("item name must not be blank"));
        }
        if let Some(request_id) = item.request_id.as_deref() {
            self.request_repository.get(request_id).await?;
        }
        let mut entity = ItemEntity::from(item);
        entity.owner_id = owner_id.to_string();
        entity.created_at = self.clock.now();
        entity.updated_at = entity.created_at;
        self.item_repository.create(&entity).await?;
        info!(item_id = %entity.item_id, owner_id, "item added");
        Ok(ItemDto::from(&entity))
    }

    async fn update_item(&self, owner_id: &str, item_id: &str, patch: &ItemPatchDto) -> SharingResult<ItemDto> {
        self.check_user(owner_id).await?;
        let mut entity = self.item_repository.get(item_id).await?;
        if !entity.is_owned_by(owner_id) {
            return Err(SharingError::not_found(format!("item not found for {}", item_id).as_str()));
        }
        if let Some(name) = patch.name.as_ref().filter(|n| !n.trim().is_empty()) {
            entity.name = name.trim().to_string();
        }
        if let Some(description) = patch.description.as_ref().filter(|d| !d.trim().is_empty()) {
            entity.description = description.trim().to_string();
        }
        if let Some(available) = patch.available {
            entity.available = available;
        }
        entity.updated_at = self.clock.now();
        self.item_repository.update(&entity).await?;
        entity.version += 1;
        info!(item_id, owner_id, available = entity.available, "item updated");
        Ok(ItemDto::from(&entity))
    }

    async fn get_item(&self, item_id: &str, viewer_id: &str) -> SharingResult<ItemInfoDto> {
        self.check_user(viewer_id).await?;
        let item = self.item_repository.get(item_id).await?;
        let summary = self.summaries().summarize(&item, viewer_id).await?;
        let comments = self.comment_service.find_by_item(item_id).await?;
        Ok(to_info(&item, summary, comments))
    }

    async fn list_owner_items(&self, owner_id: &str, offset: i64, limit: i64) -> SharingResult<Vec<ItemInfoDto>> {
        let page = PageRequest::new(offset, limit)?.capped(self.config.max_page_size);
        self.check_user(owner_id).await?;
        let items = self.item_repository.find_by_owner(owner_id).await?;
        let items = page.slice(self.config.page_rounding, &items);
        let item_ids: Vec<String> = items.iter().map(|i| i.item_id.to_string()).collect();
        let mut summaries = self.summaries().summarize_all(&items, owner_id).await?;
        let mut comments = self.comment_service.find_by_items(&item_ids).await?;
        debug!(owner_id, items = items.len(), "listed owner items");
        Ok(items.iter().map(|item| {
            let summary = summaries.remove(item.item_id.as_str()).unwrap_or_default();
            let item_comments = comments.remove(item.item_id.as_str()).unwrap_or_default();
            to_info(item, summary, item_comments)
        }).collect())
    }

    async fn search_items(&self, user_id: &str, text: &str, offset: i64, limit: i64) -> SharingResult<Vec<ItemDto>> {
        let page = PageRequest::new(offset, limit)?.capped(self.config.max_page_size);
        self.check_user(user_id).await?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(vec![]);
        }
        let items = self.item_repository.search(text).await?;
        debug!(user_id, text, found = items.len(), "searched items");
        Ok(page.slice(self.config.page_rounding, &items).iter().map(ItemDto::from).collect())
    }
}

impl From<&ItemDto> for ItemEntity {
    fn from(other: &ItemDto) -> Self {
        Self {
            item_id: other.item_id.to_string(),
            version: other.version,
            owner_id: other.owner_id.to_string(),
            name: other.name.trim().to_string(),
            description: other.description.trim().to_string(),
            available: other.available,
            request_id: other.request_id.clone(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&ItemEntity> for ItemDto {
    fn from(other: &ItemEntity) -> Self {
        Self {
            item_id: other.item_id.to_string(),
            version: other.version,
            owner_id: other.owner_id.to_string(),
            name: other.name.to_string(),
            description: other.description.to_string(),
            available: other.available,
            request_id: other.request_id.clone(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use crate::bookings::domain::model::BookingEntity;
    use crate::bookings::repository::memory_booking_repository::MemoryBookingRepository;
    use crate::comments::domain::model::CommentEntity;
    use crate::comments::domain::service::CommentServiceImpl;
    use crate::comments::repository::memory_comment_repository::MemoryCommentRepository;
    use crate::core::clock::FixedClock;
    use crate::core::domain::Configuration;
    use crate::core::repository::Repository;
    use crate::gateway::logs::publisher::LogPublisher;
    use crate::items::domain::ItemService;
    use crate::items::domain::model::ItemEntity;
    use crate::items::domain::service::ItemServiceImpl;
    use crate::items::dto::{ItemDto, ItemPatchDto};
    use crate::items::repository::memory_item_repository::MemoryItemRepository;
    use crate::requests::domain::model::RequestEntity;
    use crate::requests::repository::memory_request_repository::MemoryRequestRepository;
    use crate::users::domain::model::UserEntity;
    use crate::users::domain::service::UserServiceImpl;
    use crate::users::repository::memory_user_repository::MemoryUserRepository;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 9, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    struct Fixture {
        svc: ItemServiceImpl,
        clock: Arc<FixedClock>,
        items: MemoryItemRepository,
        requests: MemoryRequestRepository,
        bookings: MemoryBookingRepository,
        comments: MemoryCommentRepository,
        owner: UserEntity,
        renter: UserEntity,
    }

    async fn fixture(config: Configuration) -> Fixture {
        let users = MemoryUserRepository::default();
        let items = MemoryItemRepository::default();
        let bookings = MemoryBookingRepository::default();
        let comments = MemoryCommentRepository::default();
        let requests = MemoryRequestRepository::default();
        let owner = UserEntity::new("owner", "owner@items.example");
        let renter = UserEntity::new("renter", "renter@items.example");
        users.create(&owner).await.expect("should create owner");
        users.create(&renter).await.expect("should create renter");
        let clock = Arc::new(FixedClock::new(t0()));
        let comment_svc = CommentServiceImpl::new(
            &config, Box::new(comments.clone()), Box::new(bookings.clone()), Box::new(items.clone()),
            Box::new(UserServiceImpl::new(&config, Box::new(users.clone()))), Box::new(LogPublisher), clock.clone());
        let svc = ItemServiceImpl::new(
            &config, Box::new(items.clone()), Box::new(bookings.clone()), Box::new(requests.clone()),
            Box::new(UserServiceImpl::new(&config, Box::new(users))), Box::new(comment_svc), clock.clone());
        Fixture { svc, clock, items, requests, bookings, comments, owner, renter }
    }

    async fn approved_booking(f: &Fixture, item: &ItemDto, start: NaiveDateTime, end: NaiveDateTime) -> BookingEntity {
        let entity = ItemEntity::from(item);
        let mut booking = BookingEntity::create(start, end, &entity, f.renter.user_id.as_str(), t0())
            .expect("should build booking");
        booking.approve().expect("should approve");
        f.bookings.create(&booking).await.expect("should create booking");
        booking
    }

    #[tokio::test]
    async fn test_should_add_and_update_item() {
        let f = fixture(Configuration::new("test")).await;
        let owner_id = f.owner.user_id.as_str();
        let item = f.svc.add_item(owner_id, &ItemDto::new(owner_id, "drill", "cordless", true)).await.expect("should add item");
        assert_eq!(owner_id, item.owner_id.as_str());
        assert!(f.svc.add_item("missing", &ItemDto::new("missing", "saw", "", true)).await.unwrap_err().is_not_found());

        let patch = ItemPatchDto { available: Some(false), ..Default::default() };
        let err = f.svc.update_item(f.renter.user_id.as_str(), item.item_id.as_str(), &patch).await.unwrap_err();
        assert!(err.is_not_found());
        let updated = f.svc.update_item(owner_id, item.item_id.as_str(), &patch).await.expect("should update item");
        assert!(!updated.available);
        assert_eq!("drill", updated.name.as_str());
        assert!(!f.items.get(item.item_id.as_str()).await.expect("should get item").available);
    }

    #[tokio::test]
    async fn test_should_stamp_update_with_clock_time() {
        let f = fixture(Configuration::new("test")).await;
        let owner_id = f.owner.user_id.as_str();
        let item = f.svc.add_item(owner_id, &ItemDto::new(owner_id, "kayak", "", true)).await.expect("should add item");
        assert_eq!(t0(), item.created_at);
        f.clock.advance(Duration::hours(3));
        let patch = ItemPatchDto { name: Some("sea kayak".to_string()), ..Default::default() };
        let updated = f.svc.update_item(owner_id, item.item_id.as_str(), &patch).await.expect("should update item");
        let stored = f.items.get(item.item_id.as_str()).await.expect("should get item");
        assert_eq!(t0() + Duration::hours(3), stored.updated_at);
        assert_eq!(stored.updated_at, updated.updated_at);
        assert_eq!(stored.version, updated.version);
        assert_eq!(t0(), stored.created_at);
    }

    #[tokio::test]
    async fn test_should_list_item_for_existing_request_only() {
        let f = fixture(Configuration::new("test")).await;
        let owner_id = f.owner.user_id.as_str();
        let request = RequestEntity::new(f.renter.user_id.as_str(), "a pump", t0());
        f.requests.create(&request).await.expect("should create request");
        let mut item = ItemDto::new(owner_id, "pump", "", true);
        item.request_id = Some(request.request_id.to_string());
        let added = f.svc.add_item(owner_id, &item).await.expect("should add item");
        assert_eq!(Some(request.request_id), added.request_id);

        let mut orphan = ItemDto::new(owner_id, "hose", "", true);
        orphan.request_id = Some("missing".to_string());
        assert!(f.svc.add_item(owner_id, &orphan).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_should_search_available_items() {
        let f = fixture(Configuration::new("test")).await;
        let owner_id = f.owner.user_id.as_str();
        let renter_id = f.renter.user_id.as_str();
        f.svc.add_item(owner_id, &ItemDto::new(owner_id, "Drill", "cordless", true)).await.expect("should add item");
        f.svc.add_item(owner_id, &ItemDto::new(owner_id, "screwdriver", "works like a DRILL", true)).await.expect("should add item");
        f.svc.add_item(owner_id, &ItemDto::new(owner_id, "drill press", "", false)).await.expect("should add item");

        let found = f.svc.search_items(renter_id, "dRiLl", 0, 10).await.expect("should search");
        assert_eq!(2, found.len());
        assert!(found.iter().all(|i| i.available));
        assert_eq!(1, f.svc.search_items(renter_id, "drill", 1, 10).await.expect("should search").len());
        assert!(f.svc.search_items(renter_id, "  ", 0, 10).await.expect("should search").is_empty());
        assert!(f.svc.search_items(renter_id, "saw", 0, 10).await.expect("should search").is_empty());
        assert!(f.svc.search_items(renter_id, "drill", -1, 10).await.unwrap_err().is_invalid_argument());
        assert!(f.svc.search_items("missing", "drill", 0, 10).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_should_show_summary_to_owner_only() {
        let f = fixture(Configuration::new("test")).await;
        let owner_id = f.owner.user_id.as_str();
        let item = f.svc.add_item(owner_id, &ItemDto::new(owner_id, "tent", "", true)).await.expect("should add item");
        let last = approved_booking(&f, &item, t0() - Duration::hours(5), t0() - Duration::hours(1)).await;
        let next = approved_booking(&f, &item, t0() + Duration::hours(3), t0() + Duration::hours(6)).await;
        f.comments.create(&CommentEntity::new(item.item_id.as_str(), f.renter.user_id.as_str(), "dry inside", t0()))
            .await.expect("should create comment");

        let info = f.svc.get_item(item.item_id.as_str(), owner_id).await.expect("should get item");
        assert_eq!(Some(last.booking_id), info.last_booking.map(|b| b.booking_id));
        assert_eq!(Some(next.booking_id), info.next_booking.map(|b| b.booking_id));
        assert_eq!(1, info.comments.len());
        assert_eq!("renter", info.comments[0].author_name.as_str());

        let info = f.svc.get_item(item.item_id.as_str(), f.renter.user_id.as_str()).await.expect("should get item");
        assert_eq!(None, info.last_booking);
        assert_eq!(None, info.next_booking);
        assert_eq!(1, info.comments.len());

        assert!(f.svc.get_item("missing", owner_id).await.unwrap_err().is_not_found());
        assert!(f.svc.get_item(item.item_id.as_str(), "missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_should_list_owner_items_with_summaries() {
        let f = fixture(Configuration::new("test")).await;
        let owner_id = f.owner.user_id.as_str();
        let mut added = vec![];
        for i in 0..5 {
            let item = f.svc.add_item(owner_id, &ItemDto::new(owner_id, format!("item{}", i).as_str(), "", true))
                .await.expect("should add item");
            approved_booking(&f, &item, t0() + Duration::hours(i + 1), t0() + Duration::hours(i + 2)).await;
            added.push(item);
        }
        let items = f.svc.list_owner_items(owner_id, 0, 10).await.expect("should list items");
        assert_eq!(5, items.len());
        assert!(items.iter().all(|i| i.next_booking.is_some() && i.last_booking.is_none()));

        let items = f.svc.list_owner_items(owner_id, 3, 2).await.expect("should list items");
        assert_eq!(2, items.len());
        assert!(f.svc.list_owner_items(owner_id, -1, 2).await.unwrap_err().is_invalid_argument());
        assert!(f.svc.list_owner_items(owner_id, 0, 0).await.unwrap_err().is_invalid_argument());
        assert!(f.svc.list_owner_items("missing", 0, 10).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_should_round_offset_to_page_when_configured() {
        let f = fixture(Configuration::new("test").with_page_rounding(true)).await;
        let owner_id = f.owner.user_id.as_str();
        for i in 0..5 {
            f.svc.add_item(owner_id, &ItemDto::new(owner_id, format!("item{}", i).as_str(), "", true))
                .await.expect("should add item");
        }
        let all = f.svc.list_owner_items(owner_id, 0, 10).await.expect("should list items");
        let page = f.svc.list_owner_items(owner_id, 3, 2).await.expect("should list items");
        assert_eq!(all[2].item.item_id, page[0].item.item_id);
    }
}
