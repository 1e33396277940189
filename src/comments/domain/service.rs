use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use async_trait::async_trait;
use tracing::{info, warn};
use crate::bookings::repository::BookingRepository;
use crate::comments::domain::CommentService;
use crate::comments::domain::gate::CommentEligibilityGate;
use crate::comments::domain::model::CommentEntity;
use crate::comments::dto::CommentDto;
use crate::comments::repository::CommentRepository;
use crate::core::clock::Clock;
use crate::core::domain::Configuration;
use crate::core::events::DomainEvent;
use crate::core::sharing::{SharingError, SharingResult};
use crate::gateway::events::EventPublisher;
use crate::items::repository::ItemRepository;
use crate::users::domain::UserService;

pub(crate) struct CommentServiceImpl {
    max_comment_length: usize,
    comment_repository: Box<dyn CommentRepository>,
    booking_repository: Box<dyn BookingRepository>,
    item_repository: Box<dyn ItemRepository>,
    user_service: Box<dyn UserService>,
    events_publisher: Box<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl CommentServiceImpl {
    pub(crate) fn new(config: &Configuration, comment_repository: Box<dyn CommentRepository>,
                      booking_repository: Box<dyn BookingRepository>, item_repository: Box<dyn ItemRepository>,
                      user_service: Box<dyn UserService>, events_publisher: Box<dyn EventPublisher>,
                      clock: Arc<dyn Clock>) -> Self {
        Self {
            max_comment_length: config.max_comment_length,
            comment_repository,
            booking_repository,
            item_repository,
            user_service,
            events_publisher,
            clock,
        }
    }

    fn gate(&self) -> CommentEligibilityGate<'_> {
        CommentEligibilityGate::new(self.booking_repository.as_ref(), self.clock.as_ref())
    }

    fn validate_text(&self, text: &str) -> SharingResult<()> {
        if text.trim().is_empty() {
            return Err(SharingError::invalid_argument("comment text must not be blank"));
        }
        if text.chars().count() > self.max_comment_length {
            return Err(SharingError::invalid_argument(
                format!("comment text must not exceed {} characters", self.max_comment_length).as_str()));
        }
        Ok(())
    }

    // author names looked up once per distinct author, unknown authors keep an empty name
    async fn to_dtos(&self, comments: Vec<CommentEntity>) -> SharingResult<Vec<CommentDto>> {
        let authors: HashSet<String> = comments.iter().map(|c| c.author_id.to_string()).collect();
        let mut names = HashMap::new();
        for author_id in authors {
            match self.user_service.find_user_by_id(author_id.as_str()).await {
                Ok(user) => { names.insert(author_id, user.name); }
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err),
            }
        }
        Ok(comments.iter().map(|c| to_dto(c, names.get(c.author_id.as_str()))).collect())
    }
}

fn to_dto(comment: &CommentEntity, author_name: Option<&String>) -> CommentDto {
    CommentDto {
        comment_id: comment.comment_id.to_string(),
        item_id: comment.item_id.to_string(),
        author_id: comment.author_id.to_string(),
        author_name: author_name.map(String::to_string).unwrap_or_default(),
        text: comment.text.to_string(),
        created_at: comment.created_at,
    }
}

#[async_trait]
impl CommentService for CommentServiceImpl {
    async fn can_comment(&self, user_id: &str, item_id: &str) -> SharingResult<bool> {
        self.gate().is_eligible(user_id, item_id).await
    }

    async fn add_comment(&self, user_id: &str, item_id: &str, text: &str) -> SharingResult<CommentDto> {
        self.validate_text(text)?;
        let author = self.user_service.find_user_by_id(user_id).await?;
        let item = self.item_repository.get(item_id).await?;
        if let Err(err) = self.gate().check(author.user_id.as_str(), item.item_id.as_str()).await {
            warn!(user_id, item_id, "comment refused {}", err);
            return Err(err);
        }
        let comment = CommentEntity::new(item.item_id.as_str(), author.user_id.as_str(), text, self.clock.now());
        self.comment_repository.create(&comment).await?;
        let dto = to_dto(&comment, Some(&author.name));
        self.events_publisher.publish(&DomainEvent::added(
            "comment_added", "comments", comment.comment_id.as_str(), user_id, &dto, comment.created_at)?
            .with_metadata("item_id", item_id)).await?;
        info!(comment_id = %comment.comment_id, item_id, user_id, "comment added");
        Ok(dto)
    }

    async fn find_by_item(&self, item_id: &str) -> SharingResult<Vec<CommentDto>> {
        let comments = self.comment_repository.find_by_item(item_id).await?;
        self.to_dtos(comments).await
    }

    async fn find_by_items(&self, item_ids: &[String]) -> SharingResult<HashMap<String, Vec<CommentDto>>> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let grouped = self.comment_repository.find_by_items(item_ids).await?;
        let mut res = HashMap::new();
        for (item_id, comments) in grouped {
            res.insert(item_id, self.to_dtos(comments).await?);
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use crate::bookings::domain::model::BookingEntity;
    use crate::bookings::repository::memory_booking_repository::MemoryBookingRepository;
    use crate::comments::domain::CommentService;
    use crate::comments::domain::service::CommentServiceImpl;
    use crate::comments::repository::memory_comment_repository::MemoryCommentRepository;
    use crate::core::clock::FixedClock;
    use crate::core::domain::Configuration;
    use crate::core::repository::Repository;
    use crate::gateway::logs::publisher::LogPublisher;
    use crate::items::domain::model::ItemEntity;
    use crate::items::repository::memory_item_repository::MemoryItemRepository;
    use crate::users::domain::model::UserEntity;
    use crate::users::domain::service::UserServiceImpl;
    use crate::users::repository::memory_user_repository::MemoryUserRepository;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 8, 1).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    struct Fixture {
        svc: CommentServiceImpl,
        clock: Arc<FixedClock>,
        item: ItemEntity,
        booker: UserEntity,
        stranger: UserEntity,
    }

    async fn fixture() -> Fixture {
        let config = Configuration::new("test");
        let users = MemoryUserRepository::default();
        let items = MemoryItemRepository::default();
        let bookings = MemoryBookingRepository::default();
        let owner = UserEntity::new("owner", "owner@comments.example");
        let booker = UserEntity::new("booker", "booker@comments.example");
        let stranger = UserEntity::new("stranger", "stranger@comments.example");
        for user in [&owner, &booker, &stranger] {
            users.create(user).await.expect("should create user");
        }
        let item = ItemEntity::new(owner.user_id.as_str(), "grill", "charcoal grill", true);
        items.create(&item).await.expect("should create item");
        let mut booking = BookingEntity::create(t0() + Duration::hours(1), t0() + Duration::hours(2),
                                                &item, booker.user_id.as_str(), t0()).expect("should build booking");
        booking.approve().expect("should approve");
        bookings.create(&booking).await.expect("should create booking");

        let clock = Arc::new(FixedClock::new(t0()));
        let svc = CommentServiceImpl::new(
            &config, Box::new(MemoryCommentRepository::default()), Box::new(bookings), Box::new(items),
            Box::new(UserServiceImpl::new(&config, Box::new(users))), Box::new(LogPublisher), clock.clone());
        Fixture { svc, clock, item, booker, stranger }
    }

    #[tokio::test]
    async fn test_should_add_comment_after_completed_booking() {
        let f = fixture().await;
        let item_id = f.item.item_id.as_str();
        let booker_id = f.booker.user_id.as_str();
        assert!(!f.svc.can_comment(booker_id, item_id).await.expect("should check"));
        let err = f.svc.add_comment(booker_id, item_id, "nice grill").await.unwrap_err();
        assert_eq!("no completed booking found", err.to_string());

        f.clock.set(t0() + Duration::hours(2));
        assert!(f.svc.can_comment(booker_id, item_id).await.expect("should check"));
        let comment = f.svc.add_comment(booker_id, item_id, "  nice grill ").await.expect("should add comment");
        assert_eq!("nice grill", comment.text.as_str());
        assert_eq!("booker", comment.author_name.as_str());
        assert_eq!(t0() + Duration::hours(2), comment.created_at);

        let err = f.svc.add_comment(f.stranger.user_id.as_str(), item_id, "never used it").await.unwrap_err();
        assert!(err.is_invalid_argument());

        let comments = f.svc.find_by_item(item_id).await.expect("should find comments");
        assert_eq!(1, comments.len());
        let grouped = f.svc.find_by_items(&[f.item.item_id.to_string()]).await.expect("should find comments");
        assert_eq!(Some(1), grouped.get(item_id).map(|c| c.len()));
    }

    #[tokio::test]
    async fn test_should_validate_comment_text() {
        let f = fixture().await;
        f.clock.set(t0() + Duration::days(1));
        let item_id = f.item.item_id.as_str();
        let booker_id = f.booker.user_id.as_str();
        assert!(f.svc.add_comment(booker_id, item_id, "   ").await.unwrap_err().is_invalid_argument());
        let too_long = "x".repeat(2001);
        assert!(f.svc.add_comment(booker_id, item_id, too_long.as_str()).await.unwrap_err().is_invalid_argument());
        let longest = "x".repeat(2000);
        assert!(f.svc.add_comment(booker_id, item_id, longest.as_str()).await.is_ok());
    }

    #[tokio::test]
    async fn test_should_report_missing_user_and_item() {
        let f = fixture().await;
        f.clock.set(t0() + Duration::days(1));
        assert!(f.svc.add_comment("missing", f.item.item_id.as_str(), "hi").await.unwrap_err().is_not_found());
        assert!(f.svc.add_comment(f.booker.user_id.as_str(), "missing", "hi").await.unwrap_err().is_not_found());
    }
}
