use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, info};
use crate::core::clock::Clock;
use crate::core::domain::Configuration;
use crate::core::events::DomainEvent;
use crate::core::sharing::{PageRequest, SharingError, SharingResult};
use crate::gateway::events::EventPublisher;
use crate::items::domain::model::ItemEntity;
use crate::items::dto::ItemDto;
use crate::items::repository::ItemRepository;
use crate::requests::domain::model::{MAX_DESCRIPTION_LENGTH, RequestEntity};
use crate::requests::domain::RequestService;
use crate::requests::dto::RequestDto;
use crate::requests::repository::RequestRepository;
use crate::users::domain::UserService;

pub(crate) struct RequestServiceImpl {
    config: Configuration,
    request_repository: Box<dyn RequestRepository>,
    item_repository: Box<dyn ItemRepository>,
    user_service: Box<dyn UserService>,
    events_publisher: Box<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl RequestServiceImpl {
    pub(crate) fn new(config: &Configuration, request_repository: Box<dyn RequestRepository>,
                      item_repository: Box<dyn ItemRepository>, user_service: Box<dyn UserService>,
                      events_publisher: Box<dyn EventPublisher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: config.clone(),
            request_repository,
            item_repository,
            user_service,
            events_publisher,
            clock,
        }
    }

    async fn check_user(&self, user_id: &str) -> SharingResult<()> {
        if self.user_service.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(SharingError::not_found(format!("user not found for {}", user_id).as_str()))
        }
    }

    // attaches the answering items with one lookup for all requests
    async fn with_items(&self, requests: &[RequestEntity]) -> SharingResult<Vec<RequestDto>> {
        let request_ids: Vec<String> = requests.iter().map(|r| r.request_id.to_string()).collect();
        let mut answers: HashMap<String, Vec<ItemEntity>> = HashMap::new();
        for item in self.item_repository.find_by_requests(&request_ids).await? {
            if let Some(request_id) = item.request_id.clone() {
                answers.entry(request_id).or_default().push(item);
            }
        }
        Ok(requests.iter().map(|r| {
            let items = answers.remove(r.request_id.as_str()).unwrap_or_default();
            to_dto(r, &items)
        }).collect())
    }
}

fn to_dto(request: &RequestEntity, items: &[ItemEntity]) -> RequestDto {
    RequestDto {
        request_id: request.request_id.to_string(),
        requester_id: request.requester_id.to_string(),
        description: request.description.to_string(),
        created_at: request.created_at,
        items: items.iter().map(ItemDto::from).collect(),
    }
}

#[async_trait]
impl RequestService for RequestServiceImpl {
    async fn add_request(&self, requester_id: &str, description: &str) -> SharingResult<RequestDto> {
        self.check_user(requester_id).await?;
        if description.trim().is_empty() {
            return Err(SharingError::invalid_argument("request description must not be blank"));
        }
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(SharingError::invalid_argument(
                format!("request description must not exceed {} characters", MAX_DESCRIPTION_LENGTH).as_str()));
        }
        let request = RequestEntity::new(requester_id, description, self.clock.now());
        self.request_repository.create(&request).await?;
        let dto = to_dto(&request, &[]);
        self.events_publisher.publish(&DomainEvent::added(
            "request_added", "requests", request.request_id.as_str(), requester_id, &dto, request.created_at)?).await?;
        info!(request_id = %request.request_id, requester_id, "request added");
        Ok(dto)
    }

    async fn list_own_requests(&self, requester_id: &str) -> SharingResult<Vec<RequestDto>> {
        self.check_user(requester_id).await?;
        let requests = self.request_repository.find_by_requester(requester_id).await?;
        self.with_items(&requests).await
    }

    async fn list_other_requests(&self, user_id: &str, offset: i64, limit: i64) -> SharingResult<Vec<RequestDto>> {
        let page = PageRequest::new(offset, limit)?.capped(self.config.max_page_size);
        self.check_user(user_id).await?;
        let requests = self.request_repository.find_by_others(user_id).await?;
        let requests = page.slice(self.config.page_rounding, &requests);
        debug!(user_id, requests = requests.len(), "listed other requests");
        self.with_items(&requests).await
    }

    async fn get_request(&self, user_id: &str, request_id: &str) -> SharingResult<RequestDto> {
        self.check_user(user_id).await?;
        let request = self.request_repository.get(request_id).await?;
        let items = self.item_repository.find_by_requests(&[request_id.to_string()]).await?;
        Ok(to_dto(&request, &items))
    }
}
