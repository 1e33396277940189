use async_trait::async_trait;
use chrono::Utc;
use tracing::info;
use crate::core::domain::Configuration;
use crate::core::sharing::{SharingError, SharingResult};
use crate::users::domain::model::UserEntity;
use crate::users::domain::UserService;
use crate::users::dto::{UserDto, UserPatchDto};
use crate::users::repository::UserRepository;

pub(crate) struct UserServiceImpl {
    user_repository: Box<dyn UserRepository>,
}

impl UserServiceImpl {
    pub(crate) fn new(_config: &Configuration, user_repository: Box<dyn UserRepository>) -> Self {
        Self {
            user_repository,
        }
    }

    // an email belongs to at most one account
    async fn check_email_free(&self, email: &str, user_id: &str) -> SharingResult<()> {
        match self.user_repository.find_by_email(email).await? {
            Some(existing) if existing.user_id != user_id => Err(SharingError::duplicate_key(
                format!("email {} is already registered", email).as_str())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn add_user(&self, user: &UserDto) -> SharingResult<UserDto> {
        if user.name.trim().is_empty() || !user.email.contains('@') {
            return Err(SharingError::invalid_argument("user name and a valid email are required"));
        }
        self.check_email_free(user.email.as_str(), user.user_id.as_str()).await?;
        let entity = UserEntity::from(user);
        self.user_repository.create(&entity).await?;
        info!(user_id = %entity.user_id, "user added");
        Ok(UserDto::from(&entity))
    }

    async fn find_user_by_id(&self, id: &str) -> SharingResult<UserDto> {
        self.user_repository.get(id).await.map(|u| UserDto::from(&u))
    }

    async fn user_exists(&self, id: &str) -> SharingResult<bool> {
        match self.user_repository.get(id).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    async fn list_users(&self) -> SharingResult<Vec<UserDto>> {
        Ok(self.user_repository.find_all().await?.iter().map(UserDto::from).collect())
    }

    async fn update_user(&self, id: &str, patch: &UserPatchDto) -> SharingResult<UserDto> {
        let mut entity = self.user_repository.get(id).await?;
        if let Some(name) = patch.name.as_ref().filter(|n| !n.trim().is_empty()) {
            entity.name = name.trim().to_string();
        }
        if let Some(email) = patch.email.as_ref().filter(|e| !e.trim().is_empty()) {
            let email = email.trim().to_lowercase();
            if email != entity.email {
                if !email.contains('@') {
                    return Err(SharingError::invalid_argument("a valid email is required"));
                }
                self.check_email_free(email.as_str(), id).await?;
                entity.email = email;
            }
        }
        entity.updated_at = Utc::now().naive_utc();
        self.user_repository.update(&entity).await?;
        entity.version += 1;
        info!(user_id = id, "user updated");
        Ok(UserDto::from(&entity))
    }

    async fn delete_user(&self, id: &str) -> SharingResult<()> {
        self.user_repository.get(id).await?;
        self.user_repository.delete(id).await?;
        info!(user_id = id, "user deleted");
        Ok(())
    }
}

impl From<&UserDto> for UserEntity {
    fn from(other: &UserDto) -> Self {
        Self {
            user_id: other.user_id.to_string(),
            version: other.version,
            name: other.name.trim().to_string(),
            email: other.email.to_lowercase(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&UserEntity> for UserDto {
    fn from(other: &UserEntity) -> Self {
        Self {
            user_id: other.user_id.to_string(),
            version: other.version,
            name: other.name.to_string(),
            email: other.email.to_string(),
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::domain::Configuration;
    use crate::users::domain::service::UserServiceImpl;
    use crate::users::domain::UserService;
    use crate::users::dto::{UserDto, UserPatchDto};
    use crate::users::repository::memory_user_repository::MemoryUserRepository;

    fn build_service() -> UserServiceImpl {
        UserServiceImpl::new(&Configuration::new("test"), Box::new(MemoryUserRepository::default()))
    }

    #[tokio::test]
    async fn test_should_add_find_user() {
        let svc = build_service();
        let user = svc.add_user(&UserDto::new("ann", "ann@svc.example")).await.expect("should add user");
        let loaded = svc.find_user_by_id(user.user_id.as_str()).await.expect("should find user");
        assert_eq!(user, loaded);
        assert!(svc.user_exists(user.user_id.as_str()).await.expect("should check"));
        assert!(!svc.user_exists("missing").await.expect("should check"));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_email() {
        let svc = build_service();
        svc.add_user(&UserDto::new("ann", "dup@svc.example")).await.expect("should add user");
        let err = svc.add_user(&UserDto::new("other", "DUP@svc.example")).await.unwrap_err();
        assert!(matches!(err, crate::core::sharing::SharingError::DuplicateKey { .. }));
    }

    #[tokio::test]
    async fn test_should_reject_invalid_user() {
        let svc = build_service();
        assert!(svc.add_user(&UserDto::new(" ", "x@svc.example")).await.unwrap_err().is_invalid_argument());
        assert!(svc.add_user(&UserDto::new("ann", "no-at-sign")).await.unwrap_err().is_invalid_argument());
    }

    #[tokio::test]
    async fn test_should_update_user_fields() {
        let svc = build_service();
        let user = svc.add_user(&UserDto::new("ann", "ann@update.example")).await.expect("should add user");
        svc.add_user(&UserDto::new("bob", "bob@update.example")).await.expect("should add user");

        let patch = UserPatchDto { name: Some(" Annie ".to_string()), ..Default::default() };
        let updated = svc.update_user(user.user_id.as_str(), &patch).await.expect("should update user");
        assert_eq!("Annie", updated.name.as_str());
        assert_eq!("ann@update.example", updated.email.as_str());
        assert_eq!(1, updated.version);

        // own email in another case is not a conflict
        let patch = UserPatchDto { email: Some("ANN@update.example".to_string()), ..Default::default() };
        assert_eq!(2, svc.update_user(user.user_id.as_str(), &patch).await.expect("should update user").version);

        let patch = UserPatchDto { email: Some("Bob@update.example".to_string()), ..Default::default() };
        let err = svc.update_user(user.user_id.as_str(), &patch).await.unwrap_err();
        assert!(matches!(err, crate::core::sharing::SharingError::DuplicateKey { .. }));
        let patch = UserPatchDto { email: Some("no-at-sign".to_string()), ..Default::default() };
        assert!(svc.update_user(user.user_id.as_str(), &patch).await.unwrap_err().is_invalid_argument());

        let patch = UserPatchDto { email: Some("annie@update.example".to_string()), name: Some("".to_string()) };
        let updated = svc.update_user(user.user_id.as_str(), &patch).await.expect("should update user");
        assert_eq!("annie@update.example", updated.email.as_str());
        assert_eq!("Annie", updated.name.as_str());
        assert_eq!(updated, svc.find_user_by_id(user.user_id.as_str()).await.expect("should find user"));
        assert!(svc.update_user("missing", &UserPatchDto::default()).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_should_list_and_delete_users() {
        let svc = build_service();
        let ann = svc.add_user(&UserDto::new("ann", "ann@delete.example")).await.expect("should add user");
        let bob = svc.add_user(&UserDto::new("bob", "bob@delete.example")).await.expect("should add user");
        assert_eq!(2, svc.list_users().await.expect("should list users").len());

        svc.delete_user(ann.user_id.as_str()).await.expect("should delete user");
        assert!(!svc.user_exists(ann.user_id.as_str()).await.expect("should check"));
        assert!(svc.delete_user(ann.user_id.as_str()).await.unwrap_err().is_not_found());
        assert_eq!(vec![bob], svc.list_users().await.expect("should list users"));
        // the freed email can be registered again
        svc.add_user(&UserDto::new("ann", "ann@delete.example")).await.expect("should add user");
    }
}
