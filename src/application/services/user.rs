//! User profile use cases

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::application::error::AppResult;
use crate::application::events::EventDispatcher;
use crate::domain::events::{FieldChange, UserCreatedEvent, UserDeletedEvent, UserProfileUpdatedEvent};
use crate::domain::{
    CreateUserDto, DomainError, DomainEvent, GymRepository, UpdateProfileDto, User,
    UserRepository,
};
use crate::shared::normalize_optional;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    gyms: Arc<dyn GymRepository>,
    events: Arc<EventDispatcher>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        gyms: Arc<dyn GymRepository>,
        events: Arc<EventDispatcher>,
    ) -> Self {
        Self { users, gyms, events }
    }

    async fn ensure_gym_exists(&self, gym_id: Uuid) -> AppResult<()> {
        if self.gyms.get_gym(gym_id).await?.is_none() {
            return Err(DomainError::not_found("Gym", "id", gym_id).into());
        }
        Ok(())
    }

    pub async fn create_user(&self, dto: CreateUserDto) -> AppResult<User> {
        let username = dto.username.trim().to_string();
        if username.is_empty() {
            return Err(DomainError::Validation("username must not be empty".into()).into());
        }
        if self.users.get_user_by_username(&username).await?.is_some() {
            return Err(DomainError::Conflict(format!("username '{}' is taken", username)).into());
        }
        if let Some(gym_id) = dto.home_gym_id {
            self.ensure_gym_exists(gym_id).await?;
        }

        let mut user = User::new(username);
        user.display_name = normalize_optional(dto.display_name);
        user.bio = normalize_optional(dto.bio);
        user.home_gym_id = dto.home_gym_id;
        self.users.create_user(user.clone()).await?;

        info!(user_id = %user.id, username = %user.username, "User created");

        self.events
            .dispatch(DomainEvent::UserCreated(UserCreatedEvent {
                user_id: user.id,
                username: user.username.clone(),
                occurred_at: user.created_at,
            }))
            .await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id).into())
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.users.list_users().await?)
    }

    /// Apply the provided fields. Publishes nothing when no value changed.
    pub async fn update_profile(&self, id: Uuid, dto: UpdateProfileDto) -> AppResult<User> {
        let mut user = self.get_user(id).await?;
        let mut changes = Vec::new();

        if let Some(display_name) = dto.display_name {
            let new = normalize_optional(Some(display_name));
            if new != user.display_name {
                changes.push(FieldChange {
                    field: "display_name".into(),
                    old: std::mem::replace(&mut user.display_name, new.clone()),
                    new,
                });
            }
        }
        if let Some(bio) = dto.bio {
            let new = normalize_optional(Some(bio));
            if new != user.bio {
                changes.push(FieldChange {
                    field: "bio".into(),
                    old: std::mem::replace(&mut user.bio, new.clone()),
                    new,
                });
            }
        }
        if let Some(gym_id) = dto.home_gym_id {
            if user.home_gym_id != Some(gym_id) {
                self.ensure_gym_exists(gym_id).await?;
                changes.push(FieldChange {
                    field: "home_gym_id".into(),
                    old: user.home_gym_id.map(|g| g.to_string()),
                    new: Some(gym_id.to_string()),
                });
                user.home_gym_id = Some(gym_id);
            }
        }

        if changes.is_empty() {
            return Ok(user);
        }

        user.updated_at = Utc::now();
        self.users.update_user(user.clone()).await?;
        info!(user_id = %id, changed = changes.len(), "User profile updated");

        self.events
            .dispatch(DomainEvent::UserProfileUpdated(UserProfileUpdatedEvent {
                user_id: id,
                changes,
                occurred_at: user.updated_at,
            }))
            .await?;
        Ok(user)
    }

    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.users.delete_user(id).await?;
        info!(user_id = %id, "User deleted");

        self.events
            .dispatch(DomainEvent::UserDeleted(UserDeletedEvent {
                user_id: id,
                occurred_at: Utc::now(),
            }))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::AppError;
    use crate::application::services::test_support::{recording_dispatcher, storage};
    use crate::domain::Gym;

    fn users(events: Arc<EventDispatcher>) -> UserService {
        let storage = storage();
        UserService::new(storage.clone(), storage, events)
    }

    fn create(username: &str) -> CreateUserDto {
        CreateUserDto {
            username: username.to_string(),
            display_name: None,
            bio: None,
            home_gym_id: None,
        }
    }

    #[tokio::test]
    async fn create_user_publishes_user_created() {
        let (events, published) = recording_dispatcher();
        let service = users(events);

        let user = service.create_user(create("  shauna ")).await.unwrap();

        assert_eq!(user.username, "shauna");
        let published = published.lock().unwrap();
        assert!(matches!(&published[..], [DomainEvent::UserCreated(e)] if e.user_id == user.id));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let (events, _) = recording_dispatcher();
        let service = users(events);
        service.create_user(create("natalia")).await.unwrap();

        let err = service.create_user(create("Natalia")).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let (events, published) = recording_dispatcher();
        let service = users(events);

        let err = service.create_user(create("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
        assert!(published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_update_records_prior_and_new_values() {
        let (events, published) = recording_dispatcher();
        let service = users(events);
        let user = service.create_user(create("tomoa")).await.unwrap();

        let updated = service
            .update_profile(
                user.id,
                UpdateProfileDto {
                    display_name: Some("Tomoa N.".into()),
                    bio: Some("".into()),
                    home_gym_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.display_name.as_deref(), Some("Tomoa N."));
        let published = published.lock().unwrap();
        let DomainEvent::UserProfileUpdated(event) = &published[1] else {
            panic!("expected UserProfileUpdated, got {:?}", published[1]);
        };
        assert_eq!(
            event.changes,
            vec![FieldChange {
                field: "display_name".into(),
                old: None,
                new: Some("Tomoa N.".into()),
            }]
        );
    }

    #[tokio::test]
    async fn unchanged_profile_publishes_nothing() {
        let (events, published) = recording_dispatcher();
        let service = users(events);
        let user = service.create_user(create("adam")).await.unwrap();

        service
            .update_profile(user.id, UpdateProfileDto::default())
            .await
            .unwrap();

        assert_eq!(published.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_unknown_user_is_not_found() {
        let (events, published) = recording_dispatcher();
        let service = users(events);

        let err = service.delete_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::NotFound { .. })));
        assert!(published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_home_gym_is_not_found() {
        let (events, published) = recording_dispatcher();
        let service = users(events);

        let err = service
            .create_user(CreateUserDto {
                home_gym_id: Some(Uuid::new_v4()),
                ..create("janja")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::NotFound { entity: "Gym", .. })));

        let user = service.create_user(create("janja")).await.unwrap();
        let err = service
            .update_profile(
                user.id,
                UpdateProfileDto {
                    home_gym_id: Some(Uuid::new_v4()),
                    ..UpdateProfileDto::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::NotFound { .. })));
        assert_eq!(published.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn known_home_gym_is_accepted() {
        let (events, _) = recording_dispatcher();
        let storage = storage();
        let gym = Gym::new("The Arch");
        storage.create_gym(gym.clone()).await.unwrap();
        let service = UserService::new(storage.clone(), storage, events);

        let user = service
            .create_user(CreateUserDto {
                home_gym_id: Some(gym.id),
                ..create("stasa")
            })
            .await
            .unwrap();
        assert_eq!(user.home_gym_id, Some(gym.id));
    }
}
