//! Gym directory use cases

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::application::error::AppResult;
use crate::application::events::EventDispatcher;
use crate::domain::events::GymCreatedEvent;
use crate::domain::{CreateGymDto, DomainError, DomainEvent, Gym, GymRepository};
use crate::shared::normalize_optional;

pub struct GymService {
    gyms: Arc<dyn GymRepository>,
    events: Arc<EventDispatcher>,
}

impl GymService {
    pub fn new(gyms: Arc<dyn GymRepository>, events: Arc<EventDispatcher>) -> Self {
        Self { gyms, events }
    }

    pub async fn create_gym(&self, dto: CreateGymDto) -> AppResult<Gym> {
        let name = dto.name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("gym name must not be empty".into()).into());
        }

        let mut gym = Gym::new(name);
        gym.city = normalize_optional(dto.city);
        self.gyms.create_gym(gym.clone()).await?;
        info!(gym_id = %gym.id, name = %gym.name, "Gym created");

        self.events
            .dispatch(DomainEvent::GymCreated(GymCreatedEvent {
                gym_id: gym.id,
                name: gym.name.clone(),
                occurred_at: gym.created_at,
            }))
            .await?;
        Ok(gym)
    }

    pub async fn get_gym(&self, id: Uuid) -> AppResult<Gym> {
        self.gyms
            .get_gym(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Gym", "id", id).into())
    }

    pub async fn list_gyms(&self) -> AppResult<Vec<Gym>> {
        Ok(self.gyms.list_gyms().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{recording_dispatcher, storage};

    #[tokio::test]
    async fn created_gyms_are_listed_by_name() {
        let (events, published) = recording_dispatcher();
        let service = GymService::new(storage(), events);

        for (name, city) in [("Ostbloc", "Berlin"), ("Arch", "London")] {
            service
                .create_gym(CreateGymDto {
                    name: name.into(),
                    city: Some(city.into()),
                })
                .await
                .unwrap();
        }

        let names: Vec<String> = service
            .list_gyms()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Arch", "Ostbloc"]);
        assert_eq!(published.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_gym_is_not_found() {
        let (events, _) = recording_dispatcher();
        let service = GymService::new(storage(), events);
        assert!(service.get_gym(Uuid::new_v4()).await.is_err());
    }
}
