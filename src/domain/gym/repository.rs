use async_trait::async_trait;
use uuid::Uuid;

use super::Gym;
use crate::shared::DomainResult;

#[async_trait]
pub trait GymRepository: Send + Sync {
    async fn create_gym(&self, gym: Gym) -> DomainResult<()>;
    async fn get_gym(&self, id: Uuid) -> DomainResult<Option<Gym>>;
    /// Ordered by name.
    async fn list_gyms(&self) -> DomainResult<Vec<Gym>>;
}
