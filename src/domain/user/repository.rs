use async_trait::async_trait;
use uuid::Uuid;

use super::User;
use crate::shared::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: User) -> DomainResult<()>;

    async fn get_user_by_id(&self, id: Uuid) -> DomainResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn list_users(&self) -> DomainResult<Vec<User>>;

    /// Replaces the stored profile. `tweet_count` is left as stored; only
    /// `adjust_tweet_count` changes it.
    async fn update_user(&self, user: User) -> DomainResult<()>;
    /// Applies `delta` to the user's tweet count, saturating at zero.
    async fn adjust_tweet_count(&self, id: Uuid, delta: i64) -> DomainResult<u64>;
    async fn delete_user(&self, id: Uuid) -> DomainResult<()>;
}
