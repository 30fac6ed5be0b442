use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use super::Tweet;
use crate::shared::DomainResult;

#[async_trait]
pub trait TweetRepository: Send + Sync {
    async fn create_tweet(&self, tweet: Tweet) -> DomainResult<()>;
    async fn get_tweet(&self, id: Uuid) -> DomainResult<Option<Tweet>>;
    /// Newest first.
    async fn list_tweets_by_author(&self, author_id: Uuid) -> DomainResult<Vec<Tweet>>;
    /// Newest first, at most `limit` items, skipping tweets by `excluded_authors`.
    async fn list_recent_tweets(
        &self,
        limit: usize,
        excluded_authors: &HashSet<Uuid>,
    ) -> DomainResult<Vec<Tweet>>;
    async fn delete_tweet(&self, id: Uuid) -> DomainResult<()>;
    /// Returns the removed count.
    async fn delete_tweets_by_author(&self, author_id: Uuid) -> DomainResult<usize>;
}
