//! Drops tweets written by deleted users

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::application::events::{EventHandler, HandlerError};
use crate::domain::{DomainEvent, TweetRepository};

pub struct TweetCleanupHandler {
    tweets: Arc<dyn TweetRepository>,
}

impl TweetCleanupHandler {
    pub fn new(tweets: Arc<dyn TweetRepository>) -> Self {
        Self { tweets }
    }
}

#[async_trait]
impl EventHandler for TweetCleanupHandler {
    fn name(&self) -> &str {
        "tweet_cleanup"
    }

    async fn handle(&self, event: Arc<DomainEvent>) -> Result<(), HandlerError> {
        let DomainEvent::UserDeleted(deleted) = event.as_ref() else {
            return Ok(());
        };

        let removed = self.tweets.delete_tweets_by_author(deleted.user_id).await?;
        if removed > 0 {
            info!(user_id = %deleted.user_id, removed, "Removed tweets of deleted user");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::UserDeletedEvent;
    use crate::domain::Tweet;
    use crate::infrastructure::InMemoryStorage;
    use chrono::Utc;
    use uuid::Uuid;

    #[tokio::test]
    async fn removes_only_the_deleted_authors_tweets() {
        let storage = Arc::new(InMemoryStorage::new());
        let (gone, other) = (Uuid::new_v4(), Uuid::new_v4());
        storage.create_tweet(Tweet::new(gone, "last session")).await.unwrap();
        storage.create_tweet(Tweet::new(other, "still here")).await.unwrap();

        let handler = TweetCleanupHandler::new(storage.clone());
        let event = DomainEvent::UserDeleted(UserDeletedEvent {
            user_id: gone,
            occurred_at: Utc::now(),
        });
        handler.handle(Arc::new(event)).await.unwrap();

        assert!(storage.list_tweets_by_author(gone).await.unwrap().is_empty());
        assert_eq!(storage.list_tweets_by_author(other).await.unwrap().len(), 1);
    }
}
