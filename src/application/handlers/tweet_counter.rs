//! Keeps `User::tweet_count` in step with tweet creation and deletion

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::application::events::{EventHandler, HandlerError};
use crate::domain::{DomainError, DomainEvent, UserRepository};

pub struct TweetCounterHandler {
    users: Arc<dyn UserRepository>,
}

impl TweetCounterHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl EventHandler for TweetCounterHandler {
    fn name(&self) -> &str {
        "tweet_counter"
    }

    async fn handle(&self, event: Arc<DomainEvent>) -> Result<(), HandlerError> {
        let (author_id, delta) = match event.as_ref() {
            DomainEvent::TweetCreated(e) => (e.author_id, 1),
            DomainEvent::TweetDeleted(e) => (e.author_id, -1),
            _ => return Ok(()),
        };

        match self.users.adjust_tweet_count(author_id, delta).await {
            Ok(tweet_count) => {
                debug!(%author_id, tweet_count, "Tweet count updated");
                Ok(())
            }
            // The author was deleted; there is no counter left to maintain.
            Err(DomainError::NotFound { .. }) => {
                debug!(%author_id, "Author no longer exists, tweet count skipped");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{TweetCreatedEvent, TweetDeletedEvent, UserDeletedEvent};
    use crate::domain::User;
    use crate::infrastructure::InMemoryStorage;
    use chrono::Utc;
    use uuid::Uuid;

    #[tokio::test]
    async fn counts_follow_created_and_deleted_tweets() {
        let storage = Arc::new(InMemoryStorage::new());
        let user = User::new("alex");
        let author_id = user.id;
        storage.create_user(user).await.unwrap();
        let handler = TweetCounterHandler::new(storage.clone());

        for _ in 0..2 {
            let created = DomainEvent::TweetCreated(TweetCreatedEvent {
                tweet_id: Uuid::new_v4(),
                author_id,
                gym_id: None,
                occurred_at: Utc::now(),
            });
            handler.handle(Arc::new(created)).await.unwrap();
        }
        let deleted = DomainEvent::TweetDeleted(TweetDeletedEvent {
            tweet_id: Uuid::new_v4(),
            author_id,
            occurred_at: Utc::now(),
        });
        handler.handle(Arc::new(deleted)).await.unwrap();

        let user = storage.get_user_by_id(author_id).await.unwrap().unwrap();
        assert_eq!(user.tweet_count, 1);
    }

    #[tokio::test]
    async fn unknown_author_is_skipped() {
        let handler = TweetCounterHandler::new(Arc::new(InMemoryStorage::new()));
        let created = DomainEvent::TweetCreated(TweetCreatedEvent {
            tweet_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            gym_id: None,
            occurred_at: Utc::now(),
        });

        handler.handle(Arc::new(created)).await.unwrap();
    }

    #[tokio::test]
    async fn unrelated_events_are_ignored() {
        let handler = TweetCounterHandler::new(Arc::new(InMemoryStorage::new()));
        let event = DomainEvent::UserDeleted(UserDeletedEvent {
            user_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        });
        handler.handle(Arc::new(event)).await.unwrap();
    }
}
