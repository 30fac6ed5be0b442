//! Tweet (activity post) use cases

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::application::error::AppResult;
use crate::application::events::EventDispatcher;
use crate::domain::events::{TweetCreatedEvent, TweetDeletedEvent};
use crate::domain::{
    BlockRepository, CreateTweetDto, DomainError, DomainEvent, GymRepository, Tweet,
    TweetRepository, UserRepository,
};
use crate::shared::normalize_optional;

/// Longest accepted tweet body, in characters
pub const MAX_TWEET_LENGTH: usize = 280;

pub struct TweetService {
    tweets: Arc<dyn TweetRepository>,
    users: Arc<dyn UserRepository>,
    gyms: Arc<dyn GymRepository>,
    blocks: Arc<dyn BlockRepository>,
    events: Arc<EventDispatcher>,
}

impl TweetService {
    pub fn new(
        tweets: Arc<dyn TweetRepository>,
        users: Arc<dyn UserRepository>,
        gyms: Arc<dyn GymRepository>,
        blocks: Arc<dyn BlockRepository>,
        events: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            tweets,
            users,
            gyms,
            blocks,
            events,
        }
    }

    pub async fn create_tweet(&self, author_id: Uuid, dto: CreateTweetDto) -> AppResult<Tweet> {
        let content = dto.content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation("content must not be empty".into()).into());
        }
        if content.chars().count() > MAX_TWEET_LENGTH {
            return Err(DomainError::Validation(format!(
                "content exceeds {} characters",
                MAX_TWEET_LENGTH
            ))
            .into());
        }
        if self.users.get_user_by_id(author_id).await?.is_none() {
            return Err(DomainError::not_found("User", "id", author_id).into());
        }
        if let Some(gym_id) = dto.gym_id {
            if self.gyms.get_gym(gym_id).await?.is_none() {
                return Err(DomainError::not_found("Gym", "id", gym_id).into());
            }
        }

        let mut tweet = Tweet::new(author_id, content);
        tweet.gym_id = dto.gym_id;
        tweet.grade = normalize_optional(dto.grade);
        self.tweets.create_tweet(tweet.clone()).await?;

        info!(tweet_id = %tweet.id, %author_id, "Tweet created");

        self.events
            .dispatch(DomainEvent::TweetCreated(TweetCreatedEvent {
                tweet_id: tweet.id,
                author_id,
                gym_id: tweet.gym_id,
                occurred_at: tweet.created_at,
            }))
            .await?;
        Ok(tweet)
    }

    pub async fn get_tweet(&self, id: Uuid) -> AppResult<Tweet> {
        self.tweets
            .get_tweet(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tweet", "id", id).into())
    }

    pub async fn list_by_author(&self, author_id: Uuid) -> AppResult<Vec<Tweet>> {
        if self.users.get_user_by_id(author_id).await?.is_none() {
            return Err(DomainError::not_found("User", "id", author_id).into());
        }
        Ok(self.tweets.list_tweets_by_author(author_id).await?)
    }

    /// Recent tweets visible to `viewer_id`: authors the viewer blocked and
    /// authors who blocked the viewer are left out.
    pub async fn feed(&self, viewer_id: Uuid, limit: usize) -> AppResult<Vec<Tweet>> {
        let hidden: HashSet<Uuid> = self
            .blocks
            .list_blocked_by(viewer_id)
            .await?
            .into_iter()
            .map(|b| b.blocked_id)
            .chain(
                self.blocks
                    .list_blockers_of(viewer_id)
                    .await?
                    .into_iter()
                    .map(|b| b.blocker_id),
            )
            .collect();

        Ok(self.tweets.list_recent_tweets(limit, &hidden).await?)
    }

    /// Only the author may delete a tweet.
    pub async fn delete_tweet(&self, requester_id: Uuid, tweet_id: Uuid) -> AppResult<()> {
        let tweet = self.get_tweet(tweet_id).await?;
        if tweet.author_id != requester_id {
            return Err(DomainError::Forbidden(format!(
                "tweet {} belongs to another user",
                tweet_id
            ))
            .into());
        }

        self.tweets.delete_tweet(tweet_id).await?;
        info!(%tweet_id, author_id = %tweet.author_id, "Tweet deleted");

        self.events
            .dispatch(DomainEvent::TweetDeleted(TweetDeletedEvent {
                tweet_id,
                author_id: tweet.author_id,
                occurred_at: chrono::Utc::now(),
            }))
            .await?;
        Ok(())
    }
}
