//! In-memory storage implementation
//!
//! Backs every repository interface with concurrent maps. Used by the
//! service binary and by tests; data lives for the process.

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{
    Block, BlockRepository, DomainError, DomainResult, Gym, GymRepository, Tweet,
    TweetRepository, User, UserRepository,
};

/// In-memory storage for development and testing
#[derive(Default)]
pub struct InMemoryStorage {
    users: DashMap<Uuid, User>,
    tweets: DashMap<Uuid, Tweet>,
    /// Keyed by `(blocker_id, blocked_id)`
    blocks: DashMap<(Uuid, Uuid), Block>,
    gyms: DashMap<Uuid, Gym>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut tweets: Vec<Tweet>) -> Vec<Tweet> {
    tweets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tweets
}

#[async_trait]
impl UserRepository for InMemoryStorage {
    async fn create_user(&self, user: User) -> DomainResult<()> {
        let taken = self
            .users
            .iter()
            .any(|u| u.username.eq_ignore_ascii_case(&user.username));
        if taken {
            return Err(DomainError::Conflict(format!(
                "username '{}' is taken",
                user.username
            )));
        }
        match self.users.entry(user.id) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!("user {}", user.id))),
            Entry::Vacant(slot) => {
                slot.insert(user);
                Ok(())
            }
        }
    }

    async fn get_user_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .map(|u| u.value().clone()))
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn update_user(&self, user: User) -> DomainResult<()> {
        match self.users.get_mut(&user.id) {
            Some(mut existing) => {
                let tweet_count = existing.tweet_count;
                *existing = User { tweet_count, ..user };
                Ok(())
            }
            None => Err(DomainError::not_found("User", "id", user.id)),
        }
    }

    async fn adjust_tweet_count(&self, id: Uuid, delta: i64) -> DomainResult<u64> {
        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;
        user.tweet_count = if delta.is_negative() {
            user.tweet_count.saturating_sub(delta.unsigned_abs())
        } else {
            user.tweet_count.saturating_add(delta as u64)
        };
        Ok(user.tweet_count)
    }

    async fn delete_user(&self, id: Uuid) -> DomainResult<()> {
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }
}

#[async_trait]
impl TweetRepository for InMemoryStorage {
    async fn create_tweet(&self, tweet: Tweet) -> DomainResult<()> {
        match self.tweets.entry(tweet.id) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!("tweet {}", tweet.id))),
            Entry::Vacant(slot) => {
                slot.insert(tweet);
                Ok(())
            }
        }
    }

    async fn get_tweet(&self, id: Uuid) -> DomainResult<Option<Tweet>> {
        Ok(self.tweets.get(&id).map(|t| t.value().clone()))
    }

    async fn list_tweets_by_author(&self, author_id: Uuid) -> DomainResult<Vec<Tweet>> {
        Ok(newest_first(
            self.tweets
                .iter()
                .filter(|t| t.author_id == author_id)
                .map(|t| t.value().clone())
                .collect(),
        ))
    }

    async fn list_recent_tweets(
        &self,
        limit: usize,
        excluded_authors: &HashSet<Uuid>,
    ) -> DomainResult<Vec<Tweet>> {
        let mut tweets = newest_first(
            self.tweets
                .iter()
                .filter(|t| !excluded_authors.contains(&t.author_id))
                .map(|t| t.value().clone())
                .collect(),
        );
        tweets.truncate(limit);
        Ok(tweets)
    }

    async fn delete_tweet(&self, id: Uuid) -> DomainResult<()> {
        self.tweets
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Tweet", "id", id))
    }

    async fn delete_tweets_by_author(&self, author_id: Uuid) -> DomainResult<usize> {
        let before = self.tweets.len();
        self.tweets.retain(|_, t| t.author_id != author_id);
        Ok(before.saturating_sub(self.tweets.len()))
    }
}

#[async_trait]
impl BlockRepository for InMemoryStorage {
    async fn create_block(&self, block: Block) -> DomainResult<()> {
        match self.blocks.entry((block.blocker_id, block.blocked_id)) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "user {} already blocked {}",
                block.blocker_id, block.blocked_id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(block);
                Ok(())
            }
        }
    }

    async fn delete_block(&self, blocker_id: Uuid, blocked_id: Uuid) -> DomainResult<bool> {
        Ok(self.blocks.remove(&(blocker_id, blocked_id)).is_some())
    }

    async fn is_blocked(&self, blocker_id: Uuid, blocked_id: Uuid) -> DomainResult<bool> {
        Ok(self.blocks.contains_key(&(blocker_id, blocked_id)))
    }

    async fn list_blocked_by(&self, blocker_id: Uuid) -> DomainResult<Vec<Block>> {
        let mut blocks: Vec<Block> = self
            .blocks
            .iter()
            .filter(|b| b.blocker_id == blocker_id)
            .map(|b| b.value().clone())
            .collect();
        blocks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(blocks)
    }

    async fn list_blockers_of(&self, blocked_id: Uuid) -> DomainResult<Vec<Block>> {
        Ok(self
            .blocks
            .iter()
            .filter(|b| b.blocked_id == blocked_id)
            .map(|b| b.value().clone())
            .collect())
    }

    async fn delete_blocks_for_user(&self, user_id: Uuid) -> DomainResult<usize> {
        let before = self.blocks.len();
        self.blocks
            .retain(|(blocker, blocked), _| *blocker != user_id && *blocked != user_id);
        Ok(before.saturating_sub(self.blocks.len()))
    }
}

#[async_trait]
impl GymRepository for InMemoryStorage {
    async fn create_gym(&self, gym: Gym) -> DomainResult<()> {
        let taken = self
            .gyms
            .iter()
            .any(|g| g.name.eq_ignore_ascii_case(&gym.name) && g.city == gym.city);
        if taken {
            return Err(DomainError::Conflict(format!("gym '{}'", gym.name)));
        }
        self.gyms.insert(gym.id, gym);
        Ok(())
    }

    async fn get_gym(&self, id: Uuid) -> DomainResult<Option<Gym>> {
        Ok(self.gyms.get(&id).map(|g| g.value().clone()))
    }

    async fn list_gyms(&self) -> DomainResult<Vec<Gym>> {
        let mut gyms: Vec<Gym> = self.gyms.iter().map(|g| g.value().clone()).collect();
        gyms.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(gyms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn usernames_are_unique_case_insensitively() {
        let storage = InMemoryStorage::new();
        storage.create_user(User::new("Ondra")).await.unwrap();

        let err = storage.create_user(User::new("ondra")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(storage.get_user_by_username("ONDRA").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn tweet_count_saturates_at_zero() {
        let storage = InMemoryStorage::new();
        let user = User::new("janja");
        let id = user.id;
        storage.create_user(user).await.unwrap();

        assert_eq!(storage.adjust_tweet_count(id, 2).await.unwrap(), 2);
        assert_eq!(storage.adjust_tweet_count(id, -5).await.unwrap(), 0);
        assert!(storage.adjust_tweet_count(Uuid::new_v4(), 1).await.is_err());
    }

    #[tokio::test]
    async fn recent_tweets_are_newest_first_and_limited() {
        let storage = InMemoryStorage::new();
        let author = Uuid::new_v4();
        for i in 0..3 {
            let mut tweet = Tweet::new(author, format!("send #{i}"));
            tweet.created_at += chrono::Duration::seconds(i);
            storage.create_tweet(tweet).await.unwrap();
        }

        let recent = storage.list_recent_tweets(2, &HashSet::new()).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].content, "send #2");
        assert_eq!(recent[1].content, "send #1");
    }

    #[tokio::test]
    async fn recent_tweets_skip_excluded_authors_before_limiting() {
        let storage = InMemoryStorage::new();
        let (friend, spammer) = (Uuid::new_v4(), Uuid::new_v4());
        for i in 0..2 {
            let mut tweet = Tweet::new(friend, format!("session #{i}"));
            tweet.created_at -= chrono::Duration::minutes(10);
            storage.create_tweet(tweet).await.unwrap();
        }
        for i in 0..20 {
            storage.create_tweet(Tweet::new(spammer, format!("spam #{i}"))).await.unwrap();
        }

        let excluded = HashSet::from([spammer]);
        let recent = storage.list_recent_tweets(2, &excluded).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|t| t.author_id == friend));
    }

    #[tokio::test]
    async fn tweets_by_author_are_removed_together() {
        let storage = InMemoryStorage::new();
        let (gone, other) = (Uuid::new_v4(), Uuid::new_v4());
        storage.create_tweet(Tweet::new(gone, "a")).await.unwrap();
        storage.create_tweet(Tweet::new(gone, "b")).await.unwrap();
        storage.create_tweet(Tweet::new(other, "c")).await.unwrap();

        assert_eq!(storage.delete_tweets_by_author(gone).await.unwrap(), 2);
        assert!(storage.list_tweets_by_author(gone).await.unwrap().is_empty());
        assert_eq!(storage.list_tweets_by_author(other).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn profile_update_keeps_tweet_count() {
        let storage = InMemoryStorage::new();
        let user = User::new("janja");
        let id = user.id;
        storage.create_user(user).await.unwrap();

        let mut stale = storage.get_user_by_id(id).await.unwrap().unwrap();
        storage.adjust_tweet_count(id, 3).await.unwrap();
        stale.bio = Some("Olympic champion".into());
        storage.update_user(stale).await.unwrap();

        let stored = storage.get_user_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.tweet_count, 3);
        assert_eq!(stored.bio.as_deref(), Some("Olympic champion"));
    }

    #[tokio::test]
    async fn blocks_for_user_are_removed_from_both_sides() {
        let storage = InMemoryStorage::new();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        storage.create_block(Block::new(a, b)).await.unwrap();
        storage.create_block(Block::new(c, a)).await.unwrap();
        storage.create_block(Block::new(b, c)).await.unwrap();

        assert_eq!(storage.delete_blocks_for_user(a).await.unwrap(), 2);
        assert!(!storage.is_blocked(a, b).await.unwrap());
        assert!(storage.is_blocked(b, c).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_block_conflicts() {
        let storage = InMemoryStorage::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        storage.create_block(Block::new(a, b)).await.unwrap();
        assert!(matches!(
            storage.create_block(Block::new(a, b)).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(storage.delete_block(a, b).await.unwrap());
        assert!(!storage.delete_block(a, b).await.unwrap());
    }
}
