//! User-blocking use cases

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::application::error::AppResult;
use crate::application::events::EventDispatcher;
use crate::domain::events::{UserBlockedEvent, UserUnblockedEvent};
use crate::domain::{Block, BlockRepository, DomainError, DomainEvent, UserRepository};

pub struct BlockService {
    blocks: Arc<dyn BlockRepository>,
    users: Arc<dyn UserRepository>,
    events: Arc<EventDispatcher>,
}

impl BlockService {
    pub fn new(
        blocks: Arc<dyn BlockRepository>,
        users: Arc<dyn UserRepository>,
        events: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            blocks,
            users,
            events,
        }
    }

    pub async fn block_user(&self, blocker_id: Uuid, blocked_id: Uuid) -> AppResult<Block> {
        if blocker_id == blocked_id {
            return Err(DomainError::Validation("users cannot block themselves".into()).into());
        }
        for id in [blocker_id, blocked_id] {
            if self.users.get_user_by_id(id).await?.is_none() {
                return Err(DomainError::not_found("User", "id", id).into());
            }
        }

        let block = Block::new(blocker_id, blocked_id);
        self.blocks.create_block(block.clone()).await?;
        info!(%blocker_id, %blocked_id, "User blocked");

        self.events
            .dispatch(DomainEvent::UserBlocked(UserBlockedEvent {
                blocker_id,
                blocked_id,
                occurred_at: block.created_at,
            }))
            .await?;
        Ok(block)
    }

    pub async fn unblock_user(&self, blocker_id: Uuid, blocked_id: Uuid) -> AppResult<()> {
        if !self.blocks.delete_block(blocker_id, blocked_id).await? {
            return Err(DomainError::not_found("Block", "blocked_id", blocked_id).into());
        }
        info!(%blocker_id, %blocked_id, "User unblocked");

        self.events
            .dispatch(DomainEvent::UserUnblocked(UserUnblockedEvent {
                blocker_id,
                blocked_id,
                occurred_at: Utc::now(),
            }))
            .await?;
        Ok(())
    }

    pub async fn list_blocked(&self, blocker_id: Uuid) -> AppResult<Vec<Block>> {
        Ok(self.blocks.list_blocked_by(blocker_id).await?)
    }
}
