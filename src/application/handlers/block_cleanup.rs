//! Drops block relationships of deleted users

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::application::events::{EventHandler, HandlerError};
use crate::domain::{BlockRepository, DomainEvent};

pub struct BlockCleanupHandler {
    blocks: Arc<dyn BlockRepository>,
}

impl BlockCleanupHandler {
    pub fn new(blocks: Arc<dyn BlockRepository>) -> Self {
        Self { blocks }
    }
}

#[async_trait]
impl EventHandler for BlockCleanupHandler {
    fn name(&self) -> &str {
        "block_cleanup"
    }

    async fn handle(&self, event: Arc<DomainEvent>) -> Result<(), HandlerError> {
        let DomainEvent::UserDeleted(deleted) = event.as_ref() else {
            return Ok(());
        };

        let removed = self.blocks.delete_blocks_for_user(deleted.user_id).await?;
        if removed > 0 {
            info!(user_id = %deleted.user_id, removed, "Removed blocks of deleted user");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::UserDeletedEvent;
    use crate::domain::Block;
    use crate::infrastructure::InMemoryStorage;
    use chrono::Utc;
    use uuid::Uuid;

    #[tokio::test]
    async fn removes_blocks_in_both_directions() {
        let storage = Arc::new(InMemoryStorage::new());
        let (gone, other) = (Uuid::new_v4(), Uuid::new_v4());
        storage.create_block(Block::new(gone, other)).await.unwrap();
        storage.create_block(Block::new(other, gone)).await.unwrap();

        let handler = BlockCleanupHandler::new(storage.clone());
        let event = DomainEvent::UserDeleted(UserDeletedEvent {
            user_id: gone,
            occurred_at: Utc::now(),
        });
        handler.handle(Arc::new(event)).await.unwrap();

        assert!(storage.list_blocked_by(other).await.unwrap().is_empty());
        assert!(storage.list_blockers_of(other).await.unwrap().is_empty());
    }
}
