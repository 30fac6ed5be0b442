use async_trait::async_trait;
use uuid::Uuid;

use super::Block;
use crate::shared::DomainResult;

#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn create_block(&self, block: Block) -> DomainResult<()>;
    /// Returns `false` when no such relationship existed.
    async fn delete_block(&self, blocker_id: Uuid, blocked_id: Uuid) -> DomainResult<bool>;
    async fn is_blocked(&self, blocker_id: Uuid, blocked_id: Uuid) -> DomainResult<bool>;
    async fn list_blocked_by(&self, blocker_id: Uuid) -> DomainResult<Vec<Block>>;
    /// Users who blocked `blocked_id`.
    async fn list_blockers_of(&self, blocked_id: Uuid) -> DomainResult<Vec<Block>>;
    /// Removes every relationship where the user is either side. Returns the removed count.
    async fn delete_blocks_for_user(&self, user_id: Uuid) -> DomainResult<usize>;
}
