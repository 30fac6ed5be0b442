//! Block DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Block;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BlockDto {
    pub blocker_id: Uuid,
    pub blocked_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Block> for BlockDto {
    fn from(b: Block) -> Self {
        Self {
            blocker_id: b.blocker_id,
            blocked_id: b.blocked_id,
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBlockRequest {
    pub user_id: Uuid,
}
