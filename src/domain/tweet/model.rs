use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Activity post, optionally tied to a gym and a boulder grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: Uuid,
    pub author_id: Uuid,
    pub gym_id: Option<Uuid>,
    pub content: String,
    /// Free-form grade such as `V5` or `6C+`
    pub grade: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Tweet {
    pub fn new(author_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            gym_id: None,
            content: content.into(),
            grade: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateTweetDto {
    pub content: String,
    pub gym_id: Option<Uuid>,
    pub grade: Option<String>,
}
