use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Climber profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub home_gym_id: Option<Uuid>,
    /// Denormalized count maintained by the tweet counter handler.
    pub tweet_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            display_name: None,
            bio: None,
            home_gym_id: None,
            tweet_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
