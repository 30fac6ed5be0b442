//! Tweet DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::application::services::MAX_TWEET_LENGTH;
use crate::domain::{CreateTweetDto, Tweet};

// validator's `length` bounds are u64
const MAX_TWEET_LENGTH_U64: u64 = MAX_TWEET_LENGTH as u64;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TweetDto {
    pub id: Uuid,
    pub author_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gym_id: Option<Uuid>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Tweet> for TweetDto {
    fn from(t: Tweet) -> Self {
        Self {
            id: t.id,
            author_id: t.author_id,
            gym_id: t.gym_id,
            content: t.content,
            grade: t.grade,
            created_at: t.created_at,
        }
    }
}

/// Post a tweet as the acting user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTweetRequest {
    /// Whitespace-only content is rejected by the service
    #[validate(length(min = 1, max = MAX_TWEET_LENGTH_U64))]
    pub content: String,
    pub gym_id: Option<Uuid>,
    #[validate(length(max = 8))]
    pub grade: Option<String>,
}

impl From<CreateTweetRequest> for CreateTweetDto {
    fn from(r: CreateTweetRequest) -> Self {
        Self {
            content: r.content,
            gym_id: r.gym_id,
            grade: r.grade,
        }
    }
}

/// Feed query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FeedParams {
    /// Page size, defaults to 50 and is capped at 200
    pub limit: Option<usize>,
}
