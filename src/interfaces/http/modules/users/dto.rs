//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{CreateUserDto, UpdateProfileDto, User};

/// User API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_gym_id: Option<Uuid>,
    pub tweet_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            display_name: u.display_name,
            bio: u.bio,
            home_gym_id: u.home_gym_id,
            tweet_count: u.tweet_count,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 32, message = "must be 1-32 characters"))]
    pub username: String,
    #[validate(length(max = 64))]
    pub display_name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    pub home_gym_id: Option<Uuid>,
}

impl From<CreateUserRequest> for CreateUserDto {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            username: r.username,
            display_name: r.display_name,
            bio: r.bio,
            home_gym_id: r.home_gym_id,
        }
    }
}

/// Profile update request. Omitted fields stay unchanged; an empty string
/// clears a text field.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 64))]
    pub display_name: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    pub home_gym_id: Option<Uuid>,
}

impl From<UpdateProfileRequest> for UpdateProfileDto {
    fn from(r: UpdateProfileRequest) -> Self {
        Self {
            display_name: r.display_name,
            bio: r.bio,
            home_gym_id: r.home_gym_id,
        }
    }
}
