//! Gym DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{CreateGymDto, Gym};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GymDto {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Gym> for GymDto {
    fn from(g: Gym) -> Self {
        Self {
            id: g.id,
            name: g.name,
            city: g.city,
            created_at: g.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGymRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 100))]
    pub city: Option<String>,
}

impl From<CreateGymRequest> for CreateGymDto {
    fn from(r: CreateGymRequest) -> Self {
        Self {
            name: r.name,
            city: r.city,
        }
    }
}
