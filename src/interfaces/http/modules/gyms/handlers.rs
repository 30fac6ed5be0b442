//! Gym HTTP handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::dto::{CreateGymRequest, GymDto};
use crate::application::GymService;
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};

#[derive(Clone)]
pub struct GymHandlerState {
    pub gyms: Arc<GymService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/gyms",
    tag = "Gyms",
    request_body = CreateGymRequest,
    responses(
        (status = 201, description = "Gym created", body = ApiResponse<GymDto>),
        (status = 409, description = "Gym already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_gym(
    State(state): State<GymHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateGymRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GymDto>>), ApiError> {
    let gym = state.gyms.create_gym(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(gym.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/gyms",
    tag = "Gyms",
    responses((status = 200, description = "Gyms ordered by name", body = ApiResponse<Vec<GymDto>>))
)]
pub async fn list_gyms(
    State(state): State<GymHandlerState>,
) -> Result<Json<ApiResponse<Vec<GymDto>>>, ApiError> {
    let gyms = state.gyms.list_gyms().await?;
    Ok(Json(ApiResponse::success(
        gyms.into_iter().map(GymDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/gyms/{id}",
    tag = "Gyms",
    params(("id" = Uuid, Path, description = "Gym ID")),
    responses(
        (status = 200, description = "Gym", body = ApiResponse<GymDto>),
        (status = 404, description = "Gym not found")
    )
)]
pub async fn get_gym(
    State(state): State<GymHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<GymDto>>, ApiError> {
    let gym = state.gyms.get_gym(id).await?;
    Ok(Json(ApiResponse::success(gym.into())))
}
