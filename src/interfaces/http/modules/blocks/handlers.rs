//! Block HTTP handlers. All routes act on behalf of `X-User-Id`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::dto::{BlockDto, CreateBlockRequest};
use crate::application::BlockService;
use crate::interfaces::http::common::{ApiError, ApiResponse, EmptyData};
use crate::interfaces::http::acting_user::ActingUser;

#[derive(Clone)]
pub struct BlockHandlerState {
    pub blocks: Arc<BlockService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/blocks",
    tag = "Blocks",
    request_body = CreateBlockRequest,
    params(("X-User-Id" = Uuid, Header, description = "Acting user")),
    responses(
        (status = 201, description = "User blocked", body = ApiResponse<BlockDto>),
        (status = 404, description = "User not found"),
        (status = 409, description = "Already blocked"),
        (status = 422, description = "Cannot block yourself")
    )
)]
pub async fn block_user(
    State(state): State<BlockHandlerState>,
    user: ActingUser,
    Json(request): Json<CreateBlockRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BlockDto>>), ApiError> {
    let block = state.blocks.block_user(user.id(), request.user_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(block.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/blocks",
    tag = "Blocks",
    params(("X-User-Id" = Uuid, Header, description = "Acting user")),
    responses((status = 200, description = "Users blocked by the acting user", body = ApiResponse<Vec<BlockDto>>))
)]
pub async fn list_blocked(
    State(state): State<BlockHandlerState>,
    user: ActingUser,
) -> Result<Json<ApiResponse<Vec<BlockDto>>>, ApiError> {
    let blocks = state.blocks.list_blocked(user.id()).await?;
    Ok(Json(ApiResponse::success(
        blocks.into_iter().map(BlockDto::from).collect(),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/blocks/{blocked_id}",
    tag = "Blocks",
    params(
        ("blocked_id" = Uuid, Path, description = "Blocked user ID"),
        ("X-User-Id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "User unblocked", body = ApiResponse<EmptyData>),
        (status = 404, description = "No such block")
    )
)]
pub async fn unblock_user(
    State(state): State<BlockHandlerState>,
    user: ActingUser,
    Path(blocked_id): Path<Uuid>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    state.blocks.unblock_user(user.id(), blocked_id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
