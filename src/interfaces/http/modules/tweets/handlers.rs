//! Tweet HTTP handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::dto::{CreateTweetRequest, FeedParams, TweetDto};
use crate::application::TweetService;
use crate::interfaces::http::common::{ApiError, ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::acting_user::ActingUser;
use crate::shared::validate_limit;

#[derive(Clone)]
pub struct TweetHandlerState {
    pub tweets: Arc<TweetService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/tweets",
    tag = "Tweets",
    request_body = CreateTweetRequest,
    params(("X-User-Id" = Uuid, Header, description = "Acting user")),
    responses(
        (status = 201, description = "Tweet posted", body = ApiResponse<TweetDto>),
        (status = 400, description = "Missing or malformed X-User-Id"),
        (status = 404, description = "Author or gym not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_tweet(
    State(state): State<TweetHandlerState>,
    user: ActingUser,
    ValidatedJson(request): ValidatedJson<CreateTweetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TweetDto>>), ApiError> {
    let tweet = state.tweets.create_tweet(user.id(), request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tweet.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/tweets/{id}",
    tag = "Tweets",
    params(("id" = Uuid, Path, description = "Tweet ID")),
    responses(
        (status = 200, description = "Tweet", body = ApiResponse<TweetDto>),
        (status = 404, description = "Tweet not found")
    )
)]
pub async fn get_tweet(
    State(state): State<TweetHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TweetDto>>, ApiError> {
    let tweet = state.tweets.get_tweet(id).await?;
    Ok(Json(ApiResponse::success(tweet.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tweets/{id}",
    tag = "Tweets",
    params(
        ("id" = Uuid, Path, description = "Tweet ID"),
        ("X-User-Id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Tweet deleted", body = ApiResponse<EmptyData>),
        (status = 403, description = "Tweet belongs to another user"),
        (status = 404, description = "Tweet not found"),
        (status = 500, description = "A side-effect handler failed after the delete")
    )
)]
pub async fn delete_tweet(
    State(state): State<TweetHandlerState>,
    user: ActingUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    state.tweets.delete_tweet(user.id(), id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/feed",
    tag = "Tweets",
    params(
        FeedParams,
        ("X-User-Id" = Uuid, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Recent tweets, blocked authors excluded", body = ApiResponse<Vec<TweetDto>>)
    )
)]
pub async fn feed(
    State(state): State<TweetHandlerState>,
    user: ActingUser,
    Query(params): Query<FeedParams>,
) -> Result<Json<ApiResponse<Vec<TweetDto>>>, ApiError> {
    let tweets = state
        .tweets
        .feed(user.id(), validate_limit(params.limit))
        .await?;
    Ok(Json(ApiResponse::success(
        tweets.into_iter().map(TweetDto::from).collect(),
    )))
}
