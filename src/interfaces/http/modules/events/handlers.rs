//! Event introspection handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::{ActivityEntryDto, ActivityParams, HandlerCountsDto};
use crate::application::{ActivityLog, DispatchMode, SharedEventDispatcher};
use crate::interfaces::http::common::ApiResponse;
use crate::shared::validate_limit;

#[derive(Clone)]
pub struct EventHandlerState {
    pub dispatcher: SharedEventDispatcher,
    pub activity: Arc<ActivityLog>,
}

#[utoipa::path(
    get,
    path = "/api/v1/events/handlers",
    tag = "Events",
    responses((status = 200, description = "Handler counts per event type", body = ApiResponse<HandlerCountsDto>))
)]
pub async fn handler_counts(
    State(state): State<EventHandlerState>,
) -> Json<ApiResponse<HandlerCountsDto>> {
    let handlers: std::collections::BTreeMap<String, usize> = state
        .dispatcher
        .bus()
        .handler_counts()
        .into_iter()
        .map(|(kind, count)| (kind.to_string(), count))
        .collect();
    let dispatch_mode = match state.dispatcher.mode() {
        DispatchMode::Inline => "inline",
        DispatchMode::Queued => "queued",
    };
    Json(ApiResponse::success(HandlerCountsDto {
        dispatch_mode: dispatch_mode.to_string(),
        total: handlers.values().sum(),
        handlers,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/activity",
    tag = "Events",
    params(ActivityParams),
    responses((status = 200, description = "Recently published events, newest first", body = ApiResponse<Vec<ActivityEntryDto>>))
)]
pub async fn recent_activity(
    State(state): State<EventHandlerState>,
    Query(params): Query<ActivityParams>,
) -> Json<ApiResponse<Vec<ActivityEntryDto>>> {
    let entries = state.activity.recent(validate_limit(params.limit)).await;
    Json(ApiResponse::success(
        entries.into_iter().map(ActivityEntryDto::from).collect(),
    ))
}
