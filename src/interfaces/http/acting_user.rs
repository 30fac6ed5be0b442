//! Acting user
//!
//! The caller identifies itself with `X-User-Id`. Upstream infrastructure is
//! trusted to have authenticated the header; the service only parses it.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;
use uuid::Uuid;

use super::common::ApiResponse;

/// Header carrying the acting user's id
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, PartialEq, Eq)]
pub enum ActingUserError {
    MissingHeader,
    InvalidHeader,
}

/// User on whose behalf the request runs
///
/// Used directly as a handler argument; requests without a well-formed
/// header are rejected with 400 before the handler runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActingUser(pub Uuid);

impl ActingUser {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

fn parse_acting_user(headers: &HeaderMap) -> Result<ActingUser, ActingUserError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or(ActingUserError::MissingHeader)?;
    raw.to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .map(ActingUser)
        .ok_or(ActingUserError::InvalidHeader)
}

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_acting_user(&parts.headers).map_err(|e| {
            debug!(error = ?e, uri = %parts.uri, "Rejected request without acting user");
            acting_user_error_response(e)
        })
    }
}

fn acting_user_error_response(error: ActingUserError) -> Response {
    let message = match error {
        ActingUserError::MissingHeader => "Missing X-User-Id header",
        ActingUserError::InvalidHeader => "X-User-Id must be a UUID",
    };
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error(message)),
    )
        .into_response()
}
