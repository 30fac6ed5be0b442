//! Validated JSON extractor
//!
//! Malformed bodies are rejected with 400, bodies failing their
//! `validator` rules with 422 and a `field: message` list.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::ApiResponse;

/// `Json<T>` that also runs `Validate::validate` before the handler sees it.
///
/// ```ignore
/// async fn create_gym(ValidatedJson(body): ValidatedJson<CreateGymRequest>) { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Invalid(validator::ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Json(rejection) => (StatusCode::BAD_REQUEST, format!("Invalid JSON: {}", rejection)),
            Self::Invalid(errors) => (StatusCode::UNPROCESSABLE_ENTITY, describe(&errors)),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

fn describe(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    if fields.is_empty() {
        return "Validation failed".to_string();
    }
    fields.sort();
    fields.join("; ")
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::Invalid)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct NewRoute {
        #[validate(length(min = 1, max = 10))]
        name: String,
        #[validate(range(min = 1, max = 17))]
        v_grade: u32,
    }

    async fn handler(ValidatedJson(body): ValidatedJson<NewRoute>) -> String {
        format!("{} V{}", body.name, body.v_grade)
    }

    async fn send(body: impl Into<Body>) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri("/routes")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        let response = Router::new()
            .route("/routes", post(handler))
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn valid_body_reaches_handler() {
        let (status, body) = send(r#"{"name":"Dreamcatcher","v_grade":14}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Dreamcatcher V14");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = send("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid JSON"));
    }

    #[tokio::test]
    async fn rule_violation_is_unprocessable() {
        let (status, body) = send(r#"{"name":"","v_grade":30}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("\"success\":false"));
        assert!(body.contains("v_grade"));
    }
}
