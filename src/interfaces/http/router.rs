//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::modules::{blocks, events, gyms, health, metrics, request_id, tweets, users};
use crate::application::{
    ActivityLog, BlockService, GymService, SharedEventDispatcher, TweetService, UserService,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        events::handler_counts,
        events::recent_activity,
        users::create_user,
        users::list_users,
        users::get_user,
        users::update_profile,
        users::delete_user,
        users::list_user_tweets,
        tweets::create_tweet,
        tweets::get_tweet,
        tweets::delete_tweet,
        tweets::feed,
        blocks::block_user,
        blocks::list_blocked,
        blocks::unblock_user,
        gyms::create_gym,
        gyms::list_gyms,
        gyms::get_gym,
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Events", description = "Event bus handler registry and recent activity"),
        (name = "Users", description = "Climber profiles"),
        (name = "Tweets", description = "Activity posts and the personalised feed"),
        (name = "Blocks", description = "User blocking"),
        (name = "Gyms", description = "Bouldering gyms"),
    ),
    info(
        title = "Crux API",
        version = "1.0.0",
        description = "Bouldering social service",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Everything the HTTP layer calls into
#[derive(Clone)]
pub struct ApiServices {
    pub users: Arc<UserService>,
    pub tweets: Arc<TweetService>,
    pub blocks: Arc<BlockService>,
    pub gyms: Arc<GymService>,
    pub dispatcher: SharedEventDispatcher,
    pub activity: Arc<ActivityLog>,
    pub started_at: Arc<Instant>,
}

/// Create the API router. `/metrics` is mounted only when a Prometheus
/// recorder handle is supplied.
pub fn create_api_router(services: ApiServices, metrics_handle: Option<PrometheusHandle>) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            bus: Arc::clone(services.dispatcher.bus()),
            started_at: Arc::clone(&services.started_at),
        });

    let event_routes = Router::new()
        .route("/handlers", get(events::handler_counts))
        .route("/activity", get(events::recent_activity))
        .with_state(events::EventHandlerState {
            dispatcher: Arc::clone(&services.dispatcher),
            activity: Arc::clone(&services.activity),
        });

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .patch(users::update_profile)
                .delete(users::delete_user),
        )
        .route("/{id}/tweets", get(users::list_user_tweets))
        .with_state(users::UserHandlerState {
            users: Arc::clone(&services.users),
            tweets: Arc::clone(&services.tweets),
        });

    let tweet_routes = Router::new()
        .route("/tweets", post(tweets::create_tweet))
        .route("/tweets/{id}", get(tweets::get_tweet).delete(tweets::delete_tweet))
        .route("/feed", get(tweets::feed))
        .with_state(tweets::TweetHandlerState {
            tweets: Arc::clone(&services.tweets),
        });

    let block_routes = Router::new()
        .route("/", get(blocks::list_blocked).post(blocks::block_user))
        .route("/{blocked_id}", delete(blocks::unblock_user))
        .with_state(blocks::BlockHandlerState {
            blocks: Arc::clone(&services.blocks),
        });

    let gym_routes = Router::new()
        .route("/", get(gyms::list_gyms).post(gyms::create_gym))
        .route("/{id}", get(gyms::get_gym))
        .with_state(gyms::GymHandlerState {
            gyms: Arc::clone(&services.gyms),
        });

    let api_v1 = Router::new()
        .nest("/events", event_routes)
        .nest("/users", user_routes)
        .nest("/blocks", block_routes)
        .nest("/gyms", gym_routes)
        .merge(tweet_routes);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .nest("/api/v1", api_v1);

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
