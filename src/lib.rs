//! # Crux
//!
//! Social service for boulderers built around an in-process event bus:
//! services commit their primary change and publish a domain event, and
//! side effects (tweet counters, block cleanup, activity log) run in
//! handlers subscribed per event type.
//!
//! ## Architecture
//!
//! - **domain**: entities, repository traits, domain events
//! - **application**: event bus, dispatcher, handlers and services
//! - **infrastructure**: in-memory storage, graceful shutdown
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: wiring and runtime lifecycle

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use application::{create_event_bus, EventBus, EventHandler, HandlerError, SharedEventBus};
pub use config::{default_config_path, AppConfig};
pub use domain::{DomainEvent, EventKind};
pub use interfaces::http::create_api_router;
