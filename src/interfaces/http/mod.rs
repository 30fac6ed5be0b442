//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, validated JSON
//! - `acting_user`: `X-User-Id` extractor
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod acting_user;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, ApiServices};
