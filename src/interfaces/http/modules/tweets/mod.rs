//! Tweets module: activity posts and the feed

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
