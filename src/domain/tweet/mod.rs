//! Tweet aggregate (climbing activity posts)

pub mod model;
pub mod repository;

pub use model::{CreateTweetDto, Tweet};
pub use repository::TweetRepository;
