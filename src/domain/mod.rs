//! Domain layer: entities, repository interfaces and domain events.

pub mod block;
pub mod events;
pub mod gym;
pub mod tweet;
pub mod user;

pub use block::{Block, BlockRepository};
pub use events::{DomainEvent, EventKind};
pub use gym::{CreateGymDto, Gym, GymRepository};
pub use tweet::{CreateTweetDto, Tweet, TweetRepository};
pub use user::{CreateUserDto, UpdateProfileDto, User, UserRepository};

pub use crate::shared::{DomainError, DomainResult};
