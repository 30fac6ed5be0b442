pub mod blocks;
pub mod events;
pub mod gyms;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod tweets;
pub mod users;
