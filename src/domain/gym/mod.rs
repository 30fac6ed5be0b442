//! Bouldering gyms

pub mod model;
pub mod repository;

pub use model::{CreateGymDto, Gym};
pub use repository::GymRepository;
