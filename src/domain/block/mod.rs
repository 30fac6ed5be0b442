//! User-blocking relationships

pub mod model;
pub mod repository;

pub use model::Block;
pub use repository::BlockRepository;
