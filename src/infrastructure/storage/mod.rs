//! Storage backends for the repository interfaces

mod memory;

pub use memory::InMemoryStorage;
