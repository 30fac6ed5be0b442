//! Infrastructure layer - external concerns

pub mod server;
pub mod storage;

pub use server::{ShutdownCoordinator, ShutdownSignal};
pub use storage::InMemoryStorage;
