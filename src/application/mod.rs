pub mod error;
pub mod events;
pub mod handlers;
pub mod services;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use events::{
    create_event_bus, DispatchError, DispatchMode, EventBus, EventBusError, EventDispatcher,
    EventHandler, HandlerError, SharedEventBus, SharedEventDispatcher,
};
pub use handlers::{register_default_handlers, ActivityLog, HandlerDependencies};
pub use services::{BlockService, GymService, TweetService, UserService};
