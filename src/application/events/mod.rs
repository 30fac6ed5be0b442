//! Application events (pub/sub)
//!
//! Event types are defined in `domain::events`. The handler registry
//! (`EventBus`) and the `EventDispatcher` used by services live here.

pub mod dispatcher;
pub mod event_bus;
pub mod handler;

pub use dispatcher::{DispatchError, DispatchMode, EventDispatcher, SharedEventDispatcher};
pub use event_bus::{create_event_bus, EventBus, EventBusError, SharedEventBus};
pub use handler::{EventHandler, FnHandler, HandlerError, SharedEventHandler};
