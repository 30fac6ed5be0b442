//! Side-effect handlers subscribed to the event bus at bootstrap

mod activity_log;
mod block_cleanup;
mod tweet_cleanup;
mod tweet_counter;

use std::sync::Arc;

use tracing::info;

pub use activity_log::{ActivityEntry, ActivityLog, ActivityLogHandler};
pub use block_cleanup::BlockCleanupHandler;
pub use tweet_cleanup::TweetCleanupHandler;
pub use tweet_counter::TweetCounterHandler;

use crate::application::events::{EventBus, SharedEventHandler};
use crate::domain::{BlockRepository, EventKind, TweetRepository, UserRepository};

/// Collaborators needed by the default handlers
pub struct HandlerDependencies {
    pub users: Arc<dyn UserRepository>,
    pub tweets: Arc<dyn TweetRepository>,
    pub blocks: Arc<dyn BlockRepository>,
    pub activity: Arc<ActivityLog>,
}

/// Subscribe the built-in handlers. Call once during bootstrap.
pub fn register_default_handlers(bus: &EventBus, deps: HandlerDependencies) {
    let counter: SharedEventHandler = Arc::new(TweetCounterHandler::new(deps.users));
    bus.subscribe_shared(EventKind::TweetCreated, Arc::clone(&counter));
    bus.subscribe_shared(EventKind::TweetDeleted, counter);

    bus.subscribe(EventKind::UserDeleted, BlockCleanupHandler::new(deps.blocks));
    bus.subscribe(EventKind::UserDeleted, TweetCleanupHandler::new(deps.tweets));

    let activity: SharedEventHandler = Arc::new(ActivityLogHandler::new(deps.activity));
    for kind in EventKind::ALL {
        bus.subscribe_shared(kind, Arc::clone(&activity));
    }

    info!(
        event_types = bus.handler_counts().len(),
        "Default event handlers registered"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryStorage;

    #[test]
    fn registers_activity_log_for_every_kind() {
        let storage = Arc::new(InMemoryStorage::new());
        let bus = EventBus::new();
        register_default_handlers(
            &bus,
            HandlerDependencies {
                users: storage.clone(),
                tweets: storage.clone(),
                blocks: storage,
                activity: Arc::new(ActivityLog::new(4)),
            },
        );

        let counts = bus.handler_counts();
        assert_eq!(counts.len(), EventKind::ALL.len());
        assert_eq!(counts["TweetCreated"], 2);
        assert_eq!(counts["TweetDeleted"], 2);
        assert_eq!(counts["UserDeleted"], 3);
        assert_eq!(counts["GymCreated"], 1);
    }
}
