//! Use cases. Each one commits its state change through a repository and
//! then dispatches the matching domain event.

mod block;
mod gym;
mod tweet;
mod user;

pub use block::BlockService;
pub use gym::GymService;
pub use tweet::{TweetService, MAX_TWEET_LENGTH};
pub use user::UserService;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use crate::application::events::{EventBus, EventDispatcher};
    use crate::domain::{DomainEvent, EventKind};
    use crate::infrastructure::InMemoryStorage;

    /// Inline dispatcher whose bus records every published event.
    pub fn recording_dispatcher() -> (Arc<EventDispatcher>, Arc<Mutex<Vec<DomainEvent>>>) {
        let bus = EventBus::new();
        let published: Arc<Mutex<Vec<DomainEvent>>> = Arc::default();
        for kind in EventKind::ALL {
            let published = Arc::clone(&published);
            bus.subscribe_fn(kind, "recorder", move |event| {
                let published = Arc::clone(&published);
                async move {
                    published.lock().unwrap().push((*event).clone());
                    Ok(())
                }
            });
        }
        (Arc::new(EventDispatcher::inline(Arc::new(bus))), published)
    }

    pub fn storage() -> Arc<InMemoryStorage> {
        Arc::new(InMemoryStorage::new())
    }
}
