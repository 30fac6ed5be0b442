//! Event dispatcher
//!
//! Services publish through the dispatcher rather than the bus directly so
//! the deployment can choose between awaiting handlers inside the request
//! (`inline`) and handing events to a background worker (`queued`).

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::event_bus::{EventBusError, SharedEventBus};
use crate::domain::DomainEvent;
use crate::infrastructure::server::ShutdownSignal;

/// How `dispatch` delivers events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Await every handler; handler failures fail the dispatch.
    #[default]
    Inline,
    /// Enqueue and return; a worker publishes and logs failures.
    Queued,
}

#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Handler(#[from] EventBusError),

    #[error("event queue is closed, {event_type} was not dispatched")]
    QueueClosed { event_type: &'static str },
}

/// Front door for publishing domain events
pub struct EventDispatcher {
    bus: SharedEventBus,
    queue: Option<mpsc::Sender<DomainEvent>>,
}

impl EventDispatcher {
    pub fn inline(bus: SharedEventBus) -> Self {
        Self { bus, queue: None }
    }

    /// Start a queued dispatcher. The returned worker drains the queue after
    /// `shutdown` fires and then exits.
    pub fn queued(
        bus: SharedEventBus,
        capacity: usize,
        shutdown: ShutdownSignal,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(Arc::clone(&bus), receiver, shutdown));
        info!(capacity, "Queued event dispatcher started");
        (
            Self {
                bus,
                queue: Some(sender),
            },
            worker,
        )
    }

    pub fn mode(&self) -> DispatchMode {
        if self.queue.is_some() {
            DispatchMode::Queued
        } else {
            DispatchMode::Inline
        }
    }

    pub fn bus(&self) -> &SharedEventBus {
        &self.bus
    }

    /// Deliver `event` according to the configured mode.
    pub async fn dispatch(&self, event: DomainEvent) -> Result<(), DispatchError> {
        let Some(queue) = &self.queue else {
            return Ok(self.bus.publish(event).await?);
        };

        let event_type = event.event_type();
        queue
            .send(event)
            .await
            .map_err(|_| DispatchError::QueueClosed { event_type })?;
        debug!(event_type, "Event enqueued");
        Ok(())
    }

    /// Publish inline and wait for every handler regardless of mode.
    pub async fn dispatch_and_wait(&self, event: DomainEvent) -> Result<(), DispatchError> {
        Ok(self.bus.publish(event).await?)
    }
}

async fn run_worker(
    bus: SharedEventBus,
    mut receiver: mpsc::Receiver<DomainEvent>,
    shutdown: ShutdownSignal,
) {
    loop {
        tokio::select! {
            next = receiver.recv() => match next {
                Some(event) => publish_logged(&bus, event).await,
                None => break,
            },
            _ = shutdown.wait() => {
                receiver.close();
                let mut drained = 0usize;
                while let Some(event) = receiver.recv().await {
                    publish_logged(&bus, event).await;
                    drained += 1;
                }
                info!(drained, "Event queue drained");
                break;
            }
        }
    }
    info!("Queued event dispatcher stopped");
}

async fn publish_logged(bus: &SharedEventBus, event: DomainEvent) {
    let event_type = event.event_type();
    if let Err(e) = bus.publish(event).await {
        // Nobody awaits queued events; the bus already logged each handler.
        error!(event_type, error = %e, "Queued event failed");
    }
}

/// Shared dispatcher type
pub type SharedEventDispatcher = Arc<EventDispatcher>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::{EventBus, HandlerError};
    use crate::domain::events::TweetDeletedEvent;
    use crate::domain::EventKind;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Notify;
    use uuid::Uuid;

    fn tweet_deleted() -> DomainEvent {
        DomainEvent::TweetDeleted(TweetDeletedEvent {
            tweet_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        })
    }

    fn failing_bus() -> SharedEventBus {
        let bus = EventBus::new();
        bus.subscribe_fn(EventKind::TweetDeleted, "fails", |_| async {
            Err(HandlerError::msg("notification gateway down"))
        });
        Arc::new(bus)
    }

    fn counting_bus(calls: &Arc<AtomicUsize>) -> SharedEventBus {
        let bus = EventBus::new();
        let calls = Arc::clone(calls);
        bus.subscribe_fn(EventKind::TweetDeleted, "counts", move |_| {
            let calls = Arc::clone(&calls);
            async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        Arc::new(bus)
    }

    #[tokio::test]
    async fn inline_dispatch_propagates_handler_failure() {
        let dispatcher = EventDispatcher::inline(failing_bus());
        assert_eq!(dispatcher.mode(), DispatchMode::Inline);

        let err = dispatcher.dispatch(tweet_deleted()).await.unwrap_err();
        assert!(matches!(err, DispatchError::Handler(ref e) if e.handler_index == 0));
    }

    #[tokio::test]
    async fn queued_dispatch_returns_before_handlers_fail() {
        let gate = Arc::new(Notify::new());
        let failures = Arc::new(AtomicUsize::new(0));
        let bus = EventBus::new();
        {
            let gate = Arc::clone(&gate);
            let failures = Arc::clone(&failures);
            bus.subscribe_fn(EventKind::TweetDeleted, "gated", move |_| {
                let gate = Arc::clone(&gate);
                let failures = Arc::clone(&failures);
                async move {
                    gate.notified().await;
                    failures.fetch_add(1, Ordering::SeqCst);
                    Err(HandlerError::msg("notification gateway down"))
                }
            });
        }

        let shutdown = ShutdownSignal::new();
        let (dispatcher, worker) = EventDispatcher::queued(Arc::new(bus), 8, shutdown.clone());
        assert_eq!(dispatcher.mode(), DispatchMode::Queued);

        // The handler is still parked on the gate, so the Ok cannot come from it.
        dispatcher.dispatch(tweet_deleted()).await.unwrap();
        assert_eq!(failures.load(Ordering::SeqCst), 0);

        gate.notify_one();
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(2), worker)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(failures.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn dispatch_and_wait_is_inline_even_when_queued() {
        let shutdown = ShutdownSignal::new();
        let (dispatcher, worker) = EventDispatcher::queued(failing_bus(), 8, shutdown.clone());

        assert!(dispatcher.dispatch_and_wait(tweet_deleted()).await.is_err());

        shutdown.trigger();
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn worker_drains_queue_on_shutdown() {
        let calls = Arc::new(AtomicUsize::new(0));
        let shutdown = ShutdownSignal::new();
        let (dispatcher, worker) = EventDispatcher::queued(counting_bus(&calls), 16, shutdown.clone());

        for _ in 0..5 {
            dispatcher.dispatch(tweet_deleted()).await.unwrap();
        }
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(2), worker)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn dispatch_after_worker_stopped_reports_closed_queue() {
        let calls = Arc::new(AtomicUsize::new(0));
        let shutdown = ShutdownSignal::new();
        let (dispatcher, worker) = EventDispatcher::queued(counting_bus(&calls), 4, shutdown.clone());

        shutdown.trigger();
        worker.await.unwrap();

        let err = dispatcher.dispatch(tweet_deleted()).await.unwrap_err();
        assert!(matches!(err, DispatchError::QueueClosed { event_type: "TweetDeleted" }));
    }

    #[test]
    fn dispatch_mode_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: DispatchMode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"queued\"").unwrap();
        assert_eq!(parsed.mode, DispatchMode::Queued);
    }
}
