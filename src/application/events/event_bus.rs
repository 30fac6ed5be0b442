//! Event Bus dispatching domain events to registered handlers
//!
//! Handlers are registered per [`EventKind`] during bootstrap. `publish`
//! runs every handler of the event's kind concurrently inside the calling
//! task, waits for all of them to settle, and fails if any handler failed.

use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use futures_util::future::join_all;
use futures_util::FutureExt;
use thiserror::Error;
use tracing::{debug, error, info};

use super::handler::{EventHandler, FnHandler, HandlerError, SharedEventHandler};
use crate::domain::{DomainEvent, EventKind};

/// A publish in which at least one handler failed.
///
/// Carries the failure of the lowest-indexed failing handler.
#[derive(Debug, Clone, Error)]
#[error("handler #{handler_index} ({handler_name}) failed for {event_type}: {source}")]
pub struct EventBusError {
    pub event_type: &'static str,
    pub handler_index: usize,
    pub handler_name: String,
    pub handler_count: usize,
    pub failed_count: usize,
    #[source]
    pub source: HandlerError,
}

/// In-process event bus
#[derive(Default)]
pub struct EventBus {
    handlers: DashMap<EventKind, Vec<SharedEventHandler>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the handlers of `kind`.
    pub fn subscribe<H>(&self, kind: EventKind, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.subscribe_shared(kind, Arc::new(handler));
    }

    /// Register one handler instance under `kind`. The same instance may be
    /// registered under several kinds.
    pub fn subscribe_shared(&self, kind: EventKind, handler: SharedEventHandler) {
        let name = handler.name().to_string();
        let mut entry = self.handlers.entry(kind).or_default();
        entry.push(handler);
        debug!(
            event_type = kind.as_str(),
            handler = %name,
            handler_index = entry.len() - 1,
            "Event handler subscribed"
        );
    }

    /// Register an async closure under `kind`.
    pub fn subscribe_fn<F, Fut>(&self, kind: EventKind, name: impl Into<String>, f: F)
    where
        F: Fn(Arc<DomainEvent>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.subscribe(kind, FnHandler::new(name, f));
    }

    pub async fn publish(&self, event: DomainEvent) -> Result<(), EventBusError> {
        self.publish_shared(Arc::new(event)).await
    }

    /// Publish an already shared event; every handler receives a clone of this `Arc`.
    pub async fn publish_shared(&self, event: Arc<DomainEvent>) -> Result<(), EventBusError> {
        let event_type = event.event_type();

        // Snapshot so no map guard is held across an await.
        let handlers: Vec<SharedEventHandler> = self
            .handlers
            .get(&event.kind())
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        if handlers.is_empty() {
            debug!(event_type, "No handlers registered for event");
            return Ok(());
        }

        let handler_count = handlers.len();
        debug!(
            event_type,
            handler_count,
            summary = %event.summary(),
            "Publishing event"
        );

        let started = Instant::now();
        let invocations = handlers.iter().enumerate().map(|(index, handler)| {
            let event = Arc::clone(&event);
            async move {
                let outcome = AssertUnwindSafe(handler.handle(event))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| Err(HandlerError::from_panic(panic)));

                match &outcome {
                    Ok(()) => debug!(
                        event_type,
                        handler_index = index,
                        handler = handler.name(),
                        "Event handler completed"
                    ),
                    Err(e) => error!(
                        event_type,
                        handler_index = index,
                        handler = handler.name(),
                        error = %e,
                        "Event handler failed"
                    ),
                }
                outcome
            }
        });

        let results = join_all(invocations).await;
        metrics::histogram!("event_publish_duration_seconds", "event_type" => event_type)
            .record(started.elapsed().as_secs_f64());

        let failed_count = results.iter().filter(|r| r.is_err()).count();
        let first_failure = results
            .into_iter()
            .enumerate()
            .find_map(|(index, result)| result.err().map(|e| (index, e)));

        match first_failure {
            Some((handler_index, source)) => {
                metrics::counter!("event_publish_failures_total", "event_type" => event_type)
                    .increment(1);
                error!(
                    event_type,
                    handler_count,
                    failed_count,
                    handler_index,
                    error = %source,
                    "Event publish failed"
                );
                Err(EventBusError {
                    event_type,
                    handler_index,
                    handler_name: handlers[handler_index].name().to_string(),
                    handler_count,
                    failed_count,
                    source,
                })
            }
            None => {
                metrics::counter!("events_published_total", "event_type" => event_type)
                    .increment(1);
                info!(event_type, handler_count, "Event published");
                Ok(())
            }
        }
    }

    /// Registered handler count per event type, for introspection only.
    pub fn handler_counts(&self) -> BTreeMap<&'static str, usize> {
        self.handlers
            .iter()
            .map(|entry| (entry.key().as_str(), entry.value().len()))
            .collect()
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map(|e| e.len()).unwrap_or(0)
    }
}

/// Shared event bus type
pub type SharedEventBus = Arc<EventBus>;

/// Create a shared event bus
pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}
