//! Activity log
//!
//! Logs every domain event and keeps the most recent ones in a bounded
//! buffer for the introspection endpoint.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::application::events::{EventHandler, HandlerError};
use crate::domain::DomainEvent;

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub event_type: &'static str,
    pub summary: String,
    pub occurred_at: DateTime<Utc>,
}

pub struct ActivityLog {
    capacity: usize,
    entries: RwLock<VecDeque<ActivityEntry>>,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub async fn record(&self, event: &DomainEvent) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.write().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(ActivityEntry {
            event_type: event.event_type(),
            summary: event.summary(),
            occurred_at: event.occurred_at(),
        });
    }

    /// Newest first.
    pub async fn recent(&self, limit: usize) -> Vec<ActivityEntry> {
        self.entries
            .read()
            .await
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }
}

pub struct ActivityLogHandler {
    log: Arc<ActivityLog>,
}

impl ActivityLogHandler {
    pub fn new(log: Arc<ActivityLog>) -> Self {
        Self { log }
    }
}

#[async_trait]
impl EventHandler for ActivityLogHandler {
    fn name(&self) -> &str {
        "activity_log"
    }

    async fn handle(&self, event: Arc<DomainEvent>) -> Result<(), HandlerError> {
        info!(
            event_type = event.event_type(),
            occurred_at = %event.occurred_at(),
            summary = %event.summary(),
            "Domain event"
        );
        self.log.record(&event).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::GymCreatedEvent;
    use uuid::Uuid;

    fn gym(name: &str) -> DomainEvent {
        DomainEvent::GymCreated(GymCreatedEvent {
            gym_id: Uuid::new_v4(),
            name: name.to_string(),
            occurred_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn keeps_only_the_newest_entries() {
        let log = ActivityLog::new(2);
        for name in ["a", "b", "c"] {
            log.record(&gym(name)).await;
        }

        let recent = log.recent(10).await;
        assert_eq!(recent.len(), 2);
        assert!(recent[0].summary.ends_with("name=c"));
        assert!(recent[1].summary.ends_with("name=b"));
    }

    #[tokio::test]
    async fn handler_records_events() {
        let log = Arc::new(ActivityLog::new(8));
        let handler = ActivityLogHandler::new(log.clone());

        handler.handle(Arc::new(gym("Flash"))).await.unwrap();

        let recent = log.recent(1).await;
        assert_eq!(recent[0].event_type, "GymCreated");
    }

    #[tokio::test]
    async fn zero_capacity_records_nothing() {
        let log = ActivityLog::new(0);
        log.record(&gym("x")).await;
        assert!(log.recent(5).await.is_empty());
    }
}
