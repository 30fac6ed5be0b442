//! Event introspection DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::handlers::ActivityEntry;

/// Subscribed handlers per event type
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HandlerCountsDto {
    /// `inline` or `queued`
    pub dispatch_mode: String,
    pub total: usize,
    pub handlers: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityEntryDto {
    pub event_type: String,
    pub summary: String,
    pub occurred_at: DateTime<Utc>,
}

impl From<ActivityEntry> for ActivityEntryDto {
    fn from(e: ActivityEntry) -> Self {
        Self {
            event_type: e.event_type.to_string(),
            summary: e.summary,
            occurred_at: e.occurred_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ActivityParams {
    /// Number of entries, newest first
    pub limit: Option<usize>,
}
