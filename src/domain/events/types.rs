//! Domain events
//!
//! Facts about state changes that already committed. Each variant carries
//! its own typed payload; the fieldless [`EventKind`] is the discriminator
//! used for handler registration.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Human-readable one-line description of an event, used for logging.
pub trait Summarize {
    fn summary(&self) -> String;
}

/// Discriminator of a [`DomainEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    UserCreated,
    UserProfileUpdated,
    UserDeleted,
    TweetCreated,
    TweetDeleted,
    UserBlocked,
    UserUnblocked,
    GymCreated,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::UserCreated,
        EventKind::UserProfileUpdated,
        EventKind::UserDeleted,
        EventKind::TweetCreated,
        EventKind::TweetDeleted,
        EventKind::UserBlocked,
        EventKind::UserUnblocked,
        EventKind::GymCreated,
    ];

    /// The `eventType` string of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::UserCreated => "UserCreated",
            EventKind::UserProfileUpdated => "UserProfileUpdated",
            EventKind::UserDeleted => "UserDeleted",
            EventKind::TweetCreated => "TweetCreated",
            EventKind::TweetDeleted => "TweetDeleted",
            EventKind::UserBlocked => "UserBlocked",
            EventKind::UserUnblocked => "UserUnblocked",
            EventKind::GymCreated => "GymCreated",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event published after a state-changing use case succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", content = "data")]
pub enum DomainEvent {
    UserCreated(UserCreatedEvent),
    UserProfileUpdated(UserProfileUpdatedEvent),
    UserDeleted(UserDeletedEvent),
    TweetCreated(TweetCreatedEvent),
    TweetDeleted(TweetDeletedEvent),
    UserBlocked(UserBlockedEvent),
    UserUnblocked(UserUnblockedEvent),
    GymCreated(GymCreatedEvent),
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomainEvent::UserCreated(_) => EventKind::UserCreated,
            DomainEvent::UserProfileUpdated(_) => EventKind::UserProfileUpdated,
            DomainEvent::UserDeleted(_) => EventKind::UserDeleted,
            DomainEvent::TweetCreated(_) => EventKind::TweetCreated,
            DomainEvent::TweetDeleted(_) => EventKind::TweetDeleted,
            DomainEvent::UserBlocked(_) => EventKind::UserBlocked,
            DomainEvent::UserUnblocked(_) => EventKind::UserUnblocked,
            DomainEvent::GymCreated(_) => EventKind::GymCreated,
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.kind().as_str()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::UserCreated(e) => e.occurred_at,
            DomainEvent::UserProfileUpdated(e) => e.occurred_at,
            DomainEvent::UserDeleted(e) => e.occurred_at,
            DomainEvent::TweetCreated(e) => e.occurred_at,
            DomainEvent::TweetDeleted(e) => e.occurred_at,
            DomainEvent::UserBlocked(e) => e.occurred_at,
            DomainEvent::UserUnblocked(e) => e.occurred_at,
            DomainEvent::GymCreated(e) => e.occurred_at,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            DomainEvent::UserCreated(e) => e.summary(),
            DomainEvent::UserProfileUpdated(e) => e.summary(),
            DomainEvent::UserDeleted(e) => e.summary(),
            DomainEvent::TweetCreated(e) => e.summary(),
            DomainEvent::TweetDeleted(e) => e.summary(),
            DomainEvent::UserBlocked(e) => e.summary(),
            DomainEvent::UserUnblocked(e) => e.summary(),
            DomainEvent::GymCreated(e) => e.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCreatedEvent {
    pub user_id: Uuid,
    pub username: String,
    pub occurred_at: DateTime<Utc>,
}

impl Summarize for UserCreatedEvent {
    fn summary(&self) -> String {
        format!("user_id={} username={}", self.user_id, self.username)
    }
}

/// A single profile field that changed, with its prior and new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfileUpdatedEvent {
    pub user_id: Uuid,
    pub changes: Vec<FieldChange>,
    pub occurred_at: DateTime<Utc>,
}

impl Summarize for UserProfileUpdatedEvent {
    fn summary(&self) -> String {
        let fields: Vec<&str> = self.changes.iter().map(|c| c.field.as_str()).collect();
        format!("user_id={} changed=[{}]", self.user_id, fields.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDeletedEvent {
    pub user_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl Summarize for UserDeletedEvent {
    fn summary(&self) -> String {
        format!("user_id={}", self.user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetCreatedEvent {
    pub tweet_id: Uuid,
    pub author_id: Uuid,
    pub gym_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
}

impl Summarize for TweetCreatedEvent {
    fn summary(&self) -> String {
        match self.gym_id {
            Some(gym_id) => format!(
                "tweet_id={} author_id={} gym_id={}",
                self.tweet_id, self.author_id, gym_id
            ),
            None => format!("tweet_id={} author_id={}", self.tweet_id, self.author_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetDeletedEvent {
    pub tweet_id: Uuid,
    pub author_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl Summarize for TweetDeletedEvent {
    fn summary(&self) -> String {
        format!("tweet_id={} author_id={}", self.tweet_id, self.author_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBlockedEvent {
    pub blocker_id: Uuid,
    pub blocked_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl Summarize for UserBlockedEvent {
    fn summary(&self) -> String {
        format!("blocker_id={} blocked_id={}", self.blocker_id, self.blocked_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserUnblockedEvent {
    pub blocker_id: Uuid,
    pub blocked_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

impl Summarize for UserUnblockedEvent {
    fn summary(&self) -> String {
        format!("blocker_id={} blocked_id={}", self.blocker_id, self.blocked_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GymCreatedEvent {
    pub gym_id: Uuid,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

impl Summarize for GymCreatedEvent {
    fn summary(&self) -> String {
        format!("gym_id={} name={}", self.gym_id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_matches_kind() {
        let event = DomainEvent::TweetDeleted(TweetDeletedEvent {
            tweet_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
        });
        assert_eq!(event.kind(), EventKind::TweetDeleted);
        assert_eq!(event.event_type(), "TweetDeleted");
    }

    #[test]
    fn every_kind_has_a_non_empty_type() {
        for kind in EventKind::ALL {
            assert!(!kind.as_str().is_empty());
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn serializes_with_event_type_tag() {
        let occurred_at = Utc::now();
        let event = DomainEvent::GymCreated(GymCreatedEvent {
            gym_id: Uuid::nil(),
            name: "Boulderwelt".to_string(),
            occurred_at,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["eventType"], "GymCreated");
        assert_eq!(json["data"]["name"], "Boulderwelt");
    }

    #[test]
    fn profile_summary_lists_changed_fields() {
        let event = UserProfileUpdatedEvent {
            user_id: Uuid::nil(),
            changes: vec![
                FieldChange {
                    field: "display_name".into(),
                    old: None,
                    new: Some("Adam".into()),
                },
                FieldChange {
                    field: "bio".into(),
                    old: Some("old".into()),
                    new: None,
                },
            ],
            occurred_at: Utc::now(),
        };
        assert!(event.summary().ends_with("changed=[display_name,bio]"));
    }
}
