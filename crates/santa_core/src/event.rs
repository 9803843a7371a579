//! Event model - one Secret Santa exchange and its lifecycle status

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Giver → recipient lookup produced when an event closes.
pub type SantaMap = BTreeMap<String, String>;

/// Lifecycle of an event.
///
/// Only `Open` events accept roster changes. `Closed` events carry an
/// assignment. `Expired` is part of the model but nothing in this crate
/// moves an event into it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Open,
    Closed,
    Expired,
}

impl Default for EventStatus {
    fn default() -> Self {
        EventStatus::Open
    }
}

impl EventStatus {
    /// Upper-case label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Expired => "EXPIRED",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: EventStatus,
    pub participants: Vec<String>,
    pub assignment: SantaMap,
    #[serde(default)]
    pub location: String,
}

impl Event {
    /// First `width` characters of the id, for tabular listings.
    pub fn short_id(&self, width: usize) -> &str {
        match self.id.char_indices().nth(width) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    pub fn has_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p == name)
    }

    pub fn recipient_of(&self, player: &str) -> Option<&str> {
        self.assignment.get(player).map(String::as_str)
    }
}

/// Everything the store needs to create an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub scheduled_at: DateTime<Utc>,
    pub participants: Vec<String>,
    pub close_immediately: bool,
    pub location: String,
}

impl EventDraft {
    pub fn new(name: impl Into<String>, scheduled_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            scheduled_at,
            participants: Vec::new(),
            close_immediately: false,
            location: String::new(),
        }
    }

    pub fn participants<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.participants = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn close_immediately(mut self, close: bool) -> Self {
        self.close_immediately = close;
        self
    }
}
