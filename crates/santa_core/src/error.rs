//! Error types for store and assignment operations

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SantaError {
    #[error("event_id={event_id:?} not found in system")]
    EventNotFound { event_id: String },

    #[error("player={player:?} not found in event_id={event_id:?}")]
    PlayerNotFound { event_id: String, player: String },

    #[error("event_id={event_id:?} is no longer accepting players")]
    EventNotOpen { event_id: String },

    #[error("event_id={event_id:?} has expired and cannot be closed")]
    EventExpired { event_id: String },

    #[error("at least 2 participants are required, got {count}")]
    InsufficientParticipants { count: usize },

    #[error("could not draw a valid assignment after {attempts} attempt(s)")]
    AssignmentExhausted { attempts: u32 },

    #[error("player={player:?} is already on the roster")]
    DuplicateParticipant { player: String },
}

impl SantaError {
    pub(crate) fn not_found(event_id: &str) -> Self {
        Self::EventNotFound {
            event_id: event_id.to_string(),
        }
    }

    /// True for errors caused by referencing something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EventNotFound { .. } | Self::PlayerNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;
