//! Event store - owns every event of a session and enforces lifecycle rules
//!
//! Roster edits are only accepted while an event is `Open`. Closing runs the
//! assignment engine exactly once; a failed draw leaves the event as it was.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assignment::{self, AssignmentError};
use crate::config::{Config, IdStrategy};
use crate::error::{Result, SantaError};
use crate::event::{Event, EventDraft, EventStatus, SantaMap};
use crate::schedule::ScheduleIndex;

#[derive(Debug)]
pub struct EventStore {
    /// Creation sequence → event; iteration order is listing order.
    events: BTreeMap<u64, Event>,
    /// Event id → creation sequence.
    index: HashMap<String, u64>,
    next_seq: u64,
    schedule: ScheduleIndex,
    rng: StdRng,
    id_strategy: IdStrategy,
    allow_duplicates: bool,
    max_attempts: u32,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl EventStore {
    pub fn new(config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            events: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
            schedule: ScheduleIndex::new(),
            rng,
            id_strategy: config.id_strategy,
            allow_duplicates: config.allow_duplicate_participants,
            max_attempts: config.max_assignment_attempts.max(1),
        }
    }

    /// Create an event and return its id.
    ///
    /// With `close_immediately` the assignment is drawn before anything is
    /// stored, so a failed draw leaves the store untouched.
    pub fn create(&mut self, draft: EventDraft) -> Result<String> {
        let EventDraft {
            name,
            scheduled_at,
            participants,
            close_immediately,
            location,
        } = draft;

        if !self.allow_duplicates {
            if let Some(player) = first_duplicate(&participants) {
                return Err(SantaError::DuplicateParticipant {
                    player: player.to_string(),
                });
            }
        }

        let (status, assignment) = if close_immediately {
            (EventStatus::Closed, self.draw(&participants)?)
        } else {
            (EventStatus::Open, SantaMap::new())
        };

        let seq = self.next_seq;
        let id = self.mint_id(seq);
        self.next_seq += 1;

        info!(
            event_id = %id,
            participants = participants.len(),
            status = status.label(),
            "event created"
        );

        self.schedule.push(scheduled_at, id.clone());
        self.index.insert(id.clone(), seq);
        self.events.insert(
            seq,
            Event {
                id: id.clone(),
                name,
                scheduled_at,
                status,
                participants,
                assignment,
                location,
            },
        );
        Ok(id)
    }

    pub fn get(&self, event_id: &str) -> Result<&Event> {
        self.index
            .get(event_id)
            .and_then(|seq| self.events.get(seq))
            .ok_or_else(|| SantaError::not_found(event_id))
    }

    /// All events in creation order.
    pub fn list(&self) -> Vec<&Event> {
        self.events.values().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn add_player(&mut self, event_id: &str, player: &str) -> Result<()> {
        let allow_duplicates = self.allow_duplicates;
        let event = self.open_event_mut(event_id)?;
        if !allow_duplicates && event.has_participant(player) {
            return Err(SantaError::DuplicateParticipant {
                player: player.to_string(),
            });
        }
        event.participants.push(player.to_string());
        debug!(event_id, player, "player added");
        Ok(())
    }

    /// Remove the first occurrence of `player`; absent names are ignored.
    pub fn remove_player(&mut self, event_id: &str, player: &str) -> Result<()> {
        let event = self.open_event_mut(event_id)?;
        if let Some(pos) = event.participants.iter().position(|p| p == player) {
            event.participants.remove(pos);
            debug!(event_id, player, "player removed");
        }
        Ok(())
    }

    /// Close an open event and draw its assignment. Closing a closed event
    /// is a no-op.
    pub fn close(&mut self, event_id: &str) -> Result<()> {
        let seq = *self
            .index
            .get(event_id)
            .ok_or_else(|| SantaError::not_found(event_id))?;

        let participants = match self.events.get(&seq) {
            Some(event) => match event.status {
                EventStatus::Expired => {
                    return Err(SantaError::EventExpired {
                        event_id: event_id.to_string(),
                    })
                }
                EventStatus::Closed => return Ok(()),
                EventStatus::Open => event.participants.clone(),
            },
            None => return Err(SantaError::not_found(event_id)),
        };

        let assignment = self.draw(&participants)?;
        if let Some(event) = self.events.get_mut(&seq) {
            event.assignment = assignment;
            event.status = EventStatus::Closed;
            info!(event_id, "event closed");
        }
        Ok(())
    }

    /// Remove an event. Unknown ids are ignored.
    pub fn delete(&mut self, event_id: &str) {
        if let Some(seq) = self.index.remove(event_id) {
            self.events.remove(&seq);
            info!(event_id, "event deleted");
        }
    }

    /// Who `player` gives a gift to in a closed event.
    pub fn lookup_assignment(&self, event_id: &str, player: &str) -> Result<&str> {
        let event = self.get(event_id)?;
        let recipient = event
            .recipient_of(player)
            .ok_or_else(|| SantaError::PlayerNotFound {
                event_id: event_id.to_string(),
                player: player.to_string(),
            })?;
        debug!(event_id, player, "assignment looked up");
        Ok(recipient)
    }

    /// Earliest scheduled event that still exists.
    pub fn next_scheduled(&self) -> Option<(DateTime<Utc>, &Event)> {
        let (at, id) = self.schedule.earliest(|id| self.index.contains_key(id))?;
        self.get(id).ok().map(|event| (at, event))
    }

    /// Existing events scheduled at or before `cutoff`, earliest first.
    pub fn scheduled_before(&self, cutoff: DateTime<Utc>) -> Vec<&Event> {
        self.schedule
            .due(cutoff, |id| self.index.contains_key(id))
            .into_iter()
            .filter_map(|(_, id)| self.get(id).ok())
            .collect()
    }

    /// Drop time-index entries of deleted events.
    pub fn compact_schedule(&mut self) {
        let index = &self.index;
        self.schedule.prune(|id| index.contains_key(id));
    }

    fn open_event_mut(&mut self, event_id: &str) -> Result<&mut Event> {
        let event = self
            .index
            .get(event_id)
            .and_then(|seq| self.events.get_mut(seq))
            .ok_or_else(|| SantaError::not_found(event_id))?;
        if !event.status.is_open() {
            return Err(SantaError::EventNotOpen {
                event_id: event_id.to_string(),
            });
        }
        Ok(event)
    }

    /// Run the assignment engine, redrawing up to `max_attempts` times when a
    /// pass dead-ends.
    fn draw(&mut self, participants: &[String]) -> Result<SantaMap> {
        for attempt in 1..=self.max_attempts {
            match assignment::assign(participants, &mut self.rng) {
                Ok(map) => return Ok(map),
                Err(AssignmentError::InsufficientParticipants { count }) => {
                    return Err(SantaError::InsufficientParticipants { count })
                }
                Err(AssignmentError::Exhausted { player }) => {
                    warn!(attempt, player = %player, "assignment draw dead-ended");
                }
            }
        }
        Err(SantaError::AssignmentExhausted {
            attempts: self.max_attempts,
        })
    }

    fn mint_id(&self, seq: u64) -> String {
        match self.id_strategy {
            IdStrategy::Sequential => seq.to_string(),
            IdStrategy::Uuid => loop {
                let id = Uuid::new_v4().to_string();
                if !self.index.contains_key(&id) {
                    break id;
                }
            },
        }
    }
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(String::as_str)
        .find(|name| !seen.insert(*name))
}
