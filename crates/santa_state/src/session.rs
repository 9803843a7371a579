//! Session driver - runs the dialog machine against the event store
//!
//! Each turn either reads one line from the [`Console`] or performs one
//! store call and renders its outcome. Store errors are rendered and the
//! session carries on; only console I/O failures stop it.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use santa_core::{Event, EventDraft, EventStore, SantaError, ScheduleConfig};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::machine::{Action, DialogMachine, NewEventRequest, Prompt, Signal, Step};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("console I/O failed: {0}")]
    Console(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Already-validated data handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    Events(Vec<&'a Event>),
    Event(&'a Event),
    Created(&'a Event),
    Updated(&'a Event),
    Closed(&'a Event),
    Deleted {
        event_id: &'a str,
    },
    Santa {
        event_id: &'a str,
        player: &'a str,
        recipient: &'a str,
    },
    Error(&'a SantaError),
    InvalidInput,
    Goodbye,
}

/// Line input and rendering, supplied by the front end.
pub trait Console {
    /// Show `prompt` and read one line. `None` means input is exhausted.
    fn read_line(&mut self, prompt: &Prompt) -> std::io::Result<Option<String>>;

    fn render(&mut self, view: View<'_>) -> std::io::Result<()>;
}

pub struct Session<C: Console> {
    store: EventStore,
    machine: DialogMachine,
    console: C,
    schedule: ScheduleConfig,
    finished: bool,
}

impl<C: Console> Session<C> {
    pub fn new(store: EventStore, console: C, schedule: ScheduleConfig) -> Self {
        Self {
            store,
            machine: DialogMachine::new(),
            console,
            schedule,
            finished: false,
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn machine(&self) -> &DialogMachine {
        &self.machine
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn into_parts(self) -> (EventStore, C) {
        (self.store, self.console)
    }

    /// Run turns until the dialog reaches `Quit`.
    pub fn run(&mut self) -> Result<()> {
        info!("session started");
        while self.turn()? {}
        info!(events = self.store.len(), "session ended");
        Ok(())
    }

    /// Run one turn. Returns `false` once the session is over.
    pub fn turn(&mut self) -> Result<bool> {
        match self.machine.next_step() {
            Step::Prompt(prompt) => {
                let transition = match self.console.read_line(&prompt)? {
                    Some(line) => self.machine.handle_input(&line),
                    None => self.machine.end_of_input(),
                };
                debug!(from = ?transition.from, to = ?transition.to, "dialog transition");
                if transition.signal == Some(Signal::InvalidInput) {
                    self.console.render(View::InvalidInput)?;
                }
                Ok(true)
            }
            Step::Perform(action) => {
                self.perform(action)?;
                self.machine.action_completed();
                Ok(true)
            }
            Step::Finish => {
                if !self.finished {
                    self.finished = true;
                    self.console.render(View::Goodbye)?;
                }
                Ok(false)
            }
        }
    }

    fn perform(&mut self, action: Action) -> Result<()> {
        debug!(?action, "performing action");
        let Self {
            store,
            console,
            schedule,
            ..
        } = self;

        match action {
            Action::ListEvents => console.render(View::Events(store.list()))?,
            Action::CreateEvent(request) => {
                let draft = draft_from(request, scheduled_at(schedule, Utc::now()));
                let created = store.create(draft).and_then(|id| store.get(&id));
                match created {
                    Ok(event) => console.render(View::Created(event))?,
                    Err(err) => console.render(View::Error(&err))?,
                }
            }
            Action::GetEvent { event_id } => match store.get(&event_id) {
                Ok(event) => console.render(View::Event(event))?,
                Err(err) => console.render(View::Error(&err))?,
            },
            Action::AddPlayer { event_id, player } => {
                let updated = store
                    .add_player(&event_id, &player)
                    .and_then(|()| store.get(&event_id));
                match updated {
                    Ok(event) => console.render(View::Updated(event))?,
                    Err(err) => console.render(View::Error(&err))?,
                }
            }
            Action::RemovePlayer { event_id, player } => {
                let updated = store
                    .remove_player(&event_id, &player)
                    .and_then(|()| store.get(&event_id));
                match updated {
                    Ok(event) => console.render(View::Updated(event))?,
                    Err(err) => console.render(View::Error(&err))?,
                }
            }
            Action::CloseEvent { event_id } => {
                let closed = store.close(&event_id).and_then(|()| store.get(&event_id));
                match closed {
                    Ok(event) => console.render(View::Closed(event))?,
                    Err(err) => console.render(View::Error(&err))?,
                }
            }
            Action::DeleteEvent { event_id } => {
                store.delete(&event_id);
                console.render(View::Deleted {
                    event_id: &event_id,
                })?
            }
            Action::QuerySanta { event_id, player } => {
                match store.lookup_assignment(&event_id, &player) {
                    Ok(recipient) => console.render(View::Santa {
                        event_id: &event_id,
                        player: &player,
                        recipient,
                    })?,
                    Err(err) => console.render(View::Error(&err))?,
                }
            }
        }
        Ok(())
    }
}

fn draft_from(request: NewEventRequest, scheduled_at: DateTime<Utc>) -> EventDraft {
    EventDraft::new(request.name, scheduled_at)
        .participants(request.participants)
        .location(request.location)
        .close_immediately(!request.open_to_public)
}

/// `now` plus a random lead time drawn from the configured window.
///
/// A window too large for the calendar falls back to `now`.
fn scheduled_at(window: &ScheduleConfig, now: DateTime<Utc>) -> DateTime<Utc> {
    let min = window.lead_minutes_min.max(0);
    let max = window.lead_minutes_max.max(min);
    let minutes = rand::thread_rng().gen_range(min..=max);
    match Duration::try_minutes(minutes).and_then(|lead| now.checked_add_signed(lead)) {
        Some(at) => at,
        None => {
            warn!(minutes, "lead time out of range, scheduling at current time");
            now
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheduled_at_stays_in_window() {
        let now = Utc::now();
        let window = ScheduleConfig::default();
        for _ in 0..100 {
            let at = scheduled_at(&window, now);
            assert!(at >= now + Duration::minutes(5));
            assert!(at <= now + Duration::minutes(15));
        }
    }

    #[test]
    fn test_scheduled_at_with_degenerate_window() {
        let now = Utc::now();
        let window = ScheduleConfig {
            lead_minutes_min: 10,
            lead_minutes_max: 3,
        };
        assert_eq!(scheduled_at(&window, now), now + Duration::minutes(10));
    }

    #[test]
    fn test_scheduled_at_with_unrepresentable_window() {
        let now = Utc::now();
        let window = ScheduleConfig {
            lead_minutes_min: 1_000_000_000_000,
            lead_minutes_max: 1_000_000_000_000,
        };
        assert_eq!(scheduled_at(&window, now), now);

        let window = ScheduleConfig {
            lead_minutes_min: i64::MAX,
            lead_minutes_max: i64::MAX,
        };
        assert_eq!(scheduled_at(&window, now), now);
    }

    #[test]
    fn test_visibility_maps_to_close_immediately() {
        let request = NewEventRequest {
            name: "Party".to_string(),
            location: String::new(),
            participants: vec!["A".to_string(), "B".to_string()],
            open_to_public: true,
        };
        let now = Utc::now();
        assert!(!draft_from(request.clone(), now).close_immediately);

        let closed = NewEventRequest {
            open_to_public: false,
            ..request
        };
        assert!(draft_from(closed, now).close_immediately);
    }
}
