//! santa_core - Event store and assignment engine
//!
//! Holds the events of one Secret Santa session in memory, enforces their
//! Open → Closed lifecycle and draws the giver → recipient assignment when
//! an event closes.

pub mod assignment;
pub mod config;
pub mod error;
pub mod event;
pub mod schedule;
pub mod store;

// Re-export commonly used types
pub use assignment::{assign, AssignmentError, MIN_PARTICIPANTS};
pub use config::{Config, ConfigError, IdStrategy, ScheduleConfig, MAX_LEAD_MINUTES};
pub use error::{Result, SantaError};
pub use event::{Event, EventDraft, EventStatus, SantaMap};
pub use schedule::ScheduleIndex;
pub use store::EventStore;
