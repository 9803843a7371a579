//! State machine module
//!
//! Contains the dialog FSM: states, the command routing table, per-workflow
//! scratch fields and the transition logic.

mod commands;
mod scratch;
mod states;
mod transitions;

pub use commands::Command;
pub use scratch::{parse_participants, parse_visibility, Field, Scratch};
pub use states::DialogState;
pub use transitions::{
    Action, DialogMachine, NewEventRequest, Prompt, Signal, StateTransition, Step, Trigger,
};
