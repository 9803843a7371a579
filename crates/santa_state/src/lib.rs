//! santa_state - Dialog state machine for the Secret Santa CLI
//!
//! This crate sequences the multi-step conversations of the interactive
//! session and drives them against an [`santa_core::EventStore`] through a
//! [`Console`] supplied by the front end.

pub mod machine;
pub mod session;

// Re-export commonly used types
pub use machine::{
    Action, Command, DialogMachine, DialogState, Field, Prompt, Scratch, Signal, StateTransition,
    Step,
};
pub use session::{Console, Session, SessionError, View};
