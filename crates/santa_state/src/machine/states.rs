//! Dialog states - every screen the interactive session can be on

use serde::{Deserialize, Serialize};

use super::scratch::Field;

/// The states of the dialog loop.
///
/// Workflow states collect their fields one prompt at a time and run their
/// store call as soon as the last field is in.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    /// Full command menu.
    Main,

    // ========== Workflows ==========
    ListEvents,
    NewEvent,
    GetEvent,
    AddPlayer,
    RemovePlayer,
    CloseEvent,
    DeleteEvent,
    QuerySanta,

    /// Reduced menu shown after each completed workflow.
    AfterAction,

    /// Session is over.
    Quit,
}

impl Default for DialogState {
    fn default() -> Self {
        DialogState::Main
    }
}

const NEW_EVENT_FIELDS: &[Field] = &[
    Field::EventName,
    Field::Location,
    Field::Participants,
    Field::Visibility,
];
const EVENT_FIELDS: &[Field] = &[Field::EventId];
const EVENT_PLAYER_FIELDS: &[Field] = &[Field::EventId, Field::PlayerName];

impl DialogState {
    /// Fields a workflow collects, in the order they are asked for.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::NewEvent => NEW_EVENT_FIELDS,
            Self::GetEvent | Self::CloseEvent | Self::DeleteEvent => EVENT_FIELDS,
            Self::AddPlayer | Self::RemovePlayer | Self::QuerySanta => EVENT_PLAYER_FIELDS,
            Self::Main | Self::ListEvents | Self::AfterAction | Self::Quit => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Quit)
    }

    /// States that end with a store call.
    pub fn is_workflow(&self) -> bool {
        !matches!(self, Self::Main | Self::AfterAction | Self::Quit)
    }

    /// States that read a command letter rather than a field value.
    pub fn is_menu(&self) -> bool {
        matches!(self, Self::Main | Self::AfterAction)
    }
}
