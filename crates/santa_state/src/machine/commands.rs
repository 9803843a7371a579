//! Command letters - the single-key routing table of the menus

use serde::{Deserialize, Serialize};

use super::states::DialogState;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    ListEvents,
    NewEvent,
    GetEvent,
    AddPlayer,
    RemovePlayer,
    CloseEvent,
    DeleteEvent,
    QuerySanta,
    MainMenu,
    Quit,
}

impl Command {
    /// Main menu order.
    pub const ALL: [Command; 10] = [
        Command::ListEvents,
        Command::NewEvent,
        Command::GetEvent,
        Command::AddPlayer,
        Command::RemovePlayer,
        Command::CloseEvent,
        Command::DeleteEvent,
        Command::QuerySanta,
        Command::MainMenu,
        Command::Quit,
    ];

    /// Commands offered on the after-action menu.
    pub const AFTER_ACTION: [Command; 3] = [Command::ListEvents, Command::MainMenu, Command::Quit];

    pub fn letter(&self) -> char {
        match self {
            Self::ListEvents => 'l',
            Self::NewEvent => 'n',
            Self::GetEvent => 'g',
            Self::AddPlayer => 'a',
            Self::RemovePlayer => 'r',
            Self::CloseEvent => 'c',
            Self::DeleteEvent => 'd',
            Self::QuerySanta => 's',
            Self::MainMenu => 'm',
            Self::Quit => 'q',
        }
    }

    /// Parse one line of menu input. Surrounding whitespace and case are
    /// ignored; anything but a single known letter is rejected.
    pub fn parse(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        let letter = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() {
            return None;
        }
        Self::ALL.into_iter().find(|cmd| cmd.letter() == letter)
    }

    /// State the command routes to.
    pub fn target(&self) -> DialogState {
        match self {
            Self::ListEvents => DialogState::ListEvents,
            Self::NewEvent => DialogState::NewEvent,
            Self::GetEvent => DialogState::GetEvent,
            Self::AddPlayer => DialogState::AddPlayer,
            Self::RemovePlayer => DialogState::RemovePlayer,
            Self::CloseEvent => DialogState::CloseEvent,
            Self::DeleteEvent => DialogState::DeleteEvent,
            Self::QuerySanta => DialogState::QuerySanta,
            Self::MainMenu => DialogState::Main,
            Self::Quit => DialogState::Quit,
        }
    }

    pub fn in_after_action_menu(&self) -> bool {
        Self::AFTER_ACTION.contains(self)
    }
}
