//! Dialog transitions - what to ask next and how answers move the dialog
//!
//! The state machine never touches the store. It tells its driver either to
//! prompt for one line or to perform one [`Action`], and is told back what
//! the user typed or that the action finished.

use serde::{Deserialize, Serialize};

use super::commands::Command;
use super::scratch::{Field, Scratch};
use super::states::DialogState;

/// What the driver should ask the user for.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
    MainMenu,
    AfterActionMenu,
    Field { workflow: DialogState, field: Field },
}

/// Inputs for creating an event from the wizard.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewEventRequest {
    pub name: String,
    pub location: String,
    pub participants: Vec<String>,
    pub open_to_public: bool,
}

/// A store call with every field it needs.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ListEvents,
    CreateEvent(NewEventRequest),
    GetEvent { event_id: String },
    AddPlayer { event_id: String, player: String },
    RemovePlayer { event_id: String, player: String },
    CloseEvent { event_id: String },
    DeleteEvent { event_id: String },
    QuerySanta { event_id: String, player: String },
}

impl Action {
    /// Build the action for `state` once `scratch` holds all of its fields.
    pub fn from_scratch(state: DialogState, scratch: &Scratch) -> Option<Self> {
        let event_id = || scratch.event_id.clone();
        let player = || scratch.player.clone();
        let action = match state {
            DialogState::ListEvents => Self::ListEvents,
            DialogState::NewEvent => Self::CreateEvent(NewEventRequest {
                name: scratch.event_name.clone()?,
                location: scratch.location.clone()?,
                participants: scratch.participants.clone()?,
                open_to_public: scratch.open_to_public?,
            }),
            DialogState::GetEvent => Self::GetEvent {
                event_id: event_id()?,
            },
            DialogState::AddPlayer => Self::AddPlayer {
                event_id: event_id()?,
                player: player()?,
            },
            DialogState::RemovePlayer => Self::RemovePlayer {
                event_id: event_id()?,
                player: player()?,
            },
            DialogState::CloseEvent => Self::CloseEvent {
                event_id: event_id()?,
            },
            DialogState::DeleteEvent => Self::DeleteEvent {
                event_id: event_id()?,
            },
            DialogState::QuerySanta => Self::QuerySanta {
                event_id: event_id()?,
                player: player()?,
            },
            DialogState::Main | DialogState::AfterAction | DialogState::Quit => return None,
        };
        Some(action)
    }
}

/// The driver's next move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Prompt(Prompt),
    Perform(Action),
    Finish,
}

/// Side signal for the presentation layer.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    InvalidInput,
}

/// What moved the machine.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Input(String),
    ActionCompleted,
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: DialogState,
    pub to: DialogState,
    pub trigger: Trigger,
    /// Set when the input was rejected.
    pub signal: Option<Signal>,
    /// Whether the state actually changed.
    pub changed: bool,
}

/// State machine for the interactive dialog.
#[derive(Debug, Clone)]
pub struct DialogMachine {
    /// Current state.
    current_state: DialogState,
    /// Answers collected for the workflow in progress.
    scratch: Scratch,
    /// Transition history (for debugging).
    history: Vec<StateTransition>,
    /// Max history entries to keep.
    max_history: usize,
}

impl Default for DialogMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogMachine {
    /// Create a machine sitting on the main menu.
    pub fn new() -> Self {
        Self::with_state(DialogState::Main)
    }

    pub fn with_state(state: DialogState) -> Self {
        Self {
            current_state: state,
            scratch: Scratch::default(),
            history: Vec::new(),
            max_history: 50,
        }
    }

    pub fn state(&self) -> DialogState {
        self.current_state
    }

    pub fn scratch(&self) -> &Scratch {
        &self.scratch
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    pub fn next_step(&self) -> Step {
        Self::compute_step(self.current_state, &self.scratch)
    }

    /// Feed one line typed in answer to the current prompt.
    pub fn handle_input(&mut self, line: &str) -> StateTransition {
        let scratch = std::mem::take(&mut self.scratch);
        let (to, scratch, signal) = Self::apply_input(self.current_state, scratch, line);
        self.record(to, scratch, Trigger::Input(line.to_string()), signal)
    }

    /// The action from [`Step::Perform`] has been carried out.
    pub fn action_completed(&mut self) -> StateTransition {
        self.record(
            DialogState::AfterAction,
            Scratch::default(),
            Trigger::ActionCompleted,
            None,
        )
    }

    /// Input is exhausted; behaves like `q`.
    pub fn end_of_input(&mut self) -> StateTransition {
        self.record(
            DialogState::Quit,
            Scratch::default(),
            Trigger::EndOfInput,
            None,
        )
    }

    /// Back to the main menu with nothing collected.
    pub fn reset(&mut self) {
        self.current_state = DialogState::Main;
        self.scratch = Scratch::default();
    }

    /// Decide the next move for `state` given what has been collected.
    pub fn compute_step(state: DialogState, scratch: &Scratch) -> Step {
        match state {
            DialogState::Main => Step::Prompt(Prompt::MainMenu),
            DialogState::AfterAction => Step::Prompt(Prompt::AfterActionMenu),
            DialogState::Quit => Step::Finish,
            workflow => match scratch.first_missing(workflow.fields()) {
                Some(field) => Step::Prompt(Prompt::Field { workflow, field }),
                None => match Action::from_scratch(workflow, scratch) {
                    Some(action) => Step::Perform(action),
                    // unreachable while fields() and from_scratch agree
                    None => Step::Prompt(Prompt::MainMenu),
                },
            },
        }
    }

    /// Apply one line of input to `(state, scratch)`.
    pub fn apply_input(
        state: DialogState,
        scratch: Scratch,
        line: &str,
    ) -> (DialogState, Scratch, Option<Signal>) {
        match state {
            DialogState::Main => match Command::parse(line) {
                Some(command) => (command.target(), Scratch::default(), None),
                None => (DialogState::Main, Scratch::default(), Some(Signal::InvalidInput)),
            },
            DialogState::AfterAction => {
                let target = Command::parse(line)
                    .filter(Command::in_after_action_menu)
                    .map(|command| command.target())
                    .unwrap_or(DialogState::Main);
                (target, Scratch::default(), None)
            }
            DialogState::Quit => (DialogState::Quit, Scratch::default(), None),
            workflow => match scratch.first_missing(workflow.fields()) {
                Some(field) => (workflow, scratch.fill(field, line), None),
                // Nothing is being asked; the line is dropped.
                None => (workflow, scratch, None),
            },
        }
    }

    fn record(
        &mut self,
        to: DialogState,
        scratch: Scratch,
        trigger: Trigger,
        signal: Option<Signal>,
    ) -> StateTransition {
        let from = self.current_state;
        self.current_state = to;
        self.scratch = scratch;

        let transition = StateTransition {
            from,
            to,
            trigger,
            signal,
            changed: from != to,
        };

        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(machine: &mut DialogMachine, lines: &[&str]) {
        for line in lines {
            machine.handle_input(line);
        }
    }

    #[test]
    fn test_main_routes_every_letter() {
        for command in Command::ALL {
            let mut sm = DialogMachine::new();
            let t = sm.handle_input(&command.letter().to_string());
            assert_eq!(t.to, command.target());
            assert_eq!(t.signal, None);
        }
    }

    #[test]
    fn test_invalid_main_input_signals_and_stays() {
        let mut sm = DialogMachine::new();
        let t = sm.handle_input("x");
        assert!(!t.changed);
        assert_eq!(sm.state(), DialogState::Main);
        assert_eq!(t.signal, Some(Signal::InvalidInput));
        assert_eq!(sm.next_step(), Step::Prompt(Prompt::MainMenu));
    }

    #[test]
    fn test_new_event_wizard() {
        let mut sm = DialogMachine::new();
        sm.handle_input("n");

        let expected = [
            (Field::EventName, "Office party"),
            (Field::Location, "HQ"),
            (Field::Participants, "Ann, Bob, Cid"),
            (Field::Visibility, "n"),
        ];
        for (field, answer) in expected {
            assert_eq!(
                sm.next_step(),
                Step::Prompt(Prompt::Field {
                    workflow: DialogState::NewEvent,
                    field
                })
            );
            sm.handle_input(answer);
        }

        assert_eq!(
            sm.next_step(),
            Step::Perform(Action::CreateEvent(NewEventRequest {
                name: "Office party".to_string(),
                location: "HQ".to_string(),
                participants: vec!["Ann".to_string(), "Bob".to_string(), "Cid".to_string()],
                open_to_public: false,
            }))
        );

        let t = sm.action_completed();
        assert_eq!(t.to, DialogState::AfterAction);
        assert!(sm.scratch().is_empty());
    }

    #[test]
    fn test_blank_event_name_is_asked_again() {
        let mut sm = DialogMachine::new();
        feed(&mut sm, &["n", "   "]);
        assert_eq!(
            sm.next_step(),
            Step::Prompt(Prompt::Field {
                workflow: DialogState::NewEvent,
                field: Field::EventName
            })
        );
    }

    #[test]
    fn test_player_workflows_collect_id_then_player() {
        for (letter, state) in [
            ("a", DialogState::AddPlayer),
            ("r", DialogState::RemovePlayer),
            ("s", DialogState::QuerySanta),
        ] {
            let mut sm = DialogMachine::new();
            feed(&mut sm, &[letter, "7"]);
            assert_eq!(
                sm.next_step(),
                Step::Prompt(Prompt::Field {
                    workflow: state,
                    field: Field::PlayerName
                })
            );
            sm.handle_input("Ann");
            let action = match sm.next_step() {
                Step::Perform(action) => action,
                other => panic!("expected an action, got {other:?}"),
            };
            let (event_id, player) = match action {
                Action::AddPlayer { event_id, player }
                | Action::RemovePlayer { event_id, player }
                | Action::QuerySanta { event_id, player } => (event_id, player),
                other => panic!("unexpected action {other:?}"),
            };
            assert_eq!(event_id, "7");
            assert_eq!(player, "Ann");
        }
    }

    #[test]
    fn test_event_workflows_need_only_an_id() {
        for (letter, expected) in [
            ("g", Action::GetEvent { event_id: "3".to_string() }),
            ("c", Action::CloseEvent { event_id: "3".to_string() }),
            ("d", Action::DeleteEvent { event_id: "3".to_string() }),
        ] {
            let mut sm = DialogMachine::new();
            feed(&mut sm, &[letter, "3"]);
            assert_eq!(sm.next_step(), Step::Perform(expected));
        }
    }

    #[test]
    fn test_list_performs_without_prompting() {
        let mut sm = DialogMachine::new();
        sm.handle_input("l");
        assert_eq!(sm.next_step(), Step::Perform(Action::ListEvents));
    }

    #[test]
    fn test_after_action_menu_routing() {
        let cases = [
            ("l", DialogState::ListEvents),
            ("m", DialogState::Main),
            ("q", DialogState::Quit),
            ("n", DialogState::Main),
            ("???", DialogState::Main),
        ];
        for (input, expected) in cases {
            let mut sm = DialogMachine::with_state(DialogState::AfterAction);
            let t = sm.handle_input(input);
            assert_eq!(t.to, expected, "input {input:?}");
            assert_eq!(t.signal, None);
        }
    }

    #[test]
    fn test_quit_finishes_and_clears_scratch() {
        let mut sm = DialogMachine::new();
        feed(&mut sm, &["q"]);
        assert_eq!(sm.next_step(), Step::Finish);
        assert!(sm.scratch().is_empty());
    }

    #[test]
    fn test_end_of_input_quits_mid_workflow() {
        let mut sm = DialogMachine::new();
        feed(&mut sm, &["a", "1"]);
        assert!(!sm.scratch().is_empty());
        let t = sm.end_of_input();
        assert_eq!(t.to, DialogState::Quit);
        assert_eq!(t.trigger, Trigger::EndOfInput);
        assert!(sm.scratch().is_empty());
    }

    #[test]
    fn test_history_tracking() {
        let mut sm = DialogMachine::new();
        feed(&mut sm, &["g", "1"]);
        sm.action_completed();
        assert_eq!(sm.history().len(), 3);
        assert_eq!(sm.history()[2].trigger, Trigger::ActionCompleted);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut sm = DialogMachine::new();
        for _ in 0..60 {
            sm.handle_input("x");
        }
        assert_eq!(sm.history().len(), 50);
    }

    #[test]
    fn test_reset() {
        let mut sm = DialogMachine::new();
        feed(&mut sm, &["a", "1"]);
        sm.reset();
        assert_eq!(sm.state(), DialogState::Main);
        assert!(sm.scratch().is_empty());
    }
}
