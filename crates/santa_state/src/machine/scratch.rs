//! Scratch fields collected across the prompts of one workflow

use serde::{Deserialize, Serialize};

/// One value a workflow asks the user for.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EventId,
    PlayerName,
    EventName,
    Location,
    Participants,
    /// "Is the event open to the public?"
    Visibility,
}

/// Values collected so far for the workflow in progress.
///
/// A fresh `Scratch` replaces the old one whenever a workflow completes or
/// the dialog returns to a menu.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Scratch {
    /// Trimmed id of the event being acted on.
    pub event_id: Option<String>,
    /// Trimmed player name.
    pub player: Option<String>,
    /// Name for a new event.
    pub event_name: Option<String>,
    /// Location for a new event; may be empty.
    pub location: Option<String>,
    /// Roster for a new event, blanks dropped.
    pub participants: Option<Vec<String>>,
    /// `false` closes the new event on creation.
    pub open_to_public: Option<bool>,
}

impl Scratch {
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::EventId => self.event_id.is_some(),
            Field::PlayerName => self.player.is_some(),
            Field::EventName => self.event_name.is_some(),
            Field::Location => self.location.is_some(),
            Field::Participants => self.participants.is_some(),
            Field::Visibility => self.open_to_public.is_some(),
        }
    }

    pub fn first_missing(&self, fields: &[Field]) -> Option<Field> {
        fields.iter().copied().find(|field| !self.has(*field))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Store a raw answer for `field`.
    ///
    /// Event ids, player names and event names are trimmed, and a blank
    /// answer leaves the field unset so the prompt repeats. Locations may be
    /// blank.
    pub fn fill(mut self, field: Field, raw: &str) -> Self {
        match field {
            Field::EventId => self.event_id = non_blank(raw),
            Field::PlayerName => self.player = non_blank(raw),
            Field::EventName => self.event_name = non_blank(raw),
            Field::Location => self.location = Some(raw.trim().to_string()),
            Field::Participants => self.participants = Some(parse_participants(raw)),
            Field::Visibility => self.open_to_public = Some(parse_visibility(raw)),
        }
        self
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Split a comma-separated roster, trimming names and dropping blanks.
pub fn parse_participants(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Answer to "open to the public [Y/n]?". Only an explicit yes keeps the
/// event open; anything else closes it on creation.
pub fn parse_visibility(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_participants() {
        assert_eq!(
            parse_participants("john, robert ,tom,, "),
            vec!["john", "robert", "tom"]
        );
        assert!(parse_participants("").is_empty());
        assert!(parse_participants(" , ,").is_empty());
    }

    #[test]
    fn test_parse_visibility() {
        for yes in ["y", "Y", " yes ", "YES"] {
            assert!(parse_visibility(yes), "{yes:?}");
        }
        for no in ["n", "", "closed", "no", "maybe"] {
            assert!(!parse_visibility(no), "{no:?}");
        }
    }

    #[test]
    fn test_blank_answers_leave_field_missing() {
        let scratch = Scratch::default()
            .fill(Field::EventId, "   ")
            .fill(Field::EventName, "")
            .fill(Field::PlayerName, "\t");
        assert!(scratch.is_empty());
    }

    #[test]
    fn test_blank_location_is_accepted() {
        let scratch = Scratch::default().fill(Field::Location, "  ");
        assert_eq!(scratch.location.as_deref(), Some(""));
        assert!(scratch.has(Field::Location));
    }

    #[test]
    fn test_first_missing_follows_field_order() {
        let fields = [Field::EventId, Field::PlayerName];
        let scratch = Scratch::default();
        assert_eq!(scratch.first_missing(&fields), Some(Field::EventId));

        let scratch = scratch.fill(Field::EventId, " 3 ");
        assert_eq!(scratch.event_id.as_deref(), Some("3"));
        assert_eq!(scratch.first_missing(&fields), Some(Field::PlayerName));

        let scratch = scratch.fill(Field::PlayerName, "Ann");
        assert_eq!(scratch.first_missing(&fields), None);
    }
}
