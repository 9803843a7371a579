use std::io::{self, BufRead, Write};

use chrono::Local;
use colored::{Color, Colorize};
use santa_core::{Event, SantaError};
use santa_state::{Command, Console, DialogState, Field, Prompt, View};

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";
const ID_COLUMN_WIDTH: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalOptions {
    /// Print events as JSON instead of labelled lines.
    pub json: bool,
    /// Clear the screen before menus and new workflows.
    pub clear_screen: bool,
}

/// Console over any line reader and writer; `main` wires it to stdin/stdout.
pub struct TerminalConsole<R, W> {
    input: R,
    out: W,
    options: TerminalOptions,
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn new(input: R, out: W, options: TerminalOptions) -> Self {
        Self {
            input,
            out,
            options,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.options.clear_screen {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        }
        Ok(())
    }

    fn menu(&mut self, commands: &[Command]) -> io::Result<()> {
        writeln!(self.out)?;
        for command in commands {
            writeln!(
                self.out,
                "[{}] {}",
                command.letter().to_string().bold(),
                command_label(*command)
            )?;
        }
        write!(self.out, "What would you like to do? ")
    }

    fn event_info(&mut self, event: &Event) -> io::Result<()> {
        if self.options.json {
            return self.json(event);
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}  {}", "id".dimmed(), event.id.bold())?;
        writeln!(self.out, "{}  {}", "name".dimmed(), event.name)?;
        writeln!(self.out, "{}  {}", "status".dimmed(), status_label(event))?;
        writeln!(self.out, "{}  {}", "location".dimmed(), event.location)?;
        writeln!(
            self.out,
            "{}  {}",
            "scheduled".dimmed(),
            event
                .scheduled_at
                .with_timezone(&Local)
                .format("%d-%b-%Y %I:%M %p")
        )?;
        writeln!(
            self.out,
            "{}  {}",
            "participants".dimmed(),
            event.participants.join(", ")
        )?;
        if !event.assignment.is_empty() {
            writeln!(self.out, "{}", "assignment".dimmed())?;
            for (giver, recipient) in &event.assignment {
                writeln!(self.out, "  {} -> {}", giver, recipient)?;
            }
        }
        Ok(())
    }

    fn event_list(&mut self, events: &[&Event]) -> io::Result<()> {
        if self.options.json {
            return self.json(events);
        }
        self.clear()?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", "ID.   | Name          | State  ".bold())?;
        for event in events {
            writeln!(
                self.out,
                "{:<5} | {} | {}",
                event.short_id(ID_COLUMN_WIDTH),
                event.name,
                status_label(event)
            )?;
        }
        Ok(())
    }

    fn json<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        writeln!(self.out, "{}", text)
    }

    fn error(&mut self, err: &SantaError) -> io::Result<()> {
        let message = match err {
            SantaError::EventNotOpen { event_id } => {
                format!("event_id={event_id:?} is closed and cannot be modified")
            }
            SantaError::EventNotFound { event_id } => format!(
                "event_id={event_id:?} was not found in the system. Are you sure about the event id?"
            ),
            other => other.to_string(),
        };
        writeln!(self.out, "\n{}", message.color(error_color(err)))
    }
}

impl<R: BufRead, W: Write> Console for TerminalConsole<R, W> {
    fn read_line(&mut self, prompt: &Prompt) -> io::Result<Option<String>> {
        match prompt {
            Prompt::MainMenu => {
                self.clear()?;
                writeln!(self.out, "\t**********************************************")?;
                writeln!(
                    self.out,
                    "\t***    {}     ***",
                    "Welcome to the Secret Santa App".green().bold()
                )?;
                writeln!(self.out, "\t**********************************************")?;
                self.menu(&Command::ALL)?;
            }
            Prompt::AfterActionMenu => self.menu(&Command::AFTER_ACTION)?,
            Prompt::Field { workflow, field } => {
                if workflow.fields().first() == Some(field) {
                    self.clear()?;
                }
                write!(self.out, "{}", field_question(*workflow, *field))?;
            }
        }
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(&['\r', '\n'][..]).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    fn render(&mut self, view: View<'_>) -> io::Result<()> {
        match view {
            View::Events(events) => self.event_list(&events)?,
            View::Event(event) => self.event_info(event)?,
            View::Created(event) => {
                self.event_info(event)?;
                writeln!(self.out, "\n{}", "Event created".green())?;
            }
            View::Updated(event) => {
                self.event_info(event)?;
                writeln!(
                    self.out,
                    "\n{}",
                    format!("event_id={:?} has been updated", event.id).green()
                )?;
            }
            View::Closed(event) => writeln!(
                self.out,
                "\n{}",
                format!("event_id={:?} is closed and cannot be modified", event.id).yellow()
            )?,
            View::Deleted { event_id } => writeln!(
                self.out,
                "\n{}",
                format!("event_id={event_id:?} has been deleted").green()
            )?,
            View::Santa {
                event_id,
                player,
                recipient,
            } => writeln!(
                self.out,
                "\n{player} in event {event_id} is the Secret Santa of {}",
                recipient.bold()
            )?,
            View::Error(err) => self.error(err)?,
            View::InvalidInput => {
                writeln!(self.out, "\n{}", "Input that was entered is invalid.".red())?
            }
            View::Goodbye => {
                self.clear()?;
                writeln!(self.out, "Goodbye!")?;
            }
        }
        self.out.flush()
    }
}

fn command_label(command: Command) -> &'static str {
    match command {
        Command::ListEvents => "See a list of events",
        Command::NewEvent => "Create a new event",
        Command::GetEvent => "Get event info",
        Command::AddPlayer => "Add a player",
        Command::RemovePlayer => "Remove a player",
        Command::CloseEvent => "Close an event",
        Command::DeleteEvent => "Delete an event",
        Command::QuerySanta => "Get a player's Secret Santa",
        Command::MainMenu => "Return to main",
        Command::Quit => "Quit",
    }
}

fn field_question(workflow: DialogState, field: Field) -> &'static str {
    match field {
        Field::EventId => "What is the event id? ",
        Field::PlayerName => match workflow {
            DialogState::AddPlayer => "What is the name of the player you want to add? ",
            DialogState::RemovePlayer => "What is the name of the player you want to remove? ",
            _ => "What is the name of the player? ",
        },
        Field::EventName => "What is the name of the new event? ",
        Field::Location => "What is the location of the event? ",
        Field::Participants => "What are the names of the players (ex: john, robert, tom, ...)? ",
        Field::Visibility => "Is the event open to the public [Y/n]? ",
    }
}

/// A mistyped id or name is a warning; everything else is a failure.
fn error_color(err: &SantaError) -> Color {
    if err.is_not_found() {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn status_label(event: &Event) -> colored::ColoredString {
    let label = event.status.label();
    if event.status.is_open() {
        label.green()
    } else {
        label.yellow()
    }
}
