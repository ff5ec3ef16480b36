//! Bang command vocabulary.
//!
//! This module defines the closed set of [`BangCommand`]s the bot reacts to and the
//! [`CommandTable`] mapping each of them to its chat token.

use std::fmt;

/// A game action triggered from chat.
///
/// The set is closed: every variant has exactly one token (see [`BangCommand::token`])
/// and one slash sub-action (see [`BangCommand::subaction`]).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum BangCommand {
    /// Build a fresh tower and start a game
    Start,
    /// Pull a block out of the tower
    Pull,
    /// Place the held block on top of the tower
    Place,
    /// Throw the current tower away and build a new one
    Reset,
}

impl BangCommand {
    /// Returns the chat token of the command, e.g. `!pullblock`.
    pub fn token(&self) -> &'static str {
        match self {
            BangCommand::Start => "!startjenga",
            BangCommand::Pull => "!pullblock",
            BangCommand::Place => "!placeblock",
            BangCommand::Reset => "!resetjenga",
        }
    }

    /// Returns the `/jenga` sub-action name of the command, e.g. `pull`.
    pub fn subaction(&self) -> &'static str {
        match self {
            BangCommand::Start => "start",
            BangCommand::Pull => "pull",
            BangCommand::Place => "place",
            BangCommand::Reset => "reset",
        }
    }

    /// Returns the human readable description shown in the command usage.
    pub fn description(&self) -> &'static str {
        match self {
            BangCommand::Start => "Start a game",
            BangCommand::Pull => "Pull a block",
            BangCommand::Place => "Place a block",
            BangCommand::Reset => "Reset game",
        }
    }
}

impl fmt::Display for BangCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Immutable lookup table of the bang commands.
///
/// Built once at startup and handed to the scanner, the dispatcher and the slash
/// command registration. Declaration order is the matching order used by the
/// [`MessageScanner`](crate::commands::MessageScanner).
///
/// # Examples
///
/// ```text
/// let table = CommandTable::new();
/// assert_eq!(table.from_token("!pullblock"), Some(BangCommand::Pull));
/// assert_eq!(table.from_subaction("PLACE"), Some(BangCommand::Place));
/// ```
#[derive(Debug, Clone)]
pub struct CommandTable {
    commands: [BangCommand; 4],
}

impl CommandTable {
    /// Creates the table in declaration order: start, pull, place, reset.
    pub fn new() -> Self {
        CommandTable {
            commands: [
                BangCommand::Start,
                BangCommand::Pull,
                BangCommand::Place,
                BangCommand::Reset,
            ],
        }
    }

    /// Iterates over the commands in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = BangCommand> + '_ {
        self.commands.iter().copied()
    }

    /// Resolves an exact chat token.
    pub fn from_token(&self, token: &str) -> Option<BangCommand> {
        self.iter().find(|command| command.token() == token)
    }

    /// Resolves a `/jenga` sub-action, ignoring ASCII case.
    pub fn from_subaction(&self, subaction: &str) -> Option<BangCommand> {
        self.iter()
            .find(|command| command.subaction().eq_ignore_ascii_case(subaction))
    }

    /// Returns the first command whose token prefixes `text`.
    ///
    /// Tokens share no common prefix, so at most one can match.
    pub fn match_prefix(&self, text: &str) -> Option<BangCommand> {
        self.iter().find(|command| text.starts_with(command.token()))
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}
