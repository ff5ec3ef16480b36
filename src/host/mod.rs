//! Chat host abstractions.
//!
//! The bot never talks to a chat backend directly. Everything it needs from the
//! surrounding chat application goes through the seams defined here:
//!
//! - [`Host`] - reads rendered messages and executes chat commands
//! - [`EventSource`] - delivers "message rendered" notifications to listeners
//! - [`SlashCommandRegistry`] - the host command language (`/jenga pull`)
//! - [`ChatLog`] - the ordered message list the host owns
//!
//! The Matrix adapter in [`crate::matrix`] is the production implementation; tests
//! use [`MockHost`].

mod chat_log;
mod events;
mod slash;

use mockall::automock;

pub use crate::host::chat_log::ChatLog;
pub use crate::host::events::EventSource;
pub use crate::host::slash::{EnumValue, SlashCommand, SlashCommandRegistry};

/// Index of a message in the host's ordered message list.
pub type MessageId = usize;

/// A message as rendered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Message text
    pub text: String,
    /// Display name of the author, when the host knows it
    pub name: Option<String>,
    /// Set on messages emitted by the bot itself
    pub is_system: bool,
}

impl ChatMessage {
    /// Creates a user-authored message.
    pub fn new(text: &str, name: Option<&str>) -> Self {
        ChatMessage {
            text: text.to_owned(),
            name: name.map(str::to_owned),
            is_system: false,
        }
    }

    /// Creates a message flagged as generated by the bot.
    pub fn system(text: &str) -> Self {
        ChatMessage {
            text: text.to_owned(),
            name: None,
            is_system: true,
        }
    }
}

/// Kinds of host events the bot can subscribe to.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum EventKind {
    /// A message written by a human finished rendering
    UserMessageRendered,
    /// A message written by a character (another bot) finished rendering
    CharacterMessageRendered,
}

/// Options passed along with a command to [`Host::execute_command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Tag naming the component that issued the command
    pub source: String,
    /// Render the message in the compact (notice) style
    pub compact: bool,
    /// Flag the resulting message as system-generated
    pub system: bool,
}

/// The chat application the bot lives in.
#[automock]
pub trait Host {
    /// Returns the message at `id`, if it is still in the message list.
    fn message(&self, id: MessageId) -> Option<ChatMessage>;

    /// Inserts `text` into the chat as described by `options`.
    async fn execute_command(&self, text: &str, options: &ExecuteOptions) -> anyhow::Result<()>;
}
