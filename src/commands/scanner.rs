//! Bang command detection in rendered chat messages.

use log::{debug, trace};

use crate::{
    commands::{BangCommand, CommandTable},
    host::ChatMessage,
};

/// Finds the bang command a chat message starts with.
///
/// Messages generated by the bot itself are skipped before looking at the text,
/// so the bot never reacts to its own responses.
#[derive(Debug, Clone)]
pub struct MessageScanner {
    table: CommandTable,
}

impl MessageScanner {
    pub fn new(table: CommandTable) -> Self {
        MessageScanner { table }
    }

    /// Returns the command `message` starts with, or `None`.
    ///
    /// Leading and trailing whitespace is ignored. The token must open the message:
    /// `"hello !startjenga"` matches nothing.
    pub fn scan(&self, message: &ChatMessage) -> Option<BangCommand> {
        if message.is_system {
            trace!("skip system message");
            return None;
        }

        let command = self.scan_text(&message.text);
        if let Some(command) = command {
            debug!("found {} in {:?}", command, message.text);
        }

        command
    }

    /// Matches a raw text against the command table.
    pub fn scan_text(&self, text: &str) -> Option<BangCommand> {
        self.table.match_prefix(text.trim())
    }
}
