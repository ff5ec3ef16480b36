//! The `/jenga` host command.
//!
//! Declares `/jenga <start|pull|place|reset>` so players can drive the game from
//! the host command language instead of typing a bang token.

use std::future::Future;

use log::warn;

use crate::{
    commands::{BangCommand, CommandTable},
    host::{EnumValue, SlashCommand},
};

/// Name of the host command.
pub const COMMAND_NAME: &str = "jenga";

/// Builds the `/jenga` command.
///
/// `on_command` runs for every valid sub-action with the matching bang command.
/// Missing or unknown sub-actions are logged and dropped.
pub fn jenga_command<F, Fut>(table: &CommandTable, on_command: F) -> SlashCommand
where
    F: Fn(BangCommand) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let values = table
        .iter()
        .map(|command| EnumValue::new(command.subaction(), command.description()))
        .collect();

    let table = table.clone();
    SlashCommand::new(COMMAND_NAME, "Play Jenga", values, move |argument| {
        let command = resolve_subaction(&table, argument.as_deref());
        let future = command.map(&on_command);
        async move {
            if let Some(future) = future {
                future.await;
            }
        }
    })
}

/// Maps a `/jenga` argument to its bang command, logging invalid ones.
pub fn resolve_subaction(table: &CommandTable, argument: Option<&str>) -> Option<BangCommand> {
    let Some(argument) = argument else {
        warn!("missing /{} command type", COMMAND_NAME);
        return None;
    };

    let command = table.from_subaction(argument);
    if command.is_none() {
        warn!("invalid /{} command type: {}", COMMAND_NAME, argument);
    }

    command
}
