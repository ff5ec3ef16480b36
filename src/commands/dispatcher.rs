//! Response dispatching.
//!
//! The [`ResponseDispatcher`] turns a recognized token into a chat message: it asks
//! the game for the response, addresses it to the player and posts it through the
//! host flagged as system-generated.

use std::{fmt, rc::Rc};

use log::{debug, info};

use crate::{
    commands::CommandTable,
    game::{GameError, GameHandler},
    host::{ExecuteOptions, Host},
};

/// Source tag attached to every message posted by the dispatcher.
pub const SOURCE: &str = "jenga";

/// Errors that stop a response from reaching the chat.
#[derive(Debug)]
pub enum DispatchError {
    /// The token is not one of the bang commands
    UnknownToken(String),
    /// The game could not process the command
    Game(GameError),
    /// The game produced no text
    EmptyResponse,
    /// The host failed to post the response
    Host(anyhow::Error),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnknownToken(token) => write!(f, "invalid bang command: {token}"),
            DispatchError::Game(e) => write!(f, "game failed to handle command: {e}"),
            DispatchError::EmptyResponse => write!(f, "game returned an empty response"),
            DispatchError::Host(e) => write!(f, "host failed to post response: {e}"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Replaces a leading `"You "` with the author's name.
///
/// Without an author (or with an empty one) the response is returned unchanged.
///
/// # Examples
///
/// ```text
/// assert_eq!(personalize("You remove a block.", Some("Sam")), "Sam remove a block.");
/// assert_eq!(personalize("The tower falls.", Some("Sam")), "The tower falls.");
/// ```
pub fn personalize(response: &str, author: Option<&str>) -> String {
    match (author, response.strip_prefix("You ")) {
        (Some(name), Some(rest)) if !name.is_empty() => format!("{name} {rest}"),
        _ => response.to_owned(),
    }
}

/// Resolves bang tokens into posted game responses.
pub struct ResponseDispatcher<H: Host, G: GameHandler> {
    table: CommandTable,
    host: Rc<H>,
    game: G,
}

impl<H: Host, G: GameHandler> ResponseDispatcher<H, G> {
    pub fn new(table: CommandTable, host: Rc<H>, game: G) -> Self {
        ResponseDispatcher { table, host, game }
    }

    /// Posts the game's response to `token` into the chat.
    ///
    /// Returns the posted text.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnknownToken`] if `token` is not in the command table;
    ///   the game is not consulted
    /// - [`DispatchError::Game`] or [`DispatchError::EmptyResponse`] if the game gave
    ///   nothing to post
    /// - [`DispatchError::Host`] if posting failed
    pub async fn dispatch(&self, token: &str, author: Option<&str>) -> Result<String, DispatchError> {
        let Some(command) = self.table.from_token(token) else {
            return Err(DispatchError::UnknownToken(token.to_owned()));
        };

        let response = self
            .game
            .handle_command(command.token())
            .await
            .map_err(DispatchError::Game)?;
        if response.trim().is_empty() {
            return Err(DispatchError::EmptyResponse);
        }

        let response = personalize(&response, author);
        debug!("response to {}: {}", command, response);

        let options = ExecuteOptions {
            source: SOURCE.to_owned(),
            compact: true,
            system: true,
        };
        self.host
            .execute_command(&response, &options)
            .await
            .map_err(DispatchError::Host)?;

        info!("answered {}", command);
        Ok(response)
    }
}
