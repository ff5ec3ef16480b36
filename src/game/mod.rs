//! Jenga game logic.
//!
//! This module provides the game behind the bang commands:
//!
//! - [`GameHandler`] - the single capability the dispatcher depends on: token in,
//!   response text out
//! - [`JengaGame`] - the block-stacking game implementing it
//! - `tower` - the tower model (levels of three block slots)
//! - `responses` - the chat texts of every game outcome
//!
//! Responses addressed to the player start with `"You "` so the dispatcher can put
//! the player's name in their place.

mod jenga;
mod responses;
mod tower;

use std::fmt;

use mockall::automock;

pub use crate::game::jenga::JengaGame;

/// Errors reported by a [`GameHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The token is not a command of the game
    UnknownCommand(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UnknownCommand(token) => write!(f, "unknown command {token}"),
        }
    }
}

impl std::error::Error for GameError {}

/// Game entry point used by the dispatcher.
#[automock]
pub trait GameHandler {
    /// Applies the command named by `token` and returns the text to post.
    async fn handle_command(&self, token: &str) -> Result<String, GameError>;
}
