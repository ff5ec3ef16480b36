//! Matrix adapter for the chat host.
//!
//! The bot plays in a single room:
//!
//! - [`MatrixClient`] logs in, joins the room and posts messages
//! - the sync loop turns room events into [`IncomingMessage`]s
//! - [`MatrixHost`] records those messages in a bounded chat log and implements
//!   [`crate::host::Host`] on top of the client
//!
//! Messages sent by the bot account are recorded as system messages so the bot
//! never answers itself.

mod client;
mod host;
mod session;
mod sync;

pub use crate::matrix::{client::MatrixClient, host::MatrixHost};

/// User credentials for a Matrix account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// User ID of the matrix account
    pub user_id: String,
    /// Password of the matrix account
    pub password: String,
}

/// A text or notice message received from a joined room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub room_id: String,
    pub body: String,
    /// Display name of the sender, or the localpart of its user id
    pub sender_name: String,
    /// `m.notice` rather than `m.text`
    pub is_notice: bool,
    /// Sent by the bot account
    pub is_own: bool,
}
