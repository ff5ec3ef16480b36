//! [`Host`] implementation backed by a Matrix room.

use std::{cell::RefCell, sync::Arc};

use log::{debug, trace};
use matrix_sdk::ruma::events::room::message::RoomMessageEventContent;

use crate::{
    host::{ChatLog, ChatMessage, EventKind, ExecuteOptions, Host, MessageId},
    matrix::{IncomingMessage, MatrixClient},
};

/// The game room as a chat host.
pub struct MatrixHost {
    client: Arc<MatrixClient>,
    room_id: String,
    chat: RefCell<ChatLog>,
}

impl MatrixHost {
    pub fn new(client: Arc<MatrixClient>, room_id: &str, history_limit: usize) -> Self {
        MatrixHost {
            client,
            room_id: room_id.to_owned(),
            chat: RefCell::new(ChatLog::new(history_limit)),
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Appends `message` to the chat log.
    ///
    /// Returns its id and the render event to emit for it.
    pub fn record(&self, message: &IncomingMessage) -> (MessageId, EventKind) {
        let (chat_message, kind) = to_chat_message(message);
        let id = self.chat.borrow_mut().push(chat_message);
        trace!("recorded message {} ({:?})", id, kind);

        (id, kind)
    }
}

impl Host for MatrixHost {
    fn message(&self, id: MessageId) -> Option<ChatMessage> {
        self.chat.borrow().get(id)
    }

    /// Posts `text` to the room.
    ///
    /// The room echoes the message back from the bot account, so it is recorded as
    /// a system message whatever `options.system` says.
    async fn execute_command(&self, text: &str, options: &ExecuteOptions) -> anyhow::Result<()> {
        debug!(
            "posting message from {} (compact: {}, system: {})",
            options.source, options.compact, options.system
        );
        self.client
            .send(&self.room_id, message_content(text, options))
            .await
    }
}

/// Markdown content for `text`: a notice in compact mode, plain text otherwise.
fn message_content(text: &str, options: &ExecuteOptions) -> RoomMessageEventContent {
    if options.compact {
        RoomMessageEventContent::notice_markdown(text)
    } else {
        RoomMessageEventContent::text_markdown(text)
    }
}

/// Maps a room message to a chat message and its render event.
///
/// Notices are what characters say, plain text is what users say. Messages from
/// the bot account are system messages.
fn to_chat_message(message: &IncomingMessage) -> (ChatMessage, EventKind) {
    let kind = if message.is_notice {
        EventKind::CharacterMessageRendered
    } else {
        EventKind::UserMessageRendered
    };

    let chat_message = if message.is_own {
        ChatMessage::system(&message.body)
    } else {
        ChatMessage::new(&message.body, Some(&message.sender_name))
    };

    (chat_message, kind)
}

#[cfg(test)]
mod tests {
    use matrix_sdk::ruma::events::room::message::MessageType;

    use super::*;

    fn options(compact: bool) -> ExecuteOptions {
        ExecuteOptions {
            source: "jenga".to_string(),
            compact,
            system: true,
        }
    }

    fn incoming(body: &str, is_notice: bool, is_own: bool) -> IncomingMessage {
        IncomingMessage {
            room_id: "!game:example.com".to_string(),
            body: body.to_string(),
            sender_name: "Sam".to_string(),
            is_notice,
            is_own,
        }
    }

    #[test]
    fn test_text_is_user_message() {
        let (message, kind) = to_chat_message(&incoming("!pullblock", false, false));

        assert_eq!(kind, EventKind::UserMessageRendered);
        assert_eq!(message.text, "!pullblock");
        assert_eq!(message.name.as_deref(), Some("Sam"));
        assert!(!message.is_system);
    }

    #[test]
    fn test_notice_is_character_message() {
        let (message, kind) = to_chat_message(&incoming("!placeblock", true, false));

        assert_eq!(kind, EventKind::CharacterMessageRendered);
        assert!(!message.is_system);
    }

    #[test]
    fn test_own_message_is_system() {
        let (message, kind) = to_chat_message(&incoming("Sam remove a block.", true, true));

        assert_eq!(kind, EventKind::CharacterMessageRendered);
        assert!(message.is_system);
        assert_eq!(message.text, "Sam remove a block.");
    }

    #[test]
    fn test_compact_response_is_notice() {
        let content = message_content("Sam remove a block.", &options(true));

        let MessageType::Notice(notice) = content.msgtype else {
            panic!("expected a notice, got {:?}", content.msgtype);
        };
        assert_eq!(notice.body, "Sam remove a block.");
    }

    #[test]
    fn test_full_response_is_text() {
        let content = message_content("Sam remove a block.", &options(false));

        let MessageType::Text(text) = content.msgtype else {
            panic!("expected a text message, got {:?}", content.msgtype);
        };
        assert_eq!(text.body, "Sam remove a block.");
    }
}
