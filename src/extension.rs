//! Wiring of the Jenga game into a chat host.
//!
//! [`JengaExtension`] owns the scanner and the dispatcher and plugs them into the
//! host: it listens to rendered messages and registers the `/jenga` command. Every
//! failure ends in a log line; nothing is reported back to the host.

use std::rc::Rc;

use log::{debug, error, info, warn};

use crate::{
    commands::{
        BangCommand, COMMAND_NAME, CommandTable, MessageScanner, ResponseDispatcher,
        jenga_command,
    },
    game::GameHandler,
    host::{EventKind, EventSource, Host, MessageId, SlashCommandRegistry},
};

/// The game as seen by the host.
pub struct JengaExtension<H: Host, G: GameHandler> {
    host: Rc<H>,
    table: CommandTable,
    scanner: MessageScanner,
    dispatcher: ResponseDispatcher<H, G>,
}

impl<H: Host + 'static, G: GameHandler + 'static> JengaExtension<H, G> {
    pub fn new(table: CommandTable, host: Rc<H>, game: G) -> Self {
        JengaExtension {
            scanner: MessageScanner::new(table.clone()),
            dispatcher: ResponseDispatcher::new(table.clone(), Rc::clone(&host), game),
            host,
            table,
        }
    }

    /// Registers the `/jenga` command and subscribes to rendered messages.
    pub fn setup(self: &Rc<Self>, events: &mut EventSource, registry: &mut SlashCommandRegistry) {
        info!("setting up jenga");

        let extension = Rc::clone(self);
        registry.register(jenga_command(&self.table, move |command| {
            let extension = Rc::clone(&extension);
            async move { extension.handle_command(command).await }
        }));
        debug!("registered {:?}", registry.usage(COMMAND_NAME));

        for kind in [
            EventKind::UserMessageRendered,
            EventKind::CharacterMessageRendered,
        ] {
            let extension = Rc::clone(self);
            events.on(kind, move |id| {
                let extension = Rc::clone(&extension);
                async move { extension.handle_message(id, kind).await }
            });
            debug!("{} listener(s) on {:?}", events.listener_count(kind), kind);
        }
    }

    /// Answers the bang command a rendered message starts with, if any.
    pub async fn handle_message(&self, id: MessageId, kind: EventKind) {
        let Some(message) = self.host.message(id) else {
            warn!("message {} not found", id);
            return;
        };
        if message.text.trim().is_empty() {
            debug!("message {} has no text", id);
            return;
        }

        let Some(command) = self.scanner.scan(&message) else {
            return;
        };

        info!("handling message ({:?}): {}", kind, message.text);
        if let Err(e) = self
            .dispatcher
            .dispatch(command.token(), message.name.as_deref())
            .await
        {
            error!("failed to answer message {}: {}", id, e);
        }
    }

    /// Answers a command run through `/jenga`.
    pub async fn handle_command(&self, command: BangCommand) {
        info!("handling /{} {}", COMMAND_NAME, command.subaction());
        if let Err(e) = self.dispatcher.dispatch(command.token(), None).await {
            error!("failed to answer /{}: {}", COMMAND_NAME, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::{always, eq};

    use super::*;
    use crate::{
        game::MockGameHandler,
        host::{ChatMessage, MockHost},
    };

    fn setup(host: MockHost, game: MockGameHandler) -> (EventSource, SlashCommandRegistry) {
        let extension = Rc::new(JengaExtension::new(CommandTable::new(), Rc::new(host), game));
        let mut events = EventSource::new();
        let mut registry = SlashCommandRegistry::new('/');
        extension.setup(&mut events, &mut registry);
        (events, registry)
    }

    #[test]
    fn test_setup_subscribes_and_registers() {
        let (events, registry) = setup(MockHost::new(), MockGameHandler::new());

        assert_eq!(events.listener_count(EventKind::UserMessageRendered), 1);
        assert_eq!(events.listener_count(EventKind::CharacterMessageRendered), 1);
        assert!(registry.is_command("/jenga start"));
    }

    #[tokio::test]
    async fn test_user_message_is_answered() {
        let mut host = MockHost::new();
        host.expect_message()
            .with(eq(4usize))
            .returning(|_| Some(ChatMessage::new("  !pullblock now", Some("Sam"))));
        host.expect_execute_command()
            .with(eq("Sam remove a block."), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut game = MockGameHandler::new();
        game.expect_handle_command()
            .with(eq("!pullblock"))
            .times(1)
            .returning(|_| Ok("You remove a block.".to_string()));

        let (events, _registry) = setup(host, game);
        events.emit(EventKind::UserMessageRendered, 4).await;
    }

    #[tokio::test]
    async fn test_character_message_is_answered() {
        let mut host = MockHost::new();
        host.expect_message()
            .returning(|_| Some(ChatMessage::new("!startjenga", Some("Robot"))));
        host.expect_execute_command()
            .with(eq("Robot start a game."), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut game = MockGameHandler::new();
        game.expect_handle_command()
            .times(1)
            .returning(|_| Ok("You start a game.".to_string()));

        let (events, _registry) = setup(host, game);
        events.emit(EventKind::CharacterMessageRendered, 0).await;
    }

    #[tokio::test]
    async fn test_system_message_is_ignored() {
        let mut host = MockHost::new();
        host.expect_message()
            .returning(|_| Some(ChatMessage::system("!startjenga")));
        host.expect_execute_command().never();

        let mut game = MockGameHandler::new();
        game.expect_handle_command().never();

        let (events, _registry) = setup(host, game);
        events.emit(EventKind::UserMessageRendered, 0).await;
    }

    #[tokio::test]
    async fn test_plain_message_is_ignored() {
        let mut host = MockHost::new();
        host.expect_message()
            .returning(|_| Some(ChatMessage::new("hello !startjenga", Some("Sam"))));
        host.expect_execute_command().never();

        let mut game = MockGameHandler::new();
        game.expect_handle_command().never();

        let (events, _registry) = setup(host, game);
        events.emit(EventKind::UserMessageRendered, 0).await;
    }

    #[tokio::test]
    async fn test_missing_message_is_ignored() {
        let mut host = MockHost::new();
        host.expect_message().returning(|_| None);
        host.expect_execute_command().never();

        let mut game = MockGameHandler::new();
        game.expect_handle_command().never();

        let (events, _registry) = setup(host, game);
        events.emit(EventKind::UserMessageRendered, 99).await;
    }

    #[tokio::test]
    async fn test_empty_message_is_ignored() {
        let mut host = MockHost::new();
        host.expect_message()
            .returning(|_| Some(ChatMessage::new("   ", Some("Sam"))));
        host.expect_execute_command().never();

        let mut game = MockGameHandler::new();
        game.expect_handle_command().never();

        let (events, _registry) = setup(host, game);
        events.emit(EventKind::UserMessageRendered, 0).await;
    }

    #[tokio::test]
    async fn test_host_failure_is_swallowed() {
        let mut host = MockHost::new();
        host.expect_message()
            .returning(|_| Some(ChatMessage::new("!resetjenga", Some("Sam"))));
        host.expect_execute_command()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("room unavailable")));

        let mut game = MockGameHandler::new();
        game.expect_handle_command()
            .times(1)
            .returning(|_| Ok("You reset the game.".to_string()));

        let (events, _registry) = setup(host, game);
        events.emit(EventKind::UserMessageRendered, 0).await;
    }

    #[tokio::test]
    async fn test_slash_command_is_answered_without_personalization() {
        let mut host = MockHost::new();
        host.expect_execute_command()
            .with(eq("You place the block."), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut game = MockGameHandler::new();
        game.expect_handle_command()
            .with(eq("!placeblock"))
            .times(1)
            .returning(|_| Ok("You place the block.".to_string()));

        let (_events, registry) = setup(host, game);
        registry.execute("/jenga place").await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_slash_subaction_dispatches_nothing() {
        let mut host = MockHost::new();
        host.expect_execute_command().never();

        let mut game = MockGameHandler::new();
        game.expect_handle_command().never();

        let (_events, registry) = setup(host, game);
        assert!(registry.execute("/jenga topple").await.is_ok());
    }
}
