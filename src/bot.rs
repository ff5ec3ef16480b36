//! Bot wiring and main loop.
//!
//! The [`Bot`] builds the game, the chat host and the extension, then runs two
//! things side by side on the main task:
//!
//! ```text
//! Matrix sync ──(channel)──> dispatch loop ─┬─> /jenga ... ──> SlashCommandRegistry
//!                                           └─> ChatLog ──> EventSource ──> JengaExtension
//! ```
//!
//! The sync loop only forwards messages of the game room. The dispatch loop
//! handles them one at a time, so the game sees commands in chat order.

use std::{rc::Rc, sync::Arc};

use log::{info, trace, warn};
use tokio::sync::mpsc;

use crate::{
    commands::CommandTable,
    config::Config,
    extension::JengaExtension,
    game::JengaGame,
    host::{EventSource, SlashCommandRegistry},
    matrix::{IncomingMessage, MatrixClient, MatrixHost, UserCredentials},
    utils::get_path,
};

/// Prefix of host commands such as `/jenga pull`.
const SLASH_PREFIX: char = '/';

/// What the dispatch loop does with a room message.
#[derive(Debug, PartialEq, Eq)]
enum Route {
    /// Run it as a registered slash command
    SlashCommand,
    /// Record it in the chat log and emit its render event
    Render,
}

/// Slash commands run only when someone else typed a registered one; everything
/// else, including the bot's own echoes, is rendered.
fn route(registry: &SlashCommandRegistry, message: &IncomingMessage) -> Route {
    if !message.is_own && registry.is_command(&message.body) {
        Route::SlashCommand
    } else {
        Route::Render
    }
}

pub struct Bot {
    matrix_client: Arc<MatrixClient>,
    host: Rc<MatrixHost>,
    events: EventSource,
    registry: SlashCommandRegistry,
}

impl Bot {
    /// Logs in, joins the game room and sets up the game.
    ///
    /// The Matrix session is kept in `data_path/session`.
    pub async fn new(config: Config, data_path: &str) -> anyhow::Result<Self> {
        let matrix_client = Arc::new(
            MatrixClient::new(
                &UserCredentials {
                    user_id: config.matrix.user_id,
                    password: config.matrix.password,
                },
                &get_path(data_path, "session"),
            )
            .await?,
        );
        matrix_client.join_room(&config.matrix.room_id).await?;

        let host = Rc::new(MatrixHost::new(
            Arc::clone(&matrix_client),
            &config.matrix.room_id,
            config.matrix.history_limit,
        ));

        let table = CommandTable::new();
        let game = JengaGame::new(table.clone(), config.game);
        let extension = Rc::new(JengaExtension::new(table, Rc::clone(&host), game));

        let mut events = EventSource::new();
        let mut registry = SlashCommandRegistry::new(SLASH_PREFIX);
        extension.setup(&mut events, &mut registry);

        Ok(Bot {
            matrix_client,
            host,
            events,
            registry,
        })
    }

    /// Runs until the Matrix sync stops.
    pub async fn start(self) -> anyhow::Result<()> {
        let (sender, mut receiver) = mpsc::unbounded_channel();

        let room_id = self.host.room_id().to_owned();
        let on_message = move |message: IncomingMessage| {
            if message.room_id != room_id {
                trace!("ignoring message from room {}", message.room_id);
                return;
            }
            if let Err(e) = sender.send(message) {
                warn!("dispatch loop is gone, dropping message: {}", e);
            }
        };

        let dispatch = async {
            while let Some(message) = receiver.recv().await {
                self.handle_message(message).await;
            }
        };

        info!("jenga is ready in {}", self.host.room_id());
        tokio::select! {
            result = self.matrix_client.sync(on_message) => result,
            _ = dispatch => Ok(()),
        }
    }

    /// Runs a slash command or records the message and announces it.
    async fn handle_message(&self, message: IncomingMessage) {
        match route(&self.registry, &message) {
            Route::SlashCommand => {
                if let Err(e) = self.registry.execute(&message.body).await {
                    warn!("failed to run {}: {:?}", message.body, e);
                }
            }
            Route::Render => {
                let (id, kind) = self.host.record(&message);
                self.events.emit(kind, id).await;
            }
        }
    }
}
