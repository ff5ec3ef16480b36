//! Matrix client wrapper.
//!
//! [`MatrixClient`] logs the bot in (or restores its previous session), joins the
//! game room and posts messages to it.

use anyhow::{Context, anyhow, bail};
use log::{debug, error, info};
use matrix_sdk::{
    Client,
    ruma::{OwnedUserId, RoomId, events::room::message::RoomMessageEventContent},
};
use tokio::{
    fs,
    time::{Duration, sleep},
};

use crate::matrix::{IncomingMessage, UserCredentials, session::SessionStore, sync::MatrixSync};

/// Display name of the bot account.
const DISPLAY_NAME: &str = "Jenga";

/// Longest wait between two join attempts, in seconds.
const MAX_JOIN_DELAY: u64 = 3600;

/// Logged in Matrix client.
pub struct MatrixClient {
    matrix_sync: MatrixSync,
    client: Client,
}

impl MatrixClient {
    /// Logs in with `user_credentials`, reusing the session stored in `session_path`
    /// when there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created, the user id is
    /// invalid or the homeserver refuses the login.
    ///
    /// # Examples
    ///
    /// ```text
    /// let credentials = UserCredentials {
    ///     user_id: "@jenga:example.com".to_string(),
    ///     password: "password".to_string(),
    /// };
    ///
    /// let client = MatrixClient::new(&credentials, "./data/session").await?;
    /// client.join_room("!game:example.com").await?;
    /// ```
    pub async fn new(user_credentials: &UserCredentials, session_path: &str) -> anyhow::Result<Self> {
        fs::create_dir_all(session_path)
            .await
            .with_context(|| format!("failed to create session directory {session_path}"))?;

        let session = SessionStore::open(session_path).await;
        let client = match session.user_session() {
            Some(_) => restore_session(user_credentials, &session).await?,
            None => create_session(user_credentials, &session).await?,
        };

        if let Err(e) = client.account().set_display_name(Some(DISPLAY_NAME)).await {
            error!("failed to set display name: {:?}", e);
        }

        let matrix_sync = MatrixSync::new(&client, &session);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    /// Joins the room `room_id`, retrying with an exponential backoff.
    ///
    /// Joining a room the bot is already in succeeds right away.
    pub async fn join_room(&self, room_id: &str) -> anyhow::Result<()> {
        let room_id = RoomId::parse(room_id)?;
        let mut delay = 2;

        info!("joining room {}", room_id);
        while let Err(err) = self.client.join_room_by_id(&room_id).await {
            if delay > MAX_JOIN_DELAY {
                bail!("can't join room {room_id}: {err:?}");
            }

            error!("failed to join room {room_id} ({err:?}), retrying in {delay}s");
            sleep(Duration::from_secs(delay)).await;
            delay *= 2;
        }
        info!("joined room {}", room_id);

        Ok(())
    }

    /// Syncs with the homeserver, calling `on_message` for each new message.
    pub async fn sync<F>(&self, on_message: F) -> anyhow::Result<()>
    where
        F: Fn(IncomingMessage) + Send + Sync + 'static,
    {
        self.matrix_sync.sync(on_message).await.inspect_err(|e| {
            error!("matrix sync ended with error: {:?}", e);
        })
    }

    /// Posts `content` to `room_id`.
    pub async fn send(&self, room_id: &str, content: RoomMessageEventContent) -> anyhow::Result<()> {
        let room_id = RoomId::parse(room_id)?;
        let room = self
            .client
            .get_room(&room_id)
            .ok_or_else(|| anyhow!("room {room_id} is not known"))?;

        room.send(content).await?;

        debug!("sent message to {}", room_id);
        Ok(())
    }
}

async fn build_client(user_id: &OwnedUserId, session: &SessionStore) -> anyhow::Result<Client> {
    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(session.sqlite_path(), None)
        .build()
        .await?;

    Ok(client)
}

async fn create_session(
    user_credentials: &UserCredentials,
    session: &SessionStore,
) -> anyhow::Result<Client> {
    info!("logging in as {}", user_credentials.user_id);

    let user_id: OwnedUserId = user_credentials.user_id.clone().try_into()?;
    let client = build_client(&user_id, session).await?;

    client
        .matrix_auth()
        .login_username(user_id, &user_credentials.password)
        .initial_device_display_name("jenga bot")
        .send()
        .await?;

    let user_session = client
        .matrix_auth()
        .session()
        .ok_or_else(|| anyhow!("no session after login"))?;
    session.save_user_session(&user_session).await?;

    info!("matrix client logged in");
    Ok(client)
}

async fn restore_session(
    user_credentials: &UserCredentials,
    session: &SessionStore,
) -> anyhow::Result<Client> {
    info!("restoring matrix session from disk");

    let user_id: OwnedUserId = user_credentials.user_id.clone().try_into()?;
    let client = build_client(&user_id, session).await?;

    let user_session = session
        .user_session()
        .ok_or_else(|| anyhow!("no stored session"))?;
    client.restore_session(user_session.clone()).await?;

    info!("matrix session restored");
    Ok(client)
}
