//! Matrix synchronization loop.
//!
//! [`MatrixSync::sync`] catches up with the homeserver once, dropping whatever was
//! said while the bot was offline, then streams every new text or notice message
//! to a callback and persists the sync token after each batch.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use matrix_sdk::{
    Client, LoopCtrl, Room, RoomState,
    config::SyncSettings,
    ruma::{
        api::client::filter::FilterDefinition,
        events::room::message::{MessageType, OriginalSyncRoomMessageEvent},
    },
};
use tokio::time::{Duration, sleep};

use crate::matrix::{IncomingMessage, session::SessionStore};

/// Delay between two attempts of the initial sync.
const INITIAL_SYNC_RETRY: Duration = Duration::from_secs(5);

/// Runs the sync loop of a logged in client.
pub struct MatrixSync {
    client: Client,
    session: SessionStore,
}

impl MatrixSync {
    pub fn new(client: &Client, session: &SessionStore) -> Self {
        MatrixSync {
            client: client.to_owned(),
            session: session.to_owned(),
        }
    }

    /// Syncs forever, calling `on_message` for each new room message.
    ///
    /// # Errors
    ///
    /// Returns an error when the sync loop stops on a homeserver error.
    pub async fn sync<F>(&self, on_message: F) -> Result<()>
    where
        F: Fn(IncomingMessage) + Send + Sync + 'static,
    {
        info!("start syncing");

        // Room members are only needed for display names, load them lazily
        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());
        if let Some(sync_token) = self.session.sync_token() {
            sync_settings = sync_settings.token(sync_token);
        }

        // Catch up before listening, so commands sent while offline are not replayed
        let response = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response,
                Err(e) => {
                    error!("initial sync failed: {e}, retrying in {INITIAL_SYNC_RETRY:?}");
                    sleep(INITIAL_SYNC_RETRY).await;
                }
            }
        };
        if let Err(e) = self.session.save_sync_token(response.next_batch.clone()).await {
            error!("failed to persist sync token: {:?}", e);
        }
        sync_settings = sync_settings.token(response.next_batch);

        let on_message = Arc::new(on_message);
        self.client.add_event_handler(
            move |event: OriginalSyncRoomMessageEvent, room: Room| {
                let on_message = Arc::clone(&on_message);
                async move { on_room_message(event, room, &on_message).await }
            },
        );

        self.client
            .sync_with_result_callback(sync_settings, |sync_result| async move {
                let response = sync_result?;

                if let Err(e) = self.session.save_sync_token(response.next_batch).await {
                    error!("failed to persist sync token: {:?}", e);
                }

                Ok(LoopCtrl::Continue)
            })
            .await?;

        Ok(())
    }
}

/// Forwards text and notice messages of joined rooms to the callback.
async fn on_room_message<F>(event: OriginalSyncRoomMessageEvent, room: Room, on_message: &Arc<F>)
where
    F: Fn(IncomingMessage) + Send + Sync + 'static,
{
    if room.state() != RoomState::Joined {
        return;
    }

    let (body, is_notice) = match event.content.msgtype {
        MessageType::Text(content) => (content.body, false),
        MessageType::Notice(content) => (content.body, true),
        _ => return,
    };

    let is_own = event.sender.as_str() == room.own_user_id().as_str();
    let sender_name = match room.get_member_no_sync(&event.sender).await {
        Ok(Some(member)) => member.name().to_owned(),
        _ => event.sender.localpart().to_owned(),
    };
    debug!("message from {} in {}", event.sender, room.room_id());

    on_message(IncomingMessage {
        room_id: room.room_id().to_string(),
        body,
        sender_name,
        is_notice,
        is_own,
    });
}
