//! Matrix login persistence.
//!
//! The bot logs in with its password once; afterwards the access token and the
//! latest sync token are read back from the data directory:
//!
//! - `session` - JSON file with the user session and sync token
//! - `sqlite` - Matrix SDK state store

use std::path::Path;

use log::{debug, trace, warn};
use matrix_sdk::authentication::matrix;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::utils::get_path;

/// Content of the `session` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    /// Access credentials of the bot device
    user_session: matrix::MatrixSession,
    /// Batch token of the last completed sync
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

/// Session files of the bot in its data directory.
#[derive(Clone)]
pub struct SessionStore {
    /// Session loaded at startup, if any
    stored: Option<StoredSession>,
    /// `dir/session`
    session_path: String,
    /// `dir/sqlite`
    sqlite_path: String,
}

impl SessionStore {
    /// Opens the store in `dir_path`, loading the session file when present.
    ///
    /// An unreadable session file is logged and treated as absent, which leads to
    /// a fresh login.
    pub async fn open(dir_path: &str) -> Self {
        let session_path = get_path(dir_path, "session");
        let sqlite_path = get_path(dir_path, "sqlite");
        debug!("session store at {}", dir_path);

        let stored = match Self::read(&session_path).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("ignoring session file {}: {}", session_path, e);
                None
            }
        };

        SessionStore {
            stored,
            session_path,
            sqlite_path,
        }
    }

    async fn read(session_path: &str) -> anyhow::Result<Option<StoredSession>> {
        if !Path::new(session_path).exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(session_path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn sqlite_path(&self) -> &str {
        &self.sqlite_path
    }

    pub fn user_session(&self) -> Option<&matrix::MatrixSession> {
        self.stored.as_ref().map(|stored| &stored.user_session)
    }

    pub fn sync_token(&self) -> Option<String> {
        self.stored
            .as_ref()
            .and_then(|stored| stored.sync_token.clone())
    }

    /// Writes a new session file, dropping any previous sync token.
    pub async fn save_user_session(&self, user_session: &matrix::MatrixSession) -> anyhow::Result<()> {
        trace!("persist user session");

        let stored = StoredSession {
            user_session: user_session.clone(),
            sync_token: None,
        };
        fs::write(&self.session_path, serde_json::to_string(&stored)?).await?;

        Ok(())
    }

    /// Records the latest sync token in the session file.
    ///
    /// # Errors
    ///
    /// Fails if no session file was written yet.
    pub async fn save_sync_token(&self, sync_token: String) -> anyhow::Result<()> {
        trace!("persist sync token {}", sync_token);

        let mut stored = Self::read(&self.session_path)
            .await?
            .ok_or_else(|| anyhow::anyhow!("no session file to update"))?;
        stored.sync_token = Some(sync_token);
        fs::write(&self.session_path, serde_json::to_string(&stored)?).await?;

        Ok(())
    }
}
