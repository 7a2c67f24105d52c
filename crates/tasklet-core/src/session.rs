use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasklet_shared::SessionUser;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// The signed-in user, passed by reference into every command that talks
/// to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: SessionUser,
    pub api_url: String,
    pub created: DateTime<Utc>,
}

impl Session {
    pub fn new(user: SessionUser, api_url: &str) -> Self {
        Self {
            user,
            api_url: api_url.to_string(),
            created: Utc::now(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.user.bearer()
    }
}

#[derive(Debug)]
pub struct SessionStore {
    pub data_dir: PathBuf,
    pub session_path: PathBuf,
}

impl SessionStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let session_path = data_dir.join("session.json");
        debug!(session = %session_path.display(), "opened session store");

        Ok(Self {
            data_dir,
            session_path,
        })
    }

    /// A corrupt session file counts as signed out.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> anyhow::Result<Option<Session>> {
        if !self.session_path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&self.session_path)
            .with_context(|| format!("failed to read {}", self.session_path.display()))?;

        match serde_json::from_str::<Session>(&text) {
            Ok(session) if session.token().is_some() => Ok(Some(session)),
            Ok(_) => {
                warn!("stored session has an empty token; ignoring it");
                Ok(None)
            }
            Err(err) => {
                warn!(error = %err, "stored session is unreadable; ignoring it");
                Ok(None)
            }
        }
    }

    #[tracing::instrument(skip(self, session), fields(email = %session.user.email))]
    pub fn save(&self, session: &Session) -> anyhow::Result<()> {
        let parent = self
            .session_path
            .parent()
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
        serde_json::to_writer_pretty(&mut tmp, session)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(&self.session_path).map_err(|e| e.error)?;

        info!(session = %self.session_path.display(), "saved session");
        Ok(())
    }

    /// Returns whether a session was removed.
    #[tracing::instrument(skip(self))]
    pub fn clear(&self) -> anyhow::Result<bool> {
        if !self.session_path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.session_path)
            .with_context(|| format!("failed to remove {}", self.session_path.display()))?;
        info!("cleared session");
        Ok(true)
    }
}
