// ABOUTME: Persists the bearer token and user profile between invocations
// ABOUTME: File-backed store under ~/.llc, JSON on disk

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use llc_core::UserProfile;

use crate::error::{LlcError, LlcResult};

/// A signed-in session as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    session: Option<Session>,
}

impl SessionStore {
    /// Store at the default location, `~/.llc/session.json`.
    pub fn new() -> LlcResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| LlcError::config("Could not determine home directory"))?;
        Ok(Self::at_path(home.join(".llc").join("session.json")))
    }

    /// Store at an explicit path.
    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            session: None,
        }
    }

    /// Load any existing session from disk. Missing or unreadable files
    /// just leave the store signed out.
    pub async fn init(&mut self) -> LlcResult<()> {
        if !self.path.exists() {
            return Ok(());
        }
        match fs::read_to_string(&self.path).await {
            Ok(content) => match serde_json::from_str::<Session>(&content) {
                Ok(session) => {
                    self.session = Some(session);
                }
                Err(e) => {
                    tracing::warn!("Ignoring invalid session file: {}", e);
                }
            },
            Err(e) => {
                tracing::debug!("Could not read session file: {}", e);
            }
        }
        Ok(())
    }

    /// Persist a new session after sign-in.
    pub async fn save(&mut self, session: Session) -> LlcResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(&session)?;
        fs::write(&self.path, content).await?;
        self.session = Some(session);
        Ok(())
    }

    /// Remove the stored session on sign-out.
    pub async fn clear(&mut self) -> LlcResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).await?;
        }
        self.session = None;
        Ok(())
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Bearer token of the signed-in user.
    pub fn token(&self) -> LlcResult<&str> {
        self.session
            .as_ref()
            .map(|s| s.token.as_str())
            .ok_or_else(|| LlcError::auth("Not signed in. Run 'llc auth signin'"))
    }

    /// Profile of the signed-in user.
    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().map(|s| &s.user)
    }
}
