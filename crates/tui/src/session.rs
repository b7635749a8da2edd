use std::{fs, path::PathBuf};

use api_types::auth::LoginResponse;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Credentials of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

impl From<LoginResponse> for Session {
    fn from(value: LoginResponse) -> Self {
        Self {
            token: value.token,
            username: value.username,
        }
    }
}

/// File-backed store of the current [`Session`].
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    current: Option<Session>,
}

impl SessionStore {
    /// Reads the session file; a missing file means logged out.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = match fs::read_to_string(&path) {
            Ok(content) => Some(serde_json::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, current })
    }

    pub fn get(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Token of the current session, if it is usable.
    pub fn token(&self) -> Option<&str> {
        self.current
            .as_ref()
            .map(|session| session.token.as_str())
            .filter(|token| !token.is_empty())
    }

    pub fn set(&mut self, session: Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&session)?;
        fs::write(&self.path, payload)?;
        self.current = Some(session);
        Ok(())
    }

    pub fn delete(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        self.current = None;
        Ok(())
    }
}
