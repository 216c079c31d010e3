//! Remembers the last username that was looked up successfully, so commands
//! can be run without repeating it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

pub trait SessionStore {
    fn get(&self) -> Result<Option<String>, SessionError>;
    fn set(&self, username: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    username: Option<String>,
}

/// JSON file under the platform config directory.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/session.json`, e.g. `~/.config/ghlens/session.json` on Linux.
    pub fn in_config_dir() -> Result<Self, SessionError> {
        let dirs = ProjectDirs::from("", "", "ghlens").ok_or(SessionError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let file: SessionFile =
            serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        Ok(file.username)
    }

    fn set(&self, username: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let file = SessionFile {
            username: Some(username.to_string()),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        debug!("remembered {username} in {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Process-local store.
#[derive(Default)]
pub struct MemorySessionStore {
    username: Mutex<Option<String>>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<String>, SessionError> {
        Ok(self.username.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn set(&self, username: &str) -> Result<(), SessionError> {
        *self.username.lock().unwrap_or_else(|e| e.into_inner()) = Some(username.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.username.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.get().unwrap(), None);

        store.set("octocat").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("octocat"));

        store.set("hubot").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("hubot"));

        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_reports_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = FileSessionStore::new(&path).get().unwrap_err();
        assert!(matches!(err, SessionError::Corrupt { .. }));
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::default();
        assert_eq!(store.get().unwrap(), None);
        store.set("octocat").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("octocat"));
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}
