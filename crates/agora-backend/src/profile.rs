//! Persisted sign-in state.
//!
//! The REST service authenticates with a bearer token. The token and a
//! minimal projection of the signed-in user live in one well-known file,
//! `<config dir>/agora/profile.json`; it is read before every outgoing
//! REST call and removed on logout.

use agora_types::UserProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// The record persisted after login or signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProfile {
    /// Bearer token for the REST service.
    pub token: String,
    /// The signed-in user.
    pub user: UserProfile,
}

/// Reads and writes the persisted profile.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Opens the store at the platform config location.
    #[must_use]
    pub fn open_default() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| {
            tracing::warn!("Could not determine config directory, using current dir");
            PathBuf::from(".")
        });
        Self {
            path: base.join("agora").join("profile.json"),
        }
    }

    /// Opens the store at an explicit path. Used by tests.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the profile, or `None` when signed out.
    ///
    /// A corrupt file is treated as signed out; it is reported but never
    /// fatal.
    #[must_use]
    pub fn load(&self) -> Option<StoredProfile> {
        if !self.path.exists() {
            tracing::debug!(path = ?self.path, "No profile file, treating as signed out");
            return None;
        }
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!(path = ?self.path, error = %e, "Failed to parse profile, treating as signed out");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Failed to read profile, treating as signed out");
                None
            }
        }
    }

    /// The current bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.load().map(|p| p.token)
    }

    /// Saves the profile to disk.
    pub fn save(&self, profile: &StoredProfile) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(profile).map_err(io::Error::other)?;
        fs::write(&self.path, contents)?;
        tracing::info!(path = ?self.path, user = %profile.user.name, "Saved profile");
        Ok(())
    }

    /// Removes the persisted profile. Signing out twice is fine.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = ?self.path, "Cleared profile");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
