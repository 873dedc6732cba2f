//! Typed records over a [`Storage`]
//!
//! A stored record that fails to decode is treated as absent (the learner)
//! or as the default (settings), and a warning is logged.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::Storage;
use crate::config::AppSettings;
use crate::student::Student;

/// Key of the single active learner record
pub const CURRENT_USER_KEY: &str = "current_user";

/// Key of the app settings record
pub const APP_SETTINGS_KEY: &str = "app_settings";

pub struct Repository<S: Storage> {
    storage: S,
}

impl<S: Storage> Repository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.storage.read(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring malformed stored record");
                Ok(None)
            }
        }
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialize record: {key}"))?;
        self.storage.write(key, &raw)
    }

    // ========================================================================
    // Learner
    // ========================================================================

    pub fn load_student(&self) -> Result<Option<Student>> {
        self.load(CURRENT_USER_KEY)
    }

    /// Store the learner, replacing any previous one, and clear the
    /// first-time flag in the settings
    pub fn save_student(&self, student: &Student) -> Result<()> {
        self.store(CURRENT_USER_KEY, student)?;

        let mut settings = self.load_settings()?;
        if settings.is_first_time {
            settings.is_first_time = false;
            self.save_settings(&settings)?;
        }
        Ok(())
    }

    // ========================================================================
    // Settings
    // ========================================================================

    /// Stored settings, or the defaults when none are stored
    pub fn load_settings(&self) -> Result<AppSettings> {
        Ok(self.load(APP_SETTINGS_KEY)?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.store(APP_SETTINGS_KEY, settings)
    }
}
