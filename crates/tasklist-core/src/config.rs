//! Typed configuration.
//!
//! Every field has a default matching the browser build, so an empty JSON
//! object is a valid config. `from_json_str` validates after parsing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskListConfig {
    pub storage: StorageConfig,
    pub dialog: DialogConfig,
    pub tasks: TasksConfig,
}

impl TaskListConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.tasks_key.is_empty() {
            return Err(ConfigError::Invalid("storage.tasks_key is empty".into()));
        }
        if self.storage.probe_key.is_empty() {
            return Err(ConfigError::Invalid("storage.probe_key is empty".into()));
        }
        if self.storage.probe_key == self.storage.tasks_key {
            return Err(ConfigError::Invalid(
                "storage.probe_key must differ from storage.tasks_key".into(),
            ));
        }
        if self.storage.cookie.max_age_days == 0 {
            return Err(ConfigError::Invalid(
                "storage.cookie.max_age_days must be positive".into(),
            ));
        }
        if self.tasks.delete_all_phrase.trim().is_empty() {
            return Err(ConfigError::Invalid("tasks.delete_all_phrase is empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key the task list is persisted under.
    pub tasks_key: String,
    /// Key written then removed while probing Web Storage.
    pub probe_key: String,
    pub cookie: CookieConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tasks_key: "todoTasks".to_string(),
            probe_key: "__storage_test__".to_string(),
            cookie: CookieConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    pub max_age_days: u32,
    pub path: String,
    pub same_site: SameSite,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            max_age_days: 365,
            path: "/".to_string(),
            same_site: SameSite::Lax,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Delay between inserting the hidden overlay and showing it.
    pub show_delay_ms: u64,
    /// CSS transition length; the overlay is removed after it.
    pub transition_ms: u64,
    pub labels: DialogLabels,
    pub titles: DialogTitles,
}

impl DialogConfig {
    pub fn show_delay(&self) -> Duration {
        Duration::from_millis(self.show_delay_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            show_delay_ms: 10,
            transition_ms: 300,
            labels: DialogLabels::default(),
            titles: DialogTitles::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogLabels {
    pub ok: String,
    pub cancel: String,
}

impl Default for DialogLabels {
    fn default() -> Self {
        Self {
            ok: "OK".to_string(),
            cancel: "Cancel".to_string(),
        }
    }
}

/// Titles used when a caller does not pass one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogTitles {
    pub alert: String,
    pub confirm: String,
    pub prompt: String,
}

impl Default for DialogTitles {
    fn default() -> Self {
        Self {
            alert: "Notice".to_string(),
            confirm: "Confirm".to_string(),
            prompt: "Input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksConfig {
    /// Text the user must type to confirm deleting every task.
    pub delete_all_phrase: String,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            delete_all_phrase: "DELETE ALL".to_string(),
        }
    }
}
