//! User-facing app settings, persisted alongside the learner record

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub is_dark_mode: bool,

    #[serde(default = "default_language")]
    pub selected_language: String,

    /// True until a learner has been saved
    #[serde(default = "default_first_time")]
    pub is_first_time: bool,
}

fn default_language() -> String {
    "es".to_string()
}

fn default_first_time() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            is_dark_mode: false,
            selected_language: default_language(),
            is_first_time: default_first_time(),
        }
    }
}
