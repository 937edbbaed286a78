// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application configuration management.
//!
//! Preferences are stored in TOML through `confy`. Every field has a serde
//! default so older or hand-edited files keep loading.

use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use warp_client::DEFAULT_PROGRAM;

const APP_NAME: &str = "warp-status";
const CONFIG_NAME: &str = "config";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Control tool to run, either a bare name looked up on PATH or a full path
    #[serde(default = "default_cli_path")]
    pub cli_path: String,

    /// Window width in points
    #[serde(default = "default_window_width")]
    pub window_width: f32,

    /// Window height in points
    #[serde(default = "default_window_height")]
    pub window_height: f32,

    /// Keep the widget above other windows
    #[serde(default)]
    pub always_on_top: bool,

    /// Number of events kept in the event log
    #[serde(default = "default_event_log_limit")]
    pub event_log_limit: usize,
}

// Default value functions for serde
fn default_cli_path() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_window_width() -> f32 {
    300.0
}

fn default_window_height() -> f32 {
    200.0
}

fn default_event_log_limit() -> usize {
    50
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cli_path: default_cli_path(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            always_on_top: false,
            event_log_limit: default_event_log_limit(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating it with defaults if missing
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Load configuration, falling back to defaults when the file is unreadable
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!("Failed to load configuration, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Apply command-line overrides on top of the stored values
    #[must_use]
    pub fn with_cli_path(mut self, cli_path: Option<String>) -> Self {
        if let Some(path) = cli_path {
            self.cli_path = path;
        }
        self
    }
}
