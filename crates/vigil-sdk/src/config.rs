// Copyright 2025 eraflo
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

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use vigil_control::ResilienceConfig;
use vigil_telemetry::DiagnosticsConfig;
use vigil_ui::PresenterConfig;

/// File name looked up by hosts that do not pass an explicit path.
pub const DEFAULT_CONFIG_FILE: &str = "Vigil.toml";

/// Top-level configuration, read from a TOML manifest.
///
/// ```toml
/// log_filter = "debug"
///
/// [resilience]
/// max_losses_before_reduction = 3
/// tracking_window_ms = 300000
///
/// [presenter]
/// transient_message_ms = 3000
///
/// [diagnostics]
/// capacity = 50
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VigilConfig {
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Lifecycle monitor and quality policy settings.
    pub resilience: ResilienceConfig,
    /// Notification presenter settings.
    pub presenter: PresenterConfig,
    /// Diagnostics sink settings.
    pub diagnostics: DiagnosticsConfig,
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            resilience: ResilienceConfig::default(),
            presenter: PresenterConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl VigilConfig {
    /// Loads the manifest at `path`, or the defaults if no file exists there.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No '{}' found. Using default configuration.", path.display());
            return Ok(Self::default());
        }
        log::info!("Found '{}'. Loading configuration.", path.display());
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{}'", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))
    }

    /// Parses a manifest held in memory. Out-of-range values are clamped.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: VigilConfig = toml::from_str(text).context("Invalid Vigil configuration")?;
        Ok(config.sanitized())
    }

    /// Returns a copy with every section's values clamped to usable ones.
    pub fn sanitized(&self) -> Self {
        Self {
            log_filter: if self.log_filter.trim().is_empty() {
                "info".to_string()
            } else {
                self.log_filter.clone()
            },
            resilience: self.resilience.sanitized(),
            presenter: self.presenter.clone(),
            diagnostics: self.diagnostics.sanitized(),
        }
    }
}
