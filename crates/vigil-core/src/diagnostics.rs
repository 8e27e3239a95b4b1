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

//! Vocabulary of the diagnostics log shared by every component.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Severity of a diagnostics entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    /// Informational.
    Info,
    /// A notable positive outcome (context created, restored, probe passed).
    Success,
    /// Recoverable trouble.
    Warn,
    /// Failure.
    Error,
}

impl LogLevel {
    /// The `log` facade level an entry of this severity is mirrored at.
    pub fn as_log_level(self) -> log::Level {
        match self {
            LogLevel::Info | LogLevel::Success => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// One line of the diagnostics log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsEntry {
    /// When the entry was appended.
    pub timestamp: Instant,
    /// Severity.
    pub level: LogLevel,
    /// Free-form message.
    pub message: String,
}

/// Lifecycle status of the render canvas as shown by the diagnostics overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanvasStatus {
    /// The hosting view is mounted.
    pub mounted: bool,
    /// A render surface has been created.
    pub created: bool,
    /// Frames are currently being submitted.
    pub rendering: bool,
    /// Last surface error, cleared on recovery.
    pub error: Option<String>,
}

/// A partial update to [`CanvasStatus`]; `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanvasStatusUpdate {
    /// New `mounted` value.
    pub mounted: Option<bool>,
    /// New `created` value.
    pub created: Option<bool>,
    /// New `rendering` value.
    pub rendering: Option<bool>,
    /// `Some(None)` clears the error, `Some(Some(..))` sets it.
    pub error: Option<Option<String>>,
}

impl CanvasStatus {
    /// Applies a partial update in place.
    pub fn apply(&mut self, update: CanvasStatusUpdate) {
        if let Some(mounted) = update.mounted {
            self.mounted = mounted;
        }
        if let Some(created) = update.created {
            self.created = created;
        }
        if let Some(rendering) = update.rendering {
            self.rendering = rendering;
        }
        if let Some(error) = update.error {
            self.error = error;
        }
    }
}
