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

//! The diagnostics sink and its bounded log.

mod log;
mod sink;

pub use self::log::DiagnosticsLog;
pub use self::sink::{DiagnosticsSink, DiagnosticsSnapshot};

use serde::Deserialize;

/// Default number of entries the diagnostics log retains.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Configuration for the diagnostics sink.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Maximum number of retained log entries; older entries are evicted first.
    pub capacity: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl DiagnosticsConfig {
    /// Returns a copy with out-of-range values clamped.
    pub fn sanitized(&self) -> Self {
        if self.capacity == 0 {
            ::log::warn!("Diagnostics capacity of 0 is not allowed; using 1.");
        }
        Self {
            capacity: self.capacity.max(1),
        }
    }
}
