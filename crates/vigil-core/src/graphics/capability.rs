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

//! One-time description of the host's graphics capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A tier of graphics API capability a device may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureLevel {
    /// Baseline feature set (WebGL2 / GLES3-class downlevel limits).
    Baseline,
    /// Extended feature set (full WebGPU-class compliance).
    Extended,
}

impl fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureLevel::Baseline => write!(f, "feature level 1"),
            FeatureLevel::Extended => write!(f, "feature level 2"),
        }
    }
}

/// Immutable record produced once at startup by a [`CapabilityProbe`].
///
/// A snapshot is never mutated after creation. Failures are represented by
/// `supported == false` together with a populated `error`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CapabilitySnapshot {
    /// Whether any usable graphics context could be created.
    pub supported: bool,
    /// Whether the baseline feature level is available.
    pub feature_level_1: bool,
    /// Whether the extended feature level is available.
    pub feature_level_2: bool,
    /// Device vendor identifier, empty when unknown.
    pub vendor: String,
    /// Renderer (adapter) name, empty when unknown.
    pub renderer: String,
    /// Numeric device limits keyed by name (e.g. `max_texture_dimension_2d`).
    pub limits: BTreeMap<String, f64>,
    /// Reason the probe failed, if it did.
    pub error: Option<String>,
}

impl CapabilitySnapshot {
    /// Builds the snapshot reported when no usable context exists.
    pub fn unsupported(error: impl Into<String>) -> Self {
        Self {
            supported: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Returns the highest feature level the device reached, if any.
    pub fn highest_feature_level(&self) -> Option<FeatureLevel> {
        if self.feature_level_2 {
            Some(FeatureLevel::Extended)
        } else if self.feature_level_1 {
            Some(FeatureLevel::Baseline)
        } else {
            None
        }
    }

    /// Looks up a numeric limit by name.
    pub fn limit(&self, name: &str) -> Option<f64> {
        self.limits.get(name).copied()
    }

    /// One-line human-readable summary, used for the diagnostics log.
    pub fn summary(&self) -> String {
        match (&self.error, self.highest_feature_level()) {
            (Some(err), _) => format!("Graphics capability probe failed: {err}"),
            (None, Some(level)) => format!(
                "Graphics capability probe succeeded ({level}, renderer \"{}\", vendor \"{}\", {} limits)",
                self.renderer,
                self.vendor,
                self.limits.len()
            ),
            (None, None) => "Graphics capability probe found no usable feature level".to_string(),
        }
    }
}

/// Inspects the host device once, without touching the live render surface.
///
/// Implementations must never fail outward: every failure is folded into the
/// returned snapshot's `error` field with `supported == false`.
#[async_trait]
pub trait CapabilityProbe: Send + Sync {
    /// Performs the probe against a throwaway context.
    async fn probe(&self) -> CapabilitySnapshot;
}
