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

//! What the overlay shows.

use vigil_core::UserMessage;

/// Title of the banner shown while the context is lost.
pub const LOST_TITLE: &str = "Rendering context lost";
/// Title of the banner shown after a restore.
pub const RESTORED_TITLE: &str = "Restored";
/// Detail line while lost with degradation active.
pub const DEGRADED_DETAIL: &str = "Memory-intensive features have been disabled.";
/// Detail line while lost at full quality.
pub const WAITING_DETAIL: &str = "The 3D view will restore automatically when memory is available.";
/// Text of the persistent reduced-quality indicator.
pub const INDICATOR_TEXT: &str = "Reduced quality mode";

/// Visual tone of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BannerTone {
    /// Something went wrong but is being handled.
    Warning,
    /// Something recovered.
    Success,
}

/// A non-modal banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Icon and color tone.
    pub tone: BannerTone,
    /// Bold first line.
    pub title: String,
    /// The user message.
    pub message: String,
    /// Optional secondary line.
    pub detail: Option<String>,
}

impl Banner {
    /// The banner shown while the context is lost.
    pub fn lost(message: &UserMessage, degradation_active: bool) -> Self {
        let detail = if degradation_active {
            DEGRADED_DETAIL
        } else {
            WAITING_DETAIL
        };
        Self {
            tone: BannerTone::Warning,
            title: LOST_TITLE.to_string(),
            message: message.text.clone(),
            detail: Some(detail.to_string()),
        }
    }

    /// The transient banner shown after a restore.
    pub fn restored(message: &UserMessage) -> Self {
        Self {
            tone: BannerTone::Success,
            title: RESTORED_TITLE.to_string(),
            message: message.text.clone(),
            detail: None,
        }
    }
}

/// The single thing the overlay displays at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    /// Nothing.
    #[default]
    Hidden,
    /// A warning or success banner.
    Banner(Banner),
    /// A small persistent badge.
    Indicator(String),
    /// A static panel replacing the 3D view when graphics are unavailable.
    Fallback(String),
}

impl Overlay {
    /// The banner, if one is shown.
    pub fn banner(&self) -> Option<&Banner> {
        match self {
            Overlay::Banner(banner) => Some(banner),
            _ => None,
        }
    }

    /// `true` if nothing is shown.
    pub fn is_hidden(&self) -> bool {
        matches!(self, Overlay::Hidden)
    }
}
