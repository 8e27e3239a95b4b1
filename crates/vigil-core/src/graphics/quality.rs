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

//! Quality tiers and the surface creation parameters they bundle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel-ratio ceiling applied by [`QualityTier::Reduced`].
pub const REDUCED_PIXEL_RATIO_CAP: f32 = 1.0;
/// Pixel-ratio ceiling applied by [`QualityTier::Minimal`].
pub const MINIMAL_PIXEL_RATIO_CAP: f32 = 0.75;

/// A named bundle of render-surface creation parameters.
///
/// Variants are ordered from best to most degraded, so `tier > QualityTier::Full`
/// reads as "degraded".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum QualityTier {
    /// Native pixel ratio (pre-capped), antialiasing, high precision.
    #[default]
    Full,
    /// Pixel ratio capped at 1.0, no antialiasing, low precision, low power.
    Reduced,
    /// Below `Reduced`. Defined for completeness; no policy currently proposes it.
    Minimal,
}

impl QualityTier {
    /// Returns `true` for any tier below [`QualityTier::Full`].
    pub fn is_degraded(self) -> bool {
        self != QualityTier::Full
    }

    /// The pixel-ratio ceiling for this tier, given the ceiling used under
    /// normal operation.
    pub fn pixel_ratio_cap(self, native_cap: f32) -> f32 {
        match self {
            QualityTier::Full => native_cap,
            QualityTier::Reduced => REDUCED_PIXEL_RATIO_CAP.min(native_cap),
            QualityTier::Minimal => MINIMAL_PIXEL_RATIO_CAP.min(native_cap),
        }
    }

    /// The memory-intensive feature bundle enabled at this tier.
    pub fn features(self) -> RenderFeatures {
        match self {
            QualityTier::Full => RenderFeatures::all(),
            QualityTier::Reduced | QualityTier::Minimal => RenderFeatures::none(),
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityTier::Full => write!(f, "full"),
            QualityTier::Reduced => write!(f, "reduced"),
            QualityTier::Minimal => write!(f, "minimal"),
        }
    }
}

/// Shader floating-point precision requested from the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderPrecision {
    /// `highp`.
    High,
    /// `mediump`.
    Medium,
    /// `lowp`.
    Low,
}

/// GPU power preference requested from the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerPreference {
    /// Let the platform decide.
    Default,
    /// Prefer the integrated / low-power adapter.
    LowPower,
}

/// Memory-intensive rendering features toggled together with the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderFeatures {
    /// Shadow maps.
    pub shadows: bool,
    /// Screen-space ambient occlusion.
    pub ambient_occlusion: bool,
    /// Image-based environment lighting.
    pub environment_map: bool,
    /// Per-frame model animation.
    pub animations: bool,
    /// Streaming models in progressively.
    pub progressive_loading: bool,
    /// High-detail model set.
    pub enhanced_models: bool,
}

impl RenderFeatures {
    /// Every feature enabled.
    pub const fn all() -> Self {
        Self {
            shadows: true,
            ambient_occlusion: true,
            environment_map: true,
            animations: true,
            progressive_loading: true,
            enhanced_models: true,
        }
    }

    /// Every feature disabled.
    pub const fn none() -> Self {
        Self {
            shadows: false,
            ambient_occlusion: false,
            environment_map: false,
            animations: false,
            progressive_loading: false,
            enhanced_models: false,
        }
    }

    /// Number of enabled features.
    pub fn enabled_count(&self) -> usize {
        [
            self.shadows,
            self.ambient_occlusion,
            self.environment_map,
            self.animations,
            self.progressive_loading,
            self.enhanced_models,
        ]
        .iter()
        .filter(|on| **on)
        .count()
    }
}

impl Default for RenderFeatures {
    fn default() -> Self {
        Self::all()
    }
}

/// Parameters applied when a render surface is (re)created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceParams {
    /// Device pixel ratio the surface renders at.
    pub pixel_ratio: f32,
    /// Whether multisample antialiasing is requested.
    pub antialias: bool,
    /// Requested shader precision.
    pub precision: ShaderPrecision,
    /// Requested power preference.
    pub power_preference: PowerPreference,
    /// Memory-intensive features enabled on this surface.
    pub features: RenderFeatures,
}

impl SurfaceParams {
    /// Builds the parameters for `tier` on a device whose native pixel ratio
    /// is `native_pixel_ratio`, with `native_cap` as the normal ceiling.
    pub fn for_tier(tier: QualityTier, native_pixel_ratio: f32, native_cap: f32) -> Self {
        let native = if native_pixel_ratio.is_finite() && native_pixel_ratio > 0.0 {
            native_pixel_ratio
        } else {
            1.0
        };
        let pixel_ratio = native.min(tier.pixel_ratio_cap(native_cap));
        match tier {
            QualityTier::Full => Self {
                pixel_ratio,
                antialias: true,
                precision: ShaderPrecision::High,
                power_preference: PowerPreference::Default,
                features: tier.features(),
            },
            QualityTier::Reduced | QualityTier::Minimal => Self {
                pixel_ratio,
                antialias: false,
                precision: ShaderPrecision::Low,
                power_preference: PowerPreference::LowPower,
                features: tier.features(),
            },
        }
    }
}
