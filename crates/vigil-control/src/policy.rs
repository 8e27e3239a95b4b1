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

//! The quality degradation policy.
//!
//! A pure decision function: given how many losses the tracking window
//! holds and the tier currently in effect, it returns the tier the next
//! surface (re)creation should use. It never proposes an upgrade, so
//! degradation is monotonic for the life of a session.

use crate::config::ResilienceConfig;
use vigil_core::{PowerPreference, QualityTier, RenderFeatures, ShaderPrecision, SurfaceParams};

/// The outcome of one policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityDecision {
    /// `true` if this evaluation moves the session to a lower tier.
    pub escalate: bool,
    /// Tier to apply on the next surface (re)creation.
    pub tier: QualityTier,
    /// Pixel-ratio ceiling for that tier.
    pub pixel_ratio_cap: f32,
    /// Whether antialiasing stays enabled.
    pub antialiasing: bool,
    /// Shader precision for that tier.
    pub precision: ShaderPrecision,
    /// Power preference for that tier.
    pub power_preference: PowerPreference,
    /// Memory-intensive features kept enabled.
    pub features: RenderFeatures,
}

impl QualityDecision {
    /// The surface parameters this decision yields on a device whose
    /// native pixel ratio is `native_pixel_ratio`.
    pub fn surface_params(&self, native_pixel_ratio: f32) -> SurfaceParams {
        SurfaceParams::for_tier(self.tier, native_pixel_ratio, self.pixel_ratio_cap)
    }
}

/// Maps loss history to a quality tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityPolicy {
    threshold: usize,
    native_pixel_ratio_cap: f32,
}

impl QualityPolicy {
    /// Creates a policy from the resilience configuration.
    pub fn new(config: &ResilienceConfig) -> Self {
        let config = config.sanitized();
        Self {
            threshold: config.max_losses_before_reduction,
            native_pixel_ratio_cap: config.native_pixel_ratio_cap,
        }
    }

    /// Number of in-window losses at which quality is reduced.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Evaluates the policy after a loss has been recorded.
    pub fn decide(&self, losses_in_window: usize, current_tier: QualityTier) -> QualityDecision {
        let (escalate, tier) = if current_tier.is_degraded() {
            // Already reduced for this session; never upgrade, never go lower.
            (false, current_tier)
        } else if losses_in_window >= self.threshold {
            (true, QualityTier::Reduced)
        } else {
            (false, QualityTier::Full)
        };

        let template = SurfaceParams::for_tier(
            tier,
            self.native_pixel_ratio_cap,
            self.native_pixel_ratio_cap,
        );
        QualityDecision {
            escalate,
            tier,
            pixel_ratio_cap: tier.pixel_ratio_cap(self.native_pixel_ratio_cap),
            antialiasing: template.antialias,
            precision: template.precision,
            power_preference: template.power_preference,
            features: template.features,
        }
    }
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self::new(&ResilienceConfig::default())
    }
}
