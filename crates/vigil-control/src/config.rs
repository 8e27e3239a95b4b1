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

//! Tunables of the resilience control loop.

use serde::Deserialize;
use std::time::Duration;

/// Configuration for the lifecycle monitor and its quality policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Losses inside the tracking window that trigger quality reduction.
    pub max_losses_before_reduction: usize,
    /// Length of the sliding window loss events are counted over.
    pub tracking_window_ms: u64,
    /// Ceiling on the device pixel ratio under normal operation.
    pub native_pixel_ratio_cap: f32,
    /// Step the pixel ratio with the measured frame rate.
    pub adaptive_pixel_ratio: bool,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_losses_before_reduction: 3,
            tracking_window_ms: 300_000,
            native_pixel_ratio_cap: 2.0,
            adaptive_pixel_ratio: true,
        }
    }
}

impl ResilienceConfig {
    /// The tracking window as a [`Duration`].
    pub fn tracking_window(&self) -> Duration {
        Duration::from_millis(self.tracking_window_ms)
    }

    /// Returns a copy with out-of-range values clamped to usable ones.
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        if config.max_losses_before_reduction == 0 {
            log::warn!("max_losses_before_reduction must be at least 1; using 1.");
            config.max_losses_before_reduction = 1;
        }
        if config.tracking_window_ms == 0 {
            log::warn!("tracking_window_ms must be at least 1; using 1.");
            config.tracking_window_ms = 1;
        }
        if config.native_pixel_ratio_cap.is_nan() || config.native_pixel_ratio_cap < 1.0 {
            log::warn!(
                "native_pixel_ratio_cap {} is below 1.0; using 1.0.",
                config.native_pixel_ratio_cap
            );
            config.native_pixel_ratio_cap = 1.0;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = ResilienceConfig::default();
        assert_eq!(config.max_losses_before_reduction, 3);
        assert_eq!(config.tracking_window(), Duration::from_secs(300));
        assert_eq!(config.native_pixel_ratio_cap, 2.0);
        assert!(config.adaptive_pixel_ratio);
    }

    #[test]
    fn test_sanitize_clamps_invalid_values() {
        let config = ResilienceConfig {
            max_losses_before_reduction: 0,
            tracking_window_ms: 0,
            native_pixel_ratio_cap: f32::NAN,
            adaptive_pixel_ratio: false,
        }
        .sanitized();
        assert_eq!(config.max_losses_before_reduction, 1);
        assert_eq!(config.tracking_window_ms, 1);
        assert_eq!(config.native_pixel_ratio_cap, 1.0);
        assert!(!config.adaptive_pixel_ratio);
    }

    #[test]
    fn test_sanitize_keeps_valid_values() {
        let config = ResilienceConfig {
            max_losses_before_reduction: 5,
            tracking_window_ms: 60_000,
            native_pixel_ratio_cap: 3.0,
            adaptive_pixel_ratio: true,
        };
        assert_eq!(config.sanitized(), config);
    }
}
