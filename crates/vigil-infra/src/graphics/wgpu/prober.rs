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

//! Graphics capability probing with feature-level fallback.
//!
//! The prober attempts to create a throwaway device at the highest feature
//! level first (the primary backends, requiring full WebGPU compliance) and
//! falls back to the baseline level (the secondary backends with
//! WebGL2-class limits). It never touches the live render surface.

use super::conversions::{backend_name, limits_map, vendor_name, IntoWgpu};
use async_trait::async_trait;
use vigil_core::{CapabilityProbe, CapabilitySnapshot, FeatureLevel, ProbeError, Stopwatch};
use wgpu::{Instance, RequestAdapterOptions};

/// What a successful attempt at one feature level found.
struct LevelProbe {
    info: wgpu::AdapterInfo,
    limits: wgpu::Limits,
}

/// wgpu implementation of [`CapabilityProbe`].
#[derive(Debug, Clone)]
pub struct WgpuCapabilityProber {
    levels: Vec<FeatureLevel>,
}

impl WgpuCapabilityProber {
    /// Creates a prober trying the extended level, then the baseline level.
    pub fn new() -> Self {
        Self {
            levels: vec![FeatureLevel::Extended, FeatureLevel::Baseline],
        }
    }

    /// Creates a prober restricted to the given levels, tried highest first.
    pub fn with_levels(mut levels: Vec<FeatureLevel>) -> Self {
        levels.sort_unstable_by(|a, b| b.cmp(a));
        levels.dedup();
        Self { levels }
    }

    /// Probes synchronously, blocking the calling thread.
    pub fn probe_blocking(&self) -> CapabilitySnapshot {
        pollster::block_on(self.probe())
    }

    /// Tries to create a throwaway device at one feature level.
    async fn try_level(&self, level: FeatureLevel) -> Result<LevelProbe, ProbeError> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: level.into_wgpu(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::None,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ProbeError::NoAdapter(format!("{level}: {e}")))?;

        let info = adapter.get_info();
        if level == FeatureLevel::Extended
            && !adapter.get_downlevel_capabilities().is_webgpu_compliant()
        {
            return Err(ProbeError::NoAdapter(format!(
                "{level}: adapter \"{}\" is not fully compliant",
                info.name
            )));
        }

        let required_limits: wgpu::Limits = level.into_wgpu();
        let (device, _queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Vigil Capability Probe Device"),
                required_limits,
                ..Default::default()
            })
            .await
            .map_err(|e| ProbeError::DeviceCreation(format!("{level}: {e}")))?;

        let limits = device.limits();
        log::debug!(
            "{level} probe device created on \"{}\" ({}).",
            info.name,
            backend_name(info.backend)
        );
        Ok(LevelProbe { info, limits })
    }

    async fn probe_levels(&self) -> Result<CapabilitySnapshot, ProbeError> {
        if self.levels.is_empty() {
            return Err(ProbeError::Internal("no feature levels to probe".into()));
        }

        let mut failures = Vec::new();
        for &level in &self.levels {
            log::info!("Probing graphics capability at {level}...");
            match self.try_level(level).await {
                Ok(found) => {
                    return Ok(CapabilitySnapshot {
                        supported: true,
                        // The extended level is a superset of the baseline.
                        feature_level_1: true,
                        feature_level_2: level == FeatureLevel::Extended,
                        vendor: vendor_name(found.info.vendor),
                        renderer: format!(
                            "{} ({})",
                            found.info.name,
                            backend_name(found.info.backend)
                        ),
                        limits: limits_map(&found.limits),
                        error: None,
                    });
                }
                Err(e) => {
                    log::warn!("Graphics probe at {level} failed: {e}");
                    failures.push(e.to_string());
                }
            }
        }
        Err(ProbeError::NoAdapter(failures.join("; ")))
    }
}

impl Default for WgpuCapabilityProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityProbe for WgpuCapabilityProber {
    async fn probe(&self) -> CapabilitySnapshot {
        let stopwatch = Stopwatch::new();
        let snapshot = match self.probe_levels().await {
            Ok(snapshot) => snapshot,
            Err(e) => CapabilitySnapshot::unsupported(e.to_string()),
        };
        log::info!(
            "Graphics capability probe finished in {} ms.",
            stopwatch.elapsed_ms()
        );
        snapshot
    }
}
