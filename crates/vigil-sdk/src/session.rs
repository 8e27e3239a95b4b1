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

use crate::config::VigilConfig;
use crate::viewer::Viewer;
use anyhow::Result;
use std::sync::Arc;
use vigil_core::{
    CapabilityProbe, CapabilitySnapshot, Clock, RenderSurface, SurfaceParams, SurfaceSignal,
    SystemClock,
};
use vigil_telemetry::DiagnosticsSink;

/// One application session: configuration, the diagnostics sink, and the
/// capability snapshot taken at startup.
///
/// Everything here is session-scoped; nothing persists across restarts.
#[derive(Debug, Clone)]
pub struct Session {
    config: VigilConfig,
    diagnostics: DiagnosticsSink,
    clock: Arc<dyn Clock>,
    capability: CapabilitySnapshot,
}

impl Session {
    /// Starts a session on the system clock, probing graphics capability once.
    pub async fn start<P>(config: VigilConfig, prober: &P) -> Self
    where
        P: CapabilityProbe + ?Sized,
    {
        Self::start_with_clock(config, prober, Arc::new(SystemClock)).await
    }

    /// Starts a session on `clock`, probing graphics capability once.
    pub async fn start_with_clock<P>(config: VigilConfig, prober: &P, clock: Arc<dyn Clock>) -> Self
    where
        P: CapabilityProbe + ?Sized,
    {
        let config = config.sanitized();
        let diagnostics = DiagnosticsSink::with_clock(&config.diagnostics, Arc::clone(&clock));

        let capability = prober.probe().await;
        if capability.supported {
            diagnostics.success(capability.summary());
        } else {
            diagnostics.error(capability.summary());
        }
        diagnostics.record_capability(capability.clone());

        Self {
            config,
            diagnostics,
            clock,
            capability,
        }
    }

    /// Blocking variant of [`Session::start`].
    pub fn start_blocking<P>(config: VigilConfig, prober: &P) -> Self
    where
        P: CapabilityProbe + ?Sized,
    {
        pollster::block_on(Self::start(config, prober))
    }

    /// The effective (sanitized) configuration.
    pub fn config(&self) -> &VigilConfig {
        &self.config
    }

    /// The session's diagnostics sink.
    pub fn diagnostics(&self) -> &DiagnosticsSink {
        &self.diagnostics
    }

    /// The session clock.
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// The startup capability snapshot.
    pub fn capability(&self) -> &CapabilitySnapshot {
        &self.capability
    }

    /// `true` if the probe found a usable graphics context.
    pub fn is_supported(&self) -> bool {
        self.capability.supported
    }

    /// Mounts a viewer.
    ///
    /// `factory` is only called when the probe succeeded; otherwise the
    /// viewer shows the static fallback and no surface is ever created.
    pub fn mount_viewer<S, F>(&self, native_pixel_ratio: f32, factory: F) -> Viewer<S>
    where
        S: RenderSurface,
        F: FnOnce(&SurfaceParams, flume::Sender<SurfaceSignal>) -> Result<S>,
    {
        Viewer::mount(self, native_pixel_ratio, factory)
    }
}
