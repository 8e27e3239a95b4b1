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

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use vigil_control::{LifecycleMonitor, ResilienceConfig};
use vigil_core::{FrameLoop, ManualClock, RenderSurface, SurfaceParams};
use vigil_telemetry::{DiagnosticsConfig, DiagnosticsSink};

/// A surface that records every call made to it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub frame_loop: FrameLoop,
    pub frames: u64,
    pub frames_while_suspended: u64,
    pub recreated_with: Vec<SurfaceParams>,
    pub released: bool,
}

impl RenderSurface for RecordingSurface {
    fn submit_frame(&mut self) {
        if self.frame_loop == FrameLoop::Never {
            self.frames_while_suspended += 1;
        }
        self.frames += 1;
    }

    fn recreate(&mut self, params: &SurfaceParams) {
        self.recreated_with.push(*params);
    }

    fn set_frame_loop(&mut self, frame_loop: FrameLoop) {
        self.frame_loop = frame_loop;
    }

    fn release(&mut self) {
        self.released = true;
    }

    fn describe(&self) -> String {
        "recording surface".to_string()
    }
}

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub diagnostics: DiagnosticsSink,
    pub monitor: LifecycleMonitor<RecordingSurface>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(ResilienceConfig::default(), 2.0)
    }

    pub fn with(config: ResilienceConfig, native_pixel_ratio: f32) -> Self {
        let clock = Arc::new(ManualClock::new());
        let diagnostics = DiagnosticsSink::with_clock(&DiagnosticsConfig::default(), clock.clone());
        let monitor = LifecycleMonitor::new(
            &config,
            native_pixel_ratio,
            diagnostics.clone(),
            clock.clone(),
            |_, _| Ok::<_, String>(RecordingSurface::default()),
        )
        .expect("recording surface never fails");
        Self {
            clock,
            diagnostics,
            monitor,
        }
    }

    pub fn lose(&mut self) {
        self.monitor.on_context_lost("simulated memory pressure");
    }

    pub fn restore(&mut self) {
        self.monitor.on_context_restored();
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }

    pub fn surface(&self) -> &RecordingSurface {
        self.monitor.surface().expect("surface is mounted")
    }
}
