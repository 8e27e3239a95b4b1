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

use anyhow::Result;
use vigil_core::{FrameLoop, RenderSurface, SurfaceParams, SurfaceSignal};
use vigil_infra::WgpuSurfaceHost;

/// A surface the script can knock over and bring back.
pub trait Scripted: RenderSurface {
    /// Invalidates the context, as the platform would under memory pressure.
    fn lose(&mut self);

    /// Brings a context back after a loss.
    fn restore(&mut self) -> Result<()>;
}

impl Scripted for WgpuSurfaceHost {
    fn lose(&mut self) {
        self.simulate_context_loss();
    }

    fn restore(&mut self) -> Result<()> {
        WgpuSurfaceHost::restore(self)
    }
}

/// In-process stand-in for a GPU surface. Counts frames and nothing else.
pub struct SimulatedSurface {
    signals: flume::Sender<SurfaceSignal>,
    params: SurfaceParams,
    frame_loop: FrameLoop,
    frames: u64,
}

impl SimulatedSurface {
    pub fn new(params: &SurfaceParams, signals: flume::Sender<SurfaceSignal>) -> Self {
        Self {
            signals,
            params: *params,
            frame_loop: FrameLoop::Always,
            frames: 0,
        }
    }

    fn send(&self, signal: SurfaceSignal) {
        if self.signals.send(signal).is_err() {
            log::debug!("Simulated surface outlived its monitor.");
        }
    }
}

impl RenderSurface for SimulatedSurface {
    fn submit_frame(&mut self) {
        if self.frame_loop == FrameLoop::Always {
            self.frames += 1;
        }
    }

    fn recreate(&mut self, params: &SurfaceParams) {
        self.params = *params;
    }

    fn set_frame_loop(&mut self, frame_loop: FrameLoop) {
        self.frame_loop = frame_loop;
    }

    fn release(&mut self) {
        log::debug!("Simulated surface released after {} frames.", self.frames);
    }

    fn describe(&self) -> String {
        format!(
            "simulated, ratio {:.2}, antialias {}",
            self.params.pixel_ratio, self.params.antialias
        )
    }
}

impl Scripted for SimulatedSurface {
    fn lose(&mut self) {
        self.send(SurfaceSignal::Lost {
            reason: "simulated memory pressure".into(),
        });
    }

    fn restore(&mut self) -> Result<()> {
        self.send(SurfaceSignal::Restored);
        Ok(())
    }
}
