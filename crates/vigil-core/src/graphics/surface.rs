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

//! The narrow interface the resilience core consumes from a render library.

use super::quality::SurfaceParams;

/// Signals a render surface raises towards its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceSignal {
    /// The GPU context backing the surface was invalidated.
    Lost {
        /// Platform-provided reason, for diagnostics only.
        reason: String,
    },
    /// A new context is ready and rendering may resume.
    Restored,
}

/// Whether the render loop submits frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameLoop {
    /// Frames are submitted every tick.
    #[default]
    Always,
    /// Frame submission is suspended.
    Never,
}

/// A live render surface owned by the lifecycle monitor.
///
/// The surface is a black box that emits loss/restore signals through
/// whatever channel its constructor was given, accepts frame-loop
/// suspension, and can be recreated with new parameters.
pub trait RenderSurface {
    /// Submits one frame. Only called while the frame loop is `Always`.
    fn submit_frame(&mut self);

    /// Rebuilds the surface's GPU resources with `params`.
    fn recreate(&mut self, params: &SurfaceParams);

    /// Enables or suspends the render loop.
    fn set_frame_loop(&mut self, frame_loop: FrameLoop);

    /// Releases the surface. Called exactly once, when the owning view unmounts.
    fn release(&mut self);

    /// Short human-readable description used in diagnostics.
    fn describe(&self) -> String {
        "render surface".to_string()
    }
}
