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

//! # Vigil Core
//!
//! Foundational crate containing the types, traits and interface contracts
//! shared by every part of the rendering resilience stack: the surface
//! signals, the quality tiers, the resilience state record, the diagnostics
//! vocabulary, and the observer plumbing that ties them together.

#![warn(missing_docs)]

pub mod diagnostics;
pub mod event;
pub mod graphics;
pub mod resilience;
pub mod utils;

pub use diagnostics::{CanvasStatus, CanvasStatusUpdate, DiagnosticsEntry, LogLevel};
pub use event::{EventBus, Observers, Subscription};
pub use graphics::{
    CapabilityProbe, CapabilitySnapshot, FeatureLevel, FrameLoop, PowerPreference, ProbeError,
    QualityTier, RenderFeatures, RenderSurface, ShaderPrecision, SurfaceParams, SurfaceSignal,
};
pub use resilience::{NoticeKind, ResilienceState, SurfacePhase, UserMessage};
pub use utils::clock::{Clock, ManualClock, SystemClock};
pub use utils::timer::{ScopedTimer, Stopwatch};
