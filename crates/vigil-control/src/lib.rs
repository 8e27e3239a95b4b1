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

//! # Vigil Control
//!
//! The control loop of the resilience stack. The [`LifecycleMonitor`] owns
//! the live render surface and its [`ResilienceState`](vigil_core::ResilienceState),
//! consulting the pure [`QualityPolicy`] whenever a context loss is recorded.
//! Frame-time driven pixel-ratio adaptation lives alongside in [`frame_rate`].

#![warn(missing_docs)]

pub mod config;
pub mod frame_rate;
pub mod lifecycle;
pub mod policy;

pub use config::ResilienceConfig;
pub use frame_rate::{AdaptivePixelRatio, FrameRateReporter, RingBuffer};
pub use lifecycle::LifecycleMonitor;
pub use policy::{QualityDecision, QualityPolicy};
