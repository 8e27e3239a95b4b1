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

//! Graphics-facing contracts: what the host device can do, how a render
//! surface is parameterised, and which signals a surface raises.
//!
//! Concrete implementations (for example the `wgpu` backend) live in
//! `vigil-infra`; this module only defines the vocabulary.

mod capability;
mod error;
mod quality;
mod surface;

pub use capability::{CapabilityProbe, CapabilitySnapshot, FeatureLevel};
pub use error::ProbeError;
pub use quality::{PowerPreference, QualityTier, RenderFeatures, ShaderPrecision, SurfaceParams};
pub use surface::{FrameLoop, RenderSurface, SurfaceSignal};
