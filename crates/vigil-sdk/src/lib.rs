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

//! # Vigil SDK
//!
//! The surface a host application uses. It loads a [`VigilConfig`], starts a
//! [`Session`] (which probes the graphics capability exactly once), and
//! mounts [`Viewer`]s that wire a render surface to the lifecycle monitor,
//! the diagnostics sink and the notification presenter.

#![warn(missing_docs)]

mod config;
mod session;
mod viewer;

pub use config::{VigilConfig, DEFAULT_CONFIG_FILE};
pub use session::Session;
pub use viewer::{Viewer, FALLBACK_MESSAGE};

pub use vigil_control::ResilienceConfig;
pub use vigil_telemetry::{DiagnosticsConfig, DiagnosticsSink};
pub use vigil_ui::{Overlay, PresenterConfig};
