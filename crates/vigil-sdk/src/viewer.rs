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

use crate::session::Session;
use anyhow::Result;
use std::sync::PoisonError;
use std::time::Duration;
use vigil_control::LifecycleMonitor;
use vigil_core::{RenderSurface, ResilienceState, Subscription, SurfaceParams, SurfaceSignal};
use vigil_telemetry::DiagnosticsSink;
use vigil_ui::{NotificationPresenter, Overlay, SharedPresenter};

/// Text of the static panel shown when no graphics context is available.
pub const FALLBACK_MESSAGE: &str =
    "3D view is not available on this device. Showing the 2D view instead.";

const COMPONENT_NAME: &str = "viewer";

/// A mounted render view.
///
/// Owns the lifecycle monitor (and through it the surface) and the
/// notification presenter. Unmounting, explicitly or by drop, cancels the
/// presenter's timers, detaches listeners and releases the surface.
pub struct Viewer<S: RenderSurface> {
    monitor: Option<LifecycleMonitor<S>>,
    presenter: SharedPresenter,
    subscription: Option<Subscription>,
    diagnostics: DiagnosticsSink,
    mounted: bool,
}

impl<S: RenderSurface> Viewer<S> {
    pub(crate) fn mount<F>(session: &Session, native_pixel_ratio: f32, factory: F) -> Self
    where
        F: FnOnce(&SurfaceParams, flume::Sender<SurfaceSignal>) -> Result<S>,
    {
        let config = session.config();
        let diagnostics = session.diagnostics().clone();
        diagnostics.mark_component_mounted(COMPONENT_NAME, true);

        let presenter =
            NotificationPresenter::new(config.presenter.clone(), session.clock()).shared();

        let monitor = if session.is_supported() {
            LifecycleMonitor::new(
                &config.resilience,
                native_pixel_ratio,
                diagnostics.clone(),
                session.clock(),
                |params, signals| factory(params, signals).map_err(|e| format!("{e:#}")),
            )
            .ok()
        } else {
            None
        };

        let subscription = match &monitor {
            Some(monitor) => Some(monitor.subscribe(NotificationPresenter::listener(&presenter))),
            None => {
                diagnostics.info("Falling back to the 2D view: no usable graphics context");
                presenter
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .show_fallback(FALLBACK_MESSAGE);
                None
            }
        };

        Self {
            monitor,
            presenter,
            subscription,
            diagnostics,
            mounted: true,
        }
    }

    /// Runs one frame tick: applies pending surface signals, submits a
    /// frame if rendering is allowed, feeds the frame time to the adaptive
    /// pixel ratio, and advances the presenter's timers.
    ///
    /// Returns whether a frame was submitted.
    pub fn frame(&mut self, frame_time: Duration) -> bool {
        if !self.mounted {
            return false;
        }
        let submitted = match self.monitor.as_mut() {
            Some(monitor) => {
                monitor.pump();
                let submitted = monitor.render_frame();
                if submitted {
                    monitor.report_frame_time(frame_time);
                }
                submitted
            }
            None => false,
        };
        self.presenter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick();
        submitted
    }

    /// What the notification overlay shows now.
    pub fn overlay(&self) -> Overlay {
        self.presenter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .overlay()
            .clone()
    }

    /// `true` if the viewer is showing the static fallback.
    pub fn is_fallback(&self) -> bool {
        matches!(self.overlay(), Overlay::Fallback(_))
    }

    /// The resilience state, if a surface was created.
    pub fn state(&self) -> Option<&ResilienceState> {
        self.monitor.as_ref().map(LifecycleMonitor::state)
    }

    /// The lifecycle monitor, if a surface was created.
    pub fn monitor(&self) -> Option<&LifecycleMonitor<S>> {
        self.monitor.as_ref()
    }

    /// Mutable access to the lifecycle monitor, if a surface was created.
    pub fn monitor_mut(&mut self) -> Option<&mut LifecycleMonitor<S>> {
        self.monitor.as_mut()
    }

    /// The presenter, for hosts that render the overlay themselves.
    pub fn presenter(&self) -> &SharedPresenter {
        &self.presenter
    }

    /// `true` until [`unmount`](Self::unmount) runs.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Tears the view down. Idempotent; also runs on drop.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.presenter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unmount();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.teardown();
        }
        self.diagnostics.mark_component_mounted(COMPONENT_NAME, false);
    }
}

impl<S: RenderSurface> Drop for Viewer<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
