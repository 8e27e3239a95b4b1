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

//! The render surface lifecycle monitor.
//!
//! The monitor is the single writer of [`ResilienceState`]. Platform
//! callbacks push [`SurfaceSignal`]s into its event bus from any thread; the
//! owning (UI) thread calls [`LifecycleMonitor::pump`] to apply them in
//! delivery order. Nothing here returns an error: context loss is an
//! expected, recoverable condition surfaced only through state and
//! diagnostics.

use crate::config::ResilienceConfig;
use crate::frame_rate::{AdaptivePixelRatio, FrameRateReporter};
use crate::policy::QualityPolicy;
use std::sync::Arc;
use std::time::Duration;
use vigil_core::{
    CanvasStatusUpdate, Clock, EventBus, FrameLoop, Observers, QualityTier, RenderSurface,
    ResilienceState, Subscription, SurfaceParams, SurfacePhase, SurfaceSignal, UserMessage,
};
use vigil_telemetry::DiagnosticsSink;

/// Canvas error recorded while a context loss is outstanding.
pub const CONTEXT_LOST_ERROR: &str = "Rendering context lost";

/// Owns a live render surface and drives its resilience state machine.
pub struct LifecycleMonitor<S: RenderSurface> {
    config: ResilienceConfig,
    policy: QualityPolicy,
    surface: Option<S>,
    state: ResilienceState,
    params: SurfaceParams,
    frame_loop: FrameLoop,
    native_pixel_ratio: f32,
    signals: EventBus<SurfaceSignal>,
    observers: Observers<ResilienceState>,
    diagnostics: DiagnosticsSink,
    clock: Arc<dyn Clock>,
    frame_rate: FrameRateReporter,
    adaptive: Option<AdaptivePixelRatio>,
    frames_submitted: u64,
}

impl<S: RenderSurface> LifecycleMonitor<S> {
    /// Mounts a surface at full quality.
    ///
    /// `create` receives the initial surface parameters and the sender the
    /// surface must use to report loss and restore signals. If it fails,
    /// the error is recorded in diagnostics and returned; no monitor exists.
    pub fn new<F, E>(
        config: &ResilienceConfig,
        native_pixel_ratio: f32,
        diagnostics: DiagnosticsSink,
        clock: Arc<dyn Clock>,
        create: F,
    ) -> Result<Self, E>
    where
        F: FnOnce(&SurfaceParams, flume::Sender<SurfaceSignal>) -> Result<S, E>,
        E: std::fmt::Display,
    {
        let config = config.sanitized();
        let policy = QualityPolicy::new(&config);
        let params = policy
            .decide(0, QualityTier::Full)
            .surface_params(native_pixel_ratio);
        let signals = EventBus::new();

        diagnostics.update_canvas_status(CanvasStatusUpdate {
            mounted: Some(true),
            ..Default::default()
        });

        let mut surface = match create(&params, signals.sender()) {
            Ok(surface) => surface,
            Err(e) => {
                diagnostics.error(format!("Render surface creation failed: {e}"));
                // No monitor will exist to tear the canvas down later.
                diagnostics.update_canvas_status(CanvasStatusUpdate {
                    mounted: Some(false),
                    error: Some(Some(e.to_string())),
                    ..Default::default()
                });
                return Err(e);
            }
        };
        surface.set_frame_loop(FrameLoop::Always);

        diagnostics.success(format!(
            "Render surface created ({}, pixel ratio {:.2}, {} quality)",
            surface.describe(),
            params.pixel_ratio,
            QualityTier::Full
        ));
        diagnostics.update_canvas_status(CanvasStatusUpdate {
            created: Some(true),
            rendering: Some(true),
            error: Some(None),
            ..Default::default()
        });

        let adaptive = config
            .adaptive_pixel_ratio
            .then(|| AdaptivePixelRatio::new(params.pixel_ratio, params.pixel_ratio));

        Ok(Self {
            config,
            policy,
            surface: Some(surface),
            state: ResilienceState::default(),
            params,
            frame_loop: FrameLoop::Always,
            native_pixel_ratio,
            signals,
            observers: Observers::new(),
            diagnostics,
            clock,
            frame_rate: FrameRateReporter::new(),
            adaptive,
            frames_submitted: 0,
        })
    }

    /// A sender for loss/restore signals, for callbacks registered after mount.
    pub fn signal_sender(&self) -> flume::Sender<SurfaceSignal> {
        self.signals.sender()
    }

    /// Applies every queued signal in delivery order. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let pending = self.signals.drain();
        let count = pending.len();
        for signal in pending {
            self.handle_signal(signal);
        }
        count
    }

    /// Applies one signal.
    pub fn handle_signal(&mut self, signal: SurfaceSignal) {
        match signal {
            SurfaceSignal::Lost { reason } => self.on_context_lost(&reason),
            SurfaceSignal::Restored => self.on_context_restored(),
        }
    }

    /// Handles a context loss: suspends rendering, records the loss, and
    /// consults the policy.
    pub fn on_context_lost(&mut self, reason: &str) {
        if self.surface.is_none() {
            log::debug!("Context loss after teardown ignored.");
            return;
        }
        if self.state.context_lost {
            log::debug!("Context loss while already lost ignored ({reason}).");
            return;
        }

        let now = self.clock.now();
        let window = self.config.tracking_window();
        self.state.loss_events.push_back(now);
        while let Some(oldest) = self.state.loss_events.front() {
            if now.saturating_duration_since(*oldest) >= window {
                self.state.loss_events.pop_front();
            } else {
                break;
            }
        }

        self.state.context_lost = true;
        self.state.phase = SurfacePhase::Lost;
        self.set_frame_loop(FrameLoop::Never);
        self.frame_rate.reset();

        let losses = self.state.losses_in_window();
        let decision = self
            .policy
            .decide(losses, self.state.current_quality_tier);

        if decision.escalate {
            self.state.degradation_active = true;
            self.state.current_quality_tier = decision.tier;
            self.params = decision.surface_params(self.native_pixel_ratio);
            if let Some(adaptive) = self.adaptive.as_mut() {
                self.params.pixel_ratio = adaptive.set_cap(self.params.pixel_ratio);
            }
            self.state.user_message = Some(UserMessage::paused_repeated());
            self.diagnostics.warn(format!(
                "Rendering context lost ({reason}); {losses} losses within {}s, reducing to {} quality",
                window.as_secs(),
                decision.tier
            ));
        } else {
            self.state.user_message = Some(UserMessage::paused());
            self.diagnostics.warn(format!(
                "Rendering context lost ({reason}); {losses} of {} losses before reduction",
                self.policy.threshold()
            ));
        }

        self.diagnostics.update_canvas_status(CanvasStatusUpdate {
            rendering: Some(false),
            error: Some(Some(CONTEXT_LOST_ERROR.to_string())),
            ..Default::default()
        });

        // The handler is done; the platform owns the restore from here.
        self.state.phase = SurfacePhase::Recovering;
        self.publish();
    }

    /// Handles a context restore: recreates the surface with the parameters
    /// currently in effect and resumes rendering.
    pub fn on_context_restored(&mut self) {
        if !self.state.context_lost {
            log::debug!("Context restore without an outstanding loss ignored.");
            return;
        }
        let params = self.params;
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.recreate(&params);

        self.state.context_lost = false;
        if self.state.degradation_active {
            self.state.phase = SurfacePhase::DegradedStable;
            self.state.user_message = Some(UserMessage::quality_reduced());
            self.diagnostics.success(format!(
                "Rendering context restored in {} quality (pixel ratio {:.2}, antialiasing off)",
                self.state.current_quality_tier, params.pixel_ratio
            ));
        } else {
            self.state.phase = SurfacePhase::Stable;
            self.state.user_message = Some(UserMessage::restored());
            self.diagnostics.success("Rendering context restored");
        }
        self.set_frame_loop(FrameLoop::Always);

        self.diagnostics.update_canvas_status(CanvasStatusUpdate {
            rendering: Some(true),
            error: Some(None),
            ..Default::default()
        });
        self.publish();
    }

    /// Submits one frame if the render loop is running. Returns whether a
    /// frame was submitted.
    pub fn render_frame(&mut self) -> bool {
        if self.frame_loop == FrameLoop::Never {
            return false;
        }
        match self.surface.as_mut() {
            Some(surface) => {
                surface.submit_frame();
                self.frames_submitted += 1;
                true
            }
            None => false,
        }
    }

    /// Feeds one measured frame interval to the adaptive pixel-ratio
    /// controller. Ignored while the context is lost.
    pub fn report_frame_time(&mut self, frame_time: Duration) {
        if self.state.context_lost || self.surface.is_none() {
            return;
        }
        let Some(fps) = self.frame_rate.record(frame_time) else {
            return;
        };
        log::trace!("Measured {fps} fps.");
        let Some(adaptive) = self.adaptive.as_mut() else {
            return;
        };
        if let Some(pixel_ratio) = adaptive.on_report(fps) {
            self.params.pixel_ratio = pixel_ratio;
            let params = self.params;
            if let Some(surface) = self.surface.as_mut() {
                surface.recreate(&params);
            }
        }
    }

    /// The current resilience state.
    pub fn state(&self) -> &ResilienceState {
        &self.state
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> SurfacePhase {
        self.state.phase
    }

    /// Parameters the surface is (or will be, on restore) configured with.
    pub fn surface_params(&self) -> &SurfaceParams {
        &self.params
    }

    /// Whether the render loop is running.
    pub fn frame_loop(&self) -> FrameLoop {
        self.frame_loop
    }

    /// Total frames submitted since mount.
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// The owned surface, until teardown.
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Mutable access to the owned surface, for hosts that drive it directly.
    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    /// `true` once [`teardown`](Self::teardown) has run.
    pub fn is_torn_down(&self) -> bool {
        self.surface.is_none()
    }

    /// Registers a listener called with the new state after every transition.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ResilienceState) + Send + Sync + 'static,
    {
        self.observers.subscribe(listener)
    }

    /// Releases the surface and detaches every listener. Idempotent; also
    /// runs on drop.
    pub fn teardown(&mut self) {
        let Some(mut surface) = self.surface.take() else {
            return;
        };
        self.frame_loop = FrameLoop::Never;
        surface.set_frame_loop(FrameLoop::Never);
        surface.release();
        self.observers.clear();
        // Queued signals belong to the released surface.
        let dropped = self.signals.drain().len();
        if dropped > 0 {
            log::debug!("Discarded {dropped} pending surface signal(s) at teardown.");
        }

        self.diagnostics.update_canvas_status(CanvasStatusUpdate {
            mounted: Some(false),
            created: Some(false),
            rendering: Some(false),
            ..Default::default()
        });
        self.diagnostics.info("Render surface released");
    }

    fn set_frame_loop(&mut self, frame_loop: FrameLoop) {
        self.frame_loop = frame_loop;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_frame_loop(frame_loop);
        }
    }

    fn publish(&self) {
        debug_assert!(self.state.is_consistent());
        log::debug!(
            "Resilience state: {} (tier {}, {} loss(es) in window).",
            self.state.phase,
            self.state.current_quality_tier,
            self.state.losses_in_window()
        );
        self.observers.notify(&self.state);
    }
}

impl<S: RenderSurface> Drop for LifecycleMonitor<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<S: RenderSurface> std::fmt::Debug for LifecycleMonitor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleMonitor")
            .field("state", &self.state)
            .field("params", &self.params)
            .field("frame_loop", &self.frame_loop)
            .field("mounted", &self.surface.is_some())
            .finish()
    }
}
