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

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vigil_core::{
    CapabilityProbe, CapabilitySnapshot, FrameLoop, LogLevel, ManualClock, QualityTier,
    RenderSurface, SurfaceParams, SurfacePhase, SurfaceSignal,
};
use vigil_sdk::{Overlay, Session, VigilConfig, FALLBACK_MESSAGE};

struct FixedProbe {
    snapshot: CapabilitySnapshot,
    calls: AtomicUsize,
}

impl FixedProbe {
    fn supported() -> Self {
        Self {
            snapshot: CapabilitySnapshot {
                supported: true,
                feature_level_1: true,
                feature_level_2: true,
                vendor: "Test".into(),
                renderer: "Test Renderer".into(),
                ..Default::default()
            },
            calls: AtomicUsize::new(0),
        }
    }

    fn unsupported() -> Self {
        Self {
            snapshot: CapabilitySnapshot::unsupported("No usable graphics adapter"),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CapabilityProbe for FixedProbe {
    async fn probe(&self) -> CapabilitySnapshot {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.snapshot.clone()
    }
}

/// A surface that reports losses through the channel it was given.
struct ScriptedSurface {
    signals: flume::Sender<SurfaceSignal>,
    frame_loop: FrameLoop,
    recreated_with: Vec<SurfaceParams>,
}

impl ScriptedSurface {
    fn lose(&self) {
        self.signals
            .send(SurfaceSignal::Lost {
                reason: "memory pressure".into(),
            })
            .unwrap();
    }

    fn restore(&self) {
        self.signals.send(SurfaceSignal::Restored).unwrap();
    }
}

impl RenderSurface for ScriptedSurface {
    fn submit_frame(&mut self) {
        assert_eq!(self.frame_loop, FrameLoop::Always);
    }
    fn recreate(&mut self, params: &SurfaceParams) {
        self.recreated_with.push(*params);
    }
    fn set_frame_loop(&mut self, frame_loop: FrameLoop) {
        self.frame_loop = frame_loop;
    }
    fn release(&mut self) {}
}

fn session(probe: &FixedProbe) -> (Arc<ManualClock>, Session) {
    let clock = Arc::new(ManualClock::new());
    let session = pollster::block_on(Session::start_with_clock(
        VigilConfig::default(),
        probe,
        clock.clone(),
    ));
    (clock, session)
}

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn test_session_probes_exactly_once() {
    let probe = FixedProbe::supported();
    let (_, session) = session(&probe);
    let _a = session.mount_viewer(2.0, |_, signals| {
        Ok(ScriptedSurface {
            signals,
            frame_loop: FrameLoop::Always,
            recreated_with: Vec::new(),
        })
    });
    let _b = session.mount_viewer(2.0, |_, signals| {
        Ok(ScriptedSurface {
            signals,
            frame_loop: FrameLoop::Always,
            recreated_with: Vec::new(),
        })
    });
    assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    assert!(session.diagnostics().capability().is_some());
    assert_eq!(session.diagnostics().entries_at(LogLevel::Success).len(), 3);
}

#[test]
fn test_failed_probe_shows_fallback_without_surface() {
    let probe = FixedProbe::unsupported();
    let (_, session) = session(&probe);
    let mut factory_called = false;
    let mut viewer = session.mount_viewer(2.0, |_, signals| {
        factory_called = true;
        Ok(ScriptedSurface {
            signals,
            frame_loop: FrameLoop::Always,
            recreated_with: Vec::new(),
        })
    });

    assert!(!factory_called);
    assert!(viewer.is_fallback());
    assert_eq!(viewer.overlay(), Overlay::Fallback(FALLBACK_MESSAGE.into()));
    assert!(viewer.monitor().is_none());
    assert!(!viewer.frame(FRAME));
    assert_eq!(session.diagnostics().entries_at(LogLevel::Error).len(), 1);
    assert!(!session.diagnostics().canvas_status().created);
}

#[test]
fn test_factory_error_falls_back() {
    let probe = FixedProbe::supported();
    let (_, session) = session(&probe);
    let viewer = session.mount_viewer::<ScriptedSurface, _>(2.0, |_, _| {
        Err(anyhow::anyhow!("device request failed"))
    });
    assert!(viewer.is_fallback());
    let errors = session.diagnostics().entries_at(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("device request failed"));
}

#[test]
fn test_unmount_after_factory_error_leaves_canvas_unmounted() {
    let probe = FixedProbe::supported();
    let (_, session) = session(&probe);
    let mut viewer = session.mount_viewer::<ScriptedSurface, _>(2.0, |_, _| {
        Err(anyhow::anyhow!("device request failed"))
    });
    assert!(!session.diagnostics().canvas_status().mounted);

    viewer.unmount();

    let snapshot = session.diagnostics().snapshot();
    assert_eq!(snapshot.components.get("viewer"), Some(&false));
    assert!(!snapshot.canvas.mounted);
    assert!(!snapshot.canvas.created);
    assert_eq!(
        snapshot.canvas.error.as_deref(),
        Some("device request failed")
    );
}

#[test]
fn test_signals_flow_through_frame_ticks() {
    let probe = FixedProbe::supported();
    let (clock, session) = session(&probe);
    let mut viewer = session.mount_viewer(2.0, |_, signals| {
        Ok(ScriptedSurface {
            signals,
            frame_loop: FrameLoop::Always,
            recreated_with: Vec::new(),
        })
    });
    assert!(viewer.frame(FRAME));

    viewer.monitor().unwrap().surface().unwrap().lose();
    assert!(!viewer.frame(FRAME));
    assert!(matches!(viewer.overlay(), Overlay::Banner(_)));
    assert_eq!(viewer.state().unwrap().phase, SurfacePhase::Recovering);

    viewer.monitor().unwrap().surface().unwrap().restore();
    assert!(viewer.frame(FRAME));
    assert_eq!(viewer.state().unwrap().phase, SurfacePhase::Stable);

    clock.advance_ms(3000);
    viewer.frame(FRAME);
    assert_eq!(viewer.overlay(), Overlay::Hidden);
}

#[test]
fn test_three_quick_losses_degrade_the_viewer() {
    let probe = FixedProbe::supported();
    let (clock, session) = session(&probe);
    let mut viewer = session.mount_viewer(3.0, |_, signals| {
        Ok(ScriptedSurface {
            signals,
            frame_loop: FrameLoop::Always,
            recreated_with: Vec::new(),
        })
    });

    for _ in 0..3 {
        viewer.monitor().unwrap().surface().unwrap().lose();
        viewer.frame(FRAME);
        clock.advance_ms(500);
        viewer.monitor().unwrap().surface().unwrap().restore();
        viewer.frame(FRAME);
        clock.advance(Duration::from_secs(60));
    }

    let state = viewer.state().unwrap();
    assert_eq!(state.phase, SurfacePhase::DegradedStable);
    assert_eq!(state.current_quality_tier, QualityTier::Reduced);
    let params = viewer.monitor().unwrap().surface_params();
    assert_eq!(params.pixel_ratio, 1.0);
    assert!(!params.antialias);
    let surface = viewer.monitor().unwrap().surface().unwrap();
    assert_eq!(surface.recreated_with.len(), 3);
    assert_eq!(surface.recreated_with.last(), Some(params));
    assert_eq!(viewer.overlay(), Overlay::Indicator("Reduced quality mode".into()));
}

#[test]
fn test_unmount_releases_everything() {
    let probe = FixedProbe::supported();
    let (_, session) = session(&probe);
    let mut viewer = session.mount_viewer(2.0, |_, signals| {
        Ok(ScriptedSurface {
            signals,
            frame_loop: FrameLoop::Always,
            recreated_with: Vec::new(),
        })
    });
    viewer.unmount();
    viewer.unmount();

    assert!(!viewer.is_mounted());
    assert!(!viewer.frame(FRAME));
    assert!(viewer.monitor().unwrap().is_torn_down());
    let snapshot = session.diagnostics().snapshot();
    assert_eq!(snapshot.components.get("viewer"), Some(&false));
    assert!(!snapshot.canvas.mounted);
}
