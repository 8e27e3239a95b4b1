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

mod common;

use common::Harness;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vigil_control::ResilienceConfig;
use vigil_core::{Clock, FrameLoop, LogLevel, NoticeKind, QualityTier, SurfacePhase};

const MINUTE: Duration = Duration::from_secs(60);

// --- Scenarios ---

#[test]
fn test_single_loss_then_quick_restore_returns_to_stable() {
    let mut h = Harness::new();
    let notices = Arc::new(Mutex::new(Vec::new()));
    let notices_clone = notices.clone();
    let _subscription = h.monitor.subscribe(move |state| {
        if let Some(message) = &state.user_message {
            notices_clone.lock().unwrap().push(message.kind);
        }
    });
    let mounted_entries = h.diagnostics.entries().len();

    h.lose();
    h.advance(Duration::from_millis(800));
    h.restore();

    assert_eq!(h.monitor.phase(), SurfacePhase::Stable);
    assert!(!h.monitor.state().degradation_active);
    assert_eq!(h.monitor.state().current_quality_tier, QualityTier::Full);
    assert_eq!(
        *notices.lock().unwrap(),
        vec![NoticeKind::Paused, NoticeKind::Restored]
    );

    let levels: Vec<LogLevel> = h.diagnostics.entries()[mounted_entries..]
        .iter()
        .map(|e| e.level)
        .collect();
    assert_eq!(levels, vec![LogLevel::Warn, LogLevel::Success]);
}

#[test]
fn test_three_losses_within_four_minutes_degrade_quality() {
    let mut h = Harness::new();
    for i in 0..3 {
        if i > 0 {
            h.advance(2 * MINUTE);
        }
        h.lose();
        h.advance(Duration::from_secs(1));
        h.restore();
    }

    let state = h.monitor.state();
    assert_eq!(h.monitor.phase(), SurfacePhase::DegradedStable);
    assert!(state.degradation_active);
    assert_eq!(state.current_quality_tier, QualityTier::Reduced);
    assert_eq!(
        state.user_message.as_ref().map(|m| m.kind),
        Some(NoticeKind::QualityReduced)
    );

    let params = h.monitor.surface_params();
    assert!(params.pixel_ratio <= 1.0);
    assert!(!params.antialias);
    assert_eq!(params.features.enabled_count(), 0);

    // The reduced parameters were applied when the surface was recreated.
    let last = h.surface().recreated_with.last().copied().unwrap();
    assert!(last.pixel_ratio <= 1.0);
    assert!(!last.antialias);
}

#[test]
fn test_losses_ten_minutes_apart_never_degrade() {
    let mut h = Harness::new();
    h.lose();
    h.restore();
    h.advance(10 * MINUTE);
    h.lose();

    assert_eq!(h.monitor.state().losses_in_window(), 1);
    h.restore();
    assert_eq!(h.monitor.phase(), SurfacePhase::Stable);
    assert!(!h.monitor.state().degradation_active);
}

#[test]
fn test_escalation_message_is_set_at_loss_time() {
    let mut h = Harness::new();
    for _ in 0..2 {
        h.lose();
        h.restore();
    }
    h.lose();

    let state = h.monitor.state();
    assert_eq!(state.phase, SurfacePhase::Recovering);
    assert!(state.degradation_active);
    assert_eq!(
        state.user_message.as_ref().map(|m| m.kind),
        Some(NoticeKind::PausedRepeated)
    );
}

// --- Properties ---

#[test]
fn test_window_purge_keeps_only_recent_losses() {
    let mut h = Harness::new();
    let window = ResilienceConfig::default().tracking_window();
    let gaps_s = [5u64, 120, 40, 299, 301, 1, 0, 150, 150, 600, 30, 270, 300];

    for gap in gaps_s {
        h.advance(Duration::from_secs(gap));
        h.lose();
        let now = h.clock.now();
        for event in &h.monitor.state().loss_events {
            assert!(now.duration_since(*event) < window);
        }
        h.restore();
    }
}

#[test]
fn test_loss_exactly_one_window_old_is_purged() {
    let mut h = Harness::new();
    h.lose();
    h.restore();
    h.advance(Duration::from_millis(300_000));
    h.lose();
    assert_eq!(h.monitor.state().losses_in_window(), 1);
}

#[test]
fn test_degradation_is_monotonic() {
    let mut h = Harness::new();
    for _ in 0..3 {
        h.lose();
        h.restore();
    }
    assert!(h.monitor.state().degradation_active);

    for _ in 0..6 {
        // Long quiet periods empty the window; quality still stays reduced.
        h.advance(20 * MINUTE);
        h.lose();
        assert!(h.monitor.state().degradation_active);
        h.restore();
        assert!(h.monitor.state().degradation_active);
        assert_eq!(h.monitor.phase(), SurfacePhase::DegradedStable);
        assert_eq!(
            h.monitor.state().current_quality_tier,
            QualityTier::Reduced
        );
    }
}

#[test]
fn test_two_losses_stay_full_and_third_escalates() {
    let mut h = Harness::new();
    h.lose();
    h.restore();
    h.advance(MINUTE);
    h.lose();
    assert!(!h.monitor.state().degradation_active);
    h.restore();

    h.advance(MINUTE);
    h.lose();
    assert!(h.monitor.state().degradation_active);
}

#[test]
fn test_no_frames_submitted_while_lost() {
    let mut h = Harness::new();
    assert!(h.monitor.render_frame());

    h.lose();
    for _ in 0..10 {
        assert!(!h.monitor.render_frame());
    }
    assert_eq!(h.surface().frame_loop, FrameLoop::Never);

    h.restore();
    assert!(h.monitor.render_frame());
    assert_eq!(h.surface().frame_loop, FrameLoop::Always);
    assert_eq!(h.surface().frames, 2);
    assert_eq!(h.surface().frames_while_suspended, 0);
}

#[test]
fn test_state_stays_consistent_through_a_session() {
    let mut h = Harness::new();
    for step in 0..12 {
        h.advance(Duration::from_secs(45));
        h.lose();
        assert!(h.monitor.state().is_consistent(), "after loss {step}");
        h.restore();
        assert!(h.monitor.state().is_consistent(), "after restore {step}");
    }
}

// --- Canvas status and teardown ---

#[test]
fn test_canvas_status_follows_the_surface() {
    let mut h = Harness::new();
    let status = h.diagnostics.canvas_status();
    assert!(status.mounted && status.created && status.rendering);

    h.lose();
    let status = h.diagnostics.canvas_status();
    assert!(!status.rendering);
    assert_eq!(status.error.as_deref(), Some("Rendering context lost"));

    h.restore();
    let status = h.diagnostics.canvas_status();
    assert!(status.rendering);
    assert_eq!(status.error, None);

    h.monitor.teardown();
    let status = h.diagnostics.canvas_status();
    assert!(!status.mounted && !status.created && !status.rendering);
}

#[test]
fn test_teardown_releases_surface_and_detaches_listeners() {
    let mut h = Harness::new();
    let calls = Arc::new(Mutex::new(0));
    let calls_clone = calls.clone();
    let _subscription = h.monitor.subscribe(move |_| {
        *calls_clone.lock().unwrap() += 1;
    });

    h.lose();
    assert_eq!(*calls.lock().unwrap(), 1);
    h.monitor.teardown();
    h.restore();
    assert_eq!(*calls.lock().unwrap(), 1);
    assert!(h.monitor.surface().is_none());
}

// --- Adaptive pixel ratio ---

#[test]
fn test_slow_frames_lower_pixel_ratio() {
    let mut h = Harness::new();
    for _ in 0..30 {
        h.monitor.render_frame();
        h.monitor.report_frame_time(Duration::from_millis(50));
    }
    assert_eq!(h.monitor.surface_params().pixel_ratio, 1.75);
    assert_eq!(h.surface().recreated_with.len(), 1);
}

#[test]
fn test_frame_reports_are_ignored_while_lost() {
    let mut h = Harness::new();
    h.lose();
    for _ in 0..60 {
        h.monitor.report_frame_time(Duration::from_millis(50));
    }
    assert_eq!(h.monitor.surface_params().pixel_ratio, 2.0);
}

#[test]
fn test_adaptive_ratio_never_exceeds_reduced_cap() {
    let mut h = Harness::new();
    for _ in 0..3 {
        h.lose();
        h.restore();
    }
    for _ in 0..300 {
        h.monitor.report_frame_time(Duration::from_millis(8));
    }
    assert!(h.monitor.surface_params().pixel_ratio <= 1.0);
}

#[test]
fn test_adaptive_ratio_can_be_disabled() {
    let mut h = Harness::with(
        ResilienceConfig {
            adaptive_pixel_ratio: false,
            ..Default::default()
        },
        2.0,
    );
    for _ in 0..90 {
        h.monitor.report_frame_time(Duration::from_millis(100));
    }
    assert_eq!(h.monitor.surface_params().pixel_ratio, 2.0);
}
