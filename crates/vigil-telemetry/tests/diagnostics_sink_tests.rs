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

use std::sync::{Arc, Mutex};
use vigil_core::{CanvasStatusUpdate, CapabilitySnapshot, LogLevel, ManualClock};
use vigil_telemetry::{DiagnosticsConfig, DiagnosticsSink, DiagnosticsSnapshot};

fn sink_with_capacity(capacity: usize) -> DiagnosticsSink {
    DiagnosticsSink::with_clock(&DiagnosticsConfig { capacity }, Arc::new(ManualClock::new()))
}

// --- Log behaviour ---

#[test]
fn test_log_is_bounded_fifo() {
    let sink = sink_with_capacity(50);
    for i in 0..60 {
        sink.info(format!("entry {i}"));
    }
    let snapshot = sink.snapshot();
    assert_eq!(snapshot.entries.len(), 50);
    assert_eq!(snapshot.evicted, 10);
    assert_eq!(snapshot.entries[0].message, "entry 10");
    assert_eq!(snapshot.entries[49].message, "entry 59");
}

#[test]
fn test_clones_share_one_store() {
    let sink = sink_with_capacity(10);
    let reporter = sink.clone();
    reporter.warn("Rendering context lost");
    reporter.success("Rendering context restored");

    assert_eq!(sink.entries().len(), 2);
    assert_eq!(sink.entries_at(LogLevel::Warn).len(), 1);
    assert_eq!(sink.entries_at(LogLevel::Success).len(), 1);
}

// --- Subscription ---

#[test]
fn test_subscribers_see_every_change_until_unsubscribed() {
    let sink = sink_with_capacity(10);
    let seen: Arc<Mutex<Vec<DiagnosticsSnapshot>>> = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let subscription = sink.subscribe(move |snapshot| {
        seen_clone.lock().unwrap().push(snapshot.clone());
    });

    sink.info("one");
    sink.update_canvas_status(CanvasStatusUpdate {
        mounted: Some(true),
        ..Default::default()
    });
    assert_eq!(seen.lock().unwrap().len(), 2);
    assert!(seen.lock().unwrap()[1].canvas.mounted);

    subscription.unsubscribe();
    sink.info("two");
    assert_eq!(seen.lock().unwrap().len(), 2);
}

#[test]
fn test_listener_may_read_the_sink_reentrantly() {
    let sink = sink_with_capacity(10);
    let reader = sink.clone();
    let counts = Arc::new(Mutex::new(Vec::new()));
    let counts_clone = counts.clone();
    let _subscription = sink.subscribe(move |_| {
        counts_clone.lock().unwrap().push(reader.entries().len());
    });

    sink.info("a");
    sink.info("b");
    assert_eq!(*counts.lock().unwrap(), vec![1, 2]);
}

// --- Canvas, components and capability ---

#[test]
fn test_canvas_and_component_tracking() {
    let sink = sink_with_capacity(10);
    sink.update_canvas_status(CanvasStatusUpdate {
        mounted: Some(true),
        created: Some(true),
        rendering: Some(true),
        ..Default::default()
    });
    sink.mark_component_mounted("viewer", true);
    sink.mark_component_mounted("overlay", true);
    sink.mark_component_mounted("viewer", false);

    let snapshot = sink.snapshot();
    assert!(snapshot.canvas.rendering);
    assert_eq!(snapshot.components.get("viewer"), Some(&false));
    assert_eq!(snapshot.components.get("overlay"), Some(&true));
}

#[test]
fn test_capability_is_recorded_for_the_overlay() {
    let sink = sink_with_capacity(10);
    assert!(sink.capability().is_none());
    sink.record_capability(CapabilitySnapshot::unsupported("no adapter"));

    let capability = sink.capability().unwrap();
    assert!(!capability.supported);
    assert_eq!(capability.error.as_deref(), Some("no adapter"));

    let json = sink.export_json().unwrap();
    assert!(json.contains("no adapter"));
}
