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

//! The process-wide diagnostics sink.
//!
//! A [`DiagnosticsSink`] is constructed once by the application root and
//! handed by clone to every component that reports. Any component may
//! append; the diagnostics overlay reads snapshots and subscribes to changes.

use super::{DiagnosticsConfig, DiagnosticsLog};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use vigil_core::{
    CanvasStatus, CanvasStatusUpdate, CapabilitySnapshot, Clock, DiagnosticsEntry, LogLevel,
    Observers, Subscription, SystemClock,
};

/// Log target diagnostics entries are mirrored under.
pub const LOG_TARGET: &str = "vigil::diagnostics";

#[derive(Debug)]
struct SinkState {
    log: DiagnosticsLog,
    canvas: CanvasStatus,
    components: BTreeMap<String, bool>,
    capability: Option<CapabilitySnapshot>,
}

/// A point-in-time copy of everything the sink holds.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsSnapshot {
    /// Retained log entries, oldest first.
    pub entries: Vec<DiagnosticsEntry>,
    /// Number of entries evicted from the bounded log so far.
    pub evicted: u64,
    /// Canvas lifecycle status.
    pub canvas: CanvasStatus,
    /// Named components and whether they are currently mounted.
    pub components: BTreeMap<String, bool>,
    /// Result of the startup capability probe, once recorded.
    pub capability: Option<CapabilitySnapshot>,
}

#[derive(Serialize)]
struct ExportedEntry<'a> {
    t_ms: u128,
    level: LogLevel,
    message: &'a str,
}

#[derive(Serialize)]
struct ExportedCanvas<'a> {
    mounted: bool,
    created: bool,
    rendering: bool,
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct Export<'a> {
    entries: Vec<ExportedEntry<'a>>,
    evicted: u64,
    canvas: ExportedCanvas<'a>,
    components: &'a BTreeMap<String, bool>,
    capability: Option<&'a CapabilitySnapshot>,
}

/// Shared handle to the diagnostics log and canvas status.
///
/// Cloning is cheap and every clone refers to the same store.
#[derive(Debug, Clone)]
pub struct DiagnosticsSink {
    state: Arc<Mutex<SinkState>>,
    observers: Observers<DiagnosticsSnapshot>,
    clock: Arc<dyn Clock>,
    started: Instant,
}

impl DiagnosticsSink {
    /// Creates a sink timestamping entries with the system clock.
    pub fn new(config: &DiagnosticsConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a sink timestamping entries with `clock`.
    pub fn with_clock(config: &DiagnosticsConfig, clock: Arc<dyn Clock>) -> Self {
        let config = config.sanitized();
        let started = clock.now();
        Self {
            state: Arc::new(Mutex::new(SinkState {
                log: DiagnosticsLog::with_capacity(config.capacity),
                canvas: CanvasStatus::default(),
                components: BTreeMap::new(),
                capability: None,
            })),
            observers: Observers::new(),
            clock,
            started,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_of(state: &SinkState) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            entries: state.log.iter().cloned().collect(),
            evicted: state.log.evicted(),
            canvas: state.canvas.clone(),
            components: state.components.clone(),
            capability: state.capability.clone(),
        }
    }

    /// Runs `mutate` under the lock, then notifies subscribers with the
    /// resulting snapshot once the lock is released.
    fn mutate<F: FnOnce(&mut SinkState)>(&self, mutate: F) {
        let snapshot = {
            let mut state = self.lock();
            mutate(&mut state);
            if self.observers.is_empty() {
                None
            } else {
                Some(Self::snapshot_of(&state))
            }
        };
        if let Some(snapshot) = snapshot {
            self.observers.notify(&snapshot);
        }
    }

    /// Appends an entry to the log and mirrors it to the `log` facade.
    pub fn add_entry(&self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        log::log!(target: LOG_TARGET, level.as_log_level(), "[{level}] {message}");
        let entry = DiagnosticsEntry {
            timestamp: self.clock.now(),
            level,
            message,
        };
        self.mutate(|state| state.log.push(entry));
    }

    /// Appends an `Info` entry.
    pub fn info(&self, message: impl Into<String>) {
        self.add_entry(LogLevel::Info, message);
    }

    /// Appends a `Success` entry.
    pub fn success(&self, message: impl Into<String>) {
        self.add_entry(LogLevel::Success, message);
    }

    /// Appends a `Warn` entry.
    pub fn warn(&self, message: impl Into<String>) {
        self.add_entry(LogLevel::Warn, message);
    }

    /// Appends an `Error` entry.
    pub fn error(&self, message: impl Into<String>) {
        self.add_entry(LogLevel::Error, message);
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> Vec<DiagnosticsEntry> {
        self.lock().log.iter().cloned().collect()
    }

    /// Retained entries of a single level, oldest first.
    pub fn entries_at(&self, level: LogLevel) -> Vec<DiagnosticsEntry> {
        self.lock().log.with_level(level).cloned().collect()
    }

    /// Current canvas status.
    pub fn canvas_status(&self) -> CanvasStatus {
        self.lock().canvas.clone()
    }

    /// Applies a partial canvas status update.
    pub fn update_canvas_status(&self, update: CanvasStatusUpdate) {
        self.mutate(|state| state.canvas.apply(update));
    }

    /// Records whether the named component is mounted.
    pub fn mark_component_mounted(&self, component: &str, mounted: bool) {
        log::debug!(
            target: LOG_TARGET,
            "Component '{component}' {}.",
            if mounted { "mounted" } else { "unmounted" }
        );
        let component = component.to_string();
        self.mutate(|state| {
            state.components.insert(component, mounted);
        });
    }

    /// Stores the capability probe result for the overlay.
    ///
    /// The snapshot is immutable once produced; recording a second one
    /// replaces the first and is logged as unexpected.
    pub fn record_capability(&self, snapshot: CapabilitySnapshot) {
        self.mutate(|state| {
            if state.capability.is_some() {
                log::debug!(target: LOG_TARGET, "Capability snapshot recorded more than once.");
            }
            state.capability = Some(snapshot);
        });
    }

    /// The recorded capability probe result, if any.
    pub fn capability(&self) -> Option<CapabilitySnapshot> {
        self.lock().capability.clone()
    }

    /// A copy of the whole store.
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        Self::snapshot_of(&self.lock())
    }

    /// Registers a listener called with a fresh snapshot after every change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&DiagnosticsSnapshot) + Send + Sync + 'static,
    {
        self.observers.subscribe(listener)
    }

    /// Serializes the store to pretty JSON, with entry times in
    /// milliseconds since the sink was created.
    pub fn export_json(&self) -> serde_json::Result<String> {
        let state = self.lock();
        let export = Export {
            entries: state
                .log
                .iter()
                .map(|e| ExportedEntry {
                    t_ms: e.timestamp.saturating_duration_since(self.started).as_millis(),
                    level: e.level,
                    message: &e.message,
                })
                .collect(),
            evicted: state.log.evicted(),
            canvas: ExportedCanvas {
                mounted: state.canvas.mounted,
                created: state.canvas.created,
                rendering: state.canvas.rendering,
                error: state.canvas.error.as_deref(),
            },
            components: &state.components,
            capability: state.capability.as_ref(),
        };
        serde_json::to_string_pretty(&export)
    }
}

impl Default for DiagnosticsSink {
    fn default() -> Self {
        Self::new(&DiagnosticsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::ManualClock;

    #[test]
    fn test_entries_use_injected_clock() {
        let clock = Arc::new(ManualClock::new());
        let sink = DiagnosticsSink::with_clock(&DiagnosticsConfig::default(), clock.clone());
        sink.info("first");
        clock.advance_ms(1500);
        sink.warn("second");

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[1].timestamp - entries[0].timestamp,
            std::time::Duration::from_millis(1500)
        );
    }

    #[test]
    fn test_capacity_is_sanitized() {
        let sink = DiagnosticsSink::new(&DiagnosticsConfig { capacity: 0 });
        sink.info("a");
        sink.info("b");
        let snapshot = sink.snapshot();
        assert_eq!(snapshot.entries.len(), 1);
        assert_eq!(snapshot.evicted, 1);
    }

    #[test]
    fn test_export_json_has_relative_times() {
        let clock = Arc::new(ManualClock::new());
        let sink = DiagnosticsSink::with_clock(&DiagnosticsConfig::default(), clock.clone());
        clock.advance_ms(42);
        sink.success("Render surface created");

        let json = sink.export_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entries"][0]["t_ms"], 42);
        assert_eq!(value["entries"][0]["level"], "Success");
        assert_eq!(value["canvas"]["mounted"], false);
    }
}
