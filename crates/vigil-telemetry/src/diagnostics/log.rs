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

use std::collections::VecDeque;
use vigil_core::{DiagnosticsEntry, LogLevel};

/// Bounded FIFO of diagnostics entries.
///
/// Appending to a full log evicts the oldest entry. The number of evicted
/// entries is tracked so the overlay can show that history was truncated.
#[derive(Debug, Clone)]
pub struct DiagnosticsLog {
    entries: VecDeque<DiagnosticsEntry>,
    capacity: usize,
    evicted: u64,
}

impl DiagnosticsLog {
    /// Creates an empty log holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            evicted: 0,
        }
    }

    /// Appends an entry, evicting the oldest one if the log is full.
    pub fn push(&mut self, entry: DiagnosticsEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.evicted += 1;
        }
        self.entries.push_back(entry);
    }

    /// Entries oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticsEntry> {
        self.entries.iter()
    }

    /// Entries of the given level, oldest to newest.
    pub fn with_level(&self, level: LogLevel) -> impl Iterator<Item = &DiagnosticsEntry> {
        self.entries.iter().filter(move |e| e.level == level)
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&DiagnosticsEntry> {
        self.entries.back()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing has been logged (or everything was evicted).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries evicted so far.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}
