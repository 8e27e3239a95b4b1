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

//! Stopwatches and scoped timers.

use std::time::{Duration, Instant};

/// Measures wall time since its creation.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Creates a stopwatch that starts immediately.
    #[inline]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Elapsed time since creation.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Elapsed time since creation, in whole milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// A one-shot deadline owned by whoever armed it.
///
/// The timer never fires on its own: its owner checks [`ScopedTimer::is_due`]
/// from its regular tick and then calls [`ScopedTimer::fire`]. Dropping the
/// handle (because the owner was torn down, or replaced the timer with a new
/// one) cancels it, so a timer cannot outlive the scope that acquired it.
#[derive(Debug)]
pub struct ScopedTimer {
    label: &'static str,
    deadline: Instant,
    settled: bool,
}

impl ScopedTimer {
    /// Arms a timer that becomes due `after` the instant `now`.
    pub fn arm(label: &'static str, now: Instant, after: Duration) -> Self {
        log::trace!("Timer '{label}' armed for {after:?}.");
        Self {
            label,
            deadline: now + after,
            settled: false,
        }
    }

    /// The instant at which the timer becomes due.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left until the deadline, zero once due.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    /// Whether the deadline has been reached at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Consumes the timer as fired.
    pub fn fire(mut self) {
        self.settled = true;
        log::trace!("Timer '{}' fired.", self.label);
    }

    /// Consumes the timer as cancelled.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if !self.settled {
            log::trace!("Timer '{}' cancelled.", self.label);
        }
    }
}
