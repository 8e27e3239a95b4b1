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

//! Frame-rate measurement and the pixel-ratio controller it drives.

use std::time::Duration;

/// Number of frame intervals averaged per report.
pub const FRAME_WINDOW: usize = 30;
/// Lowest pixel ratio the adaptive controller will step down to.
pub const PIXEL_RATIO_FLOOR: f32 = 0.5;
/// Size of one adaptive pixel-ratio step.
pub const PIXEL_RATIO_STEP: f32 = 0.25;
/// Reports below this frame rate step the pixel ratio down.
pub const LOW_FPS: f32 = 30.0;
/// Reports above this frame rate step the pixel ratio up.
pub const HIGH_FPS: f32 = 55.0;

/// The last `N` samples pushed, oldest first.
#[derive(Debug, Clone)]
pub struct RingBuffer<T, const N: usize> {
    slots: [T; N],
    next: usize,
    len: usize,
}

impl<T: Default + Copy, const N: usize> RingBuffer<T, N> {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self {
            slots: [T::default(); N],
            next: 0,
            len: 0,
        }
    }

    /// Appends a sample, evicting the oldest once `N` are held.
    pub fn push(&mut self, value: T) {
        self.slots[self.next] = value;
        self.next = (self.next + 1) % N;
        self.len = (self.len + 1).min(N);
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` before the first push and after [`clear`](Self::clear).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forgets every sample.
    pub fn clear(&mut self) {
        self.next = 0;
        self.len = 0;
    }

    /// Samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        // Until the buffer wraps, the oldest sample sits in slot 0.
        let oldest = if self.len < N { 0 } else { self.next };
        (0..self.len).map(move |i| &self.slots[(oldest + i) % N])
    }
}

impl<T: Default + Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<f32, N> {
    /// Mean of the held samples, zero when empty.
    pub fn average(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.iter().sum::<f32>() / self.len as f32
    }
}

/// Averages frame intervals over a rolling window and reports a frame rate
/// once every [`FRAME_WINDOW`] frames.
#[derive(Debug, Clone, Default)]
pub struct FrameRateReporter {
    intervals_ms: RingBuffer<f32, FRAME_WINDOW>,
    frames: u64,
}

impl FrameRateReporter {
    /// Creates a reporter with an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame interval. Returns the rounded average frame rate
    /// when this frame completes a reporting period.
    pub fn record(&mut self, frame_time: Duration) -> Option<f32> {
        self.intervals_ms.push(frame_time.as_secs_f32() * 1000.0);
        self.frames += 1;

        if self.frames % FRAME_WINDOW as u64 != 0 {
            return None;
        }
        let average_ms = self.intervals_ms.average();
        if average_ms <= 0.0 {
            return None;
        }
        Some((1000.0 / average_ms).round())
    }

    /// Forgets every recorded interval.
    ///
    /// Called around context loss so stalled frames do not skew the next report.
    pub fn reset(&mut self) {
        self.intervals_ms.clear();
        self.frames = 0;
    }
}

/// Steps the surface pixel ratio with the measured frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptivePixelRatio {
    current: f32,
    cap: f32,
}

impl AdaptivePixelRatio {
    /// Starts at `initial`, never exceeding `cap`.
    pub fn new(initial: f32, cap: f32) -> Self {
        let cap = cap.max(PIXEL_RATIO_FLOOR);
        Self {
            current: initial.clamp(PIXEL_RATIO_FLOOR, cap),
            cap,
        }
    }

    /// The pixel ratio currently chosen.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// The current ceiling.
    pub fn cap(&self) -> f32 {
        self.cap
    }

    /// Feeds one frame-rate report. Returns the new ratio if it changed.
    pub fn on_report(&mut self, fps: f32) -> Option<f32> {
        let target = if fps < LOW_FPS {
            self.current - PIXEL_RATIO_STEP
        } else if fps > HIGH_FPS {
            self.current + PIXEL_RATIO_STEP
        } else {
            return None;
        };
        let target = target.clamp(PIXEL_RATIO_FLOOR, self.cap);
        if (target - self.current).abs() < f32::EPSILON {
            return None;
        }
        log::debug!(
            "Adaptive pixel ratio {:.2} -> {:.2} at {fps} fps.",
            self.current,
            target
        );
        self.current = target;
        Some(target)
    }

    /// Lowers (or raises) the ceiling, pulling the current ratio under it.
    /// Returns the resulting ratio.
    pub fn set_cap(&mut self, cap: f32) -> f32 {
        self.cap = cap.max(PIXEL_RATIO_FLOOR);
        self.current = self.current.min(self.cap);
        self.current
    }
}
