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

//! The resilience state record shared between the lifecycle monitor (its
//! single writer) and its readers.

use crate::graphics::QualityTier;
use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

/// Lifecycle phase of the live render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfacePhase {
    /// Rendering normally at full quality.
    #[default]
    Stable,
    /// The context was just lost; the loss handler is running.
    Lost,
    /// Waiting for the platform to restore the context.
    Recovering,
    /// Rendering normally at a degraded tier for the rest of the session.
    DegradedStable,
}

impl SurfacePhase {
    /// `true` while no context is available.
    pub fn is_lost(self) -> bool {
        matches!(self, SurfacePhase::Lost | SurfacePhase::Recovering)
    }
}

impl fmt::Display for SurfacePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// What a user-facing message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Rendering paused after a context loss.
    Paused,
    /// Rendering paused after repeated losses; quality has been reduced.
    PausedRepeated,
    /// Rendering resumed; shown briefly.
    Restored,
    /// Rendering resumed at reduced quality for the rest of the session.
    QualityReduced,
}

/// A message for the notification overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    /// Message category.
    pub kind: NoticeKind,
    /// Text shown to the user.
    pub text: String,
}

impl UserMessage {
    /// The message shown when the context is lost.
    pub fn paused() -> Self {
        Self {
            kind: NoticeKind::Paused,
            text: "3D rendering paused due to memory pressure. Attempting to restore...".into(),
        }
    }

    /// The message shown when a loss triggers quality reduction.
    pub fn paused_repeated() -> Self {
        Self {
            kind: NoticeKind::PausedRepeated,
            text: "3D rendering paused due to repeated memory pressure. \
                   Quality has been reduced to improve stability."
                .into(),
        }
    }

    /// The transient success message shown after a restore.
    pub fn restored() -> Self {
        Self {
            kind: NoticeKind::Restored,
            text: "3D rendering restored successfully.".into(),
        }
    }

    /// The persistent message shown after a restore into reduced quality.
    pub fn quality_reduced() -> Self {
        Self {
            kind: NoticeKind::QualityReduced,
            text: "3D rendering restored in reduced quality mode.".into(),
        }
    }

    /// Transient messages are cleared by the presenter after a fixed delay.
    pub fn is_transient(&self) -> bool {
        self.kind == NoticeKind::Restored
    }
}

/// Mutable, single-writer state driving the live surface.
///
/// Invariants, upheld by the lifecycle monitor:
/// - `degradation_active` implies `current_quality_tier != Full`.
/// - `context_lost` implies the render loop submits no frames.
/// - `loss_events` only holds timestamps inside the tracking window as of
///   the latest recorded loss, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResilienceState {
    /// A context loss is outstanding.
    pub context_lost: bool,
    /// Quality has been reduced for the rest of the session.
    pub degradation_active: bool,
    /// Tier the surface is (or will be, on recreation) configured for.
    pub current_quality_tier: QualityTier,
    /// Loss timestamps inside the tracking window, oldest first.
    pub loss_events: VecDeque<Instant>,
    /// Message for the notification overlay.
    pub user_message: Option<UserMessage>,
    /// Lifecycle phase.
    pub phase: SurfacePhase,
}

impl ResilienceState {
    /// Number of retained loss events.
    pub fn losses_in_window(&self) -> usize {
        self.loss_events.len()
    }

    /// Checks the record's structural invariants.
    pub fn is_consistent(&self) -> bool {
        let degradation_ok = !self.degradation_active || self.current_quality_tier.is_degraded();
        let phase_ok = self.context_lost == self.phase.is_lost();
        let ordered = self
            .loss_events
            .iter()
            .zip(self.loss_events.iter().skip(1))
            .all(|(a, b)| a <= b);
        degradation_ok && phase_ok && ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_state_is_stable_and_consistent() {
        let state = ResilienceState::default();
        assert_eq!(state.phase, SurfacePhase::Stable);
        assert_eq!(state.current_quality_tier, QualityTier::Full);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_degradation_without_tier_change_is_inconsistent() {
        let state = ResilienceState {
            degradation_active: true,
            ..Default::default()
        };
        assert!(!state.is_consistent());
    }

    #[test]
    fn test_lost_flag_must_match_phase() {
        let state = ResilienceState {
            context_lost: true,
            phase: SurfacePhase::Stable,
            ..Default::default()
        };
        assert!(!state.is_consistent());
    }

    #[test]
    fn test_unordered_losses_are_inconsistent() {
        let now = Instant::now();
        let mut state = ResilienceState::default();
        state.loss_events.push_back(now + Duration::from_secs(5));
        state.loss_events.push_back(now);
        assert!(!state.is_consistent());
    }

    #[test]
    fn test_only_restored_is_transient() {
        assert!(UserMessage::restored().is_transient());
        assert!(!UserMessage::paused().is_transient());
        assert!(!UserMessage::paused_repeated().is_transient());
        assert!(!UserMessage::quality_reduced().is_transient());
    }
}
