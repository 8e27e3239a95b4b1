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

//! The user notification presenter.
//!
//! A pure projection of [`ResilienceState`] onto an [`Overlay`]. The only
//! state it keeps of its own is the timer that clears a transient banner.
//! That timer is a [`ScopedTimer`] held in a slot: any superseding state
//! change replaces or empties the slot, and unmounting empties it, so the
//! banner can never be cleared after teardown or by a stale timer.

use crate::overlay::{Banner, Overlay, INDICATOR_TEXT};
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use vigil_core::{Clock, ResilienceState, ScopedTimer, UserMessage};

/// A presenter shared between the host UI and a state subscription.
pub type SharedPresenter = Arc<Mutex<NotificationPresenter>>;

/// Configuration for the notification presenter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    /// How long a transient success banner stays up.
    pub transient_message_ms: u64,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            transient_message_ms: 3000,
        }
    }
}

impl PresenterConfig {
    /// The transient delay as a [`Duration`].
    pub fn transient_delay(&self) -> Duration {
        Duration::from_millis(self.transient_message_ms)
    }
}

/// Projects resilience state changes onto the overlay.
#[derive(Debug)]
pub struct NotificationPresenter {
    config: PresenterConfig,
    clock: Arc<dyn Clock>,
    overlay: Overlay,
    transient: Option<ScopedTimer>,
    degradation_active: bool,
    fallback: bool,
    mounted: bool,
}

impl NotificationPresenter {
    /// Creates a mounted presenter showing nothing.
    pub fn new(config: PresenterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            overlay: Overlay::Hidden,
            transient: None,
            degradation_active: false,
            fallback: false,
            mounted: true,
        }
    }

    /// Wraps the presenter for sharing with a subscription.
    pub fn shared(self) -> SharedPresenter {
        Arc::new(Mutex::new(self))
    }

    /// A listener suitable for a state subscription, forwarding each state
    /// to the shared presenter.
    pub fn listener(
        presenter: &SharedPresenter,
    ) -> impl Fn(&ResilienceState) + Send + Sync + 'static {
        let presenter = Arc::clone(presenter);
        move |state: &ResilienceState| {
            presenter
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .on_state(state);
        }
    }

    /// Applies a new resilience state.
    pub fn on_state(&mut self, state: &ResilienceState) {
        if !self.mounted || self.fallback {
            return;
        }
        // Any new state supersedes a pending transient clear.
        self.transient = None;
        self.degradation_active = state.degradation_active;

        self.overlay = if state.context_lost {
            let message = state.user_message.clone().unwrap_or_else(UserMessage::paused);
            Overlay::Banner(Banner::lost(&message, state.degradation_active))
        } else {
            match &state.user_message {
                Some(message) if message.is_transient() => {
                    self.transient = Some(ScopedTimer::arm(
                        "transient-message",
                        self.clock.now(),
                        self.config.transient_delay(),
                    ));
                    Overlay::Banner(Banner::restored(message))
                }
                _ => self.resting_overlay(),
            }
        };
        log::debug!("Overlay now {:?}.", self.overlay);
    }

    /// Advances display timers. Returns `true` if the overlay changed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        match self.transient.take() {
            Some(timer) if timer.is_due(now) => {
                timer.fire();
                self.overlay = self.resting_overlay();
                true
            }
            pending => {
                self.transient = pending;
                false
            }
        }
    }

    /// Replaces the view with a static fallback panel for the rest of the session.
    pub fn show_fallback(&mut self, message: impl Into<String>) {
        self.transient = None;
        self.fallback = true;
        self.overlay = Overlay::Fallback(message.into());
    }

    /// What the overlay shows now.
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// `true` while a transient banner is waiting to be cleared.
    pub fn has_pending_timer(&self) -> bool {
        self.transient.is_some()
    }

    /// Tears the presenter down, cancelling any pending timer. Later state
    /// changes and ticks are ignored.
    pub fn unmount(&mut self) {
        if let Some(timer) = self.transient.take() {
            timer.cancel();
        }
        self.mounted = false;
        self.overlay = Overlay::Hidden;
    }

    fn resting_overlay(&self) -> Overlay {
        if self.degradation_active {
            Overlay::Indicator(INDICATOR_TEXT.to_string())
        } else {
            Overlay::Hidden
        }
    }
}
