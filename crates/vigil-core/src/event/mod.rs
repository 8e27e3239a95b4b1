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

//! Event plumbing shared by the resilience components.
//!
//! Two mechanisms live here:
//! - [`EventBus`], a channel used to carry platform signals (which may be
//!   raised from driver callbacks on foreign threads) to the UI thread.
//! - [`Observers`], a listener list used to publish state snapshots to
//!   reactive consumers such as the notification overlay.

mod bus;
mod observers;

pub use bus::EventBus;
pub use observers::{Observers, Subscription};
