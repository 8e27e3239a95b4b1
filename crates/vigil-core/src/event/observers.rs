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

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

struct ObserverList<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

fn lock<T>(list: &Mutex<ObserverList<T>>) -> MutexGuard<'_, ObserverList<T>> {
    list.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A list of listeners interested in values of type `T`.
///
/// Cloning an `Observers` yields another handle to the same list. Listeners
/// are invoked in subscription order. The list lock is released before any
/// listener runs, so a listener may subscribe or unsubscribe re-entrantly.
pub struct Observers<T> {
    list: Arc<Mutex<ObserverList<T>>>,
}

impl<T: 'static> Observers<T> {
    /// Creates an empty listener list.
    pub fn new() -> Self {
        Self {
            list: Arc::new(Mutex::new(ObserverList {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Registers `listener` and returns the handle that detaches it.
    ///
    /// The listener stays registered until [`Subscription::unsubscribe`] is
    /// called or the returned handle is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut list = lock(&self.list);
            let id = list.next_id;
            list.next_id += 1;
            list.listeners.push((id, Arc::new(listener)));
            id
        };
        log::trace!("Observer {id} subscribed.");

        let weak: Weak<Mutex<ObserverList<T>>> = Arc::downgrade(&self.list);
        Subscription {
            detach: Some(Box::new(move || {
                if let Some(list) = weak.upgrade() {
                    lock(&list).listeners.retain(|(lid, _)| *lid != id);
                    log::trace!("Observer {id} unsubscribed.");
                }
            })),
        }
    }

    /// Delivers `value` to every registered listener.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = lock(&self.list)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    /// Returns the number of registered listeners.
    pub fn len(&self) -> usize {
        lock(&self.list).listeners.len()
    }

    /// Returns `true` if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detaches every listener at once.
    pub fn clear(&self) {
        lock(&self.list).listeners.clear();
    }
}

impl<T: 'static> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Observers<T> {
    fn clone(&self) -> Self {
        Self {
            list: Arc::clone(&self.list),
        }
    }
}

impl<T> std::fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &lock(&self.list).listeners.len())
            .finish()
    }
}

/// Handle returned by [`Observers::subscribe`].
///
/// Dropping it detaches the listener, so the handle must be kept alive for
/// as long as notifications are wanted.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Detaches the listener now.
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.detach.is_some())
            .finish()
    }
}
