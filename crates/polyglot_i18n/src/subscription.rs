use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use rustc_hash::FxHashMap;
use tracing::{trace, warn};

/// Callback invoked whenever the active language or the dictionary changes.
pub type Callback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Handle returned by `subscribe`. Ids start at 1 and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Subscriber registry with isolated fan-out.
pub(crate) struct Subscribers {
    next_id: AtomicU64,
    entries: Mutex<FxHashMap<SubscriptionId, Callback>>,
}

impl Subscribers {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, FxHashMap<SubscriptionId, Callback>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn add(&self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries().insert(id, callback);
        trace!(%id, "subscribed");
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let removed = self.entries().remove(&id).is_some();
        if removed {
            trace!(%id, "unsubscribed");
        }
        removed
    }

    pub(crate) fn len(&self) -> usize {
        self.entries().len()
    }

    /// Invoke every live subscriber once.
    ///
    /// The set of ids is captured up front and drained one at a time. No lock
    /// is held while a callback runs, so callbacks may re-enter the store. A
    /// subscriber removed before its turn is skipped. A panicking callback is
    /// logged and does not stop the rest of the pass.
    pub(crate) fn notify(&self) {
        let mut queue: VecDeque<SubscriptionId> = {
            let mut ids: Vec<_> = self.entries().keys().copied().collect();
            ids.sort_unstable();
            ids.into()
        };

        while let Some(id) = queue.pop_front() {
            let Some(callback) = self.entries().get(&id).cloned() else {
                continue;
            };

            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback())) {
                warn!(
                    %id,
                    panic = %panic_message(payload.as_ref()),
                    "translation subscriber panicked during notification"
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

/// RAII subscription: unsubscribes when dropped.
///
/// Holds only a weak reference to the registry, so an outstanding guard does
/// not keep a store alive.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<Subscribers>,
    id: SubscriptionId,
}

impl Subscription {
    pub(crate) fn new(registry: &Arc<Subscribers>, id: SubscriptionId) -> Self {
        Self {
            registry: Arc::downgrade(registry),
            id,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Keep the subscription registered and hand back its raw id.
    pub fn detach(self) -> SubscriptionId {
        let mut this = std::mem::ManuallyDrop::new(self);
        drop(std::mem::take(&mut this.registry));
        this.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
