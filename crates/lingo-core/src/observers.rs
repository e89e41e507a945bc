use crate::event::LiveEvent;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use tracing::error;

/// Callback invoked for every live event received from the feed.
pub type LiveObserver = Arc<dyn Fn(&LiveEvent) + Send + Sync>;

/// Handle returned by [`ObserverRegistry::register`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Fan-out registry for live-event observers.
///
/// Observers are invoked in registration order, independently of any
/// catalog refresh the same event triggers. Dispatch iterates a snapshot
/// of the list, so registering or unregistering from inside an observer
/// cannot corrupt an in-flight delivery.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Mutex<Vec<(ObserverId, LiveObserver)>>,
    next_id: Mutex<u64>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, observer: LiveObserver) -> ObserverId {
        let id = {
            let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
            *next += 1;
            ObserverId(*next)
        };
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, observer));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.lock().unwrap_or_else(|e| e.into_inner());
        let before = observers.len();
        observers.retain(|(oid, _)| *oid != id);
        observers.len() != before
    }

    /// Deliver `event` to every registered observer, in registration order.
    /// A panicking observer is logged and does not stop delivery.
    pub fn dispatch(&self, event: &LiveEvent) {
        let snapshot: Vec<LiveObserver> = {
            let observers = self.observers.lock().unwrap_or_else(|e| e.into_inner());
            observers.iter().map(|(_, o)| o.clone()).collect()
        };
        for observer in snapshot {
            if catch_unwind(AssertUnwindSafe(|| observer(event))).is_err() {
                error!("live-update observer panicked on {} event", event.kind());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hook applied to a resolved message before it is returned to the caller:
/// `(language, key, message) -> message`.
pub type TranslationHook = Arc<dyn Fn(&str, &str, &str) -> String + Send + Sync>;

/// Ordered list of translation hooks.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Mutex<Vec<TranslationHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, hook: TranslationHook) {
        self.hooks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(hook);
    }

    /// Run every hook over `message`, in registration order.
    pub fn apply(&self, language: &str, key: &str, message: String) -> String {
        let snapshot: Vec<TranslationHook> = {
            let hooks = self.hooks.lock().unwrap_or_else(|e| e.into_inner());
            hooks.clone()
        };
        let mut result = message;
        for hook in snapshot {
            result = hook(language, key, &result);
        }
        result
    }
}
