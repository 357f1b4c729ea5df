use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::traits::StoreEvent;

/// Callback invoked for every committed change.
pub type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;

type SharedListener = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Listener registry shared by the store backends.
#[derive(Default)]
pub struct Listeners {
    next_id: AtomicU64,
    entries: RwLock<Vec<(SubscriptionId, SharedListener)>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .write()
            .expect("lock poisoned")
            .push((id, Arc::from(listener)));
        id
    }

    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.write().expect("lock poisoned");
        let before = entries.len();
        entries.retain(|(sid, _)| *sid != id);
        entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `events` to every listener, in registration order.
    ///
    /// The registry is snapshotted before delivery and no lock is held while
    /// a listener runs, so listeners may subscribe or unsubscribe. Such
    /// changes take effect from the next call.
    pub fn notify(&self, events: &[StoreEvent]) {
        let targets: Vec<SharedListener> = self
            .entries
            .read()
            .expect("lock poisoned")
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for event in events {
            for listener in &targets {
                listener(event);
            }
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChangeKind;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    fn event(key: &str) -> StoreEvent {
        StoreEvent { key: key.into(), kind: ChangeKind::Set }
    }

    #[test]
    fn listener_can_modify_registry_during_delivery() {
        let registry = Arc::new(Listeners::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let own_id = Arc::new(Mutex::new(None));

        let (reg, count, slot) = (Arc::clone(&registry), Arc::clone(&calls), Arc::clone(&own_id));
        let id = registry.add(Box::new(move |_: &StoreEvent| {
            count.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = slot.lock().unwrap().take() {
                assert!(reg.remove(id));
                reg.add(Box::new(|_: &StoreEvent| {}));
            }
        }));
        *own_id.lock().unwrap() = Some(id);

        registry.notify(&[event("a")]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);

        registry.notify(&[event("b")]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delivers_in_registration_order() {
        let registry = Listeners::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second"] {
            let sink = Arc::clone(&order);
            registry.add(Box::new(move |e: &StoreEvent| {
                sink.lock().unwrap().push(format!("{tag}:{}", e.key));
            }));
        }
        registry.notify(&[event("x"), event("y")]);
        assert_eq!(
            *order.lock().unwrap(),
            vec!["first:x", "second:x", "first:y", "second:y"]
        );
    }
}
