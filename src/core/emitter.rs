use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

pub type ListenerFn = Arc<dyn Fn(&str, &str) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener registry with insertion-order dispatch. Events carry a
/// name and a string payload; the emitter attaches no meaning to
/// either.
#[derive(Default)]
pub struct EventEmitter {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, ListenerFn)>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: ListenerFn) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push((id, listener));
        }
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        if let Ok(mut listeners) = self.listeners.write() {
            let before = listeners.len();
            listeners.retain(|(lid, _)| *lid != id);
            return listeners.len() != before;
        }
        false
    }

    pub fn remove_all(&self) -> usize {
        if let Ok(mut listeners) = self.listeners.write() {
            let removed = listeners.len();
            listeners.clear();
            return removed;
        }
        0
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().map(|l| l.len()).unwrap_or(0)
    }

    /// Dispatches to every registered listener in registration order.
    /// The registry is snapshotted first; listeners added or removed
    /// during a dispatch take effect from the next emit.
    pub fn emit(&self, event: &str, payload: &str) {
        let snapshot: Vec<ListenerFn> = match self.listeners.read() {
            Ok(listeners) => listeners.iter().map(|(_, f)| f.clone()).collect(),
            Err(_) => return,
        };
        for listener in snapshot {
            listener(event, payload);
        }
    }
}
