use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use anyhow::Result;
use tracing::{debug, error};

use super::emitter::{EventEmitter, ListenerFn, ListenerId};
use super::source::{LifecycleSource, StateHandler};
use crate::common::AppState;

pub const APP_STATE_EVENT: &str = "appStateDidChange";

struct ObserverShared {
    emitter: EventEmitter,
    source: Mutex<Box<dyn LifecycleSource>>,
    observing: AtomicBool,
    current: RwLock<AppState>,
}

impl ObserverShared {
    /// Drops the transition while idle. `unknown` and repeats of the
    /// current state are dropped too. The write lock is released
    /// before listeners run.
    fn handle_transition(&self, state: AppState) {
        if !self.observing.load(Ordering::SeqCst) {
            return;
        }
        if !state.is_known() {
            return;
        }

        let changed = match self.current.write() {
            Ok(mut current) => {
                if *current == state {
                    false
                } else {
                    *current = state;
                    true
                }
            }
            Err(_) => false,
        };
        if !changed {
            return;
        }

        debug!(target: "appstated::observer", "State changed to {}", state);
        self.emitter.emit(APP_STATE_EVENT, state.as_str());
    }
}

/// Tracks the application lifecycle state reported by a
/// [`LifecycleSource`] and forwards each transition to registered
/// listeners as an `appStateDidChange` event.
///
/// The source is only subscribed while observation is on. Listener
/// registration drives observation by itself: the first listener
/// starts it, removing the last one stops it. `start_observing` and
/// `stop_observing` stay available for callers that manage the window
/// explicitly, and both are safe to call any number of times.
#[derive(Clone)]
pub struct AppStateObserver {
    shared: Arc<ObserverShared>,
}

impl AppStateObserver {
    pub fn new(source: Box<dyn LifecycleSource>) -> Self {
        Self {
            shared: Arc::new(ObserverShared {
                emitter: EventEmitter::new(),
                source: Mutex::new(source),
                observing: AtomicBool::new(false),
                current: RwLock::new(AppState::Unknown),
            }),
        }
    }

    pub fn supported_events(&self) -> &'static [&'static str] {
        &[APP_STATE_EVENT]
    }

    pub fn is_observing(&self) -> bool {
        self.shared.observing.load(Ordering::SeqCst)
    }

    /// Last observed state, `unknown` until the first transition. The
    /// value survives `stop_observing`.
    pub fn current_state(&self) -> AppState {
        self.shared
            .current
            .read()
            .map(|s| *s)
            .unwrap_or(AppState::Unknown)
    }

    pub fn is_foreground(&self) -> bool {
        self.current_state() == AppState::Active
    }

    pub fn is_background(&self) -> bool {
        self.current_state() == AppState::Background
    }

    pub fn listener_count(&self) -> usize {
        self.shared.emitter.listener_count()
    }

    /// Subscribes to the source. Calling while already observing is a
    /// no-op.
    pub fn start_observing(&self) -> Result<()> {
        if self.shared.observing.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let weak = Arc::downgrade(&self.shared);
        let handler: StateHandler = Arc::new(move |state| {
            if let Some(shared) = weak.upgrade() {
                shared.handle_transition(state);
            }
        });

        let subscribed = match self.shared.source.lock() {
            Ok(mut source) => source.subscribe(handler),
            Err(_) => Err(anyhow::anyhow!("Source lock poisoned")),
        };

        if let Err(e) = subscribed {
            self.shared.observing.store(false, Ordering::SeqCst);
            return Err(e);
        }
        debug!(target: "appstated::observer", "Observation started");
        Ok(())
    }

    /// Detaches from the source. Calling while idle is a no-op.
    pub fn stop_observing(&self) {
        if !self.shared.observing.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Ok(mut source) = self.shared.source.lock() {
            source.unsubscribe();
        }
        debug!(target: "appstated::observer", "Observation stopped");
    }

    /// Registers a listener, starting observation when it is the first
    /// one. A listener added after a state is already known receives
    /// that state right away.
    pub fn add_listener(&self, listener: ListenerFn) -> ListenerId {
        let id = self.shared.emitter.add_listener(listener.clone());
        if self.shared.emitter.listener_count() == 1
            && let Err(e) = self.start_observing()
        {
            error!(target: "appstated::observer", "Observation could not start: {:?}", e);
        }

        let current = self.current_state();
        if current.is_known() {
            listener(APP_STATE_EVENT, current.as_str());
        }
        id
    }

    /// Drops a listener, stopping observation when it was the last
    /// one.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let removed = self.shared.emitter.remove_listener(id);
        if removed && self.shared.emitter.listener_count() == 0 {
            self.stop_observing();
        }
        removed
    }

    /// Clears every listener and tears down the subscription, whether
    /// or not any listener was present.
    pub fn remove_all_listeners(&self) -> usize {
        let removed = self.shared.emitter.remove_all();
        self.stop_observing();
        removed
    }

    /// Feeds a transition directly, bypassing the source. Returns
    /// false while idle; the transition is dropped in that case.
    pub fn inject(&self, state: AppState) -> bool {
        if !self.is_observing() {
            return false;
        }
        self.shared.handle_transition(state);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::ManualSource;

    fn observer_with_feed() -> (AppStateObserver, ManualSource) {
        let source = ManualSource::new();
        let feed = source.clone();
        (AppStateObserver::new(Box::new(source)), feed)
    }

    fn collector() -> (ListenerFn, Arc<std::sync::Mutex<Vec<(String, String)>>>) {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let listener: ListenerFn = Arc::new(move |event: &str, payload: &str| {
            sink.lock()
                .unwrap()
                .push((event.to_string(), payload.to_string()));
        });
        (listener, seen)
    }

    #[test]
    fn test_initial_state_is_unknown() {
        let (observer, _feed) = observer_with_feed();
        assert_eq!(observer.current_state(), AppState::Unknown);
        assert!(!observer.is_observing());
        assert!(!observer.is_foreground());
        assert!(!observer.is_background());
        assert_eq!(observer.supported_events(), &[APP_STATE_EVENT]);
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let (observer, feed) = observer_with_feed();

        observer.start_observing().unwrap();
        observer.start_observing().unwrap();
        assert!(observer.is_observing());
        assert!(feed.is_subscribed());

        observer.stop_observing();
        observer.stop_observing();
        assert!(!observer.is_observing());
        assert!(!feed.is_subscribed());
    }

    #[test]
    fn test_events_flow_only_while_observing() {
        let (observer, feed) = observer_with_feed();
        let (listener, seen) = collector();

        let id = observer.add_listener(listener);
        assert!(observer.is_observing());

        feed.post(AppState::Background);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(APP_STATE_EVENT.to_string(), "background".to_string())]
        );

        observer.stop_observing();
        feed.post(AppState::Active);
        assert_eq!(seen.lock().unwrap().len(), 1);

        observer.remove_listener(id);
    }

    #[test]
    fn test_redundant_transitions_are_dropped() {
        let (observer, feed) = observer_with_feed();
        let (listener, seen) = collector();
        observer.add_listener(listener);

        feed.post(AppState::Active);
        feed.post(AppState::Active);
        feed.post(AppState::Background);
        feed.post(AppState::Background);

        let events: Vec<String> = seen
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.clone())
            .collect();
        assert_eq!(events, vec!["active", "background"]);
    }

    #[test]
    fn test_unknown_is_never_forwarded() {
        let (observer, feed) = observer_with_feed();
        let (listener, seen) = collector();
        observer.add_listener(listener);

        feed.post(AppState::Unknown);
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(observer.current_state(), AppState::Unknown);
    }

    #[test]
    fn test_listener_count_drives_subscription() {
        let (observer, feed) = observer_with_feed();
        assert!(!feed.is_subscribed());

        let first = observer.add_listener(Arc::new(|_, _| {}));
        assert!(feed.is_subscribed());
        assert!(observer.is_observing());

        let second = observer.add_listener(Arc::new(|_, _| {}));
        assert_eq!(observer.listener_count(), 2);

        observer.remove_listener(first);
        assert!(feed.is_subscribed());

        observer.remove_listener(second);
        assert!(!feed.is_subscribed());
        assert!(!observer.is_observing());
    }

    #[test]
    fn test_new_listener_receives_known_state() {
        let (observer, feed) = observer_with_feed();
        observer.add_listener(Arc::new(|_, _| {}));
        feed.post(AppState::Background);

        let (listener, seen) = collector();
        observer.add_listener(listener);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(APP_STATE_EVENT.to_string(), "background".to_string())]
        );
    }

    #[test]
    fn test_remove_all_listeners_stops_observation() {
        let (observer, feed) = observer_with_feed();
        observer.add_listener(Arc::new(|_, _| {}));
        observer.add_listener(Arc::new(|_, _| {}));
        assert!(feed.is_subscribed());

        assert_eq!(observer.remove_all_listeners(), 2);
        assert!(!observer.is_observing());
        assert!(!feed.is_subscribed());
        assert_eq!(observer.remove_all_listeners(), 0);
    }

    #[test]
    fn test_inject_requires_observation() {
        let (observer, _feed) = observer_with_feed();
        assert!(!observer.inject(AppState::Active));
        assert_eq!(observer.current_state(), AppState::Unknown);

        let (listener, seen) = collector();
        observer.add_listener(listener);
        assert!(observer.inject(AppState::Active));
        assert_eq!(observer.current_state(), AppState::Active);
        assert!(observer.is_foreground());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_state_survives_stop() {
        let (observer, feed) = observer_with_feed();
        let id = observer.add_listener(Arc::new(|_, _| {}));
        feed.post(AppState::Inactive);
        observer.remove_listener(id);

        assert!(!observer.is_observing());
        assert_eq!(observer.current_state(), AppState::Inactive);
        assert!(!observer.is_foreground());
        assert!(!observer.is_background());
    }

    #[test]
    fn test_explicit_start_without_listeners() {
        let (observer, feed) = observer_with_feed();
        observer.start_observing().unwrap();
        assert!(feed.is_subscribed());
        assert_eq!(observer.listener_count(), 0);

        // remove_all tears the subscription down even with nothing
        // registered.
        assert_eq!(observer.remove_all_listeners(), 0);
        assert!(!observer.is_observing());
        assert!(!feed.is_subscribed());
    }
}
