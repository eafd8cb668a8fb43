use std::sync::{Arc, RwLock};

use anyhow::Result;

use crate::common::AppState;

pub type StateHandler = Arc<dyn Fn(AppState) + Send + Sync>;

/// A feed of lifecycle transitions. Implementations hold at most one
/// handler and must stop delivering after `unsubscribe`.
pub trait LifecycleSource: Send {
    fn subscribe(&mut self, handler: StateHandler) -> Result<()>;
    fn unsubscribe(&mut self);
    fn is_subscribed(&self) -> bool;
}

/// In-process source driven by explicit `post` calls. Clones share the
/// same handler slot, so a caller can keep one half to feed states
/// after handing the other half to an observer.
#[derive(Clone, Default)]
pub struct ManualSource {
    handler: Arc<RwLock<Option<StateHandler>>>,
}

impl ManualSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a state to the subscribed handler. Returns false when
    /// nothing is subscribed.
    pub fn post(&self, state: AppState) -> bool {
        let handler = match self.handler.read() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        };
        match handler {
            Some(h) => {
                h(state);
                true
            }
            None => false,
        }
    }
}

impl LifecycleSource for ManualSource {
    fn subscribe(&mut self, handler: StateHandler) -> Result<()> {
        if let Ok(mut slot) = self.handler.write() {
            *slot = Some(handler);
        }
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if let Ok(mut slot) = self.handler.write() {
            *slot = None;
        }
    }

    fn is_subscribed(&self) -> bool {
        match self.handler.read() {
            Ok(slot) => slot.is_some(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_post_without_handler_is_dropped() {
        let source = ManualSource::new();
        assert!(!source.post(AppState::Active));
        assert!(!source.is_subscribed());
    }

    #[test]
    fn test_clones_share_the_handler_slot() {
        let mut source = ManualSource::new();
        let feeder = source.clone();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        source
            .subscribe(Arc::new(move |state| {
                sink.lock().unwrap().push(state);
            }))
            .unwrap();

        assert!(feeder.is_subscribed());
        assert!(feeder.post(AppState::Background));
        assert!(feeder.post(AppState::Active));

        source.unsubscribe();
        assert!(!feeder.post(AppState::Inactive));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![AppState::Background, AppState::Active]
        );
    }
}
