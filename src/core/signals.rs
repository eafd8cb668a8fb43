use anyhow::{Context, Result};
use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinHandle;
use tracing::debug;

use super::source::{LifecycleSource, StateHandler};
use crate::common::AppState;

/// Lifecycle feed backed by job-control signals. SIGCONT maps to
/// active, SIGTSTP to inactive and SIGTTIN to background. Must be
/// subscribed from inside a tokio runtime.
#[derive(Default)]
pub struct SignalSource {
    task: Option<JoinHandle<()>>,
}

impl SignalSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LifecycleSource for SignalSource {
    /// Re-subscribing replaces the previous handler.
    fn subscribe(&mut self, handler: StateHandler) -> Result<()> {
        self.unsubscribe();

        // No named SignalKind constants exist for these three.
        let mut cont = signal(SignalKind::from_raw(libc::SIGCONT))
            .context("Failed to install SIGCONT handler")?;
        let mut tstp = signal(SignalKind::from_raw(libc::SIGTSTP))
            .context("Failed to install SIGTSTP handler")?;
        let mut ttin = signal(SignalKind::from_raw(libc::SIGTTIN))
            .context("Failed to install SIGTTIN handler")?;

        self.task = Some(tokio::spawn(async move {
            loop {
                let state = tokio::select! {
                    Some(_) = cont.recv() => AppState::Active,
                    Some(_) = tstp.recv() => AppState::Inactive,
                    Some(_) = ttin.recv() => AppState::Background,
                    else => break,
                };
                debug!(target: "appstated::signals", "Lifecycle signal: {}", state);
                handler(state);
            }
        }));
        Ok(())
    }

    fn unsubscribe(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_subscribed(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for SignalSource {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_subscription_bookkeeping() {
        let mut source = SignalSource::new();
        assert!(!source.is_subscribed());

        source.subscribe(Arc::new(|_| {})).unwrap();
        assert!(source.is_subscribed());

        // Replacing the handler keeps the source live.
        source.subscribe(Arc::new(|_| {})).unwrap();
        assert!(source.is_subscribed());

        source.unsubscribe();
        assert!(!source.is_subscribed());
        source.unsubscribe();
        assert!(!source.is_subscribed());
    }
}
