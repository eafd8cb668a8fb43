//! Application lifecycle state monitor.
//!
//! The observer core tracks foreground/background transitions reported
//! by a lifecycle source and forwards them to listeners as
//! `appStateDidChange` events. `appstated` exposes the observer over a
//! Unix socket; `appstatectl` talks to that socket.

pub mod cli;
pub mod common;
pub mod core;
pub mod daemon;

pub use anyhow::{Context, Result};
pub use crate::common::AppState;
pub use crate::core::observer::AppStateObserver;
