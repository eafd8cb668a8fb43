use notify::{EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::core::config::settings_path;

/// Watches settings.toml from a dedicated thread and signals every
/// modification. The thread owns the notify handle for the life of
/// the process.
pub fn start_settings_watcher() -> mpsc::Receiver<()> {
    let (watch_tx, watch_rx) = mpsc::channel::<()>(10);
    let path = settings_path();

    std::thread::spawn(move || {
        let tx = watch_tx;

        let mut watcher = match notify::recommended_watcher(
            move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res
                    && matches!(event.kind, EventKind::Modify(_))
                {
                    let _ = tx.blocking_send(());
                }
            },
        ) {
            Ok(w) => w,
            Err(e) => {
                error!(target: "appstated::daemon", "Failed to create settings watcher: {}", e);
                return;
            }
        };

        if let Err(e) = watcher.watch(&path, RecursiveMode::NonRecursive) {
            error!(target: "appstated::daemon", "Failed to watch settings file: {}", e);
            return;
        }

        info!(target: "appstated::daemon", "Settings file watcher started");
        loop {
            std::thread::sleep(std::time::Duration::from_secs(3600));
        }
    });

    watch_rx
}
