use super::commands::LogLevelCmd;
use super::handlers::handle_client;
use crate::core::observer::AppStateObserver;
use anyhow::Result;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tokio::net::UnixListener;

pub struct IpcHandles {
    pub observer: AppStateObserver,
    pub set_log_level: Arc<dyn Fn(LogLevelCmd) + Send + Sync>,
    pub current_log_level: Arc<RwLock<LogLevelCmd>>,
}

pub async fn start<P: AsRef<Path>>(path: P, h: IpcHandles) -> Result<()> {
    let path_ref = path.as_ref();
    let _ = std::fs::remove_file(path_ref);
    let listener = UnixListener::bind(path_ref)?;
    let _ = std::fs::set_permissions(path_ref, std::fs::Permissions::from_mode(0o660));
    tracing::debug!(target: "appstated::daemon", "IPC listening at {:?}", path_ref);

    loop {
        let (stream, _) = listener.accept().await?;
        let hc = IpcHandles {
            observer: h.observer.clone(),
            set_log_level: h.set_log_level.clone(),
            current_log_level: h.current_log_level.clone(),
        };
        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, hc).await {
                tracing::warn!(target: "appstated::daemon", "client error: {:?}", e);
            }
        });
    }
}
