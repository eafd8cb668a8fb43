use anyhow::Result;
use std::sync::{Arc, RwLock};
use tokio::{signal, time};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::core::emitter::ListenerId;
use crate::core::observer::AppStateObserver;
use crate::core::signals::SignalSource;
use crate::daemon::ipc::LogLevelCmd;

pub use crate::daemon::config::DaemonConfig;

pub type ReloadHandle =
    tracing_subscriber::reload::Handle<tracing_subscriber::EnvFilter, tracing_subscriber::Registry>;

pub struct Daemon {
    pub(crate) cfg: DaemonConfig,
    pub(crate) observer: AppStateObserver,
    pub(crate) log_listener: Option<ListenerId>,
    pub(crate) filter_handle: ReloadHandle,
    pub(crate) current_log_level: Arc<RwLock<LogLevelCmd>>,
}

impl Daemon {
    pub fn new(cfg: DaemonConfig, filter_handle: ReloadHandle) -> Result<Self> {
        let observer = AppStateObserver::new(Box::new(SignalSource::new()));
        let current_log_level = Arc::new(RwLock::new(LogLevelCmd::from_config(
            &cfg.settings.daemon.log_level,
        )));

        Ok(Self {
            cfg,
            observer,
            log_listener: None,
            filter_handle,
            current_log_level,
        })
    }

    /// The daemon's own transition logging is an ordinary listener and
    /// counts toward the listener bookkeeping like any IPC watcher.
    fn install_log_listener(&mut self) {
        if self.log_listener.is_some() {
            return;
        }
        let id = self.observer.add_listener(Arc::new(|_, payload| {
            info!(target: "appstated::daemon", "State  | {}", payload);
        }));
        self.log_listener = Some(id);
        debug!(target: "appstated::daemon", "Transition logging on");
    }

    fn remove_log_listener(&mut self) {
        if let Some(id) = self.log_listener.take() {
            self.observer.remove_listener(id);
            debug!(target: "appstated::daemon", "Transition logging off");
        }
    }

    fn apply_log_level(&self, cmd: LogLevelCmd) {
        if let Ok(mut l) = self.current_log_level.write() {
            *l = cmd;
        }
        match self.filter_handle.reload(EnvFilter::new(cmd.as_filter_str())) {
            Ok(_) => debug!(target: "appstated::daemon", "Log level changed to {:?}", cmd),
            Err(e) => error!(target: "appstated::daemon", "Failed to change log level: {}", e),
        }
    }

    fn reload_settings(&mut self) {
        match crate::core::config::Settings::load(crate::core::config::settings_path()) {
            Ok(new_settings) => {
                if self.cfg.settings.daemon.log_level != new_settings.daemon.log_level {
                    debug!(target: "appstated::daemon", "Settings reloaded. New log level: {}", new_settings.daemon.log_level);
                    self.apply_log_level(LogLevelCmd::from_config(&new_settings.daemon.log_level));
                }

                if self.cfg.settings.monitor.log_transitions != new_settings.monitor.log_transitions
                {
                    if new_settings.monitor.log_transitions {
                        self.install_log_listener();
                    } else {
                        self.remove_log_listener();
                    }
                }

                if self.cfg.settings.ipc.socket != new_settings.ipc.socket {
                    warn!(target: "appstated::daemon", "Socket path changed; takes effect on restart");
                }

                self.cfg.settings = new_settings;
            }
            Err(e) => {
                error!(target: "appstated::daemon", "Failed to reload settings: {:?}", e);
            }
        }
    }

    pub async fn init_ipc(&self) {
        let log_level_clone = self.current_log_level.clone();
        let handle = self.filter_handle.clone();
        let set_log_level = Arc::new(move |lvl: LogLevelCmd| {
            if let Ok(mut l) = log_level_clone.write() {
                *l = lvl;
            }
            match handle.reload(EnvFilter::new(lvl.as_filter_str())) {
                Ok(_) => debug!(target: "appstated::ipc", "Log level changed to {:?}", lvl),
                Err(e) => {
                    error!(target: "appstated::ipc", "Failed to change log level: {}", e)
                }
            }
        });

        let ipc_handles = crate::daemon::ipc::IpcHandles {
            observer: self.observer.clone(),
            set_log_level,
            current_log_level: self.current_log_level.clone(),
        };

        let socket = self.cfg.settings.ipc.socket.clone();
        tokio::spawn(async move {
            debug!(target: "appstated::daemon", "Starting IPC socket listener...");
            match crate::daemon::ipc::start(&socket, ipc_handles).await {
                Ok(_) => info!(target: "appstated::daemon", "IPC    | Listener stopped"),
                Err(e) => error!(target: "appstated::daemon", "IPC    | Error: {:?}", e),
            }
        });
    }
}

pub async fn run_with_config(cfg: &DaemonConfig, filter_handle: ReloadHandle) -> Result<()> {
    let mut daemon = Daemon::new(cfg.clone(), filter_handle)?;

    if daemon.cfg.settings.monitor.log_transitions {
        daemon.install_log_listener();
    }

    daemon.init_ipc().await;

    tokio::time::sleep(time::Duration::from_millis(200)).await;
    debug!(target: "appstated::daemon", "IPC socket ready at {}", daemon.cfg.settings.ipc.socket);

    let mut watch_rx = crate::daemon::watcher::start_settings_watcher();

    loop {
        tokio::select! {
            Some(_) = watch_rx.recv() => {
                daemon.reload_settings();
            }
            _ = signal::ctrl_c() => {
                info!(target: "appstated::daemon", "Daemon | Received Ctrl-C, shutting down");
                break;
            }
        }
    }

    daemon.observer.remove_all_listeners();
    let _ = std::fs::remove_file(&daemon.cfg.settings.ipc.socket);
    info!(target: "appstated::daemon", "Daemon | Stopped");
    Ok(())
}
