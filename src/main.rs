use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

use appstate_monitor::core::config;
use appstate_monitor::daemon;
use appstate_monitor::daemon::ipc::LogLevelCmd;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let base_filter = EnvFilter::new("info");
    let (filter_layer, filter_handle) = reload::Layer::new(base_filter);
    let timer = tracing_subscriber::fmt::time::UtcTime::new(
        time::format_description::parse("[hour]:[minute]:[second]").unwrap(),
    );

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_level(false)
                .with_timer(timer)
                .with_writer(std::io::stderr),
        )
        .init();

    let settings = config::Settings::load_or_default(config::settings_path());

    let level = LogLevelCmd::from_config(&settings.daemon.log_level);
    if level != LogLevelCmd::Info
        && let Err(e) = filter_handle.reload(EnvFilter::new(level.as_filter_str()))
    {
        tracing::warn!("Failed to apply configured log level: {}", e);
    }

    tracing::info!(
        "appstated v{} started (socket={}, transition logging={})",
        env!("CARGO_PKG_VERSION"),
        settings.ipc.socket,
        if settings.monitor.log_transitions {
            "on"
        } else {
            "off"
        }
    );

    let cfg = daemon::run::DaemonConfig { settings };
    daemon::run::run_with_config(&cfg, filter_handle).await
}
