use super::commands::Command;
use super::server::IpcHandles;
use crate::core::emitter::ListenerId;
use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;

const HELP: &str = "CMDS:
        - HELP | ?
        - STATUS
        - STATE
        - EVENTS
        - WATCH | UNWATCH
        - INJECT <ACTIVE|INACTIVE|BACKGROUND>
        - SETLOG <DEBUG|INFO|WARN|ERROR>
        - PING
        - QUIT
 ";

async fn next_event(rx: &mut Option<mpsc::Receiver<String>>) -> Option<String> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Handle a single IPC client connection. A WATCH subscription lives
/// only as long as the connection; it is torn down on UNWATCH, QUIT
/// and disconnect.
pub async fn handle_client(stream: UnixStream, h: IpcHandles) -> Result<()> {
    let (r, mut w) = stream.into_split();
    let mut lines = BufReader::new(r).lines();
    w.write_all(b"OK APPSTATED IPC\n").await?;

    let mut watch_rx: Option<mpsc::Receiver<String>> = None;
    let mut watch_id: Option<ListenerId> = None;

    let session = serve(&mut lines, &mut w, &h, &mut watch_rx, &mut watch_id).await;

    // The listener is removed on every exit path, a session that
    // ends in an I/O error included.
    if let Some(id) = watch_id {
        h.observer.remove_listener(id);
    }
    session
}

/// Runs the command/event loop until EOF, QUIT or an I/O error.
async fn serve(
    lines: &mut Lines<BufReader<OwnedReadHalf>>,
    w: &mut OwnedWriteHalf,
    h: &IpcHandles,
    watch_rx: &mut Option<mpsc::Receiver<String>>,
    watch_id: &mut Option<ListenerId>,
) -> Result<()> {
    loop {
        tokio::select! {
            // next_line keeps partially read input buffered when the
            // event branch completes first.
            next = lines.next_line() => {
                let line = match next? {
                    Some(line) => line,
                    None => return Ok(()),
                };
                let s = line.trim();
                if s.len() > 256 {
                    w.write_all(b"ERR input too long\n").await?;
                    continue;
                }
                let resp = match s.parse::<Command>() {
                    Ok(Command::Help) => HELP.to_string(),
                    Ok(Command::Ping) => "PONG\n".into(),
                    Ok(Command::Quit) => {
                        w.write_all(b"BYE\n").await?;
                        return Ok(());
                    }
                    Ok(Command::State) => {
                        format!("STATE={}\n", h.observer.current_state())
                    }
                    Ok(Command::Status) => {
                        let log_level = match h.current_log_level.read() {
                            Ok(l) => format!("{:?}", *l),
                            Err(_) => "Unknown".to_string(),
                        };
                        format!(
                            "OBSERVING={} STATE={} LISTENERS={} LOG_LEVEL={}\n",
                            h.observer.is_observing(),
                            h.observer.current_state(),
                            h.observer.listener_count(),
                            log_level
                        )
                    }
                    Ok(Command::Events) => {
                        format!("EVENTS={}\n", h.observer.supported_events().join(" "))
                    }
                    Ok(Command::Watch) => {
                        if watch_id.is_some() {
                            "OK WATCHING\n".to_string()
                        } else {
                            let (tx, rx) = mpsc::channel::<String>(16);
                            let id = h.observer.add_listener(Arc::new(move |event, payload| {
                                // A stalled client loses events rather
                                // than blocking the dispatch path.
                                let _ =
                                    tx.try_send(format!("EVENT {} app_state={}\n", event, payload));
                            }));
                            *watch_rx = Some(rx);
                            *watch_id = Some(id);
                            "OK WATCHING\n".to_string()
                        }
                    }
                    Ok(Command::Unwatch) => match watch_id.take() {
                        Some(id) => {
                            h.observer.remove_listener(id);
                            *watch_rx = None;
                            "OK UNWATCHED\n".to_string()
                        }
                        None => "ERR not watching\n".to_string(),
                    },
                    Ok(Command::Inject(state)) => {
                        if h.observer.inject(state) {
                            format!("OK INJECT {}\n", state)
                        } else {
                            "ERR not observing\n".to_string()
                        }
                    }
                    Ok(Command::SetLog(lvl)) => {
                        (h.set_log_level)(lvl);
                        "OK SET_LOG\n".into()
                    }
                    Err(e) => format!("ERR {}\n", e),
                };
                if !resp.is_empty() {
                    w.write_all(resp.as_bytes()).await?;
                }
            }
            Some(event) = next_event(watch_rx) => {
                w.write_all(event.as_bytes()).await?;
            }
        }
    }
}
