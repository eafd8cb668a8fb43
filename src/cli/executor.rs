use super::{app::*, client::IpcClient, output};
use crate::Result;
use crate::common::SOCKET_PATH;
use anyhow::bail;

pub async fn execute(cli: Cli) -> Result<()> {
    let socket = cli.socket.as_deref().unwrap_or(SOCKET_PATH);
    let client = IpcClient::with_path(socket);

    if !matches!(cli.command, Commands::Status) && !client.is_alive().await {
        bail!("Daemon is not running");
    }

    match cli.command {
        Commands::Status => {
            handle_status(&client).await?;
        }

        Commands::State => {
            let resp = client.send("STATE").await?;
            output::print_state(&resp);
        }

        Commands::Events => {
            let resp = client.send("EVENTS").await?;
            output::print_events(&resp);
        }

        Commands::Watch => {
            handle_watch(&client).await?;
        }

        Commands::Inject { state } => {
            let cmd = format!("INJECT {}", state.to_upper_str());
            let resp = client.send(&cmd).await?;
            output::print_success(&format!("Injected: {}", resp));
        }

        Commands::SetLog { level } => {
            let cmd = format!("SETLOG {}", level.to_upper_str());
            let resp = client.send(&cmd).await?;
            output::print_success(&format!("Log level set: {}", resp));
        }

        Commands::Ping => {
            if client.ping().await? {
                output::print_success("Daemon is alive (PONG)");
            } else {
                output::print_error("Daemon not responding");
            }
        }
    }

    Ok(())
}

async fn handle_status(client: &IpcClient) -> Result<()> {
    if !client.is_alive().await {
        output::print_daemon_stopped();
        return Ok(());
    }

    let response = client.send("STATUS").await?;
    output::print_status(&response);
    Ok(())
}

async fn handle_watch(client: &IpcClient) -> Result<()> {
    let mut session = client.watch().await?;
    println!("Watching app state (Ctrl-C to stop)...");

    loop {
        tokio::select! {
            line = session.next_line() => {
                match line? {
                    Some(event) => output::print_event(&event),
                    None => {
                        output::print_error("Daemon closed the connection");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }
    Ok(())
}
