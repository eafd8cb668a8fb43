pub fn print_status(response: &str) {
    println!("     appstated Status     ");

    if response.is_empty() {
        println!("No response from daemon\n");
        return;
    }

    println!("Daemon: Running\n");
    for token in response.split_whitespace() {
        if let Some((key, value)) = token.split_once('=') {
            match key {
                "OBSERVING" => {
                    let icon = if value == "true" { "✓" } else { "✗" };
                    println!("  {} Observing: {}", icon, value);
                }
                "STATE" => {
                    println!("    State:     {}", value);
                }
                "LISTENERS" => {
                    println!("    Listeners: {}", value);
                }
                "LOG_LEVEL" => {
                    println!("    Log level: {}", value);
                }
                _ => {}
            }
        }
    }

    println!();
}

pub fn print_daemon_stopped() {
    println!("     appstated Status     ");
    println!(" Daemon: Not running\n");
}

pub fn print_success(message: &str) {
    println!(" {}", message);
}

pub fn print_error(message: &str) {
    eprintln!(" Error: {}", message);
}

pub fn print_state(response: &str) {
    let state = response.strip_prefix("STATE=").unwrap_or(response);
    println!("App state: {}", state);
}

pub fn print_events(response: &str) {
    let events = response.strip_prefix("EVENTS=").unwrap_or(response);
    println!("Supported events: {}", events);
}

/// Lines arrive as `EVENT <name> app_state=<state>`.
pub fn print_event(line: &str) {
    let state = line.rsplit_once('=').map(|(_, v)| v).unwrap_or(line);
    println!("  {}", state);
}
