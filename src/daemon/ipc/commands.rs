use std::str::FromStr;

use crate::common::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevelCmd {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevelCmd {
    /// Unrecognized configuration values fall back to Info.
    pub fn from_config(level: &str) -> Self {
        match level.to_lowercase().as_str() {
            "debug" => Self::Debug,
            "warn" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    State,
    Events,
    Watch,
    Unwatch,
    Inject(AppState),
    SetLog(LogLevelCmd),
    Ping,
    Quit,
}

impl FromStr for Command {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            ["HELP"] | ["?"] => Ok(Command::Help),
            ["STATUS"] => Ok(Command::Status),
            ["STATE"] => Ok(Command::State),
            ["EVENTS"] => Ok(Command::Events),
            ["WATCH"] => Ok(Command::Watch),
            ["UNWATCH"] => Ok(Command::Unwatch),
            ["PING"] => Ok(Command::Ping),
            ["QUIT"] => Ok(Command::Quit),

            ["SETLOG", level] | ["SET_LOG", level] => match level.to_uppercase().as_str() {
                "DEBUG" => Ok(Command::SetLog(LogLevelCmd::Debug)),
                "INFO" => Ok(Command::SetLog(LogLevelCmd::Info)),
                "WARN" => Ok(Command::SetLog(LogLevelCmd::Warn)),
                "ERROR" => Ok(Command::SetLog(LogLevelCmd::Error)),
                _ => Err("usage: SETLOG <DEBUG|INFO|WARN|ERROR>"),
            },

            ["INJECT", state] => match AppState::from_str_ignore_case(state) {
                Some(st) => Ok(Command::Inject(st)),
                None => Err("usage: INJECT <ACTIVE|INACTIVE|BACKGROUND>"),
            },

            _ => Err("unknown command (try HELP)"),
        }
    }
}
