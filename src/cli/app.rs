use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "appstatectl")]
#[command(version, about = "appstated control CLI")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[arg(short, long, global = true)]
    pub socket: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Daemon status summary
    Status,

    /// Print the current app state
    State,

    /// List the event names the daemon emits
    Events,

    /// Stream state transitions until interrupted
    Watch,

    /// Feed a transition into the observer
    Inject {
        #[arg(value_enum)]
        state: StateArg,
    },

    SetLog {
        #[arg(value_enum)]
        level: LogLevel,
    },

    Ping,
}

#[derive(Clone, ValueEnum)]
pub enum StateArg {
    Active,
    Inactive,
    Background,
}

impl StateArg {
    pub fn to_upper_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Background => "BACKGROUND",
        }
    }
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_upper_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}
