pub mod commands;
pub mod handlers;
pub mod server;

pub use commands::{Command, LogLevelCmd};
pub use server::{IpcHandles, start};
