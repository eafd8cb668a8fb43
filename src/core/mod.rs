pub mod config;
pub mod emitter;
pub mod observer;
pub mod signals;
pub mod source;
