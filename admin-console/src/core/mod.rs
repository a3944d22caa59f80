//! Core: configuration and the console context shared by every screen

pub mod config;
pub mod context;

pub use config::Config;
pub use context::ConsoleContext;
