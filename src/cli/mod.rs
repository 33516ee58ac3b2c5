pub mod app;
pub mod commands;
pub mod prompts;

pub use app::{Cli, Commands};
