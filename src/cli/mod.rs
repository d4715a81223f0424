//! CLI command handling

pub mod output;
pub mod send;
pub mod show_config;

pub use output::*;
pub use send::*;
pub use show_config::*;
