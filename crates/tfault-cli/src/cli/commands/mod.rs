//! CLI command handlers. Each command is in its own file.

mod classify;
mod config;
mod decode;

pub use classify::run_classify;
pub use config::run_config;
pub use decode::{run_decode, run_parse};

#[cfg(test)]
pub(crate) use classify::render_classification;
#[cfg(test)]
pub(crate) use decode::render_condition;
