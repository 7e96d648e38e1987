pub mod config;
pub mod logging;

pub mod provider;
pub mod retry;
pub mod throttling;
