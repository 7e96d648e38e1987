//! `tfault config` – show where settings live and what they resolve to.

use anyhow::Result;
use tfault_core::config;
use tfault_core::retry::RetryPolicy;

pub fn run_config() -> Result<()> {
    let path = config::config_path()?;
    let cfg = config::load_or_init_at(&path)?;
    println!("config: {}", path.display());
    print_policy("command", &cfg.command.to_policy()?);
    print_policy("query", &cfg.query.to_policy()?);
    Ok(())
}

fn print_policy(name: &str, policy: &RetryPolicy) {
    println!(
        "{:<8} max_attempts={} wait={:?}",
        name,
        policy.max_attempts(),
        policy.wait_interval()
    );
}
