//! `tfault decode` / `tfault parse` – show a decoded throttling condition.

use anyhow::Result;
use tfault_core::throttling::{ThrottlingCondition, ThrottlingSeverity};

pub fn run_decode(code: i32, json: bool) -> Result<()> {
    let condition = ThrottlingCondition::from_reason_code(code);
    println!("{}", render_condition(&condition, json)?);
    Ok(())
}

pub fn run_parse(message: &str, json: bool) -> Result<()> {
    let condition = ThrottlingCondition::from_error_message(message);
    if condition.is_unknown() {
        tracing::info!("no usable reason code in message");
    }
    println!("{}", render_condition(&condition, json)?);
    Ok(())
}

/// Summary line followed by one row per active resource, or pretty JSON.
pub(crate) fn render_condition(condition: &ThrottlingCondition, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(condition)?);
    }
    let mut out = condition.to_string();
    for (resource, severity) in condition.resources() {
        if *severity != ThrottlingSeverity::None {
            out.push_str(&format!("\n  {:<22} {}", resource.to_string(), severity));
        }
    }
    Ok(out)
}
