//! `tfault classify` – run a classifier against a synthetic provider error.

use tfault_core::provider::{
    DbError, NetworkConnectivityClassifier, ProviderError, SqlError, SqlTransientClassifier,
};
use tfault_core::retry::{Classification, FaultClassifier};

pub fn run_classify(numbers: &[i32], message: Option<&str>, network: bool, timeout: bool) {
    let error = if timeout {
        DbError::Timeout { after: None }
    } else {
        let message = message.unwrap_or_default();
        DbError::Provider(ProviderError::new(
            numbers.iter().map(|n| SqlError::new(*n, message)).collect(),
        ))
    };
    let classification = if network {
        NetworkConnectivityClassifier.classify(&error)
    } else {
        SqlTransientClassifier.classify(&error)
    };
    println!("{}", render_classification(&error, &classification));
}

pub(crate) fn render_classification(error: &DbError, classification: &Classification) -> String {
    let verdict = if classification.transient {
        "transient (retry)"
    } else {
        "permanent (no retry)"
    };
    let mut out = format!("{}: {}", error, verdict);
    if let Some(condition) = &classification.throttling {
        out.push_str(&format!("\nthrottling: {}", condition));
    }
    out
}
