//! Decode a throttling reason code into a [`ThrottlingCondition`].

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use super::kinds::{ResourceType, ThrottlingMode, ThrottlingSeverity};
use crate::provider::{ProviderError, SqlError};

/// Provider error number reported when the server is throttling the session.
pub const THROTTLING_ERROR_NUMBER: i32 = 40501;

/// Matches the reason code embedded in a throttling error message, e.g. `"... Code: 12345"`.
static REASON_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Code:\s*(\d+)").expect("REASON_CODE_REGEX should compile - this is a bug")
});

/// Decoded throttling state: the mode plus a severity per resource.
///
/// Built only through the `from_*` constructors and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThrottlingCondition {
    mode: ThrottlingMode,
    resources: Vec<(ResourceType, ThrottlingSeverity)>,
}

impl ThrottlingCondition {
    /// Condition used whenever a reason code is missing or cannot be decoded.
    pub fn unknown() -> Self {
        Self {
            mode: ThrottlingMode::Unknown,
            resources: vec![(ResourceType::Unknown, ThrottlingSeverity::Unknown)],
        }
    }

    /// Decode a packed reason code.
    ///
    /// Bits 0-1 carry the mode. Bits 2-7 are unused. From bit 8 upwards each
    /// resource in [`ResourceType::DECODE_ORDER`] takes two bits. Non-positive
    /// codes yield [`ThrottlingCondition::unknown`].
    pub fn from_reason_code(reason_code: i32) -> Self {
        if reason_code <= 0 {
            return Self::unknown();
        }

        let mode = ThrottlingMode::from_bits(reason_code);
        let mut group = reason_code >> 8;
        let mut resources = Vec::with_capacity(ResourceType::DECODE_ORDER.len());
        for resource in ResourceType::DECODE_ORDER {
            resources.push((resource, ThrottlingSeverity::from_bits(group)));
            group >>= 2;
        }

        Self { mode, resources }
    }

    /// Extract the first `Code: <n>` from a provider message and decode it.
    ///
    /// Falls back to [`ThrottlingCondition::unknown`] when there is no code or it
    /// does not fit in an `i32`.
    pub fn from_error_message(message: &str) -> Self {
        REASON_CODE_REGEX
            .captures(message)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .map(Self::from_reason_code)
            .unwrap_or_else(Self::unknown)
    }

    /// Decode the message of a single provider sub-error.
    pub fn from_sql_error(error: &SqlError) -> Self {
        Self::from_error_message(&error.message)
    }

    /// Decode the first throttling sub-error of a provider error, if any.
    pub fn from_provider_error(error: &ProviderError) -> Self {
        error
            .errors()
            .iter()
            .find(|e| e.number == THROTTLING_ERROR_NUMBER)
            .map(Self::from_sql_error)
            .unwrap_or_else(Self::unknown)
    }

    pub fn mode(&self) -> ThrottlingMode {
        self.mode
    }

    /// Resource/severity pairs in decode order. `Internal` appears twice.
    pub fn resources(&self) -> &[(ResourceType, ThrottlingSeverity)] {
        &self.resources
    }

    pub fn is_unknown(&self) -> bool {
        self.mode == ThrottlingMode::Unknown
    }

    /// Severity of the first entry for `resource`.
    pub fn severity_of(&self, resource: ResourceType) -> Option<ThrottlingSeverity> {
        self.resources
            .iter()
            .find(|(r, _)| *r == resource)
            .map(|(_, s)| *s)
    }

    /// True if any entry for `resource` is throttled softly or hard.
    pub fn is_throttled_on(&self, resource: ResourceType) -> bool {
        self.resources
            .iter()
            .any(|(r, s)| *r == resource && s.is_active())
    }
}

impl fmt::Display for ThrottlingCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self
            .resources
            .iter()
            .filter(|(r, _)| *r != ResourceType::Internal)
            .map(|(r, s)| format!("{}: {}", r, s))
            .collect();
        // Case-insensitive order first, so "DatabaseSize" precedes "DataReadDelay".
        parts.sort_by(|a, b| {
            a.to_ascii_lowercase()
                .cmp(&b.to_ascii_lowercase())
                .then_with(|| a.cmp(b))
        });
        write!(f, "Mode: {} | {}", self.mode, parts.join(", "))
    }
}
