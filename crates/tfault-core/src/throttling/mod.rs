//! Throttling reason-code decoding.
//!
//! A throttled provider error (number 40501) embeds a packed reason code in its
//! message. The low two bits carry the [`ThrottlingMode`]; from bit 8 upwards,
//! successive 2-bit groups carry a [`ThrottlingSeverity`] per [`ResourceType`].
//! Decoding never fails: anything unreadable becomes
//! [`ThrottlingCondition::unknown`].

mod condition;
mod kinds;

pub use condition::{ThrottlingCondition, THROTTLING_ERROR_NUMBER};
pub use kinds::{ResourceType, ThrottlingMode, ThrottlingSeverity};
