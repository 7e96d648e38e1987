//! Value types decoded from a throttling reason code.

use serde::Serialize;
use std::fmt;

/// Which operations the server currently rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ThrottlingMode {
    NoThrottling,
    RejectUpdateInsert,
    RejectAllWrites,
    RejectAll,
    Unknown,
}

impl ThrottlingMode {
    /// Map the low two bits of a reason code to a mode.
    pub(crate) fn from_bits(bits: i32) -> Self {
        match bits & 0b11 {
            0 => ThrottlingMode::NoThrottling,
            1 => ThrottlingMode::RejectUpdateInsert,
            2 => ThrottlingMode::RejectAllWrites,
            _ => ThrottlingMode::RejectAll,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ThrottlingMode::NoThrottling => "NoThrottling",
            ThrottlingMode::RejectUpdateInsert => "RejectUpdateInsert",
            ThrottlingMode::RejectAllWrites => "RejectAllWrites",
            ThrottlingMode::RejectAll => "RejectAll",
            ThrottlingMode::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ThrottlingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server resource that may be subject to throttling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceType {
    PhysicalDatabaseSpace,
    PhysicalLogSpace,
    LogWriteDelay,
    DataReadDelay,
    Cpu,
    DatabaseSize,
    Internal,
    WorkerThreads,
    Unknown,
}

impl ResourceType {
    /// Order in which 2-bit severity groups appear in a reason code, lowest bits first.
    ///
    /// `Internal` occupies two groups; both are kept.
    pub(crate) const DECODE_ORDER: [ResourceType; 9] = [
        ResourceType::PhysicalDatabaseSpace,
        ResourceType::PhysicalLogSpace,
        ResourceType::LogWriteDelay,
        ResourceType::DataReadDelay,
        ResourceType::Cpu,
        ResourceType::DatabaseSize,
        ResourceType::Internal,
        ResourceType::WorkerThreads,
        ResourceType::Internal,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ResourceType::PhysicalDatabaseSpace => "PhysicalDatabaseSpace",
            ResourceType::PhysicalLogSpace => "PhysicalLogSpace",
            ResourceType::LogWriteDelay => "LogWriteDelay",
            ResourceType::DataReadDelay => "DataReadDelay",
            ResourceType::Cpu => "Cpu",
            ResourceType::DatabaseSize => "DatabaseSize",
            ResourceType::Internal => "Internal",
            ResourceType::WorkerThreads => "WorkerThreads",
            ResourceType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How hard a resource is being throttled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ThrottlingSeverity {
    None,
    Soft,
    Hard,
    Unknown,
}

impl ThrottlingSeverity {
    pub(crate) fn from_bits(bits: i32) -> Self {
        match bits & 0b11 {
            0 => ThrottlingSeverity::None,
            1 => ThrottlingSeverity::Soft,
            2 => ThrottlingSeverity::Hard,
            _ => ThrottlingSeverity::Unknown,
        }
    }

    /// True for `Soft` and `Hard`.
    pub fn is_active(self) -> bool {
        matches!(self, ThrottlingSeverity::Soft | ThrottlingSeverity::Hard)
    }

    fn as_str(self) -> &'static str {
        match self {
            ThrottlingSeverity::None => "None",
            ThrottlingSeverity::Soft => "Soft",
            ThrottlingSeverity::Hard => "Hard",
            ThrottlingSeverity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ThrottlingSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
