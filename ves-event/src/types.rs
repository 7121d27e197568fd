//! Enumerated Field Types
//!
//! Every enumerated value in the VES schema is carried as a Rust enum and
//! converted to its wire string only at encode time, so out-of-range values
//! cannot be constructed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Event domain tag, fixed when an event is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    Heartbeat,
    Fault,
    Report,
    /// Heartbeat carrying interval and additional fields. Shares the
    /// `heartbeat` wire name with [`Domain::Heartbeat`].
    HeartbeatField,
    StateChange,
    Syslog,
    Other,
    ThresholdCrossingAlert,
}

impl Domain {
    /// All domains in declaration order
    pub const ALL: [Domain; 8] = [
        Domain::Heartbeat,
        Domain::Fault,
        Domain::Report,
        Domain::HeartbeatField,
        Domain::StateChange,
        Domain::Syslog,
        Domain::Other,
        Domain::ThresholdCrossingAlert,
    ];

    /// Wire string written into `commonEventHeader.domain`
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Heartbeat | Domain::HeartbeatField => "heartbeat",
            Domain::Fault => "fault",
            Domain::Report => "measurementsForVfReporting",
            Domain::StateChange => "stateChange",
            Domain::Syslog => "syslog",
            Domain::Other => "other",
            Domain::ThresholdCrossingAlert => "thresholdCrossingAlert",
        }
    }

    /// Domain used when looking up throttle specifications.
    ///
    /// Both heartbeat flavours are throttled by the single `heartbeat` spec.
    pub fn throttle_domain(&self) -> Domain {
        match self {
            Domain::HeartbeatField => Domain::Heartbeat,
            other => *other,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a wire string into an enum
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Domain {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heartbeat" => Ok(Domain::Heartbeat),
            "fault" => Ok(Domain::Fault),
            "measurementsForVfReporting" => Ok(Domain::Report),
            "stateChange" => Ok(Domain::StateChange),
            "syslog" => Ok(Domain::Syslog),
            "other" => Ok(Domain::Other),
            "thresholdCrossingAlert" => Ok(Domain::ThresholdCrossingAlert),
            _ => Err(ParseEnumError {
                kind: "domain",
                value: s.to_string(),
            }),
        }
    }
}

/// Event priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Normal,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Normal => "Normal",
            Priority::Low => "Low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            _ => Err(ParseEnumError {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

/// Event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Warning,
    Normal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Major => "MAJOR",
            Severity::Minor => "MINOR",
            Severity::Warning => "WARNING",
            Severity::Normal => "NORMAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CRITICAL" => Ok(Severity::Critical),
            "MAJOR" => Ok(Severity::Major),
            "MINOR" => Ok(Severity::Minor),
            "WARNING" => Ok(Severity::Warning),
            "NORMAL" => Ok(Severity::Normal),
            _ => Err(ParseEnumError {
                kind: "severity",
                value: s.to_string(),
            }),
        }
    }
}

/// Kind of entity that raised the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    Other,
    Router,
    Switch,
    Host,
    Card,
    Port,
    SlotThreshold,
    PortThreshold,
    VirtualMachine,
    VirtualNetworkFunction,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Other => "other",
            SourceType::Router => "router",
            SourceType::Switch => "switch",
            SourceType::Host => "host",
            SourceType::Card => "card",
            SourceType::Port => "port",
            SourceType::SlotThreshold => "slotThreshold",
            SourceType::PortThreshold => "portThreshold",
            SourceType::VirtualMachine => "virtualMachine",
            SourceType::VirtualNetworkFunction => "virtualNetworkFunction",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of the virtual function raising a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VfStatus {
    Active,
    Idle,
    PrepTerminate,
    ReadyTerminate,
    RequestingTerminate,
}

impl VfStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VfStatus::Active => "Active",
            VfStatus::Idle => "Idle",
            VfStatus::PrepTerminate => "Preparing to terminate",
            VfStatus::ReadyTerminate => "Ready to terminate",
            VfStatus::RequestingTerminate => "Requesting termination",
        }
    }
}

impl fmt::Display for VfStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service state of an entity in a state change event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityState {
    InService,
    Maintenance,
    OutOfService,
}

impl EntityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityState::InService => "inService",
            EntityState::Maintenance => "maintenance",
            EntityState::OutOfService => "outOfService",
        }
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold crossing alert action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertAction {
    Clear,
    Continue,
    Set,
}

impl AlertAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertAction::Clear => "CLEAR",
            AlertAction::Continue => "CONT",
            AlertAction::Set => "SET",
        }
    }
}

/// Threshold crossing alert type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertType {
    CardAnomaly,
    ElementAnomaly,
    InterfaceAnomaly,
    ServiceAnomaly,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::CardAnomaly => "CARD-ANOMALY",
            AlertType::ElementAnomaly => "ELEMENT-ANOMALY",
            AlertType::InterfaceAnomaly => "INTERFACE-ANOMALY",
            AlertType::ServiceAnomaly => "SERVICE-ANOMALY",
        }
    }
}

/// Performance counter criticality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criticality {
    Critical,
    Major,
}

impl Criticality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Critical => "CRIT",
            Criticality::Major => "MAJ",
        }
    }
}

/// Syslog facility, encoded as its numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyslogFacility {
    Kernel = 0,
    User = 1,
    Mail = 2,
    SystemDaemon = 3,
    SecurityAuth = 4,
    Internal = 5,
    LinePrinter = 6,
    Network = 7,
    Uucp = 8,
    Clock = 9,
    SecurityAuth2 = 10,
    Ftp = 11,
    Ntp = 12,
    LogAudit = 13,
    LogAlert = 14,
    Clock2 = 15,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

impl SyslogFacility {
    pub fn code(&self) -> i64 {
        *self as i64
    }
}
