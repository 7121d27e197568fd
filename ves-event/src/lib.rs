//! VES Event Model
//!
//! This crate defines the strongly-typed telemetry events reported to a VES
//! collector. Each event is a common header plus domain-specific fields.
//! Mandatory fields are supplied to the constructor; optional fields are
//! single-write [`Opt`] values whose setters report whether they applied.
//!
//! Events are owned values. Posting an event moves it into the delivery
//! queue, so nothing can touch it after it has been handed over.

mod fault;
mod header;
mod heartbeat;
mod opt;
mod other;
mod report;
mod state_change;
mod syslog;
mod threshold;
mod types;

pub use fault::{Fault, FAULT_MAJOR_VERSION, FAULT_MINOR_VERSION};
pub use header::{
    now_epoch_microsec, EventHeader, ReportingEntity, HEADER_MAJOR_VERSION, HEADER_MINOR_VERSION,
};
pub use heartbeat::{HeartbeatField, HEARTBEAT_FIELD_MAJOR_VERSION, HEARTBEAT_FIELD_MINOR_VERSION};
pub use opt::Opt;
pub use other::{JsonObject, JsonObjectInstance, NamedArray, ObjectKey, Other};
pub use report::{FeatureUsage, MeasurementGroup, Report};
pub use state_change::StateChange;
pub use syslog::Syslog;
pub use threshold::{PerfCounter, ThresholdCross};
pub use types::{
    AlertAction, AlertType, Criticality, Domain, EntityState, ParseEnumError, Priority, Severity,
    SourceType, SyslogFacility, VfStatus,
};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A free-form name/value pair attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered additional-info collection. Iteration follows insertion order.
pub type NameValueList = SmallVec<[NameValue; 4]>;

/// A telemetry event in one of the supported domains
#[derive(Debug, Clone)]
pub enum Event {
    /// A bare `commonEventHeader`
    Heartbeat(EventHeader),
    Fault(Fault),
    Report(Report),
    HeartbeatField(HeartbeatField),
    StateChange(StateChange),
    Syslog(Syslog),
    Other(Other),
    ThresholdCross(ThresholdCross),
}

impl Event {
    /// Create a heartbeat event
    pub fn heartbeat(entity: &ReportingEntity) -> Self {
        Self::heartbeat_named(entity, "Heartbeat", "heartbeat")
    }

    /// Create a heartbeat event with an explicit name and id
    pub fn heartbeat_named(
        entity: &ReportingEntity,
        event_name: impl Into<String>,
        event_id: impl Into<String>,
    ) -> Self {
        let mut header = entity.header(Domain::Heartbeat, event_name, event_id);
        header.event_type.force("Autonomous heartbeat".to_string());
        Event::Heartbeat(header)
    }

    pub fn header(&self) -> &EventHeader {
        match self {
            Event::Heartbeat(header) => header,
            Event::Fault(e) => &e.header,
            Event::Report(e) => &e.header,
            Event::HeartbeatField(e) => &e.header,
            Event::StateChange(e) => &e.header,
            Event::Syslog(e) => &e.header,
            Event::Other(e) => &e.header,
            Event::ThresholdCross(e) => &e.header,
        }
    }

    pub fn header_mut(&mut self) -> &mut EventHeader {
        match self {
            Event::Heartbeat(header) => header,
            Event::Fault(e) => &mut e.header,
            Event::Report(e) => &mut e.header,
            Event::HeartbeatField(e) => &mut e.header,
            Event::StateChange(e) => &mut e.header,
            Event::Syslog(e) => &mut e.header,
            Event::Other(e) => &mut e.header,
            Event::ThresholdCross(e) => &mut e.header,
        }
    }

    pub fn domain(&self) -> Domain {
        self.header().domain()
    }
}

impl From<Fault> for Event {
    fn from(event: Fault) -> Self {
        Event::Fault(event)
    }
}

impl From<Report> for Event {
    fn from(event: Report) -> Self {
        Event::Report(event)
    }
}

impl From<HeartbeatField> for Event {
    fn from(event: HeartbeatField) -> Self {
        Event::HeartbeatField(event)
    }
}

impl From<StateChange> for Event {
    fn from(event: StateChange) -> Self {
        Event::StateChange(event)
    }
}

impl From<Syslog> for Event {
    fn from(event: Syslog) -> Self {
        Event::Syslog(event)
    }
}

impl From<Other> for Event {
    fn from(event: Other) -> Self {
        Event::Other(event)
    }
}

impl From<ThresholdCross> for Event {
    fn from(event: ThresholdCross) -> Self {
        Event::ThresholdCross(event)
    }
}
