//! Heartbeat field events

use crate::{Domain, EventHeader, NameValue, NameValueList, ReportingEntity};

pub const HEARTBEAT_FIELD_MAJOR_VERSION: u32 = 1;
pub const HEARTBEAT_FIELD_MINOR_VERSION: u32 = 1;

/// Heartbeat announcing the reporting interval
#[derive(Debug, Clone)]
pub struct HeartbeatField {
    pub header: EventHeader,
    pub major_version: u32,
    pub minor_version: u32,
    /// Seconds between heartbeats
    pub heartbeat_interval: i64,
    pub(crate) additional_info: NameValueList,
}

impl HeartbeatField {
    pub fn new(
        entity: &ReportingEntity,
        event_name: impl Into<String>,
        event_id: impl Into<String>,
        interval: i64,
    ) -> Self {
        Self {
            header: entity.header(Domain::HeartbeatField, event_name, event_id),
            major_version: HEARTBEAT_FIELD_MAJOR_VERSION,
            minor_version: HEARTBEAT_FIELD_MINOR_VERSION,
            heartbeat_interval: interval,
            additional_info: NameValueList::new(),
        }
    }

    pub fn set_interval(&mut self, interval: i64) {
        self.heartbeat_interval = interval;
    }

    pub fn add_additional_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.additional_info.push(NameValue::new(name, value));
    }

    pub fn additional_info(&self) -> &[NameValue] {
        &self.additional_info
    }
}
