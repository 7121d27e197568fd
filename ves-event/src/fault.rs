//! Fault events

use crate::{
    Domain, EventHeader, NameValue, NameValueList, Opt, Priority, ReportingEntity, Severity,
    SourceType, VfStatus,
};

pub const FAULT_MAJOR_VERSION: u32 = 2;
pub const FAULT_MINOR_VERSION: u32 = 1;

/// A fault (alarm) raised by a virtual function
#[derive(Debug, Clone)]
pub struct Fault {
    pub header: EventHeader,
    pub major_version: u32,
    pub minor_version: u32,

    /// Short name of the alarm condition
    pub alarm_condition: String,
    /// Description of the problem
    pub specific_problem: String,
    pub severity: Severity,
    pub source_type: SourceType,
    pub vf_status: VfStatus,

    pub(crate) category: Opt<String>,
    pub(crate) alarm_interface_a: Opt<String>,

    /// `alarmAdditionalInformation` entries, in insertion order
    pub(crate) additional_info: NameValueList,
}

impl Fault {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entity: &ReportingEntity,
        event_name: impl Into<String>,
        event_id: impl Into<String>,
        condition: impl Into<String>,
        specific_problem: impl Into<String>,
        priority: Priority,
        severity: Severity,
        source_type: SourceType,
        vf_status: VfStatus,
    ) -> Self {
        let mut header = entity.header(Domain::Fault, event_name, event_id);
        header.priority = priority;

        Self {
            header,
            major_version: FAULT_MAJOR_VERSION,
            minor_version: FAULT_MINOR_VERSION,
            alarm_condition: condition.into(),
            specific_problem: specific_problem.into(),
            severity,
            source_type,
            vf_status,
            category: Opt::new(),
            alarm_interface_a: Opt::new(),
            additional_info: NameValueList::new(),
        }
    }

    /// Append an `alarmAdditionalInformation` entry
    pub fn add_additional_info(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.additional_info.push(NameValue::new(name, value));
    }

    pub fn set_category(&mut self, category: impl Into<String>) -> bool {
        self.category.set(category.into())
    }

    pub fn set_interface(&mut self, interface: impl Into<String>) -> bool {
        self.alarm_interface_a.set(interface.into())
    }

    pub fn set_event_type(&mut self, event_type: impl Into<String>) -> bool {
        self.header.set_event_type(event_type)
    }

    pub fn category(&self) -> &Opt<String> {
        &self.category
    }

    pub fn interface(&self) -> &Opt<String> {
        &self.alarm_interface_a
    }

    pub fn additional_info(&self) -> &[NameValue] {
        &self.additional_info
    }
}
