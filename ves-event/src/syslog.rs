//! Syslog events

use crate::{Domain, EventHeader, Opt, ReportingEntity, SourceType, SyslogFacility};

pub const SYSLOG_MAJOR_VERSION: u32 = 1;
pub const SYSLOG_MINOR_VERSION: u32 = 2;

/// A syslog record forwarded to the collector
#[derive(Debug, Clone)]
pub struct Syslog {
    pub header: EventHeader,
    pub major_version: u32,
    pub minor_version: u32,

    pub source_type: SourceType,
    pub syslog_msg: String,
    pub syslog_tag: String,

    /// Pipe-separated `name=value` filter list
    pub(crate) additional_filters: Opt<String>,
    pub(crate) event_source_host: Opt<String>,
    pub(crate) facility: Opt<SyslogFacility>,
    pub(crate) priority: Opt<i64>,
    pub(crate) proc_name: Opt<String>,
    pub(crate) proc_id: Opt<i64>,
    pub(crate) s_data: Opt<String>,
    pub(crate) sd_id: Opt<String>,
    pub(crate) severity: Opt<String>,
    pub(crate) version: Opt<i64>,
}

impl Syslog {
    pub fn new(
        entity: &ReportingEntity,
        event_name: impl Into<String>,
        event_id: impl Into<String>,
        source_type: SourceType,
        msg: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            header: entity.header(Domain::Syslog, event_name, event_id),
            major_version: SYSLOG_MAJOR_VERSION,
            minor_version: SYSLOG_MINOR_VERSION,
            source_type,
            syslog_msg: msg.into(),
            syslog_tag: tag.into(),
            additional_filters: Opt::new(),
            event_source_host: Opt::new(),
            facility: Opt::new(),
            priority: Opt::new(),
            proc_name: Opt::new(),
            proc_id: Opt::new(),
            s_data: Opt::new(),
            sd_id: Opt::new(),
            severity: Opt::new(),
            version: Opt::new(),
        }
    }

    pub fn set_additional_filters(&mut self, filters: impl Into<String>) -> bool {
        self.additional_filters.set(filters.into())
    }

    pub fn set_event_source_host(&mut self, host: impl Into<String>) -> bool {
        self.event_source_host.set(host.into())
    }

    pub fn set_facility(&mut self, facility: SyslogFacility) -> bool {
        self.facility.set(facility)
    }

    /// Priority is `facility * 8 + severity`, so 0..=191
    pub fn set_priority(&mut self, priority: i64) -> bool {
        if !(0..=191).contains(&priority) {
            return false;
        }
        self.priority.set(priority)
    }

    pub fn set_proc(&mut self, proc_name: impl Into<String>) -> bool {
        self.proc_name.set(proc_name.into())
    }

    pub fn set_proc_id(&mut self, proc_id: i64) -> bool {
        self.proc_id.set(proc_id)
    }

    pub fn set_s_data(&mut self, s_data: impl Into<String>) -> bool {
        self.s_data.set(s_data.into())
    }

    pub fn set_sd_id(&mut self, sd_id: impl Into<String>) -> bool {
        self.sd_id.set(sd_id.into())
    }

    pub fn set_severity(&mut self, severity: impl Into<String>) -> bool {
        self.severity.set(severity.into())
    }

    pub fn set_version(&mut self, version: i64) -> bool {
        self.version.set(version)
    }

    pub fn additional_filters(&self) -> &Opt<String> {
        &self.additional_filters
    }

    pub fn event_source_host(&self) -> &Opt<String> {
        &self.event_source_host
    }

    pub fn facility(&self) -> &Opt<SyslogFacility> {
        &self.facility
    }

    pub fn priority(&self) -> &Opt<i64> {
        &self.priority
    }

    pub fn proc_name(&self) -> &Opt<String> {
        &self.proc_name
    }

    pub fn proc_id(&self) -> &Opt<i64> {
        &self.proc_id
    }

    pub fn s_data(&self) -> &Opt<String> {
        &self.s_data
    }

    pub fn sd_id(&self) -> &Opt<String> {
        &self.sd_id
    }

    pub fn severity(&self) -> &Opt<String> {
        &self.severity
    }

    pub fn version(&self) -> &Opt<i64> {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_range() {
        let entity = ReportingEntity::new("vm-1", "vm-1");
        let mut syslog = Syslog::new(&entity, "Syslog_vm", "s1", SourceType::Host, "msg", "tag");

        assert!(!syslog.set_priority(192));
        assert!(!syslog.priority.is_set());
        assert!(syslog.set_priority(13));
        assert!(!syslog.set_priority(14));
        assert_eq!(syslog.priority.get(), Some(&13));
    }
}
