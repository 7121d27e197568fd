//! Common Event Header
//!
//! Every event carries a `commonEventHeader`. Headers are minted by a
//! [`ReportingEntity`], which owns the sequence counter and the identity of
//! the reporting VM so that no process-wide state is needed.

use crate::{Domain, Opt, Priority};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Header schema version
pub const HEADER_MAJOR_VERSION: u32 = 1;
pub const HEADER_MINOR_VERSION: u32 = 2;

/// Current wall clock time in microseconds since the Unix epoch
pub fn now_epoch_microsec() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

/// Identity of the entity reporting events, plus the event sequence counter
#[derive(Debug)]
pub struct ReportingEntity {
    source_name: String,
    reporting_entity_name: String,
    source_id: Option<String>,
    reporting_entity_id: Option<String>,
    sequence: AtomicU64,
}

impl ReportingEntity {
    /// Create a reporting entity. Sequence numbers start at 1.
    pub fn new(source_name: impl Into<String>, reporting_entity_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            reporting_entity_name: reporting_entity_name.into(),
            source_id: None,
            reporting_entity_id: None,
            sequence: AtomicU64::new(1),
        }
    }

    /// Default `sourceId` stamped on every header
    pub fn with_source_id(mut self, id: impl Into<String>) -> Self {
        self.source_id = Some(id.into());
        self
    }

    /// Default `reportingEntityId` stamped on every header
    pub fn with_reporting_entity_id(mut self, id: impl Into<String>) -> Self {
        self.reporting_entity_id = Some(id.into());
        self
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn reporting_entity_name(&self) -> &str {
        &self.reporting_entity_name
    }

    /// Reset the sequence number used by the next event
    pub fn set_next_sequence(&self, sequence: u64) {
        self.sequence.store(sequence, Ordering::Relaxed);
    }

    /// Sequence number the next event will receive
    pub fn peek_sequence(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Mint a header for a new event, consuming one sequence number
    pub fn header(
        &self,
        domain: Domain,
        event_name: impl Into<String>,
        event_id: impl Into<String>,
    ) -> EventHeader {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let now = now_epoch_microsec();

        let mut header = EventHeader {
            domain,
            event_id: event_id.into(),
            event_name: event_name.into(),
            priority: Priority::Normal,
            sequence,
            start_epoch_microsec: now,
            last_epoch_microsec: now,
            reporting_entity_name: self.reporting_entity_name.clone(),
            source_name: self.source_name.clone(),
            major_version: HEADER_MAJOR_VERSION,
            minor_version: HEADER_MINOR_VERSION,
            event_type: Opt::new(),
            reporting_entity_id: Opt::new(),
            source_id: Opt::new(),
            nfc_naming_code: Opt::new(),
            nf_naming_code: Opt::new(),
        };

        if let Some(id) = &self.reporting_entity_id {
            header.reporting_entity_id.force(id.clone());
        }
        if let Some(id) = &self.source_id {
            header.source_id.force(id.clone());
        }
        header
    }
}

/// The `commonEventHeader` shared by all domains
#[derive(Debug, Clone)]
pub struct EventHeader {
    pub(crate) domain: Domain,
    pub event_id: String,
    pub event_name: String,
    pub priority: Priority,
    pub sequence: u64,
    pub start_epoch_microsec: u64,
    pub last_epoch_microsec: u64,
    pub reporting_entity_name: String,
    pub source_name: String,
    pub major_version: u32,
    pub minor_version: u32,
    pub(crate) event_type: Opt<String>,
    pub(crate) reporting_entity_id: Opt<String>,
    pub(crate) source_id: Opt<String>,
    pub(crate) nfc_naming_code: Opt<String>,
    pub(crate) nf_naming_code: Opt<String>,
}

impl EventHeader {
    /// Domain tag, fixed at construction
    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn set_start_epoch(&mut self, microsec: u64) {
        self.start_epoch_microsec = microsec;
    }

    pub fn set_last_epoch(&mut self, microsec: u64) {
        self.last_epoch_microsec = microsec;
    }

    pub fn set_event_type(&mut self, event_type: impl Into<String>) -> bool {
        self.event_type.set(event_type.into())
    }

    pub fn set_reporting_entity_id(&mut self, id: impl Into<String>) -> bool {
        self.reporting_entity_id.set(id.into())
    }

    pub fn set_source_id(&mut self, id: impl Into<String>) -> bool {
        self.source_id.set(id.into())
    }

    pub fn set_nfc_naming_code(&mut self, code: impl Into<String>) -> bool {
        self.nfc_naming_code.set(code.into())
    }

    pub fn set_nf_naming_code(&mut self, code: impl Into<String>) -> bool {
        self.nf_naming_code.set(code.into())
    }

    pub fn event_type(&self) -> &Opt<String> {
        &self.event_type
    }

    pub fn reporting_entity_id(&self) -> &Opt<String> {
        &self.reporting_entity_id
    }

    pub fn source_id(&self) -> &Opt<String> {
        &self.source_id
    }

    pub fn nfc_naming_code(&self) -> &Opt<String> {
        &self.nfc_naming_code
    }

    pub fn nf_naming_code(&self) -> &Opt<String> {
        &self.nf_naming_code
    }
}
