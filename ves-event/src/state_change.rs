//! State change events

use crate::{Domain, EntityState, EventHeader, NameValue, NameValueList, ReportingEntity};

pub const STATE_CHANGE_MAJOR_VERSION: u32 = 1;
pub const STATE_CHANGE_MINOR_VERSION: u32 = 2;

/// An interface moving between service states
#[derive(Debug, Clone)]
pub struct StateChange {
    pub header: EventHeader,
    pub major_version: u32,
    pub minor_version: u32,
    pub new_state: EntityState,
    pub old_state: EntityState,
    pub state_interface: String,
    pub(crate) additional_fields: NameValueList,
}

impl StateChange {
    pub fn new(
        entity: &ReportingEntity,
        event_name: impl Into<String>,
        event_id: impl Into<String>,
        new_state: EntityState,
        old_state: EntityState,
        interface: impl Into<String>,
    ) -> Self {
        Self {
            header: entity.header(Domain::StateChange, event_name, event_id),
            major_version: STATE_CHANGE_MAJOR_VERSION,
            minor_version: STATE_CHANGE_MINOR_VERSION,
            new_state,
            old_state,
            state_interface: interface.into(),
            additional_fields: NameValueList::new(),
        }
    }

    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.additional_fields.push(NameValue::new(name, value));
    }

    pub fn additional_fields(&self) -> &[NameValue] {
        &self.additional_fields
    }
}
