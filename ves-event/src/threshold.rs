//! Threshold crossing alert events

use crate::{
    AlertAction, AlertType, Criticality, Domain, EventHeader, NameValue, NameValueList, Opt,
    ReportingEntity, Severity,
};

pub const THRESHOLD_CROSS_MAJOR_VERSION: u32 = 1;
pub const THRESHOLD_CROSS_MINOR_VERSION: u32 = 1;

/// The performance counter whose threshold was crossed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerfCounter {
    pub criticality: Criticality,
    pub name: String,
    pub threshold_crossed: String,
    pub value: String,
}

/// A performance counter crossing its configured threshold
#[derive(Debug, Clone)]
pub struct ThresholdCross {
    pub header: EventHeader,
    pub major_version: u32,
    pub minor_version: u32,

    pub additional_parameters: PerfCounter,
    pub alert_action: AlertAction,
    pub alert_description: String,
    pub alert_type: AlertType,
    pub collection_timestamp: u64,
    pub severity: Severity,
    pub event_start_timestamp: u64,

    pub(crate) alert_value: Opt<String>,
    pub(crate) data_collector: Opt<String>,
    pub(crate) element_type: Opt<String>,
    pub(crate) interface_name: Opt<String>,
    pub(crate) network_service: Opt<String>,
    pub(crate) possible_root_cause: Opt<String>,

    pub(crate) additional_info: NameValueList,
    pub(crate) alert_ids: Vec<String>,
}

impl ThresholdCross {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entity: &ReportingEntity,
        event_name: impl Into<String>,
        event_id: impl Into<String>,
        counter: PerfCounter,
        alert_action: AlertAction,
        alert_description: impl Into<String>,
        alert_type: AlertType,
        collection_timestamp: u64,
        severity: Severity,
        event_start_timestamp: u64,
    ) -> Self {
        Self {
            header: entity.header(Domain::ThresholdCrossingAlert, event_name, event_id),
            major_version: THRESHOLD_CROSS_MAJOR_VERSION,
            minor_version: THRESHOLD_CROSS_MINOR_VERSION,
            additional_parameters: counter,
            alert_action,
            alert_description: alert_description.into(),
            alert_type,
            collection_timestamp,
            severity,
            event_start_timestamp,
            alert_value: Opt::new(),
            data_collector: Opt::new(),
            element_type: Opt::new(),
            interface_name: Opt::new(),
            network_service: Opt::new(),
            possible_root_cause: Opt::new(),
            additional_info: NameValueList::new(),
            alert_ids: Vec::new(),
        }
    }

    pub fn add_additional_info(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.additional_info.push(NameValue::new(name, value));
    }

    /// Associate another alert with this one
    pub fn add_alert_id(&mut self, alert_id: impl Into<String>) {
        self.alert_ids.push(alert_id.into());
    }

    pub fn set_alert_value(&mut self, value: impl Into<String>) -> bool {
        self.alert_value.set(value.into())
    }

    pub fn set_data_collector(&mut self, value: impl Into<String>) -> bool {
        self.data_collector.set(value.into())
    }

    pub fn set_element_type(&mut self, value: impl Into<String>) -> bool {
        self.element_type.set(value.into())
    }

    pub fn set_interface_name(&mut self, value: impl Into<String>) -> bool {
        self.interface_name.set(value.into())
    }

    pub fn set_network_service(&mut self, value: impl Into<String>) -> bool {
        self.network_service.set(value.into())
    }

    pub fn set_possible_root_cause(&mut self, value: impl Into<String>) -> bool {
        self.possible_root_cause.set(value.into())
    }

    pub fn alert_value(&self) -> &Opt<String> {
        &self.alert_value
    }

    pub fn data_collector(&self) -> &Opt<String> {
        &self.data_collector
    }

    pub fn element_type(&self) -> &Opt<String> {
        &self.element_type
    }

    pub fn interface_name(&self) -> &Opt<String> {
        &self.interface_name
    }

    pub fn network_service(&self) -> &Opt<String> {
        &self.network_service
    }

    pub fn possible_root_cause(&self) -> &Opt<String> {
        &self.possible_root_cause
    }

    pub fn additional_info(&self) -> &[NameValue] {
        &self.additional_info
    }

    pub fn alert_ids(&self) -> &[String] {
        &self.alert_ids
    }
}
