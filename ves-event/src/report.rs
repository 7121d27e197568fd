//! Measurements-for-VF-reporting events

use crate::{Domain, EventHeader, NameValue, NameValueList, ReportingEntity};

pub const REPORT_MAJOR_VERSION: u32 = 1;
pub const REPORT_MINOR_VERSION: u32 = 1;

/// Utilization of a single feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureUsage {
    pub feature_id: String,
    pub utilization: i64,
}

/// A named group of custom measurements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementGroup {
    pub name: String,
    pub(crate) measurements: NameValueList,
}

impl MeasurementGroup {
    pub fn measurements(&self) -> &[NameValue] {
        &self.measurements
    }
}

/// Periodic VF reporting measurements
#[derive(Debug, Clone)]
pub struct Report {
    pub header: EventHeader,
    pub major_version: u32,
    pub minor_version: u32,
    /// Interval over which the measurements were taken, in seconds
    pub measurement_interval: f64,
    pub(crate) feature_usage: Vec<FeatureUsage>,
    pub(crate) measurement_groups: Vec<MeasurementGroup>,
}

impl Report {
    pub fn new(
        entity: &ReportingEntity,
        event_name: impl Into<String>,
        event_id: impl Into<String>,
        measurement_interval: f64,
    ) -> Self {
        Self {
            header: entity.header(Domain::Report, event_name, event_id),
            major_version: REPORT_MAJOR_VERSION,
            minor_version: REPORT_MINOR_VERSION,
            measurement_interval,
            feature_usage: Vec::new(),
            measurement_groups: Vec::new(),
        }
    }

    pub fn add_feature_usage(&mut self, feature_id: impl Into<String>, utilization: i64) {
        self.feature_usage.push(FeatureUsage {
            feature_id: feature_id.into(),
            utilization,
        });
    }

    /// Add a measurement to the named group, creating the group on first use
    pub fn add_custom_measurement(
        &mut self,
        group: &str,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        let measurement = NameValue::new(name, value);
        match self.measurement_groups.iter_mut().find(|g| g.name == group) {
            Some(existing) => existing.measurements.push(measurement),
            None => {
                let mut measurements = NameValueList::new();
                measurements.push(measurement);
                self.measurement_groups.push(MeasurementGroup {
                    name: group.to_string(),
                    measurements,
                });
            }
        }
    }

    pub fn feature_usage(&self) -> &[FeatureUsage] {
        &self.feature_usage
    }

    pub fn measurement_groups(&self) -> &[MeasurementGroup] {
        &self.measurement_groups
    }
}
