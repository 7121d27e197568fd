//! Event Throttling
//!
//! The collector may answer a POST with a `commandList` asking the client to
//! suppress optional fields or name/value pairs per domain, to change the
//! measurement interval, or to report its current throttling state.
//! [`ThrottleStore`] keeps the per-domain specifications and answers the
//! encoder's suppress/allow questions through [`ThrottlePolicy`].

use crate::json::JsonWriter;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};
use ves_event::Domain;

/// Suppress/allow decisions consulted while encoding
pub trait ThrottlePolicy: Send + Sync {
    /// Whether the optional field (or optional collection) `field` is suppressed
    fn suppress_field(&self, domain: Domain, field: &str) -> bool;

    /// Whether entry `name` of the collection `list` is suppressed
    fn suppress_nv_pair(&self, domain: Domain, list: &str, name: &str) -> bool;
}

/// Policy that never suppresses anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThrottle;

impl ThrottlePolicy for NoThrottle {
    fn suppress_field(&self, _domain: Domain, _field: &str) -> bool {
        false
    }

    fn suppress_nv_pair(&self, _domain: Domain, _list: &str, _name: &str) -> bool {
        false
    }
}

/// Throttling error types
#[derive(Debug, thiserror::Error)]
pub enum ThrottleError {
    #[error("Invalid collector command list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown event domain: {0}")]
    UnknownDomain(String),
}

/// Name/value pairs suppressed within one collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressedNvPairs {
    pub nv_pair_field_name: String,
    #[serde(default)]
    pub suppressed_nv_pair_names: Vec<String>,
}

/// `eventDomainThrottleSpecification` as sent by the collector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainThrottleSpec {
    pub event_domain: String,
    #[serde(default)]
    pub suppressed_field_names: Vec<String>,
    #[serde(default)]
    pub suppressed_nv_pairs_list: Vec<SuppressedNvPairs>,
}

impl DomainThrottleSpec {
    /// A spec with nothing suppressed clears throttling for its domain
    pub fn is_empty(&self) -> bool {
        self.suppressed_field_names.is_empty() && self.suppressed_nv_pairs_list.is_empty()
    }
}

/// A domain's throttle specification with lookup tables built
#[derive(Debug, Clone)]
pub struct ThrottleSpec {
    wire: DomainThrottleSpec,
    fields: HashSet<String>,
    nv_pairs: HashMap<String, HashSet<String>>,
}

impl ThrottleSpec {
    pub fn suppresses_field(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn suppresses_nv_pair(&self, list: &str, name: &str) -> bool {
        self.nv_pairs
            .get(list)
            .map(|names| names.contains(name))
            .unwrap_or(false)
    }

    pub fn wire(&self) -> &DomainThrottleSpec {
        &self.wire
    }

    fn encode(&self, writer: &mut JsonWriter<'_>) {
        writer.open_object();
        writer.enc_kv_string("eventDomain", &self.wire.event_domain);
        writer.speculative_list("suppressedFieldNames", |w| {
            for field in &self.wire.suppressed_field_names {
                w.enc_list_item(field);
            }
            !self.wire.suppressed_field_names.is_empty()
        });
        writer.speculative_list("suppressedNvPairsList", |w| {
            for pairs in &self.wire.suppressed_nv_pairs_list {
                w.open_object();
                w.enc_kv_string("nvPairFieldName", &pairs.nv_pair_field_name);
                w.open_named_list("suppressedNvPairNames");
                for name in &pairs.suppressed_nv_pair_names {
                    w.enc_list_item(name);
                }
                w.close_list();
                w.close_object();
            }
            !self.wire.suppressed_nv_pairs_list.is_empty()
        });
        writer.close_object();
    }
}

impl From<DomainThrottleSpec> for ThrottleSpec {
    fn from(wire: DomainThrottleSpec) -> Self {
        let fields = wire.suppressed_field_names.iter().cloned().collect();
        let mut nv_pairs: HashMap<String, HashSet<String>> = HashMap::new();
        for pairs in &wire.suppressed_nv_pairs_list {
            nv_pairs
                .entry(pairs.nv_pair_field_name.clone())
                .or_default()
                .extend(pairs.suppressed_nv_pair_names.iter().cloned());
        }
        Self {
            wire,
            fields,
            nv_pairs,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommandListResponse {
    #[serde(default)]
    command_list: Vec<CommandEntry>,
}

#[derive(Debug, Deserialize)]
struct CommandEntry {
    command: Command,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Command {
    command_type: String,
    event_domain_throttle_specification: Option<DomainThrottleSpec>,
    measurement_interval: Option<u64>,
}

/// Shared per-domain throttle state
#[derive(Debug, Default)]
pub struct ThrottleStore {
    specs: RwLock<HashMap<Domain, ThrottleSpec>>,
    /// Seconds; zero means the collector has not specified one. A requested
    /// interval of zero is rejected, so zero is never a real value.
    measurement_interval: AtomicU64,
}

impl ThrottleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a domain's specification. An empty spec clears the domain.
    pub fn set_spec(&self, spec: DomainThrottleSpec) -> Result<(), ThrottleError> {
        let domain: Domain = spec
            .event_domain
            .parse()
            .map_err(|_| ThrottleError::UnknownDomain(spec.event_domain.clone()))?;

        if spec.is_empty() {
            self.clear_spec(domain);
            return Ok(());
        }

        info!(
            domain = %domain,
            fields = spec.suppressed_field_names.len(),
            nv_lists = spec.suppressed_nv_pairs_list.len(),
            "Throttling specification applied"
        );
        self.specs.write().insert(domain, ThrottleSpec::from(spec));
        Ok(())
    }

    /// Stop throttling a domain
    pub fn clear_spec(&self, domain: Domain) {
        if self.specs.write().remove(&domain.throttle_domain()).is_some() {
            info!(domain = %domain, "Throttling cleared");
        }
    }

    pub fn spec(&self, domain: Domain) -> Option<ThrottleSpec> {
        self.specs.read().get(&domain.throttle_domain()).cloned()
    }

    pub fn is_throttled(&self) -> bool {
        !self.specs.read().is_empty()
    }

    /// Measurement interval requested by the collector, in seconds
    pub fn measurement_interval(&self) -> Option<u64> {
        match self.measurement_interval.load(Ordering::Relaxed) {
            0 => None,
            secs => Some(secs),
        }
    }

    /// Apply the `commandList` in a collector response body.
    ///
    /// Returns the `eventThrottlingState` report to post back when the
    /// collector asked for it.
    pub fn handle_response(&self, body: &str) -> Result<Option<String>, ThrottleError> {
        if body.trim().is_empty() {
            return Ok(None);
        }

        let response: CommandListResponse = serde_json::from_str(body)?;
        let mut provide_state = false;

        for entry in response.command_list {
            let command = entry.command;
            debug!(command_type = %command.command_type, "Collector command");

            match command.command_type.as_str() {
                "throttlingSpecification" => match command.event_domain_throttle_specification {
                    Some(spec) => {
                        if let Err(e) = self.set_spec(spec) {
                            warn!(error = %e, "Ignoring throttling specification");
                        }
                    }
                    None => warn!("Throttling specification command without a specification"),
                },
                "measurementIntervalChange" => match command.measurement_interval {
                    Some(0) => warn!("Ignoring zero measurement interval"),
                    Some(interval) => {
                        info!(interval, "Measurement interval changed");
                        self.measurement_interval.store(interval, Ordering::Relaxed);
                    }
                    None => warn!("Measurement interval command without an interval"),
                },
                "provideThrottlingState" => provide_state = true,
                other => warn!(command_type = other, "Unsupported collector command"),
            }
        }

        Ok(provide_state.then(|| self.encode_state()))
    }

    /// Encode the `eventThrottlingState` report
    pub fn encode_state(&self) -> String {
        let specs = self.specs.read();
        let mut writer = JsonWriter::new();

        writer.open_object();
        writer.open_named_object("eventThrottlingState");
        if specs.is_empty() {
            writer.enc_kv_string("eventThrottlingMode", "normal");
        } else {
            writer.enc_kv_string("eventThrottlingMode", "throttled");
            writer.open_named_list("eventDomainThrottleSpecificationList");
            for domain in Domain::ALL {
                if let Some(spec) = specs.get(&domain) {
                    spec.encode(&mut writer);
                }
            }
            writer.close_list();
        }
        writer.close_object();
        writer.close_object();

        writer.finish()
    }
}

impl ThrottlePolicy for ThrottleStore {
    fn suppress_field(&self, domain: Domain, field: &str) -> bool {
        self.specs
            .read()
            .get(&domain.throttle_domain())
            .map(|spec| spec.suppresses_field(field))
            .unwrap_or(false)
    }

    fn suppress_nv_pair(&self, domain: Domain, list: &str, name: &str) -> bool {
        self.specs
            .read()
            .get(&domain.throttle_domain())
            .map(|spec| spec.suppresses_nv_pair(list, name))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const FAULT_SPEC: &str = r#"{
        "commandList": [
            {"command": {
                "commandType": "throttlingSpecification",
                "eventDomainThrottleSpecification": {
                    "eventDomain": "fault",
                    "suppressedFieldNames": ["alarmInterfaceA"],
                    "suppressedNvPairsList": [
                        {"nvPairFieldName": "alarmAdditionalInformation",
                         "suppressedNvPairNames": ["cause", "trace"]}
                    ]
                }
            }}
        ]
    }"#;

    #[test]
    fn test_apply_throttling_specification() {
        let store = ThrottleStore::new();
        assert_eq!(store.handle_response(FAULT_SPEC).unwrap(), None);

        assert!(store.suppress_field(Domain::Fault, "alarmInterfaceA"));
        assert!(!store.suppress_field(Domain::Fault, "eventCategory"));
        assert!(!store.suppress_field(Domain::Syslog, "alarmInterfaceA"));
        assert!(store.suppress_nv_pair(Domain::Fault, "alarmAdditionalInformation", "cause"));
        assert!(!store.suppress_nv_pair(Domain::Fault, "alarmAdditionalInformation", "slot"));
        assert!(!store.suppress_nv_pair(Domain::Fault, "additionalFields", "cause"));
    }

    #[test]
    fn test_empty_spec_clears_domain() {
        let store = ThrottleStore::new();
        store.handle_response(FAULT_SPEC).unwrap();
        assert!(store.is_throttled());

        store
            .set_spec(DomainThrottleSpec {
                event_domain: "fault".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert!(!store.is_throttled());
        assert!(!store.suppress_field(Domain::Fault, "alarmInterfaceA"));
    }

    #[test]
    fn test_unknown_domain_rejected() {
        let store = ThrottleStore::new();
        let err = store
            .set_spec(DomainThrottleSpec {
                event_domain: "voiceQuality".to_string(),
                suppressed_field_names: vec!["x".to_string()],
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, ThrottleError::UnknownDomain(d) if d == "voiceQuality"));
    }

    #[test]
    fn test_heartbeat_spec_covers_heartbeat_fields() {
        let store = ThrottleStore::new();
        store
            .set_spec(DomainThrottleSpec {
                event_domain: "heartbeat".to_string(),
                suppressed_field_names: vec!["additionalFields".to_string()],
                ..Default::default()
            })
            .unwrap();
        assert!(store.suppress_field(Domain::HeartbeatField, "additionalFields"));
    }

    #[test]
    fn test_measurement_interval_and_unknown_commands() {
        let store = ThrottleStore::new();
        assert_eq!(store.measurement_interval(), None);

        let body = r#"{"commandList":[
            {"command":{"commandType":"measurementIntervalChange","measurementInterval":30}},
            {"command":{"commandType":"heartbeatIntervalChange"}}
        ]}"#;
        assert_eq!(store.handle_response(body).unwrap(), None);
        assert_eq!(store.measurement_interval(), Some(30));
    }

    #[test]
    fn test_zero_measurement_interval_ignored() {
        let store = ThrottleStore::new();
        let set = r#"{"commandList":[
            {"command":{"commandType":"measurementIntervalChange","measurementInterval":45}}
        ]}"#;
        let zero = r#"{"commandList":[
            {"command":{"commandType":"measurementIntervalChange","measurementInterval":0}}
        ]}"#;

        store.handle_response(zero).unwrap();
        assert_eq!(store.measurement_interval(), None);

        store.handle_response(set).unwrap();
        store.handle_response(zero).unwrap();
        assert_eq!(store.measurement_interval(), Some(45));
    }

    #[test]
    fn test_provide_throttling_state() {
        let store = ThrottleStore::new();
        let ask = r#"{"commandList":[{"command":{"commandType":"provideThrottlingState"}}]}"#;

        let normal = store.handle_response(ask).unwrap().unwrap();
        assert_eq!(
            normal,
            r#"{"eventThrottlingState":{"eventThrottlingMode":"normal"}}"#
        );

        store.handle_response(FAULT_SPEC).unwrap();
        let throttled = store.handle_response(ask).unwrap().unwrap();
        let parsed: Value = serde_json::from_str(&throttled).unwrap();
        let state = &parsed["eventThrottlingState"];
        assert_eq!(state["eventThrottlingMode"], "throttled");
        let spec = &state["eventDomainThrottleSpecificationList"][0];
        assert_eq!(spec["eventDomain"], "fault");
        assert_eq!(spec["suppressedFieldNames"][0], "alarmInterfaceA");
        assert_eq!(
            spec["suppressedNvPairsList"][0]["suppressedNvPairNames"][1],
            "trace"
        );
    }

    #[test]
    fn test_empty_and_invalid_bodies() {
        let store = ThrottleStore::new();
        assert_eq!(store.handle_response("  ").unwrap(), None);
        assert_eq!(store.handle_response("{}").unwrap(), None);
        assert!(matches!(
            store.handle_response("not json"),
            Err(ThrottleError::Parse(_))
        ));
    }
}
