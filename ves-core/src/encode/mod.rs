//! Domain Encoders
//!
//! Map an [`Event`] to the VES JSON body
//! `{"event":{"commonEventHeader":{...},"<domainFields>":{...}}}`.
//!
//! Every domain follows the same shape: header, then the domain object with
//! mandatory fields written unconditionally, optional scalars through the
//! self-omitting `enc_kv_opt_*` writers, and each additional-info collection
//! written speculatively so that an entirely throttled collection disappears
//! along with its key.

mod fault;
mod header;
mod heartbeat;
mod other;
mod report;
mod state_change;
mod syslog;
mod threshold;

use crate::json::JsonWriter;
use crate::throttle::ThrottlePolicy;
use ves_event::{Event, NameValue};

pub use header::encode_header;

/// Encode an event, consulting `throttle` for suppressed fields
pub fn encode_event(event: &Event, throttle: Option<&dyn ThrottlePolicy>) -> String {
    let mut writer = match throttle {
        Some(policy) => JsonWriter::with_throttle(policy, event.domain()),
        None => JsonWriter::new(),
    };

    writer.open_object();
    writer.open_named_object("event");

    match event {
        Event::Heartbeat(header) => encode_header(&mut writer, header),
        Event::Fault(e) => fault::encode_fault(&mut writer, e),
        Event::Report(e) => report::encode_report(&mut writer, e),
        Event::HeartbeatField(e) => heartbeat::encode_heartbeat_field(&mut writer, e),
        Event::StateChange(e) => state_change::encode_state_change(&mut writer, e),
        Event::Syslog(e) => syslog::encode_syslog(&mut writer, e),
        Event::Other(e) => other::encode_other(&mut writer, e),
        Event::ThresholdCross(e) => threshold::encode_threshold_cross(&mut writer, e),
    }

    writer.close_object();
    writer.close_object();
    writer.finish()
}

/// Write an optional list of `{"name":..,"value":..}` objects.
///
/// Entries suppressed for `list` are skipped. If none survive, the list and
/// its key are rewound away. Returns whether anything was written.
pub fn encode_nv_list(writer: &mut JsonWriter<'_>, list: &str, pairs: &[NameValue]) -> bool {
    let checkpoint = writer.checkpoint();
    if !writer.open_opt_named_list(list) {
        return false;
    }

    let mut added = false;
    for pair in pairs {
        if writer.suppress_nv_pair(list, &pair.name) {
            continue;
        }
        writer.open_object();
        writer.enc_kv_string("name", &pair.name);
        writer.enc_kv_string("value", &pair.value);
        writer.close_object();
        added = true;
    }
    writer.close_list();

    if !added {
        writer.rewind(checkpoint);
    }
    added
}
