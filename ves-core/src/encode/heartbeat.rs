use super::{encode_header, encode_nv_list};
use crate::json::JsonWriter;
use ves_event::HeartbeatField;

pub(super) fn encode_heartbeat_field(writer: &mut JsonWriter<'_>, event: &HeartbeatField) {
    encode_header(writer, &event.header);
    writer.open_named_object("heartbeatField");

    writer.enc_kv_int("heartbeatInterval", event.heartbeat_interval);
    encode_nv_list(writer, "additionalFields", event.additional_info());

    writer.close_object_with_version(
        "heartbeatFieldsVersion",
        event.major_version,
        event.minor_version,
    );
}
