use super::{encode_header, encode_nv_list};
use crate::json::JsonWriter;
use ves_event::StateChange;

pub(super) fn encode_state_change(writer: &mut JsonWriter<'_>, event: &StateChange) {
    encode_header(writer, &event.header);
    writer.open_named_object("stateChangeFields");

    writer.enc_kv_string("newState", event.new_state.as_str());
    writer.enc_kv_string("oldState", event.old_state.as_str());
    writer.enc_kv_string("stateInterface", &event.state_interface);
    encode_nv_list(writer, "additionalFields", event.additional_fields());

    writer.close_object_with_version(
        "stateChangeFieldsVersion",
        event.major_version,
        event.minor_version,
    );
}
