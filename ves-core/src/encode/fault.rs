use super::{encode_header, encode_nv_list};
use crate::json::JsonWriter;
use ves_event::Fault;

pub(super) fn encode_fault(writer: &mut JsonWriter<'_>, fault: &Fault) {
    encode_header(writer, &fault.header);
    writer.open_named_object("faultFields");

    writer.enc_kv_string("alarmCondition", &fault.alarm_condition);
    writer.enc_kv_opt_string("eventCategory", fault.category());
    writer.enc_kv_string("eventSeverity", fault.severity.as_str());
    writer.enc_kv_string("eventSourceType", fault.source_type.as_str());
    writer.enc_kv_string("specificProblem", &fault.specific_problem);
    writer.enc_kv_string("vfStatus", fault.vf_status.as_str());

    encode_nv_list(writer, "alarmAdditionalInformation", fault.additional_info());
    writer.enc_kv_opt_string("alarmInterfaceA", fault.interface());

    writer.close_object_with_version(
        "faultFieldsVersion",
        fault.major_version,
        fault.minor_version,
    );
}
