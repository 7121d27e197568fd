use super::encode_header;
use crate::json::JsonWriter;
use ves_event::Syslog;

pub(super) fn encode_syslog(writer: &mut JsonWriter<'_>, event: &Syslog) {
    encode_header(writer, &event.header);
    writer.open_named_object("syslogFields");

    writer.enc_kv_opt_string("additionalFields", event.additional_filters());
    writer.enc_kv_string("eventSourceType", event.source_type.as_str());
    writer.enc_kv_string("syslogMsg", &event.syslog_msg);
    writer.enc_kv_string("syslogTag", &event.syslog_tag);

    writer.enc_kv_opt_string("eventSourceHost", event.event_source_host());
    if let Some(facility) = event.facility().get() {
        if !writer.suppress_field("syslogFacility") {
            writer.enc_kv_int("syslogFacility", facility.code());
        }
    }
    writer.enc_kv_opt_int("syslogPri", event.priority());
    writer.enc_kv_opt_string("syslogProc", event.proc_name());
    writer.enc_kv_opt_int("syslogProcId", event.proc_id());
    writer.enc_kv_opt_string("syslogSData", event.s_data());
    writer.enc_kv_opt_string("syslogSdId", event.sd_id());
    writer.enc_kv_opt_string("syslogSev", event.severity());
    writer.enc_kv_opt_int("syslogVer", event.version());

    writer.close_object_with_version(
        "syslogFieldsVersion",
        event.major_version,
        event.minor_version,
    );
}
