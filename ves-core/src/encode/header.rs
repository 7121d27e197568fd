use crate::json::JsonWriter;
use ves_event::EventHeader;

/// Write the `commonEventHeader` object
pub fn encode_header(writer: &mut JsonWriter<'_>, header: &EventHeader) {
    writer.open_named_object("commonEventHeader");

    writer.enc_kv_string("domain", header.domain().as_str());
    writer.enc_kv_string("eventId", &header.event_id);
    writer.enc_kv_string("eventName", &header.event_name);
    writer.enc_kv_ull("lastEpochMicrosec", header.last_epoch_microsec);
    writer.enc_kv_string("priority", header.priority.as_str());
    writer.enc_kv_string("reportingEntityName", &header.reporting_entity_name);
    writer.enc_kv_ull("sequence", header.sequence);
    writer.enc_kv_string("sourceName", &header.source_name);
    writer.enc_kv_ull("startEpochMicrosec", header.start_epoch_microsec);
    writer.enc_version("version", header.major_version, header.minor_version);

    writer.enc_kv_opt_string("eventType", header.event_type());
    writer.enc_kv_opt_string("reportingEntityId", header.reporting_entity_id());
    writer.enc_kv_opt_string("sourceId", header.source_id());
    writer.enc_kv_opt_string("nfcNamingCode", header.nfc_naming_code());
    writer.enc_kv_opt_string("nfNamingCode", header.nf_naming_code());

    writer.close_object();
}
