use super::{encode_header, encode_nv_list};
use crate::json::JsonWriter;
use ves_event::ThresholdCross;

pub(super) fn encode_threshold_cross(writer: &mut JsonWriter<'_>, event: &ThresholdCross) {
    encode_header(writer, &event.header);
    writer.open_named_object("thresholdCrossingAlert");

    let counter = &event.additional_parameters;
    writer.open_named_object("additionalParameters");
    writer.enc_kv_string("criticality", counter.criticality.as_str());
    writer.enc_kv_string("name", &counter.name);
    writer.enc_kv_string("thresholdCrossed", &counter.threshold_crossed);
    writer.enc_kv_string("value", &counter.value);
    writer.close_object();

    writer.enc_kv_string("alertAction", event.alert_action.as_str());
    writer.enc_kv_string("alertDescription", &event.alert_description);
    writer.enc_kv_string("alertType", event.alert_type.as_str());
    writer.enc_kv_ull("collectionTimestamp", event.collection_timestamp);
    writer.enc_kv_string("eventSeverity", event.severity.as_str());
    writer.enc_kv_ull("eventStartTimestamp", event.event_start_timestamp);

    writer.enc_kv_opt_string("alertValue", event.alert_value());
    writer.enc_kv_opt_string("dataCollector", event.data_collector());
    writer.enc_kv_opt_string("elementType", event.element_type());
    writer.enc_kv_opt_string("interfaceName", event.interface_name());
    writer.enc_kv_opt_string("networkService", event.network_service());
    writer.enc_kv_opt_string("possibleRootCause", event.possible_root_cause());

    encode_nv_list(writer, "additionalFields", event.additional_info());
    writer.speculative_list("associatedAlertIdList", |w| {
        for alert_id in event.alert_ids() {
            w.enc_list_item(alert_id);
        }
        !event.alert_ids().is_empty()
    });

    writer.close_object_with_version(
        "thresholdCrossingFieldsVersion",
        event.major_version,
        event.minor_version,
    );
}
