use super::encode_header;
use crate::json::JsonWriter;
use ves_event::Report;

pub(super) fn encode_report(writer: &mut JsonWriter<'_>, event: &Report) {
    encode_header(writer, &event.header);
    writer.open_named_object("measurementsForVfReportingFields");

    writer.enc_kv_double("measurementInterval", event.measurement_interval);

    writer.speculative_list("featureUsageArray", |w| {
        let mut added = false;
        for usage in event.feature_usage() {
            if w.suppress_nv_pair("featureUsageArray", &usage.feature_id) {
                continue;
            }
            w.open_object();
            w.enc_kv_string("featureIdentifier", &usage.feature_id);
            w.enc_kv_int("featureUtilization", usage.utilization);
            w.close_object();
            added = true;
        }
        added
    });

    writer.speculative_list("additionalMeasurements", |w| {
        let mut added = false;
        for group in event.measurement_groups() {
            if w.suppress_nv_pair("additionalMeasurements", &group.name) {
                continue;
            }
            w.open_object();
            w.enc_kv_string("name", &group.name);
            w.open_named_list("arrayOfFields");
            for measurement in group.measurements() {
                w.open_object();
                w.enc_kv_string("name", &measurement.name);
                w.enc_kv_string("value", &measurement.value);
                w.close_object();
            }
            w.close_list();
            w.close_object();
            added = true;
        }
        added
    });

    writer.close_object_with_version(
        "measurementFieldsVersion",
        event.major_version,
        event.minor_version,
    );
}
