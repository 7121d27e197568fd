use super::{encode_header, encode_nv_list};
use crate::json::JsonWriter;
use serde::de::IgnoredAny;
use tracing::warn;
use ves_event::{JsonObject, JsonObjectInstance, Other};

pub(super) fn encode_other(writer: &mut JsonWriter<'_>, event: &Other) {
    encode_header(writer, &event.header);
    writer.open_named_object("otherFields");

    writer.speculative_list("hashOfNameValuePairArrays", |w| {
        let mut added = false;
        for array in event.named_arrays().iter().filter(|a| !a.fields().is_empty()) {
            w.open_object();
            w.enc_kv_string("name", &array.name);
            w.open_named_list("arrayOfFields");
            for pair in array.fields() {
                w.open_object();
                w.enc_kv_string("name", &pair.name);
                w.enc_kv_string("value", &pair.value);
                w.close_object();
            }
            w.close_list();
            w.close_object();
            added = true;
        }
        added
    });

    writer.speculative_list("jsonObjects", |w| {
        for object in event.json_objects() {
            encode_json_object(w, object);
        }
        !event.json_objects().is_empty()
    });

    encode_nv_list(writer, "nameValuePairs", event.name_value_pairs());

    writer.close_object_with_version(
        "otherFieldsVersion",
        event.major_version,
        event.minor_version,
    );
}

fn encode_json_object(writer: &mut JsonWriter<'_>, object: &JsonObject) {
    writer.open_object();

    writer.speculative_list("objectInstances", |w| {
        let mut added = false;
        for instance in object.instances() {
            added |= encode_instance(w, &object.object_name, instance);
        }
        added
    });

    writer.enc_kv_string("objectName", &object.object_name);
    writer.enc_kv_opt_string("objectSchema", object.schema());
    writer.enc_kv_opt_string("objectSchemaUrl", object.schema_url());
    writer.enc_kv_opt_string("nfSubscribedObjectName", object.nf_subscribed_object_name());
    writer.enc_kv_opt_string("nfSubscriptionId", object.nf_subscription_id());

    writer.close_object();
}

fn encode_instance(writer: &mut JsonWriter<'_>, object_name: &str, instance: &JsonObjectInstance) -> bool {
    if serde_json::from_str::<IgnoredAny>(&instance.object_instance).is_err() {
        warn!(object = object_name, "Skipping object instance that is not valid JSON");
        return false;
    }

    writer.open_object();
    writer.enc_kv_object("objectInstance", &instance.object_instance);
    writer.enc_kv_opt_ull("objectInstanceEpochMicrosec", instance.epoch_microsec());
    writer.speculative_list("objectKeys", |w| {
        for key in instance.keys() {
            w.open_object();
            w.enc_kv_string("keyName", &key.key_name);
            w.enc_kv_opt_int("keyOrder", key.order());
            w.enc_kv_opt_string("keyValue", key.value());
            w.close_object();
        }
        !instance.keys().is_empty()
    });
    writer.close_object();
    true
}
