//! "Other" events
//!
//! Free-form events carrying name/value pairs, named arrays of pairs and
//! opaque JSON object instances.

use crate::{Domain, EventHeader, NameValue, NameValueList, Opt, ReportingEntity};

pub const OTHER_MAJOR_VERSION: u32 = 1;
pub const OTHER_MINOR_VERSION: u32 = 1;

/// A named, ordered array of name/value pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedArray {
    pub name: String,
    pub(crate) fields: NameValueList,
}

impl NamedArray {
    pub fn fields(&self) -> &[NameValue] {
        &self.fields
    }
}

/// A key identifying an object instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKey {
    pub key_name: String,
    pub(crate) key_order: Opt<i64>,
    pub(crate) key_value: Opt<String>,
}

impl ObjectKey {
    pub fn new(key_name: impl Into<String>) -> Self {
        Self {
            key_name: key_name.into(),
            key_order: Opt::new(),
            key_value: Opt::new(),
        }
    }

    pub fn set_order(&mut self, order: i64) -> bool {
        self.key_order.set(order)
    }

    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        self.key_value.set(value.into())
    }

    pub fn order(&self) -> &Opt<i64> {
        &self.key_order
    }

    pub fn value(&self) -> &Opt<String> {
        &self.key_value
    }
}

/// One instance of a JSON object, carried as raw JSON text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonObjectInstance {
    /// Raw JSON, emitted verbatim
    pub object_instance: String,
    pub(crate) epoch_microsec: Opt<u64>,
    pub(crate) object_keys: Vec<ObjectKey>,
}

impl JsonObjectInstance {
    pub fn new(object_instance: impl Into<String>) -> Self {
        Self {
            object_instance: object_instance.into(),
            epoch_microsec: Opt::new(),
            object_keys: Vec::new(),
        }
    }

    pub fn set_epoch_microsec(&mut self, microsec: u64) -> bool {
        self.epoch_microsec.set(microsec)
    }

    pub fn add_key(&mut self, key: ObjectKey) {
        self.object_keys.push(key);
    }

    pub fn epoch_microsec(&self) -> &Opt<u64> {
        &self.epoch_microsec
    }

    pub fn keys(&self) -> &[ObjectKey] {
        &self.object_keys
    }
}

/// A named JSON object with its instances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonObject {
    pub object_name: String,
    pub(crate) object_schema: Opt<String>,
    pub(crate) object_schema_url: Opt<String>,
    pub(crate) nf_subscribed_object_name: Opt<String>,
    pub(crate) nf_subscription_id: Opt<String>,
    pub(crate) instances: Vec<JsonObjectInstance>,
}

impl JsonObject {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            object_schema: Opt::new(),
            object_schema_url: Opt::new(),
            nf_subscribed_object_name: Opt::new(),
            nf_subscription_id: Opt::new(),
            instances: Vec::new(),
        }
    }

    pub fn set_schema(&mut self, schema: impl Into<String>) -> bool {
        self.object_schema.set(schema.into())
    }

    pub fn set_schema_url(&mut self, url: impl Into<String>) -> bool {
        self.object_schema_url.set(url.into())
    }

    pub fn set_nf_subscribed_object_name(&mut self, name: impl Into<String>) -> bool {
        self.nf_subscribed_object_name.set(name.into())
    }

    pub fn set_nf_subscription_id(&mut self, id: impl Into<String>) -> bool {
        self.nf_subscription_id.set(id.into())
    }

    pub fn add_instance(&mut self, instance: JsonObjectInstance) {
        self.instances.push(instance);
    }

    pub fn schema(&self) -> &Opt<String> {
        &self.object_schema
    }

    pub fn schema_url(&self) -> &Opt<String> {
        &self.object_schema_url
    }

    pub fn nf_subscribed_object_name(&self) -> &Opt<String> {
        &self.nf_subscribed_object_name
    }

    pub fn nf_subscription_id(&self) -> &Opt<String> {
        &self.nf_subscription_id
    }

    pub fn instances(&self) -> &[JsonObjectInstance] {
        &self.instances
    }
}

/// Event for data that fits no other domain
#[derive(Debug, Clone)]
pub struct Other {
    pub header: EventHeader,
    pub major_version: u32,
    pub minor_version: u32,
    /// Named arrays, kept in the order each name was first used
    pub(crate) named_arrays: Vec<NamedArray>,
    pub(crate) json_objects: Vec<JsonObject>,
    pub(crate) name_value_pairs: NameValueList,
}

impl Other {
    pub fn new(
        entity: &ReportingEntity,
        event_name: impl Into<String>,
        event_id: impl Into<String>,
    ) -> Self {
        Self {
            header: entity.header(Domain::Other, event_name, event_id),
            major_version: OTHER_MAJOR_VERSION,
            minor_version: OTHER_MINOR_VERSION,
            named_arrays: Vec::new(),
            json_objects: Vec::new(),
            name_value_pairs: NameValueList::new(),
        }
    }

    pub fn add_name_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.name_value_pairs.push(NameValue::new(name, value));
    }

    /// Append a pair to the named array, creating the array on first use
    pub fn add_named_array_entry(
        &mut self,
        array: &str,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        let pair = NameValue::new(name, value);
        match self.named_arrays.iter_mut().find(|a| a.name == array) {
            Some(existing) => existing.fields.push(pair),
            None => {
                let mut fields = NameValueList::new();
                fields.push(pair);
                self.named_arrays.push(NamedArray {
                    name: array.to_string(),
                    fields,
                });
            }
        }
    }

    pub fn named_array(&self, array: &str) -> Option<&NamedArray> {
        self.named_arrays.iter().find(|a| a.name == array)
    }

    pub fn add_json_object(&mut self, object: JsonObject) {
        self.json_objects.push(object);
    }

    pub fn named_arrays(&self) -> &[NamedArray] {
        &self.named_arrays
    }

    pub fn json_objects(&self) -> &[JsonObject] {
        &self.json_objects
    }

    pub fn name_value_pairs(&self) -> &[NameValue] {
        &self.name_value_pairs
    }
}
