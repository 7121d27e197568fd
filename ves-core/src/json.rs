//! Throttle-Aware JSON Writer
//!
//! A cursor-based builder producing compact JSON text. A frame stack records
//! whether each open object or list already holds an item, which decides
//! where separators go.
//!
//! Optional collections are written speculatively: take a [`Checkpoint`],
//! open the list, emit whatever survives throttling, close it, and
//! [`JsonWriter::rewind`] if nothing was written. After a rewind the buffer is
//! byte-identical to never having opened the list.
//!
//! Field suppression applies only at [`THROTTLE_FIELD_DEPTH`], the depth of a
//! domain's field object (`{` → `"event":{` → `"<domain>Fields":{`).

use crate::throttle::ThrottlePolicy;
use serde_json::Value;
use std::fmt::Write as _;
use tracing::debug;
use ves_event::{Domain, Opt};

/// Nesting depth at which optional fields are subject to throttling
pub const THROTTLE_FIELD_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Object,
    List,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: FrameKind,
    has_items: bool,
}

/// Saved writer position for [`JsonWriter::rewind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    offset: usize,
    depth: usize,
    has_items: bool,
}

/// JSON text builder with optional throttle policy
pub struct JsonWriter<'a> {
    buf: String,
    frames: Vec<Frame>,
    throttle: Option<(&'a dyn ThrottlePolicy, Domain)>,
}

impl<'a> JsonWriter<'a> {
    /// Create a writer with no throttling
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(1024),
            frames: Vec::with_capacity(8),
            throttle: None,
        }
    }

    /// Create a writer that consults `policy` for the given domain
    pub fn with_throttle(policy: &'a dyn ThrottlePolicy, domain: Domain) -> Self {
        let mut writer = Self::new();
        writer.throttle = Some((policy, domain));
        writer
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Consume the writer and return the JSON text
    pub fn finish(self) -> String {
        debug_assert_eq!(self.frames.len(), 0, "unbalanced JSON frames");
        self.buf
    }

    // ------------------------------------------------------------------
    // Throttling
    // ------------------------------------------------------------------

    /// Whether an optional field or collection named `key` is suppressed here
    pub fn suppress_field(&self, key: &str) -> bool {
        match self.throttle {
            Some((policy, domain)) if self.depth() == THROTTLE_FIELD_DEPTH => {
                let suppressed = policy.suppress_field(domain, key);
                if suppressed {
                    debug!(domain = %domain, field = key, "Suppressing field");
                }
                suppressed
            }
            _ => false,
        }
    }

    /// Whether entry `name` of the collection `list` is suppressed
    pub fn suppress_nv_pair(&self, list: &str, name: &str) -> bool {
        match self.throttle {
            Some((policy, domain)) => {
                let suppressed = policy.suppress_nv_pair(domain, list, name);
                if suppressed {
                    debug!(domain = %domain, list, name, "Suppressing name/value pair");
                }
                suppressed
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Checkpoint / rewind
    // ------------------------------------------------------------------

    /// Record the current position. Checkpoints nest.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            offset: self.buf.len(),
            depth: self.frames.len(),
            has_items: self.frames.last().map(|f| f.has_items).unwrap_or(false),
        }
    }

    /// Discard everything written since `checkpoint`
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        debug_assert!(checkpoint.offset <= self.buf.len());
        debug_assert!(checkpoint.depth <= self.frames.len());

        self.buf.truncate(checkpoint.offset);
        self.frames.truncate(checkpoint.depth);
        if let Some(top) = self.frames.last_mut() {
            top.has_items = checkpoint.has_items;
        }
    }

    /// Write an optional named list speculatively.
    ///
    /// `body` writes the list items and returns whether it wrote any. If it
    /// wrote none, or the list itself is throttled, nothing is left behind.
    pub fn speculative_list<F>(&mut self, key: &str, body: F) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let checkpoint = self.checkpoint();
        if !self.open_opt_named_list(key) {
            return false;
        }

        let added = body(self);
        self.close_list();

        if !added {
            self.rewind(checkpoint);
        }
        added
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    pub fn open_object(&mut self) {
        self.separator();
        self.push_frame(FrameKind::Object);
    }

    pub fn open_named_object(&mut self, key: &str) {
        self.write_key(key);
        self.push_frame(FrameKind::Object);
    }

    /// Open a named object unless it is throttled. Returns whether it opened.
    pub fn open_opt_named_object(&mut self, key: &str) -> bool {
        if self.suppress_field(key) {
            return false;
        }
        self.open_named_object(key);
        true
    }

    pub fn close_object(&mut self) {
        self.pop_frame(FrameKind::Object);
    }

    pub fn open_list(&mut self) {
        self.separator();
        self.push_frame(FrameKind::List);
    }

    pub fn open_named_list(&mut self, key: &str) {
        self.write_key(key);
        self.push_frame(FrameKind::List);
    }

    /// Open a named list unless it is throttled. Returns whether it opened.
    pub fn open_opt_named_list(&mut self, key: &str) -> bool {
        if self.suppress_field(key) {
            return false;
        }
        self.open_named_list(key);
        true
    }

    pub fn close_list(&mut self) {
        self.pop_frame(FrameKind::List);
    }

    // ------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------

    pub fn enc_kv_string(&mut self, key: &str, value: &str) {
        self.write_key(key);
        self.write_string(value);
    }

    pub fn enc_kv_int(&mut self, key: &str, value: i64) {
        self.write_key(key);
        let _ = write!(self.buf, "{}", value);
    }

    pub fn enc_kv_ull(&mut self, key: &str, value: u64) {
        self.write_key(key);
        let _ = write!(self.buf, "{}", value);
    }

    /// Doubles use the shortest round-trip form; non-finite values become `null`
    pub fn enc_kv_double(&mut self, key: &str, value: f64) {
        self.write_key(key);
        let _ = write!(self.buf, "{}", Value::from(value));
    }

    /// Write `raw` verbatim as the value. The caller guarantees it is valid JSON.
    pub fn enc_kv_object(&mut self, key: &str, raw: &str) {
        self.write_key(key);
        self.buf.push_str(raw);
    }

    pub fn enc_kv_opt_string(&mut self, key: &str, value: &Opt<String>) -> bool {
        match value.get() {
            Some(v) if !self.suppress_field(key) => {
                self.enc_kv_string(key, v);
                true
            }
            _ => false,
        }
    }

    pub fn enc_kv_opt_int(&mut self, key: &str, value: &Opt<i64>) -> bool {
        match value.get() {
            Some(v) if !self.suppress_field(key) => {
                self.enc_kv_int(key, *v);
                true
            }
            _ => false,
        }
    }

    pub fn enc_kv_opt_ull(&mut self, key: &str, value: &Opt<u64>) -> bool {
        match value.get() {
            Some(v) if !self.suppress_field(key) => {
                self.enc_kv_ull(key, *v);
                true
            }
            _ => false,
        }
    }

    pub fn enc_kv_opt_double(&mut self, key: &str, value: &Opt<f64>) -> bool {
        match value.get() {
            Some(v) if !self.suppress_field(key) => {
                self.enc_kv_double(key, *v);
                true
            }
            _ => false,
        }
    }

    /// Write a bare string item into the current list
    pub fn enc_list_item(&mut self, value: &str) {
        self.separator();
        self.write_string(value);
    }

    /// Write a `major[.minor]` version number. A zero minor is omitted.
    pub fn enc_version(&mut self, key: &str, major: u32, minor: u32) {
        self.write_key(key);
        if minor == 0 {
            let _ = write!(self.buf, "{}", major);
        } else {
            let _ = write!(self.buf, "{}.{}", major, minor);
        }
    }

    /// Write the version and close the enclosing object in one step
    pub fn close_object_with_version(&mut self, key: &str, major: u32, minor: u32) {
        self.enc_version(key, major, minor);
        self.close_object();
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn separator(&mut self) {
        if let Some(top) = self.frames.last_mut() {
            if top.has_items {
                self.buf.push(',');
            }
            top.has_items = true;
        }
    }

    fn write_key(&mut self, key: &str) {
        self.separator();
        self.write_string(key);
        self.buf.push(':');
    }

    fn write_string(&mut self, value: &str) {
        let _ = write!(self.buf, "{}", Value::from(value));
    }

    fn push_frame(&mut self, kind: FrameKind) {
        self.buf.push(match kind {
            FrameKind::Object => '{',
            FrameKind::List => '[',
        });
        self.frames.push(Frame {
            kind,
            has_items: false,
        });
    }

    fn pop_frame(&mut self, kind: FrameKind) {
        let frame = self.frames.pop();
        debug_assert!(
            matches!(frame, Some(f) if f.kind == kind),
            "mismatched JSON close"
        );
        self.buf.push(match kind {
            FrameKind::Object => '}',
            FrameKind::List => ']',
        });
    }
}

impl Default for JsonWriter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SuppressAll;

    impl ThrottlePolicy for SuppressAll {
        fn suppress_field(&self, _domain: Domain, _field: &str) -> bool {
            true
        }

        fn suppress_nv_pair(&self, _domain: Domain, _list: &str, _name: &str) -> bool {
            true
        }
    }

    #[test]
    fn test_separators() {
        let mut w = JsonWriter::new();
        w.open_object();
        w.enc_kv_string("a", "x");
        w.enc_kv_int("b", -3);
        w.open_named_list("c");
        w.enc_list_item("p");
        w.enc_list_item("q");
        w.close_list();
        w.open_named_object("d");
        w.close_object();
        w.close_object();

        assert_eq!(w.finish(), r#"{"a":"x","b":-3,"c":["p","q"],"d":{}}"#);
    }

    #[test]
    fn test_string_escaping() {
        let mut w = JsonWriter::new();
        w.open_object();
        w.enc_kv_string("msg", "say \"hi\"\n\\");
        w.close_object();

        let text = w.finish();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["msg"], "say \"hi\"\n\\");
    }

    #[test]
    fn test_numbers() {
        let mut w = JsonWriter::new();
        w.open_object();
        w.enc_kv_ull("big", u64::MAX);
        w.enc_kv_double("interval", 60.5);
        w.enc_kv_object("raw", r#"{"k":[1,2]}"#);
        w.close_object();

        assert_eq!(
            w.finish(),
            r#"{"big":18446744073709551615,"interval":60.5,"raw":{"k":[1,2]}}"#
        );
    }

    #[test]
    fn test_version_format() {
        let mut w = JsonWriter::new();
        w.open_object();
        w.enc_version("a", 2, 1);
        w.open_named_object("inner");
        w.close_object_with_version("b", 3, 0);
        w.close_object();

        assert_eq!(w.finish(), r#"{"a":2.1,"inner":{"b":3}}"#);
    }

    #[test]
    fn test_rewind_restores_separator_state() {
        let mut w = JsonWriter::new();
        w.open_object();
        w.enc_kv_string("first", "1");
        let before = w.as_str().to_string();

        let cp = w.checkpoint();
        w.open_named_list("speculative");
        w.open_object();
        w.enc_kv_string("name", "n");
        w.close_object();
        w.close_list();
        w.rewind(cp);

        assert_eq!(w.as_str(), before);
        w.enc_kv_string("second", "2");
        w.close_object();
        assert_eq!(w.finish(), r#"{"first":"1","second":"2"}"#);
    }

    #[test]
    fn test_rewind_as_first_item() {
        let mut w = JsonWriter::new();
        w.open_object();
        let cp = w.checkpoint();
        w.open_named_list("gone");
        w.close_list();
        w.rewind(cp);
        w.enc_kv_int("only", 1);
        w.close_object();

        assert_eq!(w.finish(), r#"{"only":1}"#);
    }

    #[test]
    fn test_nested_checkpoints() {
        let mut w = JsonWriter::new();
        w.open_object();
        w.open_named_list("outer");
        w.open_object();
        let inner = w.checkpoint();
        w.open_named_list("inner");
        w.close_list();
        w.rewind(inner);
        w.enc_kv_string("kept", "yes");
        w.close_object();
        w.close_list();
        let kept = w.as_str().to_string();
        w.close_object();

        assert_eq!(kept, r#"{"outer":[{"kept":"yes"}]"#);

        let mut w2 = JsonWriter::new();
        w2.open_object();
        let cp = w2.checkpoint();
        w2.open_named_list("outer");
        w2.close_list();
        w2.rewind(cp);
        w2.close_object();
        assert_eq!(w2.finish(), "{}");
    }

    #[test]
    fn test_speculative_list_omitted_when_empty() {
        let mut w = JsonWriter::new();
        w.open_object();
        w.enc_kv_int("a", 1);
        let wrote = w.speculative_list("items", |_| false);
        assert!(!wrote);
        w.speculative_list("kept", |w| {
            w.enc_list_item("x");
            true
        });
        w.close_object();

        assert_eq!(w.finish(), r#"{"a":1,"kept":["x"]}"#);
    }

    #[test]
    fn test_unset_optional_emits_nothing() {
        let mut w = JsonWriter::new();
        w.open_object();
        let unset: Opt<String> = Opt::new();
        assert!(!w.enc_kv_opt_string("eventCategory", &unset));
        let mut set = Opt::new();
        set.set(7i64);
        assert!(w.enc_kv_opt_int("count", &set));
        w.close_object();

        assert_eq!(w.finish(), r#"{"count":7}"#);
    }

    #[test]
    fn test_suppression_only_at_field_depth() {
        let policy = SuppressAll;
        let mut value = Opt::new();
        value.set("v".to_string());

        let mut w = JsonWriter::with_throttle(&policy, Domain::Fault);
        w.open_object();
        assert!(w.enc_kv_opt_string("depth1", &value));
        w.open_named_object("event");
        assert!(w.enc_kv_opt_string("depth2", &value));
        w.open_named_object("faultFields");
        assert_eq!(w.depth(), THROTTLE_FIELD_DEPTH);
        assert!(!w.enc_kv_opt_string("depth3", &value));
        assert!(!w.open_opt_named_list("list"));
        assert!(!w.open_opt_named_object("obj"));
        w.open_named_object("nested");
        assert!(w.enc_kv_opt_string("depth4", &value));
        w.close_object();
        w.close_object();
        w.close_object();
        w.close_object();

        let text = w.finish();
        assert!(text.contains("depth1"));
        assert!(text.contains("depth2"));
        assert!(!text.contains("depth3"));
        assert!(text.contains("depth4"));
    }

    #[test]
    fn test_nv_pair_suppression_without_policy() {
        let w = JsonWriter::new();
        assert!(!w.suppress_nv_pair("additionalFields", "anything"));

        let policy = SuppressAll;
        let throttled = JsonWriter::with_throttle(&policy, Domain::Other);
        assert!(throttled.suppress_nv_pair("additionalFields", "anything"));
    }
}
