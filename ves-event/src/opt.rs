//! Single-write optional fields

/// An optional field with an explicit is-set flag.
///
/// The first [`Opt::set`] wins; later calls leave the stored value untouched
/// and report `false`, so an event's optional content cannot be rewritten once
/// populated. An unset field is never encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opt<T> {
    value: Option<T>,
}

impl<T> Default for Opt<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> Opt<T> {
    /// Create an unset field
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value if not already set. Returns whether the write was applied.
    pub fn set(&mut self, value: T) -> bool {
        if self.value.is_some() {
            return false;
        }
        self.value = Some(value);
        true
    }

    /// Set the value regardless of whether it was set before
    pub(crate) fn force(&mut self, value: T) {
        self.value = Some(value);
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

impl Opt<String> {
    pub fn as_deref(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
