//! The change event handed to observers.

use std::fmt;

/// Describes which property of a data object changed.
///
/// An empty name is the "everything changed" event: bindings receiving it
/// should refresh every property they display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyChanged<'a> {
    name: &'a str,
}

impl<'a> PropertyChanged<'a> {
    /// Create an event for the named property.
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }

    /// Create the event meaning all properties changed.
    pub fn all() -> PropertyChanged<'static> {
        PropertyChanged { name: "" }
    }

    /// Name of the changed property, empty when all properties changed.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Whether this event refers to every property of the object.
    pub fn is_all(&self) -> bool {
        self.name.is_empty()
    }

    /// Whether the event affects `property`.
    ///
    /// True for an exact name match and for the all-properties event.
    pub fn affects(&self, property: &str) -> bool {
        self.is_all() || self.name == property
    }
}

impl fmt::Display for PropertyChanged<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            f.write_str("<all properties>")
        } else {
            f.write_str(self.name)
        }
    }
}
