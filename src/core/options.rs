//! Tuning options for a [`PropertyNotifier`](crate::core::PropertyNotifier).

use crate::core::PropertyNotifier;
use serde::{Deserialize, Serialize};

/// Options controlling how a notifier behaves.
///
/// Deserializable so host applications can keep these next to the rest of
/// their settings. Missing fields fall back to [`NotifierOptions::default`].
///
/// # Examples
///
/// ```rust
/// use property_notify::prelude::*;
///
/// let options: NotifierOptions = serde_json::from_str(r#"{ "label": "window" }"#).unwrap();
/// assert_eq!(options.label.as_deref(), Some("window"));
/// assert!(!options.notify_unchanged);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierOptions {
    /// Name used for this notifier in log output
    pub label: Option<String>,
    /// Notify from `set_field` even when the new value equals the old one
    pub notify_unchanged: bool,
    /// Initial capacity reserved for the observer list
    pub capacity: usize,
}

/// Builder for creating a [`PropertyNotifier`] with custom options.
///
/// # Examples
///
/// ```rust
/// use property_notify::prelude::*;
///
/// let notifier = PropertyNotifier::builder()
///     .with_label("settings-page")
///     .with_capacity(4)
///     .build();
///
/// assert_eq!(notifier.options().label.as_deref(), Some("settings-page"));
/// ```
#[derive(Debug, Default)]
pub struct NotifierBuilder {
    options: NotifierOptions,
}

impl NotifierBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of options, e.g. loaded from a file.
    pub fn from_options(options: NotifierOptions) -> Self {
        Self { options }
    }

    /// Name the notifier in log output.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    /// Notify from `set_field` even when the assigned value is unchanged.
    pub fn notify_unchanged(mut self, enabled: bool) -> Self {
        self.options.notify_unchanged = enabled;
        self
    }

    /// Reserve room for `capacity` observers up front.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.options.capacity = capacity;
        self
    }

    /// Build the notifier.
    pub fn build(self) -> PropertyNotifier {
        PropertyNotifier::with_options(self.options)
    }
}
