//! The trait bindable data objects implement to expose change notifications.

use crate::core::{PropertyChanged, PropertyNotifier};
use crate::error::{ObserverError, Result};
use crate::notify::{SubscriptionHandle, SubscriptionId};

/// A data object whose property changes can be observed.
///
/// Implementors own a [`PropertyNotifier`] and return it from
/// [`notifier`](Self::notifier); every other method is provided and forwards
/// to it. Setters call [`set_property!`](crate::set_property) or
/// [`notify_property_changed`](Self::notify_property_changed) after changing
/// a value.
///
/// # Examples
///
/// ```rust
/// use property_notify::prelude::*;
/// use property_notify::set_property;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct GraphicsSettings {
///     notifier: PropertyNotifier,
///     width: u32,
/// }
///
/// impl GraphicsSettings {
///     fn set_width(&mut self, width: u32) -> Result<bool> {
///         set_property!(self.notifier, self.width, width)
///     }
/// }
///
/// impl NotifyPropertyChanged for GraphicsSettings {
///     fn notifier(&self) -> &PropertyNotifier {
///         &self.notifier
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let mut settings = GraphicsSettings::default();
/// let refreshes = Arc::new(AtomicUsize::new(0));
///
/// let counter = Arc::clone(&refreshes);
/// settings.subscribe(move |event| {
///     assert_eq!(event.name(), "width");
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// settings.set_width(1920)?;
/// assert_eq!(refreshes.load(Ordering::SeqCst), 1);
/// # Ok(())
/// # }
/// ```
pub trait NotifyPropertyChanged {
    /// The notifier holding this object's observers.
    fn notifier(&self) -> &PropertyNotifier;

    /// Register an observer for every future change of this object.
    fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged<'_>) + Send + Sync + 'static,
    {
        self.notifier().subscribe(observer)
    }

    /// Register an observer that can fail.
    fn subscribe_fallible<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged<'_>) -> std::result::Result<(), ObserverError>
            + Send
            + Sync
            + 'static,
    {
        self.notifier().subscribe_fallible(observer)
    }

    /// Register an observer removed when the returned handle drops.
    fn subscribe_scoped<F>(&self, observer: F) -> SubscriptionHandle
    where
        F: Fn(&PropertyChanged<'_>) + Send + Sync + 'static,
    {
        self.notifier().subscribe_scoped(observer)
    }

    /// Remove an observer; unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier().unsubscribe(id)
    }

    /// Report that the property `name` changed.
    fn notify_property_changed(&self, name: &str) -> Result<()> {
        self.notifier().notify_changed(name)
    }
}

impl NotifyPropertyChanged for PropertyNotifier {
    fn notifier(&self) -> &PropertyNotifier {
        self
    }
}

/// Assign a field through its notifier, naming the change after the field.
///
/// `set_property!(self.notifier, self.width, value)` expands to
/// `self.notifier.set_field(&mut self.width, value, "width")`. Nested places
/// such as `self.display.width` are accepted and named after their last
/// segment. Pass a fourth argument to report a different property name.
#[macro_export]
macro_rules! set_property {
    (@last $field:ident) => {
        stringify!($field)
    };
    (@last $head:ident $($rest:ident)+) => {
        $crate::set_property!(@last $($rest)+)
    };
    ($notifier:expr, $owner:ident $(. $path:ident)+, $value:expr) => {
        $notifier.set_field(
            &mut $owner $(. $path)+,
            $value,
            $crate::set_property!(@last $($path)+),
        )
    };
    ($notifier:expr, $owner:ident $(. $path:ident)+, $value:expr, $name:expr) => {
        $notifier.set_field(&mut $owner $(. $path)+, $value, $name)
    };
}
