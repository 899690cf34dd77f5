//! The observer list behind every notifying data object.

use crate::core::{NotifierBuilder, NotifierOptions, PropertyChanged};
use crate::error::{NotifyError, ObserverError, ObserverFailure, Result};
use crate::notify::{SubscriptionHandle, SubscriptionId};
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Type alias for observers that cannot fail.
type ObserverFn = Arc<dyn Fn(&PropertyChanged<'_>) + Send + Sync>;

/// Type alias for observers that may report an error.
type FallibleObserverFn =
    Arc<dyn Fn(&PropertyChanged<'_>) -> std::result::Result<(), ObserverError> + Send + Sync>;

#[derive(Clone)]
enum Observer {
    Infallible(ObserverFn),
    Fallible(FallibleObserverFn),
}

impl Observer {
    fn call(&self, event: &PropertyChanged<'_>) -> std::result::Result<(), ObserverError> {
        match self {
            Self::Infallible(f) => {
                f(event);
                Ok(())
            }
            Self::Fallible(f) => f(event),
        }
    }
}

/// Source of subscription ids, shared by every notifier in the process so an
/// id issued by one notifier never matches an observer on another.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Clone)]
struct Entry {
    id: SubscriptionId,
    observer: Observer,
}

/// State shared between a notifier, its clones and its subscription handles.
pub(crate) struct Shared {
    /// Registered observers in subscription order, swapped atomically
    entries: ArcSwap<Vec<Entry>>,
    options: NotifierOptions,
}

impl Shared {
    fn insert(&self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId::from_raw(NEXT_ID.fetch_add(1, Ordering::Relaxed));
        let entry = Entry { id, observer };

        self.entries.rcu(|current| {
            let mut next = Vec::with_capacity((current.len() + 1).max(self.options.capacity));
            next.extend(current.iter().cloned());
            next.push(entry.clone());
            next
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(notifier = self.label(), %id, "observer subscribed");

        id
    }

    /// Remove the entry for `id`, returning whether it was registered.
    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        if !self.entries.load().iter().any(|entry| entry.id == id) {
            return false;
        }

        let previous = self.entries.rcu(|current| {
            current
                .iter()
                .filter(|entry| entry.id != id)
                .cloned()
                .collect::<Vec<_>>()
        });
        let removed = previous.iter().any(|entry| entry.id == id);

        #[cfg(feature = "tracing")]
        if removed {
            tracing::debug!(notifier = self.label(), %id, "observer unsubscribed");
        }

        removed
    }

    #[cfg(feature = "tracing")]
    fn label(&self) -> &str {
        self.options.label.as_deref().unwrap_or("unnamed")
    }
}

/// Delivers "property changed" notifications to registered observers.
///
/// This is the piece a bindable data object composes with: it owns an
/// ordered list of observers and invokes each of them, synchronously and in
/// subscription order, whenever the object reports a change. Publishing with
/// no observers is a no-op.
///
/// The observer list is held in an `ArcSwap`, so notification takes a
/// lock-free snapshot of it. Observers may subscribe or unsubscribe while a
/// notification is running; the change applies from the next notification.
/// An observer that notifies the same property on the same notifier from
/// inside its callback recurses, and is responsible for terminating.
///
/// Cloning a notifier yields a second handle to the same observer list.
/// Observers that need their own notifier should capture
/// [`downgrade`](Self::downgrade) instead of a clone; a strong clone inside
/// the list keeps the list alive forever.
///
/// # Examples
///
/// ```rust
/// use property_notify::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// # fn main() -> Result<()> {
/// let notifier = PropertyNotifier::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// let id = notifier.subscribe(move |event| {
///     sink.lock().unwrap().push(event.name().to_string());
/// });
///
/// notifier.notify_changed("Width")?;
/// notifier.unsubscribe(id);
/// notifier.notify_changed("Height")?;
///
/// assert_eq!(*seen.lock().unwrap(), vec!["Width".to_string()]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PropertyNotifier {
    shared: Arc<Shared>,
}

impl PropertyNotifier {
    /// Create a notifier with no observers and default options.
    pub fn new() -> Self {
        Self::with_options(NotifierOptions::default())
    }

    /// Create a notifier with the given options.
    pub fn with_options(options: NotifierOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                entries: ArcSwap::from_pointee(Vec::with_capacity(options.capacity)),
                options,
            }),
        }
    }

    /// Create a weak handle that does not keep the observer list alive.
    pub fn downgrade(&self) -> WeakPropertyNotifier {
        WeakPropertyNotifier {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Start building a notifier with custom options.
    pub fn builder() -> NotifierBuilder {
        NotifierBuilder::new()
    }

    /// The options this notifier was created with.
    pub fn options(&self) -> &NotifierOptions {
        &self.shared.options
    }

    /// Register an observer for every future change notification.
    ///
    /// The same closure may be registered more than once; each registration
    /// is a separate entry and is invoked separately.
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged<'_>) + Send + Sync + 'static,
    {
        self.shared.insert(Observer::Infallible(Arc::new(observer)))
    }

    /// Register an observer that can fail.
    ///
    /// A failing observer does not stop delivery to the observers after it;
    /// its error is reported from [`notify_changed`](Self::notify_changed).
    pub fn subscribe_fallible<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&PropertyChanged<'_>) -> std::result::Result<(), ObserverError>
            + Send
            + Sync
            + 'static,
    {
        self.shared.insert(Observer::Fallible(Arc::new(observer)))
    }

    /// Register an observer that is removed when the returned handle drops.
    pub fn subscribe_scoped<F>(&self, observer: F) -> SubscriptionHandle
    where
        F: Fn(&PropertyChanged<'_>) + Send + Sync + 'static,
    {
        let id = self.subscribe(observer);
        SubscriptionHandle::new(id, Arc::downgrade(&self.shared))
    }

    /// Remove a previously registered observer.
    ///
    /// Returns `false` without error if `id` is not currently registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.remove(id)
    }

    /// Tell every registered observer that `name` changed.
    ///
    /// Observers run on the calling thread, in subscription order, before this
    /// returns. Every observer runs even if an earlier one failed.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::ObserverFailed`] listing each fallible observer
    /// that returned an error. A panicking observer is not caught.
    pub fn notify_changed(&self, name: &str) -> Result<()> {
        let event = PropertyChanged::new(name);
        let snapshot = self.shared.entries.load_full();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            notifier = self.shared.label(),
            property = %event,
            observers = snapshot.len(),
            "notifying property change"
        );

        let mut failures = Vec::new();
        for entry in snapshot.iter() {
            if let Err(error) = entry.observer.call(&event) {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    notifier = self.shared.label(),
                    property = %event,
                    id = %entry.id,
                    %error,
                    "observer failed"
                );
                failures.push(ObserverFailure { id: entry.id, error });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(NotifyError::ObserverFailed {
                property: name.to_string(),
                failures,
            })
        }
    }

    /// Tell every observer that all properties changed.
    pub fn notify_all_changed(&self) -> Result<()> {
        self.notify_changed(PropertyChanged::all().name())
    }

    /// Assign `value` to `field` and notify `name` if the value changed.
    ///
    /// Returns `Ok(true)` when the stored value changed. Assigning an equal
    /// value does not notify unless the notifier was built with
    /// `notify_unchanged`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use property_notify::prelude::*;
    ///
    /// # fn main() -> Result<()> {
    /// let notifier = PropertyNotifier::new();
    /// let mut width = 640;
    ///
    /// assert!(notifier.set_field(&mut width, 800, "Width")?);
    /// assert!(!notifier.set_field(&mut width, 800, "Width")?);
    /// assert_eq!(width, 800);
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_field<T: PartialEq>(&self, field: &mut T, value: T, name: &str) -> Result<bool> {
        let changed = *field != value;
        if !changed && !self.shared.options.notify_unchanged {
            return Ok(false);
        }

        *field = value;
        self.notify_changed(name)?;
        Ok(changed)
    }

    /// Get the number of registered observers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.entries.load().len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.subscriber_count() == 0
    }
}

impl Default for PropertyNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PropertyNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyNotifier")
            .field("options", &self.shared.options)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// A non-owning reference to a [`PropertyNotifier`].
///
/// Obtained from [`PropertyNotifier::downgrade`].
#[derive(Clone, Default)]
pub struct WeakPropertyNotifier {
    shared: Weak<Shared>,
}

impl WeakPropertyNotifier {
    /// Get the notifier back, or `None` if every strong handle was dropped.
    pub fn upgrade(&self) -> Option<PropertyNotifier> {
        self.shared
            .upgrade()
            .map(|shared| PropertyNotifier { shared })
    }
}

impl fmt::Debug for WeakPropertyNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakPropertyNotifier")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> ObserverFn) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let make = move |tag: &str| -> ObserverFn {
            let sink = Arc::clone(&sink);
            let tag = tag.to_string();
            Arc::new(move |event: &PropertyChanged<'_>| {
                sink.lock().unwrap().push(format!("{}:{}", tag, event.name()));
            })
        };
        (log, make)
    }

    #[test]
    fn test_observers_run_in_subscription_order() {
        let notifier = PropertyNotifier::new();
        let (log, make) = recorder();

        let a = make("A");
        let b = make("B");
        notifier.subscribe(move |e| a(e));
        notifier.subscribe(move |e| b(e));

        notifier.notify_changed("Width").unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["A:Width", "B:Width"]);
    }

    #[test]
    fn test_notify_without_observers_is_noop() {
        let notifier = PropertyNotifier::new();
        assert!(notifier.is_empty());
        assert!(notifier.notify_changed("Height").is_ok());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let notifier = PropertyNotifier::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let counter_clone = Arc::clone(&counter);
        let id = notifier.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(notifier.unsubscribe(id));
        notifier.notify_changed("Depth").unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_unknown_id_is_noop() {
        let notifier = PropertyNotifier::new();
        let id = notifier.subscribe(|_| {});

        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(SubscriptionId::from_raw(99)));
    }

    #[test]
    fn test_duplicate_subscription_runs_twice() {
        let notifier = PropertyNotifier::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let observer = {
            let counter = Arc::clone(&counter);
            move |_: &PropertyChanged<'_>| {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        };
        let first = notifier.subscribe(observer.clone());
        let second = notifier.subscribe(observer);
        assert_ne!(first, second);

        notifier.notify_changed("Width").unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failing_observer_does_not_stop_others() {
        let notifier = PropertyNotifier::new();
        let (log, make) = recorder();

        let a = make("A");
        let c = make("C");
        notifier.subscribe(move |e| a(e));
        let failing = notifier.subscribe_fallible(|event| {
            Err(ObserverError::custom(format!("cannot show {}", event.name())))
        });
        notifier.subscribe(move |e| c(e));

        let err = notifier.notify_changed("Width").unwrap_err();

        assert_eq!(*log.lock().unwrap(), vec!["A:Width", "C:Width"]);
        match &err {
            NotifyError::ObserverFailed { property, failures } => {
                assert_eq!(property, "Width");
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].id, failing);
                assert_eq!(failures[0].error.to_string(), "cannot show Width");
            }
        }
    }

    #[test]
    fn test_fallible_observer_success() {
        let notifier = PropertyNotifier::new();
        notifier.subscribe_fallible(|_| Ok(()));
        assert!(notifier.notify_changed("Width").is_ok());
    }

    #[test]
    fn test_observer_can_unsubscribe_itself() {
        let notifier = PropertyNotifier::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let own_id = Arc::new(Mutex::new(None::<SubscriptionId>));

        let weak = notifier.downgrade();
        let counter_clone = Arc::clone(&counter);
        let own_id_clone = Arc::clone(&own_id);
        let id = notifier.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
            let own = *own_id_clone.lock().unwrap();
            if let (Some(id), Some(notifier)) = (own, weak.upgrade()) {
                notifier.unsubscribe(id);
            }
        });
        *own_id.lock().unwrap() = Some(id);

        notifier.notify_changed("Width").unwrap();
        notifier.notify_changed("Width").unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_subscribe_during_notification_applies_next_time() {
        let notifier = PropertyNotifier::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let weak = notifier.downgrade();
        let counter_clone = Arc::clone(&counter);
        notifier.subscribe(move |_| {
            let Some(notifier) = weak.upgrade() else {
                return;
            };
            let counter = Arc::clone(&counter_clone);
            notifier.subscribe(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });

        notifier.notify_changed("Width").unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.subscriber_count(), 2);

        notifier.notify_changed("Width").unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_notify_all_changed_sends_empty_name() {
        let notifier = PropertyNotifier::new();
        let saw_all = Arc::new(AtomicUsize::new(0));

        let saw_all_clone = Arc::clone(&saw_all);
        notifier.subscribe(move |event| {
            if event.is_all() {
                saw_all_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        notifier.notify_all_changed().unwrap();
        assert_eq!(saw_all.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_field_only_notifies_on_change() {
        let notifier = PropertyNotifier::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let counter_clone = Arc::clone(&counter);
        notifier.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        let mut width = 10;
        assert!(notifier.set_field(&mut width, 20, "Width").unwrap());
        assert!(!notifier.set_field(&mut width, 20, "Width").unwrap());

        assert_eq!(width, 20);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_field_notify_unchanged() {
        let notifier = PropertyNotifier::builder().notify_unchanged(true).build();
        let counter = Arc::new(AtomicUsize::new(0));

        let counter_clone = Arc::clone(&counter);
        notifier.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        let mut name = String::from("Lara");
        assert!(!notifier.set_field(&mut name, String::from("Lara"), "Name").unwrap());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_field_assigns_before_reporting_failure() {
        let notifier = PropertyNotifier::new();
        notifier.subscribe_fallible(|_| Err(ObserverError::custom("rejected")));

        let mut depth = 1.0_f32;
        assert!(notifier.set_field(&mut depth, 2.5, "Depth").is_err());
        assert_eq!(depth, 2.5);
    }

    #[test]
    fn test_clone_shares_observers() {
        let notifier = PropertyNotifier::new();
        let other = notifier.clone();
        let counter = Arc::new(AtomicUsize::new(0));

        let counter_clone = Arc::clone(&counter);
        notifier.subscribe(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        other.notify_changed("Width").unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(other.subscriber_count(), 1);
    }

    #[test]
    fn test_weak_observer_lets_list_drop() {
        let notifier = PropertyNotifier::new();
        let weak = notifier.downgrade();

        let inner = weak.clone();
        notifier.subscribe(move |_| {
            if let Some(notifier) = inner.upgrade() {
                notifier.subscribe(|_| {});
            }
        });
        let handle = notifier.subscribe_scoped(|_| {});
        notifier.notify_changed("Width").unwrap();
        assert_eq!(notifier.subscriber_count(), 3);

        drop(notifier);

        assert!(weak.upgrade().is_none());
        assert!(format!("{:?}", weak).contains("alive: false"));
        assert!(format!("{:?}", handle).contains("attached: false"));
    }

    #[test]
    fn test_ids_unique_across_notifiers() {
        let audio = PropertyNotifier::new();
        let window = PropertyNotifier::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        let audio_id = audio.subscribe(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });
        let window_id = window.subscribe(|_| {});

        assert_ne!(audio_id, window_id);
        assert!(!audio.unsubscribe(window_id));
        audio.notify_changed("Volume").unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(audio.subscriber_count(), 1);
        assert_eq!(window.subscriber_count(), 1);
    }

    #[test]
    fn test_debug_shows_subscriber_count() {
        let notifier = PropertyNotifier::new();
        notifier.subscribe(|_| {});
        let debug = format!("{:?}", notifier);
        assert!(debug.contains("subscribers: 1"));
    }
}
