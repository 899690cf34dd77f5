//! Subscription identifiers and drop guards.

use crate::core::notifier::Shared;
use std::fmt;
use std::sync::Weak;

/// Identifies one observer registration on a notifier.
///
/// Ids are unique across every notifier in the process and never reused, so
/// a stale id, or one issued by a different notifier, can be passed to
/// `unsubscribe` safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The numeric value of this id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for a subscription that can be dropped to unsubscribe.
///
/// When the handle is dropped, the observer is removed immediately. Dropping
/// it after the notifier itself is gone does nothing.
///
/// # Examples
///
/// ```rust
/// use property_notify::prelude::*;
///
/// let notifier = PropertyNotifier::new();
/// let handle = notifier.subscribe_scoped(|event| println!("{} changed", event));
/// assert_eq!(notifier.subscriber_count(), 1);
///
/// drop(handle);
/// assert_eq!(notifier.subscriber_count(), 0);
/// ```
#[must_use = "dropping the handle unsubscribes immediately"]
pub struct SubscriptionHandle {
    id: SubscriptionId,
    shared: Weak<Shared>,
}

impl SubscriptionHandle {
    pub(crate) fn new(id: SubscriptionId, shared: Weak<Shared>) -> Self {
        Self { id, shared }
    }

    /// The id of the guarded subscription.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Keep the observer registered and give up the guard.
    ///
    /// The returned id can still be passed to `unsubscribe` later.
    pub fn detach(mut self) -> SubscriptionId {
        self.shared = Weak::new();
        self.id
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.remove(self.id);
        }
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.id)
            .field("attached", &(self.shared.strong_count() > 0))
            .finish()
    }
}
