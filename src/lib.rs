//! # property-notify
//!
//! Synchronous property-change notification for bindable data objects.
//!
//! ## Overview
//!
//! A data object shown in a settings UI composes a [`PropertyNotifier`](core::PropertyNotifier)
//! and reports every property it changes. View bindings subscribe and refresh
//! whatever the changed property feeds. The crate provides:
//! - An ordered observer list with subscribe / unsubscribe / notify
//! - Lock-free snapshots of that list using `arc-swap`, so observers can
//!   (un)subscribe while a notification is running
//! - Fallible observers with collect-and-continue error reporting
//! - Drop-guard subscriptions
//! - A `set_property!` macro naming the change after the assigned field
//!
//! ## Quick Start
//!
//! ```rust
//! use property_notify::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! # fn main() -> Result<()> {
//! let notifier = PropertyNotifier::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let a = Arc::clone(&seen);
//! notifier.subscribe(move |event| a.lock().unwrap().push(format!("A:{}", event)));
//! let b = Arc::clone(&seen);
//! notifier.subscribe(move |event| b.lock().unwrap().push(format!("B:{}", event)));
//!
//! notifier.notify_changed("Width")?;
//! assert_eq!(*seen.lock().unwrap(), vec!["A:Width", "B:Width"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `tracing` (default): emit `tracing` events for subscriptions,
//!   notifications and observer failures.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod notify;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        NotifierBuilder, NotifierOptions, PropertyChanged, PropertyNotifier, WeakPropertyNotifier,
    };
    pub use crate::error::{NotifyError, ObserverError, Result};
    pub use crate::notify::{NotifyPropertyChanged, SubscriptionHandle, SubscriptionId};
}
