//! Core notification types.

mod event;
pub(crate) mod notifier;
mod options;

pub use event::PropertyChanged;
pub use notifier::{PropertyNotifier, WeakPropertyNotifier};
pub use options::{NotifierBuilder, NotifierOptions};
