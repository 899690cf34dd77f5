//! Observer registration and the observable data-object trait.

pub mod observable;
pub mod subscription;

pub use observable::NotifyPropertyChanged;
pub use subscription::{SubscriptionHandle, SubscriptionId};
