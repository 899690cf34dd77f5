//! Error types for property-notify.

use crate::notify::SubscriptionId;
use std::fmt;

/// Result type alias for property-notify operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Errors that can occur while delivering change notifications.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// One or more fallible observers reported an error.
    ///
    /// Every other observer was still invoked before this was returned.
    #[error("{} observer(s) failed while handling change of '{property}'", .failures.len())]
    ObserverFailed {
        /// Name of the property whose notification failed
        property: String,
        /// Each failure, in the order the observers were invoked
        failures: Vec<ObserverFailure>,
    },
}

impl NotifyError {
    /// The failures collected during notification.
    pub fn failures(&self) -> &[ObserverFailure] {
        match self {
            Self::ObserverFailed { failures, .. } => failures,
        }
    }
}

/// A single observer failure recorded during notification.
#[derive(Debug)]
pub struct ObserverFailure {
    /// Subscription that produced the error
    pub id: SubscriptionId,
    /// The error the observer returned
    pub error: ObserverError,
}

/// Error returned by a fallible observer.
#[derive(Debug)]
pub enum ObserverError {
    /// Custom error with a message.
    Custom(String),

    /// Wraps an arbitrary error raised by the observer.
    Source(Box<dyn std::error::Error + Send + Sync>),
}

impl ObserverError {
    /// Create a custom observer error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Wrap an existing error.
    pub fn from_error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Source(Box::new(err))
    }
}

impl fmt::Display for ObserverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::Source(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ObserverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Custom(_) => None,
            Self::Source(err) => Some(err.as_ref()),
        }
    }
}

impl fmt::Display for ObserverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscription {}: {}", self.id, self.error)
    }
}
