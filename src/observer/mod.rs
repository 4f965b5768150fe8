//! Cart lifecycle notifications.
//!
//! A cart hands every lifecycle event to its [`CartObserver`]. Observer
//! failures are logged and dropped: they never fail the cart operation that
//! triggered them.

#[cfg(feature = "emitter")]
mod emitter;
mod log;

use std::fmt;

use serde::Serialize;

use crate::item::LineItem;

#[cfg(feature = "emitter")]
pub use emitter::EmitterObserver;
pub use log::LogObserver;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CartEvent {
    BeforeAdd { item: LineItem },
    AfterAdd { item: LineItem },
    BeforeUpdate { item: LineItem },
    AfterUpdate { item: LineItem },
    BeforeRemove { item: LineItem },
    AfterRemove { item: LineItem },
    Stored { instance: String, identifier: String },
    Restored { instance: String, identifier: String },
    Erased { instance: String, identifier: String },
    Merged { instance: String, identifier: String },
    Destroyed { instance: String },
}

impl CartEvent {
    /// Stable event name, used as the emitter topic.
    pub fn name(&self) -> &'static str {
        match self {
            CartEvent::BeforeAdd { .. } => "cart.adding",
            CartEvent::AfterAdd { .. } => "cart.added",
            CartEvent::BeforeUpdate { .. } => "cart.updating",
            CartEvent::AfterUpdate { .. } => "cart.updated",
            CartEvent::BeforeRemove { .. } => "cart.removing",
            CartEvent::AfterRemove { .. } => "cart.removed",
            CartEvent::Stored { .. } => "cart.stored",
            CartEvent::Restored { .. } => "cart.restored",
            CartEvent::Erased { .. } => "cart.erased",
            CartEvent::Merged { .. } => "cart.merged",
            CartEvent::Destroyed { .. } => "cart.destroyed",
        }
    }

    /// The line item carried by item events.
    pub fn item(&self) -> Option<&LineItem> {
        match self {
            CartEvent::BeforeAdd { item }
            | CartEvent::AfterAdd { item }
            | CartEvent::BeforeUpdate { item }
            | CartEvent::AfterUpdate { item }
            | CartEvent::BeforeRemove { item }
            | CartEvent::AfterRemove { item } => Some(item),
            _ => None,
        }
    }

    /// JSON payload for observers that forward events as text.
    pub fn payload(&self) -> Result<String, ObserverError> {
        serde_json::to_string(self).map_err(|e| ObserverError::new(e.to_string()))
    }
}

/// Error reported by an observer. Logged by the cart, never returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObserverError {
    pub message: String,
}

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        ObserverError {
            message: message.into(),
        }
    }
}

impl fmt::Display for ObserverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer error: {}", self.message)
    }
}

impl std::error::Error for ObserverError {}

/// Receives cart lifecycle events.
pub trait CartObserver {
    fn notify(&mut self, event: &CartEvent) -> Result<(), ObserverError>;
}

impl<F> CartObserver for F
where
    F: FnMut(&CartEvent) -> Result<(), ObserverError>,
{
    fn notify(&mut self, event: &CartEvent) -> Result<(), ObserverError> {
        self(event)
    }
}
