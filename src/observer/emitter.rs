use event_emitter_rs::EventEmitter;

use super::{CartEvent, CartObserver, ObserverError};

/// An observer that emits events via an `EventEmitter` for in-process listeners.
///
/// Listeners are registered under the event name (`cart.added`, ...) and
/// receive the JSON payload as a `String`. The emitter runs listeners on
/// their own threads.
pub struct EmitterObserver {
    emitter: EventEmitter,
}

impl EmitterObserver {
    pub fn new(emitter: EventEmitter) -> Self {
        EmitterObserver { emitter }
    }

    /// Register a listener for an event name.
    pub fn on<F>(&mut self, event: &str, listener: F)
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.on(event, listener);
    }
}

impl Default for EmitterObserver {
    fn default() -> Self {
        Self::new(EventEmitter::new())
    }
}

impl CartObserver for EmitterObserver {
    fn notify(&mut self, event: &CartEvent) -> Result<(), ObserverError> {
        let payload = event.payload()?;
        self.emitter.emit(event.name(), payload);
        Ok(())
    }
}
