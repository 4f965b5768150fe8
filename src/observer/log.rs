use std::sync::{Arc, Mutex};

use super::{CartEvent, CartObserver, ObserverError};

/// An observer that logs events through `tracing` or into a buffer.
pub struct LogObserver {
    buffer: Option<Arc<Mutex<Vec<String>>>>,
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl LogObserver {
    pub fn new() -> Self {
        LogObserver { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<String>>>) -> Self {
        LogObserver {
            buffer: Some(buffer),
        }
    }
}

impl CartObserver for LogObserver {
    fn notify(&mut self, event: &CartEvent) -> Result<(), ObserverError> {
        let line = format!("[CART] {} {}", event.name(), event.payload()?);
        if let Some(buffer) = &self.buffer {
            let mut buffer = buffer
                .lock()
                .map_err(|_| ObserverError::new("log observer buffer poisoned"))?;
            buffer.push(line);
        } else {
            tracing::info!(event = event.name(), "{}", line);
        }
        Ok(())
    }
}
