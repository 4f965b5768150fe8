//! Storage collaborators.
//!
//! A cart writes its full content to a [`SessionStore`] after every
//! mutation, and moves content to and from a [`DurableStore`] on explicit
//! store/restore/erase/merge calls. Both are plain CRUD traits so hosts can
//! back them with whatever they already run; [`InMemoryStore`] implements
//! both for tests and single-process use.

mod durable;
mod in_memory;
mod session;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::LineItem;

pub use durable::DurableStore;
pub use in_memory::InMemoryStore;
pub use session::SessionStore;

/// Error type for session and durable store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    LockPoisoned(&'static str),
    /// Content could not be encoded or decoded.
    Serde(String),
    /// Backend-specific failure.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Serde(message) => write!(f, "content serialization error: {}", message),
            StoreError::Backend(message) => write!(f, "store backend error: {}", message),
        }
    }
}

impl std::error::Error for StoreError {}

/// Encode cart content for storage.
pub fn encode_content(items: &[LineItem]) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(items).map_err(|e| StoreError::Serde(e.to_string()))
}

/// Decode content written by [`encode_content`].
pub fn decode_content(bytes: &[u8]) -> Result<Vec<LineItem>, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Serde(e.to_string()))
}

/// A durable cart record, unique per `(identifier, instance)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredCart {
    pub identifier: String,
    pub instance: String,
    #[serde(with = "content_serde")]
    pub content: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

mod content_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(content: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(content).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

impl StoredCart {
    /// Build a record for the given content, stamped with `now` on both timestamps.
    pub fn new(
        identifier: impl Into<String>,
        instance: impl Into<String>,
        items: &[LineItem],
        now: DateTime<Utc>,
    ) -> Result<Self, StoreError> {
        Ok(StoredCart {
            identifier: identifier.into(),
            instance: instance.into(),
            content: encode_content(items)?,
            created_at: now,
            updated_at: now,
        })
    }

    /// Decode the stored line items, in their stored order.
    pub fn items(&self) -> Result<Vec<LineItem>, StoreError> {
        decode_content(&self.content)
    }
}
