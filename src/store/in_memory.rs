//! InMemoryStore - HashMap-backed session and durable store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::item::LineItem;

use super::{decode_content, encode_content, DurableStore, SessionStore, StoreError, StoredCart};

type DurableKey = (String, String);

/// In-memory session and durable store.
///
/// Session content is kept as encoded bytes so a load always hands back a
/// fresh copy, the same as a real backend would. Clone-friendly via Arc:
/// clones share storage, so several carts can use one store.
#[derive(Clone)]
pub struct InMemoryStore {
    sessions: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    durable: Arc<RwLock<HashMap<DurableKey, StoredCart>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            durable: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn durable_key(identifier: &str, instance: &str) -> DurableKey {
        (identifier.to_string(), instance.to_string())
    }

    /// Number of durable records currently held.
    pub fn durable_len(&self) -> Result<usize, StoreError> {
        let durable = self
            .durable
            .read()
            .map_err(|_| StoreError::LockPoisoned("durable read"))?;
        Ok(durable.len())
    }
}

impl SessionStore for InMemoryStore {
    fn load(&self, key: &str) -> Result<Option<Vec<LineItem>>, StoreError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| StoreError::LockPoisoned("session read"))?;

        match sessions.get(key) {
            Some(bytes) => Ok(Some(decode_content(bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, items: &[LineItem]) -> Result<(), StoreError> {
        let bytes = encode_content(items)?;
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| StoreError::LockPoisoned("session write"))?;
        sessions.insert(key.to_string(), bytes);
        Ok(())
    }

    fn forget(&self, key: &str) -> Result<(), StoreError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| StoreError::LockPoisoned("session write"))?;
        sessions.remove(key);
        Ok(())
    }
}

impl DurableStore for InMemoryStore {
    fn store_durable(&self, record: StoredCart) -> Result<(), StoreError> {
        let mut durable = self
            .durable
            .write()
            .map_err(|_| StoreError::LockPoisoned("durable write"))?;
        let key = Self::durable_key(&record.identifier, &record.instance);
        durable.insert(key, record);
        Ok(())
    }

    fn load_durable(
        &self,
        identifier: &str,
        instance: &str,
    ) -> Result<Option<StoredCart>, StoreError> {
        let durable = self
            .durable
            .read()
            .map_err(|_| StoreError::LockPoisoned("durable read"))?;
        Ok(durable.get(&Self::durable_key(identifier, instance)).cloned())
    }

    fn delete_durable(&self, identifier: &str, instance: &str) -> Result<bool, StoreError> {
        let mut durable = self
            .durable
            .write()
            .map_err(|_| StoreError::LockPoisoned("durable write"))?;
        Ok(durable
            .remove(&Self::durable_key(identifier, instance))
            .is_some())
    }

    fn exists_durable(&self, identifier: &str, instance: &str) -> Result<bool, StoreError> {
        let durable = self
            .durable
            .read()
            .map_err(|_| StoreError::LockPoisoned("durable read"))?;
        Ok(durable.contains_key(&Self::durable_key(identifier, instance)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemAttributes;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn item(id: &str) -> LineItem {
        LineItem::new(
            ItemAttributes::new(id, "Thing", Decimal::ONE, Decimal::TEN),
            Decimal::ZERO,
            Decimal::ZERO,
        )
    }

    #[test]
    fn session_save_and_load() {
        let store = InMemoryStore::new();
        store.save("cart.default", &[item("a"), item("b")]).unwrap();

        let loaded = store.load("cart.default").unwrap().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id(), "a");
        assert_eq!(loaded[1].id(), "b");
    }

    #[test]
    fn session_load_missing_returns_none() {
        let store = InMemoryStore::new();
        assert!(store.load("cart.default").unwrap().is_none());
    }

    #[test]
    fn session_save_overwrites() {
        let store = InMemoryStore::new();
        store.save("cart.default", &[item("a"), item("b")]).unwrap();
        store.save("cart.default", &[item("c")]).unwrap();

        let loaded = store.load("cart.default").unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), "c");
    }

    #[test]
    fn session_forget() {
        let store = InMemoryStore::new();
        store.save("cart.default", &[item("a")]).unwrap();
        store.forget("cart.default").unwrap();
        store.forget("cart.missing").unwrap();
        assert!(store.load("cart.default").unwrap().is_none());
    }

    #[test]
    fn durable_upsert_and_delete() {
        let store = InMemoryStore::new();
        let record = StoredCart::new("user-1", "default", &[item("a")], Utc::now()).unwrap();
        store.store_durable(record).unwrap();

        let replacement =
            StoredCart::new("user-1", "default", &[item("a"), item("b")], Utc::now()).unwrap();
        store.store_durable(replacement).unwrap();
        assert_eq!(store.durable_len().unwrap(), 1);

        let loaded = store.load_durable("user-1", "default").unwrap().unwrap();
        assert_eq!(loaded.items().unwrap().len(), 2);

        assert!(store.exists_durable("user-1", "default").unwrap());
        assert!(!store.exists_durable("user-1", "wishlist").unwrap());

        assert!(store.delete_durable("user-1", "default").unwrap());
        assert!(!store.delete_durable("user-1", "default").unwrap());
        assert!(store.load_durable("user-1", "default").unwrap().is_none());
    }

    #[test]
    fn durable_records_are_scoped_by_instance() {
        let store = InMemoryStore::new();
        store
            .store_durable(StoredCart::new("user-1", "default", &[item("a")], Utc::now()).unwrap())
            .unwrap();
        store
            .store_durable(StoredCart::new("user-1", "wishlist", &[item("b")], Utc::now()).unwrap())
            .unwrap();

        let wishlist = store.load_durable("user-1", "wishlist").unwrap().unwrap();
        assert_eq!(wishlist.items().unwrap()[0].id(), "b");
        assert_eq!(store.durable_len().unwrap(), 2);
    }

    #[test]
    fn clone_shares_storage() {
        let store = InMemoryStore::new();
        let clone = store.clone();
        store.save("cart.default", &[item("a")]).unwrap();

        let loaded = clone.load("cart.default").unwrap().unwrap();
        assert_eq!(loaded[0].id(), "a");
    }
}
