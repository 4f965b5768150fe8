use super::{StoreError, StoredCart};

/// Long-lived cart storage keyed by `(identifier, instance)`.
pub trait DurableStore {
    /// Insert or overwrite the record for `(record.identifier, record.instance)`.
    fn store_durable(&self, record: StoredCart) -> Result<(), StoreError>;

    /// Load the record for the pair. Returns None if it does not exist.
    fn load_durable(
        &self,
        identifier: &str,
        instance: &str,
    ) -> Result<Option<StoredCart>, StoreError>;

    /// Delete the record for the pair. Returns true if one existed.
    fn delete_durable(&self, identifier: &str, instance: &str) -> Result<bool, StoreError>;

    fn exists_durable(&self, identifier: &str, instance: &str) -> Result<bool, StoreError> {
        Ok(self.load_durable(identifier, instance)?.is_some())
    }
}
