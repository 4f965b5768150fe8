use crate::item::LineItem;

use super::StoreError;

/// Per-instance content storage for the current session.
///
/// Every cart mutation calls `save` with the complete content; there are no
/// incremental writes.
pub trait SessionStore {
    /// Load the content saved under `key`. Returns None if nothing was saved.
    fn load(&self, key: &str) -> Result<Option<Vec<LineItem>>, StoreError>;

    /// Overwrite the content saved under `key`.
    fn save(&self, key: &str, items: &[LineItem]) -> Result<(), StoreError>;

    /// Drop whatever is saved under `key`. Missing keys are not an error.
    fn forget(&self, key: &str) -> Result<(), StoreError>;
}
