use chrono::Utc;
use tracing::debug;

use crate::error::CartError;
use crate::item::LineItem;
use crate::observer::CartEvent;
use crate::store::{DurableStore, SessionStore, StoredCart};

use super::{Cart, DEFAULT_INSTANCE};

/// Flags for `Cart::merge`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOptions {
    pub keep_discount: bool,
    pub keep_tax: bool,
    /// Emit add notifications for every merged item.
    pub dispatch_add: bool,
    /// Instance the stored cart was saved under.
    pub instance: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            keep_discount: false,
            keep_tax: false,
            dispatch_add: true,
            instance: DEFAULT_INSTANCE.to_string(),
        }
    }
}

impl MergeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keep_discount(mut self, keep: bool) -> Self {
        self.keep_discount = keep;
        self
    }

    pub fn keep_tax(mut self, keep: bool) -> Self {
        self.keep_tax = keep;
        self
    }

    pub fn dispatch_add(mut self, dispatch: bool) -> Self {
        self.dispatch_add = dispatch;
        self
    }

    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }
}

impl<S: SessionStore + DurableStore> Cart<S> {
    /// Save the current content under `(identifier, instance)`, replacing any
    /// earlier copy. The first store time is kept as `created_at`.
    pub fn store(&mut self, identifier: &str) -> Result<(), CartError> {
        let mut record =
            StoredCart::new(identifier, &self.instance, self.content.items(), Utc::now())?;
        if let Some(existing) = self.store.load_durable(identifier, &self.instance)? {
            record.created_at = existing.created_at;
        }
        let (created_at, updated_at) = (record.created_at, record.updated_at);
        self.store.store_durable(record)?;
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);

        debug!(
            instance = %self.instance,
            identifier,
            items = self.content.len(),
            "stored cart"
        );
        self.notify(CartEvent::Stored {
            instance: self.instance.clone(),
            identifier: identifier.to_string(),
        });
        Ok(())
    }

    /// Bring a stored copy back into this cart and delete it from the durable
    /// store. Stored rows overwrite rows with the same row ID.
    ///
    /// Returns false, changing nothing, when no copy exists.
    pub fn restore(&mut self, identifier: &str) -> Result<bool, CartError> {
        let Some(record) = self.store.load_durable(identifier, &self.instance)? else {
            debug!(instance = %self.instance, identifier, "no stored cart to restore");
            return Ok(false);
        };

        let mut content = self.content.clone();
        for item in record.items()? {
            content.put(item);
        }
        self.commit(content)?;
        self.store.delete_durable(identifier, &self.instance)?;
        self.created_at = Some(record.created_at);
        self.updated_at = Some(record.updated_at);

        debug!(
            instance = %self.instance,
            identifier,
            items = self.content.len(),
            "restored cart"
        );
        self.notify(CartEvent::Restored {
            instance: self.instance.clone(),
            identifier: identifier.to_string(),
        });
        Ok(true)
    }

    /// Delete the stored copy. Returns true if one existed.
    pub fn erase(&mut self, identifier: &str) -> Result<bool, CartError> {
        let existed = self.store.delete_durable(identifier, &self.instance)?;
        debug!(instance = %self.instance, identifier, existed, "erased stored cart");
        if existed {
            self.notify(CartEvent::Erased {
                instance: self.instance.clone(),
                identifier: identifier.to_string(),
            });
        }
        Ok(existed)
    }

    /// Add every item of a stored cart to this one. The stored copy is left
    /// in place.
    ///
    /// Returns false when no stored cart exists for
    /// `(identifier, options.instance)`.
    pub fn merge(&mut self, identifier: &str, options: MergeOptions) -> Result<bool, CartError> {
        let Some(record) = self.store.load_durable(identifier, &options.instance)? else {
            debug!(
                instance = %options.instance,
                identifier,
                "no stored cart to merge"
            );
            return Ok(false);
        };

        let items: Vec<LineItem> = record
            .items()?
            .into_iter()
            .map(|item| self.adopt(item, options.keep_tax, options.keep_discount))
            .collect();
        let merged = items.len();
        self.add_items(items, options.dispatch_add)?;

        debug!(
            instance = %self.instance,
            source = %options.instance,
            identifier,
            merged,
            "merged stored cart"
        );
        self.notify(CartEvent::Merged {
            instance: self.instance.clone(),
            identifier: identifier.to_string(),
        });
        Ok(true)
    }

    /// Whether a stored copy exists for this instance.
    pub fn stored_exists(&self, identifier: &str) -> Result<bool, CartError> {
        Ok(self.store.exists_durable(identifier, &self.instance)?)
    }
}
