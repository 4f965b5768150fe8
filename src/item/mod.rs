//! Line items and the sources they are built from.

mod association;
mod line_item;
mod row_id;
mod source;

use std::collections::BTreeMap;

/// Options that distinguish otherwise identical products (size, color, ...).
/// Kept sorted so they hash and serialize the same way every time.
pub type ItemOptions = BTreeMap<String, String>;

pub use association::{Associable, Association, ModelRegistry};
pub use line_item::{ItemAttributes, ItemChanges, LineItem};
pub use row_id::row_id;
pub use source::{Buyable, ItemSource};

pub(crate) use line_item::{validate_discount_rate, validate_tax_rate};
