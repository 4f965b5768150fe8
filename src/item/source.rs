use rust_decimal::Decimal;

use super::line_item::ItemAttributes;
use super::ItemOptions;

/// A host entity that can be put in a cart directly.
pub trait Buyable {
    fn buyable_identifier(&self, options: &ItemOptions) -> String;

    fn buyable_description(&self, options: &ItemOptions) -> String;

    fn buyable_price(&self, options: &ItemOptions) -> Decimal;

    fn buyable_weight(&self, _options: &ItemOptions) -> Decimal {
        Decimal::ZERO
    }
}

/// Where the fields of a new line item come from.
///
/// Every source is resolved once into plain [`ItemAttributes`] before it
/// reaches the cart content.
pub enum ItemSource<'a> {
    Attributes(ItemAttributes),
    Entity {
        entity: &'a dyn Buyable,
        quantity: Decimal,
        options: ItemOptions,
    },
    Array(Vec<ItemAttributes>),
}

impl ItemSource<'_> {
    pub fn resolve(self) -> Vec<ItemAttributes> {
        match self {
            ItemSource::Attributes(attributes) => vec![attributes],
            ItemSource::Entity {
                entity,
                quantity,
                options,
            } => vec![ItemAttributes::from_buyable(entity, quantity, options)],
            ItemSource::Array(items) => items,
        }
    }
}

impl From<ItemAttributes> for ItemSource<'_> {
    fn from(attributes: ItemAttributes) -> Self {
        ItemSource::Attributes(attributes)
    }
}

impl From<Vec<ItemAttributes>> for ItemSource<'_> {
    fn from(items: Vec<ItemAttributes>) -> Self {
        ItemSource::Array(items)
    }
}
