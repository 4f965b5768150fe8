use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CartError;

use super::association::Association;
use super::row_id::row_id;
use super::source::Buyable;
use super::ItemOptions;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A priced line in a cart.
///
/// The row ID is derived from the product ID and options and is recomputed
/// whenever either changes. All monetary values are derived from the same
/// discounted unit price so the cart totals always reconcile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    row_id: String,
    id: String,
    name: String,
    quantity: Decimal,
    price: Decimal,
    #[serde(default)]
    weight: Decimal,
    #[serde(default)]
    options: ItemOptions,
    tax_rate: Decimal,
    discount_rate: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    association: Option<Association>,
}

impl LineItem {
    /// Build a line item from validated attributes and the resolved rates.
    pub(crate) fn new(attributes: ItemAttributes, tax_rate: Decimal, discount_rate: Decimal) -> Self {
        let row_id = row_id(&attributes.id, &attributes.options);
        LineItem {
            row_id,
            id: attributes.id,
            name: attributes.name,
            quantity: attributes.quantity,
            price: attributes.price,
            weight: attributes.weight,
            options: attributes.options,
            tax_rate,
            discount_rate,
            association: None,
        }
    }

    pub fn row_id(&self) -> &str {
        &self.row_id
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// Unit price before discount and tax.
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Unit weight.
    pub fn weight(&self) -> Decimal {
        self.weight
    }

    pub fn options(&self) -> &ItemOptions {
        &self.options
    }

    /// Look up a single option value.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(|s| s.as_str())
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn discount_rate(&self) -> Decimal {
        self.discount_rate
    }

    pub fn association(&self) -> Option<&Association> {
        self.association.as_ref()
    }

    /// Discount per unit.
    pub fn discount(&self) -> Decimal {
        self.price * self.discount_rate / HUNDRED
    }

    /// Unit price after discount, before tax.
    pub fn price_target(&self) -> Decimal {
        self.price - self.discount()
    }

    /// Tax per unit, computed on the discounted price.
    pub fn tax(&self) -> Decimal {
        self.price_target() * self.tax_rate / HUNDRED
    }

    /// Unit price after discount, including tax.
    pub fn price_tax(&self) -> Decimal {
        self.price_target() + self.tax()
    }

    /// Quantity times the undiscounted, untaxed unit price.
    pub fn initial_total(&self) -> Decimal {
        self.quantity * self.price
    }

    pub fn discount_total(&self) -> Decimal {
        self.quantity * self.discount()
    }

    /// Quantity times the discounted price, before tax.
    pub fn subtotal(&self) -> Decimal {
        self.quantity * self.price_target()
    }

    pub fn tax_total(&self) -> Decimal {
        self.quantity * self.tax()
    }

    pub fn total(&self) -> Decimal {
        self.subtotal() + self.tax_total()
    }

    pub fn weight_total(&self) -> Decimal {
        self.quantity * self.weight
    }

    /// Every derived amount, or None if one of them overflows `Decimal`.
    ///
    /// Mirrors the accessors above operation for operation, so when this
    /// returns Some none of them can panic.
    pub(crate) fn checked_amounts(&self) -> Option<LineAmounts> {
        let discount = self
            .price
            .checked_mul(self.discount_rate)?
            .checked_div(HUNDRED)?;
        let price_target = self.price.checked_sub(discount)?;
        let tax = price_target.checked_mul(self.tax_rate)?.checked_div(HUNDRED)?;
        let subtotal = self.quantity.checked_mul(price_target)?;
        let tax_total = self.quantity.checked_mul(tax)?;
        price_target.checked_add(tax)?;
        Some(LineAmounts {
            initial: self.quantity.checked_mul(self.price)?,
            discount: self.quantity.checked_mul(discount)?,
            subtotal,
            tax: tax_total,
            total: subtotal.checked_add(tax_total)?,
            weight: self.quantity.checked_mul(self.weight)?,
        })
    }

    pub(crate) fn set_quantity(&mut self, quantity: Decimal) {
        self.quantity = quantity;
    }

    pub(crate) fn set_tax_rate(&mut self, rate: Decimal) {
        self.tax_rate = rate;
    }

    pub(crate) fn set_discount_rate(&mut self, rate: Decimal) {
        self.discount_rate = rate;
    }

    pub(crate) fn set_association(&mut self, association: Association) {
        self.association = Some(association);
    }

    /// Apply partial changes. Identity changes recompute the row ID.
    ///
    /// Quantity is not validated here: a quantity at or below zero means the
    /// caller wants the item removed.
    pub(crate) fn apply_changes(&mut self, changes: ItemChanges) -> Result<(), CartError> {
        if let Some(id) = &changes.id {
            require_text("id", id)?;
        }
        if let Some(name) = &changes.name {
            require_text("name", name)?;
        }
        if let Some(price) = changes.price {
            require_non_negative("price", price)?;
        }
        if let Some(weight) = changes.weight {
            require_non_negative("weight", weight)?;
        }

        if let Some(id) = changes.id {
            if let Some(association) = self.association.as_mut() {
                association.id = id.clone();
            }
            self.id = id;
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(weight) = changes.weight {
            self.weight = weight;
        }
        if let Some(options) = changes.options {
            self.options = options;
        }
        self.refresh_row_id();
        Ok(())
    }

    /// Take identity, name, price and weight from a buyable entity.
    pub(crate) fn apply_buyable(&mut self, buyable: &dyn Buyable) -> Result<(), CartError> {
        let changes = ItemChanges {
            id: Some(buyable.buyable_identifier(&self.options)),
            name: Some(buyable.buyable_description(&self.options)),
            price: Some(buyable.buyable_price(&self.options)),
            weight: Some(buyable.buyable_weight(&self.options)),
            ..ItemChanges::default()
        };
        self.apply_changes(changes)
    }

    fn refresh_row_id(&mut self) {
        self.row_id = row_id(&self.id, &self.options);
    }
}

/// Line totals of one item, as summed into the cart totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LineAmounts {
    pub initial: Decimal,
    pub discount: Decimal,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub weight: Decimal,
}

/// Raw fields for a new line item.
///
/// Rates left as `None` take the cart-wide rate. An explicit rate is only
/// kept when the add call asks to keep it.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemAttributes {
    pub id: String,
    pub name: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub weight: Decimal,
    pub options: ItemOptions,
    pub tax_rate: Option<Decimal>,
    pub discount_rate: Option<Decimal>,
}

impl ItemAttributes {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: Decimal,
        price: Decimal,
    ) -> Self {
        ItemAttributes {
            id: id.into(),
            name: name.into(),
            quantity,
            price,
            weight: Decimal::ZERO,
            options: ItemOptions::new(),
            tax_rate: None,
            discount_rate: None,
        }
    }

    /// Build attributes from a buyable entity.
    pub fn from_buyable(buyable: &dyn Buyable, quantity: Decimal, options: ItemOptions) -> Self {
        ItemAttributes {
            id: buyable.buyable_identifier(&options),
            name: buyable.buyable_description(&options),
            quantity,
            price: buyable.buyable_price(&options),
            weight: buyable.buyable_weight(&options),
            options,
            tax_rate: None,
            discount_rate: None,
        }
    }

    pub fn with_weight(mut self, weight: Decimal) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_options(mut self, options: ItemOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = Some(rate);
        self
    }

    pub fn with_discount_rate(mut self, rate: Decimal) -> Self {
        self.discount_rate = Some(rate);
        self
    }

    /// The row ID these attributes resolve to.
    pub fn row_id(&self) -> String {
        row_id(&self.id, &self.options)
    }

    pub(crate) fn validate(&self) -> Result<(), CartError> {
        require_text("id", &self.id)?;
        require_text("name", &self.name)?;
        require_non_negative("quantity", self.quantity)?;
        require_non_negative("price", self.price)?;
        require_non_negative("weight", self.weight)?;
        if self.quantity.checked_mul(self.price).is_none() {
            return Err(CartError::validation(format!(
                "line total of {} x {} is out of range",
                self.quantity, self.price
            )));
        }
        if self.quantity.checked_mul(self.weight).is_none() {
            return Err(CartError::validation(format!(
                "line weight of {} x {} is out of range",
                self.quantity, self.weight
            )));
        }
        if let Some(rate) = self.tax_rate {
            validate_tax_rate(rate)?;
        }
        if let Some(rate) = self.discount_rate {
            validate_discount_rate(rate)?;
        }
        Ok(())
    }
}

/// Partial changes applied by `Cart::update`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemChanges {
    pub id: Option<String>,
    pub name: Option<String>,
    pub quantity: Option<Decimal>,
    pub price: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub options: Option<ItemOptions>,
}

impl ItemChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn weight(mut self, weight: Decimal) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn options(mut self, options: ItemOptions) -> Self {
        self.options = Some(options);
        self
    }
}

pub(crate) fn validate_tax_rate(rate: Decimal) -> Result<(), CartError> {
    if rate < Decimal::ZERO {
        return Err(CartError::validation(format!(
            "tax rate must not be negative, got {}",
            rate
        )));
    }
    Ok(())
}

pub(crate) fn validate_discount_rate(rate: Decimal) -> Result<(), CartError> {
    if rate < Decimal::ZERO || rate > HUNDRED {
        return Err(CartError::validation(format!(
            "discount rate must be between 0 and 100, got {}",
            rate
        )));
    }
    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<(), CartError> {
    if value.trim().is_empty() {
        return Err(CartError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: Decimal) -> Result<(), CartError> {
    if value < Decimal::ZERO {
        return Err(CartError::validation(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }
    Ok(())
}
