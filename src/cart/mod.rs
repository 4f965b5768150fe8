//! The cart: an ordered set of line items for one named instance.
//!
//! ## Example
//!
//! ```ignore
//! use cartkeep::{Cart, CartConfig, InMemoryStore, ItemAttributes};
//! use rust_decimal::Decimal;
//!
//! let store = InMemoryStore::new();
//! let mut cart = Cart::open("default", store, CartConfig::default())?;
//!
//! let shirt = cart.add(
//!     ItemAttributes::new("sku-1", "Shirt", Decimal::ONE, Decimal::new(1999, 2))
//!         .with_option("size", "L"),
//! )?;
//! cart.update(shirt.row_id(), Decimal::TWO)?;
//! println!("{}", cart.formatted(cart.total()));
//! ```

mod content;
mod persist;
mod totals;

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::config::CartConfig;
use crate::error::CartError;
use crate::item::{
    validate_discount_rate, validate_tax_rate, Associable, Association, Buyable, ItemAttributes,
    ItemChanges, ItemSource, LineItem, ModelRegistry,
};
use crate::observer::{CartEvent, CartObserver};
use crate::store::SessionStore;

use content::Content;

pub use persist::MergeOptions;
pub use totals::Totals;

/// Instance name used when none is given.
pub const DEFAULT_INSTANCE: &str = "default";

/// Session key under which an instance's content is saved.
pub fn session_key(instance: &str) -> String {
    format!("cart.{}", instance)
}

/// Per-call flags for adding items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddOptions {
    /// Keep the item's own discount rate instead of the cart-wide one.
    pub keep_discount: bool,
    /// Keep the item's own tax rate instead of the cart-wide one.
    pub keep_tax: bool,
    /// Emit add notifications.
    pub dispatch: bool,
}

impl Default for AddOptions {
    fn default() -> Self {
        AddOptions {
            keep_discount: false,
            keep_tax: false,
            dispatch: true,
        }
    }
}

impl AddOptions {
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

    pub fn dispatch(mut self, dispatch: bool) -> Self {
        self.dispatch = dispatch;
        self
    }
}

/// What `Cart::update` changes.
pub enum ItemUpdate<'a> {
    Quantity(Decimal),
    Attributes(ItemChanges),
    Entity(&'a dyn Buyable),
}

impl From<Decimal> for ItemUpdate<'_> {
    fn from(quantity: Decimal) -> Self {
        ItemUpdate::Quantity(quantity)
    }
}

impl From<ItemChanges> for ItemUpdate<'_> {
    fn from(changes: ItemChanges) -> Self {
        ItemUpdate::Attributes(changes)
    }
}

/// Result of `Cart::update`.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    Updated(LineItem),
    /// The resulting quantity was zero or less and the row was removed.
    Removed { row_id: String },
}

impl UpdateOutcome {
    pub fn item(&self) -> Option<&LineItem> {
        match self {
            UpdateOutcome::Updated(item) => Some(item),
            UpdateOutcome::Removed { .. } => None,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, UpdateOutcome::Removed { .. })
    }
}

pub struct Cart<S> {
    instance: String,
    store: S,
    content: Content,
    config: CartConfig,
    tax_rate: Decimal,
    discount_rate: Decimal,
    models: ModelRegistry,
    observer: Option<Box<dyn CartObserver>>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl<S> fmt::Debug for Cart<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("instance", &self.instance)
            .field("content", &self.content.items())
            .field("tax_rate", &self.tax_rate)
            .field("discount_rate", &self.discount_rate)
            .field("models", &self.models)
            .field("observer", &self.observer.is_some())
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl<S: SessionStore> Cart<S> {
    /// Open the named instance, loading any content saved in the session.
    pub fn open(instance: impl Into<String>, store: S, config: CartConfig) -> Result<Self, CartError> {
        let instance = instance.into();
        let items = store.load(&session_key(&instance))?.unwrap_or_default();
        Ok(Cart {
            instance,
            store,
            content: Content::from_items(items),
            tax_rate: config.tax_rate,
            discount_rate: config.discount_rate,
            config,
            models: ModelRegistry::new(),
            observer: None,
            created_at: None,
            updated_at: None,
        })
    }

    pub fn with_observer(mut self, observer: impl CartObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn CartObserver>) {
        self.observer = Some(observer);
    }

    pub fn with_models(mut self, models: ModelRegistry) -> Self {
        self.models = models;
        self
    }

    pub fn models_mut(&mut self) -> &mut ModelRegistry {
        &mut self.models
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// The session (and possibly durable) store backing this cart.
    pub fn storage(&self) -> &S {
        &self.store
    }

    /// Line items in cart order.
    pub fn content(&self) -> &[LineItem] {
        self.content.items()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Cart-wide tax rate applied to new items.
    pub fn global_tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Cart-wide discount rate applied to new items.
    pub fn global_discount_rate(&self) -> Decimal {
        self.discount_rate
    }

    /// When the durable copy was first stored, if known.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Replace the cached content with what the session currently holds.
    pub fn reload(&mut self) -> Result<(), CartError> {
        let items = self
            .store
            .load(&session_key(&self.instance))?
            .unwrap_or_default();
        self.content = Content::from_items(items);
        Ok(())
    }

    /// Add an item with the cart-wide rates.
    pub fn add(&mut self, attributes: ItemAttributes) -> Result<LineItem, CartError> {
        self.add_with(attributes, AddOptions::default())
    }

    /// Add an item. An item with the same row ID absorbs the new quantity
    /// and keeps its position.
    pub fn add_with(
        &mut self,
        attributes: ItemAttributes,
        options: AddOptions,
    ) -> Result<LineItem, CartError> {
        attributes.validate()?;
        let item = self.build_item(attributes, options);
        let mut added = self.add_items(vec![item], options.dispatch)?;
        added
            .pop()
            .ok_or_else(|| CartError::validation("no item was added"))
    }

    /// Add every item from a source. Nothing is added unless all items are valid.
    pub fn add_from<'a>(
        &mut self,
        source: impl Into<ItemSource<'a>>,
        options: AddOptions,
    ) -> Result<Vec<LineItem>, CartError> {
        let batch = source.into().resolve();
        for attributes in &batch {
            attributes.validate()?;
        }
        let items = batch
            .into_iter()
            .map(|attributes| self.build_item(attributes, options))
            .collect();
        self.add_items(items, options.dispatch)
    }

    /// Update a row.
    ///
    /// When the update changes the row ID, the item keeps the slot of the old
    /// row; if another row already has the new ID, the two merge into one
    /// entry with the summed quantity in that slot. A resulting quantity of
    /// zero or less removes the row.
    pub fn update<'a>(
        &mut self,
        row_id: &str,
        update: impl Into<ItemUpdate<'a>>,
    ) -> Result<UpdateOutcome, CartError> {
        let original = self.get(row_id)?.clone();
        let mut item = original.clone();
        match update.into() {
            ItemUpdate::Quantity(quantity) => item.set_quantity(quantity),
            ItemUpdate::Attributes(changes) => item.apply_changes(changes)?,
            ItemUpdate::Entity(buyable) => item.apply_buyable(buyable)?,
        }

        let mut content = self.content.clone();
        let mut slot = None;
        let mut collided = None;
        if item.row_id() != row_id {
            let (mut index, _) = content
                .remove(row_id)
                .ok_or_else(|| CartError::not_found(row_id))?;
            if let Some((existing_index, existing)) = content.remove(item.row_id()) {
                item.set_quantity(sum_quantities(existing.quantity(), item.quantity())?);
                if existing_index < index {
                    index -= 1;
                }
                collided = Some(existing);
            }
            slot = Some(index);
        }

        if item.quantity() <= Decimal::ZERO {
            content.remove(row_id);
            let mut removed = vec![original];
            removed.extend(collided);
            for item in &removed {
                self.notify(CartEvent::BeforeRemove { item: item.clone() });
            }
            self.commit(content)?;
            for item in removed {
                self.notify(CartEvent::AfterRemove { item });
            }
            return Ok(UpdateOutcome::Removed {
                row_id: row_id.to_string(),
            });
        }

        match slot {
            Some(index) => content.insert_at(index, item.clone()),
            None => content.put(item.clone()),
        }
        ensure_in_range(&content)?;
        self.notify(CartEvent::BeforeUpdate { item: original });
        self.commit(content)?;
        self.notify(CartEvent::AfterUpdate { item: item.clone() });
        Ok(UpdateOutcome::Updated(item))
    }

    pub fn remove(&mut self, row_id: &str) -> Result<(), CartError> {
        let mut content = self.content.clone();
        let (_, item) = content
            .remove(row_id)
            .ok_or_else(|| CartError::not_found(row_id))?;
        self.notify(CartEvent::BeforeRemove { item: item.clone() });
        self.commit(content)?;
        self.notify(CartEvent::AfterRemove { item });
        Ok(())
    }

    pub fn get(&self, row_id: &str) -> Result<&LineItem, CartError> {
        self.content
            .get(row_id)
            .ok_or_else(|| CartError::not_found(row_id))
    }

    /// Items matching the predicate, in cart order.
    pub fn search<F>(&self, predicate: F) -> Vec<&LineItem>
    where
        F: Fn(&LineItem) -> bool,
    {
        self.content.iter().filter(|item| predicate(item)).collect()
    }

    /// Override the tax rate of one row.
    pub fn set_tax(&mut self, row_id: &str, rate: Decimal) -> Result<LineItem, CartError> {
        validate_tax_rate(rate)?;
        self.modify(row_id, |item| item.set_tax_rate(rate))
    }

    /// Override the discount rate of one row.
    pub fn set_discount(&mut self, row_id: &str, rate: Decimal) -> Result<LineItem, CartError> {
        validate_discount_rate(rate)?;
        self.modify(row_id, |item| item.set_discount_rate(rate))
    }

    /// Change the cart-wide tax rate and apply it to every row.
    pub fn set_global_tax(&mut self, rate: Decimal) -> Result<(), CartError> {
        validate_tax_rate(rate)?;
        let mut content = self.content.clone();
        for item in content.iter_mut() {
            item.set_tax_rate(rate);
        }
        self.commit(content)?;
        self.tax_rate = rate;
        Ok(())
    }

    /// Change the cart-wide discount rate and apply it to every row.
    pub fn set_global_discount(&mut self, rate: Decimal) -> Result<(), CartError> {
        validate_discount_rate(rate)?;
        let mut content = self.content.clone();
        for item in content.iter_mut() {
            item.set_discount_rate(rate);
        }
        self.commit(content)?;
        self.discount_rate = rate;
        Ok(())
    }

    /// Associate a row with a registered host model.
    pub fn associate(&mut self, row_id: &str, model: &str) -> Result<LineItem, CartError> {
        self.models.resolve(model)?;
        self.modify(row_id, |item| {
            let association = Association::new(model, item.id());
            item.set_association(association);
        })
    }

    /// Register `T` and associate the row with it.
    pub fn associate_with<T: Associable>(&mut self, row_id: &str) -> Result<LineItem, CartError> {
        self.models.register_type::<T>();
        self.associate(row_id, T::MODEL)
    }

    /// Empty the cart and drop its session entry.
    pub fn destroy(&mut self) -> Result<(), CartError> {
        self.store.forget(&session_key(&self.instance))?;
        self.content.clear();
        let instance = self.instance.clone();
        self.notify(CartEvent::Destroyed { instance });
        Ok(())
    }

    pub fn totals(&self) -> Totals {
        Totals::of(self.content.iter())
    }

    /// Sum of quantities.
    pub fn count(&self) -> Decimal {
        self.totals().count
    }

    /// Number of distinct rows.
    pub fn count_items(&self) -> usize {
        self.content.len()
    }

    pub fn initial(&self) -> Decimal {
        self.totals().initial
    }

    pub fn discount(&self) -> Decimal {
        self.totals().discount
    }

    pub fn subtotal(&self) -> Decimal {
        self.totals().subtotal
    }

    pub fn tax(&self) -> Decimal {
        self.totals().tax
    }

    pub fn total(&self) -> Decimal {
        self.totals().total
    }

    pub fn weight(&self) -> Decimal {
        self.totals().weight
    }

    /// Format an amount with this cart's number and currency settings.
    pub fn formatted(&self, amount: Decimal) -> String {
        self.config.format_money(amount)
    }

    fn build_item(&self, attributes: ItemAttributes, options: AddOptions) -> LineItem {
        let tax_rate = pick_rate(attributes.tax_rate, options.keep_tax, self.tax_rate);
        let discount_rate =
            pick_rate(attributes.discount_rate, options.keep_discount, self.discount_rate);
        LineItem::new(attributes, tax_rate, discount_rate)
    }

    /// Give an imported item the cart-wide rates unless asked to keep its own.
    fn adopt(&self, mut item: LineItem, keep_tax: bool, keep_discount: bool) -> LineItem {
        if !keep_tax {
            item.set_tax_rate(self.tax_rate);
        }
        if !keep_discount {
            item.set_discount_rate(self.discount_rate);
        }
        item
    }

    fn add_items(
        &mut self,
        items: Vec<LineItem>,
        dispatch: bool,
    ) -> Result<Vec<LineItem>, CartError> {
        let mut content = self.content.clone();
        let mut added = Vec::with_capacity(items.len());
        for mut item in items {
            if let Some(existing) = content.get(item.row_id()) {
                item.set_quantity(sum_quantities(existing.quantity(), item.quantity())?);
            }
            content.put(item.clone());
            added.push(item);
        }
        ensure_in_range(&content)?;

        if dispatch {
            for item in &added {
                self.notify(CartEvent::BeforeAdd { item: item.clone() });
            }
        }
        self.commit(content)?;
        if dispatch {
            for item in &added {
                self.notify(CartEvent::AfterAdd { item: item.clone() });
            }
        }
        Ok(added)
    }

    fn modify<F>(&mut self, row_id: &str, change: F) -> Result<LineItem, CartError>
    where
        F: FnOnce(&mut LineItem),
    {
        let mut content = self.content.clone();
        let item = content
            .get_mut(row_id)
            .ok_or_else(|| CartError::not_found(row_id))?;
        change(item);
        let item = item.clone();
        self.commit(content)?;
        Ok(item)
    }

    /// Save the new content to the session, then adopt it.
    ///
    /// Content whose totals would overflow is refused, so the total
    /// accessors never panic on committed content.
    fn commit(&mut self, content: Content) -> Result<(), CartError> {
        ensure_in_range(&content)?;
        self.store
            .save(&session_key(&self.instance), content.items())?;
        self.content = content;
        Ok(())
    }

    fn notify(&mut self, event: CartEvent) {
        let Some(observer) = self.observer.as_mut() else {
            return;
        };
        if let Err(err) = observer.notify(&event) {
            tracing::warn!(
                instance = %self.instance,
                event = event.name(),
                error = %err,
                "cart observer failed"
            );
        }
    }
}

fn sum_quantities(existing: Decimal, added: Decimal) -> Result<Decimal, CartError> {
    existing.checked_add(added).ok_or_else(|| {
        CartError::validation(format!(
            "quantity {} + {} is out of range",
            existing, added
        ))
    })
}

fn ensure_in_range(content: &Content) -> Result<(), CartError> {
    match Totals::checked(content.iter()) {
        Some(_) => Ok(()),
        None => Err(CartError::validation("cart amounts are out of range")),
    }
}

fn pick_rate(own: Option<Decimal>, keep: bool, global: Decimal) -> Decimal {
    match own {
        Some(rate) if keep => rate,
        _ => global,
    }
}
