#![allow(dead_code)]

pub mod product;

use std::sync::{Arc, Mutex};

use cartkeep::{Cart, CartConfig, Decimal, InMemoryStore, ItemAttributes, LogObserver};

/// Config with 20% tax and no discount, so expected totals are easy to read.
pub fn config() -> CartConfig {
    CartConfig::default()
        .with_tax_rate(Decimal::from(20))
        .with_discount_rate(Decimal::ZERO)
}

pub fn open(store: &InMemoryStore, instance: &str) -> Cart<InMemoryStore> {
    Cart::open(instance, store.clone(), config()).unwrap()
}

pub fn cart() -> Cart<InMemoryStore> {
    open(&InMemoryStore::new(), "default")
}

/// A cart whose events are collected as `[CART] name payload` lines.
pub fn logged_cart(store: &InMemoryStore) -> (Cart<InMemoryStore>, Arc<Mutex<Vec<String>>>) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let cart = open(store, "default").with_observer(LogObserver::with_buffer(buffer.clone()));
    (cart, buffer)
}

pub fn item(id: &str, quantity: i64, price: Decimal) -> ItemAttributes {
    ItemAttributes::new(id, format!("Product {}", id), Decimal::from(quantity), price)
}

pub fn dollars(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub fn ids(cart: &Cart<InMemoryStore>) -> Vec<String> {
    cart.content()
        .iter()
        .map(|item| item.id().to_string())
        .collect()
}

/// Event names from a log buffer, in order.
pub fn event_names(buffer: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    buffer
        .lock()
        .unwrap()
        .iter()
        .filter_map(|line| line.split_whitespace().nth(1).map(str::to_string))
        .collect()
}
