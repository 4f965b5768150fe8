pub mod cart;
pub mod config;
mod error;
mod format;
pub mod item;
pub mod observer;
mod registry;
pub mod store;

pub use cart::{
    session_key, AddOptions, Cart, ItemUpdate, MergeOptions, Totals, UpdateOutcome,
    DEFAULT_INSTANCE,
};
pub use config::{CartConfig, ConfigError, CurrencyFormat, NumberFormat, Placement};
pub use error::CartError;
pub use item::{
    row_id, Associable, Association, Buyable, ItemAttributes, ItemChanges, ItemOptions,
    ItemSource, LineItem, ModelRegistry,
};
#[cfg(feature = "emitter")]
pub use observer::EmitterObserver;
pub use observer::{CartEvent, CartObserver, LogObserver, ObserverError};
pub use registry::CartRegistry;
pub use store::{DurableStore, InMemoryStore, SessionStore, StoreError, StoredCart};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;

// Re-export Decimal so callers can build amounts without naming rust_decimal
pub use rust_decimal::Decimal;
