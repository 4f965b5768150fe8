//! CartRegistry - one cart per instance name, opened on first access.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::cart::Cart;
use crate::config::CartConfig;
use crate::error::CartError;
use crate::item::ModelRegistry;
use crate::observer::CartObserver;
use crate::store::SessionStore;

type ObserverFactory = Box<dyn Fn(&str) -> Box<dyn CartObserver>>;

/// Keeps the open carts of one session.
///
/// Every instance shares the same store (clone-friendly stores share their
/// storage), the same configuration and the same model registry.
pub struct CartRegistry<S> {
    store: S,
    config: CartConfig,
    models: ModelRegistry,
    observer_factory: Option<ObserverFactory>,
    carts: HashMap<String, Cart<S>>,
}

impl<S: SessionStore + Clone> CartRegistry<S> {
    pub fn new(store: S, config: CartConfig) -> Self {
        CartRegistry {
            store,
            config,
            models: ModelRegistry::new(),
            observer_factory: None,
            carts: HashMap::new(),
        }
    }

    pub fn with_models(mut self, models: ModelRegistry) -> Self {
        self.models = models;
        self
    }

    /// Build an observer for every cart opened from now on. The factory
    /// receives the instance name.
    pub fn with_observer_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> Box<dyn CartObserver> + 'static,
    {
        self.observer_factory = Some(Box::new(factory));
        self
    }

    /// Get the cart for `name`, opening it from the session on first access.
    pub fn instance(&mut self, name: &str) -> Result<&mut Cart<S>, CartError> {
        match self.carts.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut cart = Cart::open(name, self.store.clone(), self.config.clone())?
                    .with_models(self.models.clone());
                if let Some(factory) = &self.observer_factory {
                    cart.set_observer(factory(name));
                }
                Ok(entry.insert(cart))
            }
        }
    }

    /// Whether `name` has been opened.
    pub fn is_open(&self, name: &str) -> bool {
        self.carts.contains_key(name)
    }

    /// Names of the opened instances, sorted.
    pub fn instances(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.carts.keys().map(|name| name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Drop the cached cart. Its content stays in the session.
    pub fn close(&mut self, name: &str) -> Option<Cart<S>> {
        self.carts.remove(name)
    }
}
