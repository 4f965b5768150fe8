use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CartError;

/// Reference from a line item to an entity owned by the host application.
///
/// The cart never loads the entity; the host resolves `model` + `id` when it
/// needs the full record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    pub model: String,
    pub id: String,
}

impl Association {
    pub fn new(model: impl Into<String>, id: impl Into<String>) -> Self {
        Association {
            model: model.into(),
            id: id.into(),
        }
    }
}

/// Host entity types that line items can be associated with.
pub trait Associable {
    /// Stable model name stored in the association.
    const MODEL: &'static str;
}

/// Set of model names a cart accepts in `associate`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelRegistry {
    models: BTreeSet<String>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model: impl Into<String>) {
        self.models.insert(model.into());
    }

    pub fn register_type<T: Associable>(&mut self) {
        self.register(T::MODEL);
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.register(model);
        self
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.contains(model)
    }

    /// Fails with a validation error when the model was never registered.
    pub fn resolve(&self, model: &str) -> Result<(), CartError> {
        if self.contains(model) {
            Ok(())
        } else {
            Err(CartError::validation(format!(
                "the associated model {} is not registered",
                model
            )))
        }
    }
}
