use std::fmt;

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The row ID is not present in the cart content.
    NotFound { row_id: String },
    /// Malformed identity, negative amounts, out-of-range rates or an
    /// unknown association model.
    Validation(String),
    /// The session or durable store failed.
    Store(StoreError),
}

impl CartError {
    pub(crate) fn not_found(row_id: impl Into<String>) -> Self {
        CartError::NotFound {
            row_id: row_id.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        CartError::Validation(message.into())
    }
}

impl fmt::Display for CartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartError::NotFound { row_id } => {
                write!(f, "the cart does not contain row id {}", row_id)
            }
            CartError::Validation(message) => write!(f, "invalid cart item: {}", message),
            CartError::Store(err) => write!(f, "cart store error: {}", err),
        }
    }
}

impl std::error::Error for CartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CartError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CartError {
    fn from(err: StoreError) -> Self {
        CartError::Store(err)
    }
}
