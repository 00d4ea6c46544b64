#![forbid(unsafe_code)]

//! Stable identifiers for collections and items.
//!
//! Hosts assign ids to the elements they render; the engine only compares and
//! hashes them. `0` is reserved so ids are always non-zero.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a rendered collection (the parent element of a list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(u64);

/// Identifier of a rendered item (one child element of a collection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

macro_rules! impl_id {
    ($name:ident, $label:literal) => {
        impl $name {
            /// Lowest valid id.
            pub const MIN: Self = Self(1);

            /// Create a new id, rejecting 0.
            pub fn new(raw: u64) -> Result<Self, IdError> {
                if raw == 0 {
                    return Err(IdError::Zero { kind: $label });
                }
                Ok(Self(raw))
            }

            /// Get the raw numeric value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }

            /// Return the next id, or an error on overflow.
            pub fn checked_next(self) -> Result<Self, IdError> {
                let Some(next) = self.0.checked_add(1) else {
                    return Err(IdError::Overflow { kind: $label });
                };
                Self::new(next)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::MIN
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

impl_id!(CollectionId, "collection");
impl_id!(ItemId, "item");

/// Identifier construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    Zero { kind: &'static str },
    Overflow { kind: &'static str },
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero { kind } => write!(f, "{kind} id must be non-zero"),
            Self::Overflow { kind } => write!(f, "{kind} id overflowed u64"),
        }
    }
}

impl std::error::Error for IdError {}
