//! Identifiers tagged with the entity they belong to.
//!
//! Log entry ids are `BIGSERIAL` keys and are `Copy`. Tenant and user ids come from the identity
//! platform as strings. Both compare, hash and print as their inner value only.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

macro_rules! value_traits {
    ($wrapper:ident) => {
        impl<T> Debug for $wrapper<T> {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                Debug::fmt(&self.0, f)
            }
        }

        impl<T> Display for $wrapper<T> {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                Display::fmt(&self.0, f)
            }
        }

        impl<T> PartialEq for $wrapper<T> {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        impl<T> Eq for $wrapper<T> {}

        impl<T> Hash for $wrapper<T> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl<T> PartialOrd for $wrapper<T> {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl<T> Ord for $wrapper<T> {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.cmp(&other.0)
            }
        }
    };
}

/// Store-assigned key; ordering follows insertion order.
pub struct TypedId<T>(i64, PhantomData<T>);

impl<T> TypedId<T> {
    pub const fn from_i64(id: i64) -> Self {
        Self(id, PhantomData)
    }

    #[must_use]
    pub const fn into_i64(self) -> i64 {
        self.0
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

value_traits!(TypedId);

impl<T> From<i64> for TypedId<T> {
    fn from(value: i64) -> Self {
        Self::from_i64(value)
    }
}

impl<T> From<TypedId<T>> for i64 {
    fn from(value: TypedId<T>) -> Self {
        value.into_i64()
    }
}

/// Externally issued key, kept verbatim.
pub struct TypedKey<T>(String, PhantomData<T>);

impl<T> TypedKey<T> {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into(), PhantomData)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the key is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl<T> Clone for TypedKey<T> {
    fn clone(&self) -> Self {
        Self::new(self.0.clone())
    }
}

value_traits!(TypedKey);

impl<T> AsRef<str> for TypedKey<T> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<T> From<String> for TypedKey<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T> From<&str> for TypedKey<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
