//! Presence-aware optional values.
//!
//! Airbyte distinguishes a field that was never supplied from one that was
//! supplied with a zero value: sending `"news": false` turns news off, while
//! omitting `news` keeps the server default. [`Optional`] carries that
//! distinction through both translation directions.
//!
//! # Example
//!
//! ```
//! use airbyte_provider::Optional;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Body {
//!     #[serde(skip_serializing_if = "Optional::is_unset")]
//!     news: Optional<bool>,
//!     #[serde(skip_serializing_if = "Optional::is_unset")]
//!     email: Optional<String>,
//! }
//!
//! let body = Body { news: Optional::Present(false), email: Optional::Unset };
//! assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"news":false}"#);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value that is either explicitly present or was never set.
///
/// JSON `null` and a missing key (with `#[serde(default)]`) both decode to
/// [`Optional::Unset`]. `Unset` serializes as `null`; wire types skip it
/// entirely with `skip_serializing_if = "Optional::is_unset"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Optional<T> {
    /// The field was not supplied.
    Unset,
    /// The field was supplied with this value (which may be a zero value).
    Present(T),
}

impl<T> Optional<T> {
    /// Returns `true` if a value is present.
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns `true` if no value is present.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Borrow the contained value.
    pub fn as_ref(&self) -> Optional<&T> {
        match self {
            Self::Present(v) => Optional::Present(v),
            Self::Unset => Optional::Unset,
        }
    }

    /// Returns the present value, if any.
    pub fn as_present(&self) -> Option<&T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Unset => None,
        }
    }

    /// Converts into a standard [`Option`].
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Unset => None,
        }
    }

    /// Maps the present value.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Optional<U> {
        match self {
            Self::Present(v) => Optional::Present(f(v)),
            Self::Unset => Optional::Unset,
        }
    }

    /// Returns the present value or `default`.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Present(v) => v,
            Self::Unset => default,
        }
    }

    /// Returns the present value or `T::default()`.
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Self::Present(v) => v,
            Self::Unset => T::default(),
        }
    }

    /// Returns `self` if present, otherwise `other`.
    pub fn or(self, other: Optional<T>) -> Optional<T> {
        match self {
            Self::Present(_) => self,
            Self::Unset => other,
        }
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Present(v),
            None => Self::Unset,
        }
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.into_option()
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(v) => v.serialize(serializer),
            Self::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Into::into)
    }
}
