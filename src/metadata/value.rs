//! Dynamically typed values passed to and returned from reflected methods.
//!
//! A [`Value`] either holds a boxed Rust value or is the null sentinel. It remembers the Rust
//! type name of its content so that type mismatches can be reported without the original type
//! at hand.

use std::{
    any::{Any, TypeId},
    fmt,
};

/// A boxed, type-erased argument or return value
pub struct Value {
    inner: Option<Box<dyn Any + Send + Sync>>,
    type_name: &'static str,
}

impl Value {
    /// Display name used for the null sentinel
    pub const NULL_NAME: &'static str = "null";

    /// Wrap a concrete value
    pub fn new<V: Any + Send + Sync>(value: V) -> Self {
        Value {
            inner: Some(Box::new(value)),
            type_name: std::any::type_name::<V>(),
        }
    }

    /// The null sentinel
    #[must_use]
    pub fn null() -> Self {
        Value {
            inner: None,
            type_name: Self::NULL_NAME,
        }
    }

    /// Wrap an optional value, mapping `None` to the null sentinel
    pub fn from_option<V: Any + Send + Sync>(value: Option<V>) -> Self {
        value.map_or_else(Value::null, Value::new)
    }

    /// Returns `true` for the null sentinel
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns `true` if the value holds a `V`
    #[must_use]
    pub fn is<V: Any>(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.is::<V>())
    }

    /// Rust type name of the content, `null` for the null sentinel
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// `TypeId` of the content, `None` for the null sentinel
    #[must_use]
    pub fn rust_type(&self) -> Option<TypeId> {
        self.inner.as_ref().map(|inner| (**inner).type_id())
    }

    /// Borrow the content as a `V`
    #[must_use]
    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.inner.as_ref()?.downcast_ref::<V>()
    }

    /// Take the content as a `V`.
    ///
    /// # Errors
    /// Returns the unchanged value if it is null or holds a different type.
    pub fn downcast<V: Any>(self) -> Result<V, Value> {
        match self.inner {
            Some(inner) => match inner.downcast::<V>() {
                Ok(value) => Ok(*value),
                Err(inner) => Err(Value {
                    inner: Some(inner),
                    type_name: self.type_name,
                }),
            },
            None => Err(Value::null()),
        }
    }

    /// Take the content as an optional `V`, mapping null to `None`.
    ///
    /// # Errors
    /// Returns the unchanged value if it holds a different type.
    pub fn downcast_opt<V: Any>(self) -> Result<Option<V>, Value> {
        if self.is_null() {
            return Ok(None);
        }
        self.downcast::<V>().map(Some)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "Value(null)");
        }
        write!(f, "Value({})", self.type_name)
    }
}
